pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod naming;
pub mod process;

pub use config::Config;
pub use error::{Result, StormError};
