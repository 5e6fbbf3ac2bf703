// src/fetch/gunzip.rs

use flate2::read::MultiGzDecoder;
use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};
use tracing::{info, instrument};

use super::download::{part_path, Outcome};
use crate::error::Result;

/// Decompress `src` into `dest` in one streamed pass; skip if `dest` exists.
#[instrument(level = "info", skip_all, fields(src = %src.display(), dest = %dest.display()))]
pub fn gunzip_file(src: &Path, dest: &Path) -> Result<Outcome> {
    if dest.exists() {
        info!("already unzipped, skipping");
        return Ok(Outcome::Skipped);
    }

    let mut decoder = MultiGzDecoder::new(BufReader::new(File::open(src)?));
    let part = part_path(dest);
    let mut out = BufWriter::new(File::create(&part)?);
    let bytes = match io::copy(&mut decoder, &mut out).and_then(|n| out.flush().map(|_| n)) {
        Ok(n) => n,
        Err(e) => {
            drop(out);
            let _ = fs::remove_file(&part);
            return Err(e.into());
        }
    };
    drop(out);
    fs::rename(&part, dest)?;

    info!(bytes, "unzipped");
    Ok(Outcome::Written { bytes })
}
