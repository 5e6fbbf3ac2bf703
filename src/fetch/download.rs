// src/fetch/download.rs

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};
use std::path::{Path, PathBuf};
use tokio::{
    fs,
    io::{AsyncWriteExt, BufWriter},
};
use tracing::{info, instrument};
use url::Url;

use crate::error::Result;

/// Write buffer size for streamed downloads.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// What a fetch-stage step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Destination already existed; nothing was read or written.
    Skipped,
    Written { bytes: u64 },
}

/// Sibling path written to until a transfer completes.
pub(crate) fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

fn progress_bar(total: u64, label: &str) -> ProgressBar {
    let pb = if total > 0 {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
        );
        pb
    } else {
        // no Content-Length: count bytes without a total
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg} {bytes} ({bytes_per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    };
    pb.set_message(label.to_string());
    pb
}

async fn stream_to_file(resp: Response, part: &Path, pb: &ProgressBar) -> Result<u64> {
    let file = fs::File::create(part).await?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut stream = resp.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
        pb.set_position(written);
    }
    writer.flush().await?;
    Ok(written)
}

/// Stream `url` to `dest`, skipping entirely if `dest` already exists.
///
/// There is no checksum or ETag check: an existing file is trusted as
/// complete. Bytes land in `<dest>.part` first and are renamed on success, so
/// only finished transfers ever occupy `dest`. A failed transfer deletes its
/// `.part` file.
#[instrument(level = "info", skip_all, fields(url = %url, dest = %dest.display()))]
pub async fn download_file(client: &Client, url: &Url, dest: &Path) -> Result<Outcome> {
    if fs::try_exists(dest).await? {
        info!("already exists, skipping download");
        return Ok(Outcome::Skipped);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }

    let resp = client.get(url.clone()).send().await?.error_for_status()?;
    let total = resp.content_length().unwrap_or(0);
    let label = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let pb = progress_bar(total, &label);

    let part = part_path(dest);
    let written = match stream_to_file(resp, &part, &pb).await {
        Ok(n) => n,
        Err(e) => {
            pb.abandon();
            let _ = fs::remove_file(&part).await;
            return Err(e);
        }
    };

    fs::rename(&part, dest).await?;
    pb.finish_and_clear();
    info!(bytes = written, declared = total, "downloaded");

    Ok(Outcome::Written { bytes: written })
}
