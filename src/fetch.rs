//! Downloading the upstream source archive.
//!
//! The archive is streamed to disk through a fixed-size buffer, so memory use
//! does not grow with the archive size. Where the bytes come from is behind
//! the [`ArchiveSource`] trait: [`HttpSource`] talks to the archive host,
//! tests substitute an in-memory source.

use crate::config::{Branch, Config};
use crate::error::{FctError, Result};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Something that can open a byte stream for an archive URL.
pub trait ArchiveSource {
    /// Open `url` for reading. Transport and status failures are network errors.
    fn open(&self, url: &str) -> Result<Box<dyn Read>>;
}

/// HTTPS archive source backed by a `ureq` agent.
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    /// Create a source whose requests time out after `timeout` in total.
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl ArchiveSource for HttpSource {
    fn open(&self, url: &str) -> Result<Box<dyn Read>> {
        tracing::debug!(url, "requesting archive");
        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => {
                FctError::network(url, format!("server returned HTTP {}", code))
            }
            other => FctError::network(url, other),
        })?;

        Ok(Box::new(response.into_body().into_reader()))
    }
}

/// Download the archive for `branch` to `dest`, reading `chunk_size` bytes at a time.
///
/// Returns the path written. Read failures are network errors; write
/// failures are filesystem errors.
pub fn fetch_archive(
    source: &dyn ArchiveSource,
    config: &Config,
    branch: Branch,
    dest: &Path,
) -> Result<PathBuf> {
    let url = config.archive_url(branch);
    let mut reader = source.open(&url)?;

    let mut file = File::create(dest)
        .map_err(|e| FctError::filesystem(dest, format!("failed to create archive file: {}", e)))?;

    let mut chunk = vec![0u8; config.chunk_size.max(1)];
    let mut total: u64 = 0;
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FctError::network(&url, format!("download interrupted: {}", e))),
        };
        file.write_all(&chunk[..n])
            .map_err(|e| FctError::filesystem(dest, format!("failed to write archive: {}", e)))?;
        total += n as u64;
    }

    file.sync_all()
        .map_err(|e| FctError::filesystem(dest, format!("failed to sync archive: {}", e)))?;

    tracing::info!(url = %url, bytes = total, path = %dest.display(), "finished downloading archive");
    Ok(dest.to_path_buf())
}
