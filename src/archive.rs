//! Unpacking the downloaded archive.

use crate::error::{FctError, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

/// Unpack every member of `zip_path` into `dest_dir`.
///
/// Content that is not a valid ZIP container, and member data that fails to
/// decompress or to match its checksum, are archive errors. Failures creating
/// or writing the output files are filesystem errors. Members whose names
/// would escape `dest_dir` are rejected by the reader.
pub fn extract_archive(zip_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(zip_path)
        .map_err(|e| FctError::filesystem(zip_path, format!("failed to open archive: {}", e)))?;

    let mut archive = ZipArchive::new(file).map_err(|e| zip_error(zip_path, zip_path, e))?;
    let members = archive.len();

    fs::create_dir_all(dest_dir).map_err(|e| {
        FctError::filesystem(dest_dir, format!("failed to create extraction directory: {}", e))
    })?;
    archive
        .extract(dest_dir)
        .map_err(|e| zip_error(zip_path, dest_dir, e))?;

    tracing::info!(
        archive = %zip_path.display(),
        members,
        dest = %dest_dir.display(),
        "extracted archive"
    );
    Ok(())
}

/// `io_path` names where plain I/O failures happened.
fn zip_error(zip_path: &Path, io_path: &Path, err: ZipError) -> FctError {
    match err {
        // Truncated members and checksum or inflate failures surface as I/O.
        ZipError::Io(e)
            if matches!(e.kind(), io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof) =>
        {
            FctError::archive(zip_path, format!("corrupt member data: {}", e))
        }
        ZipError::Io(e) => FctError::filesystem(io_path, format!("I/O error while extracting: {}", e)),
        other => FctError::archive(zip_path, other),
    }
}
