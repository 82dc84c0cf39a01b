//! Moving extracted files into the destination project tree.
//!
//! The scratch workspace and the project may live on different mounts, so a
//! move is always a copy followed by a delete of the source rather than a
//! `rename(2)`. Permissions and modification times are carried over.
//! Directories are merged into existing destination directories; files
//! overwrite existing destination files.

use crate::error::{FctError, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Move each entry of `sources` into `dest_dir`, keeping its file name.
///
/// Returns the destination paths in the order given.
pub fn relocate<P: AsRef<Path>>(sources: &[P], dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut moved = Vec::with_capacity(sources.len());
    for source in sources {
        let source = source.as_ref();
        let name = source
            .file_name()
            .ok_or_else(|| FctError::filesystem(source, "source path has no file name"))?;
        let destination = dest_dir.join(name);
        relocate_to(source, &destination)?;
        moved.push(destination);
    }
    Ok(moved)
}

/// Move a single file or directory to exactly `destination`.
pub fn relocate_to(source: &Path, destination: &Path) -> Result<()> {
    let meta = fs::metadata(source)
        .map_err(|e| FctError::filesystem(source, format!("expected path is missing: {}", e)))?;

    if meta.is_dir() {
        copy_dir_merge(source, destination)?;
        fs::remove_dir_all(source).map_err(|e| {
            FctError::filesystem(
                source,
                format!("copied directory but failed to delete source: {}", e),
            )
        })?;
    } else {
        copy_file(source, destination, &meta)?;
        fs::remove_file(source).map_err(|e| {
            FctError::filesystem(source, format!("copied file but failed to delete source: {}", e))
        })?;
    }

    tracing::debug!(
        from = %source.display(),
        to = %destination.display(),
        "relocated"
    );
    Ok(())
}

fn copy_file(source: &Path, destination: &Path, meta: &fs::Metadata) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FctError::filesystem(parent, format!("failed to create destination directory: {}", e))
        })?;
    }

    if destination.is_dir() {
        return Err(FctError::filesystem(
            destination,
            "destination is a directory, refusing to replace it with a file",
        ));
    }

    // fs::copy carries permission bits over.
    fs::copy(source, destination).map_err(|e| {
        FctError::filesystem(
            destination,
            format!("failed to copy from '{}': {}", source.display(), e),
        )
    })?;

    if let Ok(modified) = meta.modified() {
        let file = File::options().write(true).open(destination).map_err(|e| {
            FctError::filesystem(destination, format!("failed to reopen copied file: {}", e))
        })?;
        file.set_modified(modified).map_err(|e| {
            FctError::filesystem(destination, format!("failed to preserve modification time: {}", e))
        })?;
    }

    Ok(())
}

fn copy_dir_merge(source: &Path, destination: &Path) -> Result<()> {
    if destination.exists() && !destination.is_dir() {
        return Err(FctError::filesystem(
            destination,
            "destination is a file, refusing to replace it with a directory",
        ));
    }
    fs::create_dir_all(destination).map_err(|e| {
        FctError::filesystem(destination, format!("failed to create directory: {}", e))
    })?;

    let entries = fs::read_dir(source)
        .map_err(|e| FctError::filesystem(source, format!("failed to read directory: {}", e)))?;
    for entry in entries {
        let entry = entry
            .map_err(|e| FctError::filesystem(source, format!("failed to read directory: {}", e)))?;
        let from = entry.path();
        let to = destination.join(entry.file_name());
        let meta = fs::metadata(&from)
            .map_err(|e| FctError::filesystem(&from, format!("failed to stat: {}", e)))?;

        if meta.is_dir() {
            copy_dir_merge(&from, &to)?;
        } else {
            copy_file(&from, &to, &meta)?;
        }
    }

    if let Ok(meta) = fs::metadata(source) {
        let _ = fs::set_permissions(destination, meta.permissions());
    }
    Ok(())
}
