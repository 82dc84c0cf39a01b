//! Atomic file replacement.
//!
//! All in-place edits follow this pattern:
//! 1. Stream new content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Rename it over the original
//!
//! The original is therefore either fully old or fully new, even if the
//! process dies mid-write. On a crash a temporary file named `.{filename}.tmp`
//! may remain next to the target; an [`AtomicFile`] dropped without being
//! committed removes it.

use crate::error::{FctError, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A file being written next to its target, swapped in on [`commit`](Self::commit).
#[derive(Debug)]
pub struct AtomicFile {
    target: PathBuf,
    temp: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl AtomicFile {
    /// Start writing a replacement for `target`.
    pub fn create<P: AsRef<Path>>(target: P) -> Result<Self> {
        let target = target.as_ref().to_path_buf();

        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                FctError::filesystem(parent, format!("failed to create parent directory: {}", e))
            })?;
        }

        let temp = temp_path_for(&target)?;
        let file = File::create(&temp).map_err(|e| {
            FctError::filesystem(&temp, format!("failed to create temporary file: {}", e))
        })?;

        Ok(Self {
            target,
            temp,
            writer: Some(BufWriter::new(file)),
        })
    }

    /// Path of the file that will be replaced.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flush, sync and rename the temporary file over the target.
    ///
    /// Permissions of an existing target are carried over to the new file.
    pub fn commit(mut self) -> Result<()> {
        let result = self.finish();
        if result.is_err() {
            let _ = fs::remove_file(&self.temp);
        }
        result
    }

    fn finish(&mut self) -> Result<()> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => return Ok(()),
        };

        let file = writer.into_inner().map_err(|e| {
            FctError::filesystem(
                &self.temp,
                format!("failed to flush temporary file: {}", e.error()),
            )
        })?;
        file.sync_all().map_err(|e| {
            FctError::filesystem(&self.temp, format!("failed to sync temporary file: {}", e))
        })?;
        drop(file);

        if let Ok(meta) = fs::metadata(&self.target) {
            fs::set_permissions(&self.temp, meta.permissions()).map_err(|e| {
                FctError::filesystem(&self.temp, format!("failed to copy permissions: {}", e))
            })?;
        }

        atomic_replace(&self.temp, &self.target)
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(io::Error::other("atomic file already committed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for AtomicFile {
    fn drop(&mut self) {
        // Still holding the writer means commit never ran.
        if self.writer.take().is_some() {
            let _ = fs::remove_file(&self.temp);
        }
    }
}

/// Atomically write bytes to a file.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let mut file = AtomicFile::create(path)?;
    let target = file.target().to_path_buf();
    file.write_all(content).map_err(|e| {
        FctError::filesystem(&target, format!("failed to write temporary file: {}", e))
    })?;
    file.commit()
}

/// Generate a temporary file path in the same directory as the target.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FctError::filesystem(target, "invalid file path"))?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

/// Rename `source` over `target`, replacing it.
///
/// `std::fs::rename` replaces an existing destination on both POSIX and
/// Windows. Source and target must share a filesystem, which holds because
/// the temporary file is a sibling of the target.
fn atomic_replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        FctError::filesystem(target, format!("failed to atomically replace: {}", e))
    })?;

    sync_parent_dir(target);
    Ok(())
}

/// Persist the directory entry of a renamed file.
#[cfg(unix)]
fn sync_parent_dir(target: &Path) {
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_target: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("models.py");

        atomic_write(&file_path, b"import os\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "import os\n");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("models.py");
        fs::write(&file_path, "original content").unwrap();

        atomic_write(&file_path, b"new content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("python").join("pkg").join("x.py");

        atomic_write(&file_path, b"nested").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "nested");
    }

    #[test]
    fn test_uncommitted_file_leaves_original_and_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("notebook.ipynb");
        fs::write(&file_path, "original").unwrap();

        {
            let mut file = AtomicFile::create(&file_path).unwrap();
            file.write_all(b"half writ").unwrap();
            // dropped without commit, as on an error path
        }

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original");
        assert!(!temp_dir.path().join(".notebook.ipynb.tmp").exists());
    }

    #[test]
    fn test_commit_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        let mut file = AtomicFile::create(&file_path).unwrap();
        file.write_all(b"content").unwrap();
        file.commit().unwrap();

        assert!(!temp_dir.path().join(".test.txt.tmp").exists());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "content");
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("run.py");
        fs::write(&file_path, "old").unwrap();
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o755)).unwrap();

        atomic_write(&file_path, b"new").unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/some/path/file.txt")).unwrap();
        assert_eq!(temp, Path::new("/some/path/.file.txt.tmp"));
    }

    #[test]
    fn test_atomic_write_empty_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");

        atomic_write(&file_path, b"").unwrap();

        assert!(fs::read(&file_path).unwrap().is_empty());
    }
}
