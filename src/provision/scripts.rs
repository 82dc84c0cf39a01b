//! Finding example scripts inside an extracted category subfolder.

use crate::error::{FctError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Scripts and notebooks at the top of the subfolder or one directory down.
const SCRIPT_PATTERNS: [&str; 4] = ["*.py", "*.ipynb", "*/*.py", "*/*.ipynb"];

/// Deepest directory level the patterns can match.
const MAX_DEPTH: usize = 2;

fn build_globset(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // `*` must not cross directories, so each pattern pins a depth.
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| FctError::Config(format!("invalid script pattern '{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| FctError::Config(format!("failed to compile script patterns: {}", e)))
}

/// Every script under `root` matching the script patterns, sorted.
pub(super) fn collect_scripts(root: &Path) -> Result<Vec<PathBuf>> {
    let globs = build_globset(&SCRIPT_PATTERNS)?;
    let mut files = Vec::new();
    walk(root, root, 1, MAX_DEPTH, &mut files)?;

    let mut scripts: Vec<PathBuf> = files
        .into_iter()
        .filter(|path| {
            path.strip_prefix(root)
                .map(|rel| globs.is_match(to_slash(rel)))
                .unwrap_or(false)
        })
        .collect();
    scripts.sort();
    Ok(scripts)
}

/// `path` itself if it has `extension`, or every such file below it, sorted.
pub(super) fn collect_files_with_extension(path: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let has_extension = |p: &Path| p.extension().is_some_and(|e| e == extension);

    if path.is_file() {
        return Ok(if has_extension(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let mut files = Vec::new();
    if path.is_dir() {
        walk(path, path, 1, usize::MAX, &mut files)?;
    }
    files.retain(|p| has_extension(p));
    files.sort();
    Ok(files)
}

fn walk(root: &Path, dir: &Path, depth: usize, max_depth: usize, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| FctError::filesystem(dir, format!("failed to list directory: {}", e)))?;

    for entry in entries {
        let entry = entry.map_err(|e| FctError::filesystem(dir, format!("failed to list directory: {}", e)))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| FctError::filesystem(&path, format!("failed to stat: {}", e)))?;

        if file_type.is_dir() {
            if depth < max_depth {
                walk(root, &path, depth + 1, max_depth, files)?;
            }
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn collects_two_levels_only() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "top.py");
        touch(root, "analysis.ipynb");
        touch(root, "energy_ratio/ratio.py");
        touch(root, "energy_ratio/deep/too_deep.py");
        touch(root, "energy_ratio/notes.txt");
        touch(root, "README.md");

        let scripts = collect_scripts(root).unwrap();

        assert_eq!(
            scripts,
            vec![
                root.join("analysis.ipynb"),
                root.join("energy_ratio/ratio.py"),
                root.join("top.py"),
            ]
        );
    }

    #[test]
    fn empty_subfolder_has_no_scripts() {
        let temp = TempDir::new().unwrap();
        assert!(collect_scripts(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn files_with_extension_walks_recursively() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "a/b/c/deep.ipynb");
        touch(root, "a/shallow.ipynb");
        touch(root, "a/script.py");

        let found = collect_files_with_extension(&root.join("a"), "ipynb").unwrap();
        assert_eq!(
            found,
            vec![root.join("a/b/c/deep.ipynb"), root.join("a/shallow.ipynb")]
        );

        let single = collect_files_with_extension(&root.join("a/script.py"), "ipynb").unwrap();
        assert!(single.is_empty());
    }
}
