//! Line-oriented, in-place rewriting of example scripts and notebooks.
//!
//! Both operations stream the file once, write kept lines to an [`AtomicFile`]
//! and swap it in at the end. Lines are handled as raw bytes, so line endings
//! and any non-UTF-8 content are preserved byte for byte. When nothing
//! changes the original file is left untouched.

use super::atomic::AtomicFile;
use crate::error::{FctError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// One `old -> new` substring replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub old: String,
    pub new: String,
}

impl Substitution {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Result of [`excise_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExciseOutcome {
    /// Lines dropped from the file, marker lines included.
    pub removed_lines: usize,

    /// Number of times the start marker opened a block.
    pub blocks: usize,

    /// The file ended while still inside a block.
    pub unterminated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExciseState {
    Keep,
    Drop,
}

/// Apply `substitutions`, in order, to every line of `path`.
///
/// Returns the number of lines that changed.
pub fn rewrite_references<P: AsRef<Path>>(path: P, substitutions: &[Substitution]) -> Result<usize> {
    let path = path.as_ref();
    let mut reader = open_lines(path)?;
    let mut out = AtomicFile::create(path)?;
    let mut changed = 0;

    let mut line = Vec::new();
    while read_line(&mut reader, &mut line, path)? {
        let mut rewritten: Option<Vec<u8>> = None;
        for sub in substitutions {
            let current = rewritten.as_deref().unwrap_or(line.as_slice());
            if contains_bytes(current, sub.old.as_bytes()) {
                rewritten = Some(replace_bytes(current, sub.old.as_bytes(), sub.new.as_bytes()));
            }
        }
        match rewritten {
            Some(rewritten) if rewritten != line => {
                changed += 1;
                write_line(&mut out, &rewritten, path)?;
            }
            _ => write_line(&mut out, &line, path)?,
        }
    }

    if changed > 0 {
        out.commit()?;
        tracing::debug!(path = %path.display(), changed, "rewrote references");
    }
    Ok(changed)
}

/// Remove every block running from a line containing `start_marker` through
/// the next line containing `end_marker`, both lines included.
///
/// If `end_marker` never follows, everything from the start line to the end
/// of the file is dropped. That case is flagged in the outcome and logged.
pub fn excise_block<P: AsRef<Path>>(
    path: P,
    start_marker: &str,
    end_marker: &str,
) -> Result<ExciseOutcome> {
    let path = path.as_ref();
    if start_marker.is_empty() || end_marker.is_empty() {
        return Err(FctError::Config(
            "excision markers must not be empty".to_string(),
        ));
    }

    let mut reader = open_lines(path)?;
    let mut out = AtomicFile::create(path)?;
    let mut outcome = ExciseOutcome::default();
    let mut state = ExciseState::Keep;

    let mut line = Vec::new();
    while read_line(&mut reader, &mut line, path)? {
        if state == ExciseState::Keep && contains_bytes(&line, start_marker.as_bytes()) {
            state = ExciseState::Drop;
            outcome.blocks += 1;
        }

        match state {
            ExciseState::Keep => write_line(&mut out, &line, path)?,
            ExciseState::Drop => {
                outcome.removed_lines += 1;
                if contains_bytes(&line, end_marker.as_bytes()) {
                    state = ExciseState::Keep;
                }
            }
        }
    }

    outcome.unterminated = state == ExciseState::Drop;
    if outcome.unterminated {
        tracing::warn!(
            path = %path.display(),
            start_marker,
            end_marker,
            removed = outcome.removed_lines,
            "end marker not found, dropped everything after the start marker"
        );
    }

    if outcome.removed_lines > 0 {
        out.commit()?;
        tracing::debug!(path = %path.display(), removed = outcome.removed_lines, "excised block");
    }
    Ok(outcome)
}

fn open_lines(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .map_err(|e| FctError::filesystem(path, format!("failed to open file: {}", e)))?;
    Ok(BufReader::new(file))
}

/// Read the next line, line ending included. Returns `false` at end of file.
fn read_line(reader: &mut BufReader<File>, line: &mut Vec<u8>, path: &Path) -> Result<bool> {
    line.clear();
    let n = reader
        .read_until(b'\n', line)
        .map_err(|e| FctError::filesystem(path, format!("failed to read line: {}", e)))?;
    Ok(n > 0)
}

fn write_line(out: &mut AtomicFile, line: &[u8], path: &Path) -> Result<()> {
    out.write_all(line)
        .map_err(|e| FctError::filesystem(path, format!("failed to write temporary file: {}", e)))
}

/// Empty needles never match.
fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Replace every non-overlapping occurrence of `old`, scanning left to right.
fn replace_bytes(haystack: &[u8], old: &[u8], new: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;
    while !old.is_empty() && rest.len() >= old.len() {
        if rest.starts_with(old) {
            out.extend_from_slice(new);
            rest = &rest[old.len()..];
        } else {
            out.push(rest[0]);
            rest = &rest[1..];
        }
    }
    out.extend_from_slice(rest);
    out
}
