//! Converting Jupyter notebooks into runnable Python scripts.
//!
//! Code cells are copied in order. Everything after the import header runs
//! under `if __name__ == "__main__":`, and `os.getcwd()` is replaced with the
//! script's own directory so relative data lookups keep working when the
//! script is run from elsewhere. Markdown cells become comments.

use crate::error::{FctError, Result};
use crate::fs::atomic_write;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Only this many leading code lines are searched for imports.
const IMPORT_SCAN_LINES: usize = 20;

const MAIN_GUARD: &str = "if __name__ == \"__main__\":\n";
const INDENT: &str = "    ";

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: Source,
}

/// nbformat allows the cell source as one string or a list of lines.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Source {
    Lines(Vec<String>),
    Text(String),
}

impl Default for Source {
    fn default() -> Self {
        Source::Lines(Vec::new())
    }
}

impl Source {
    fn lines(&self) -> Vec<&str> {
        match self {
            Source::Lines(lines) => lines.iter().map(String::as_str).collect(),
            Source::Text(text) => text.split_inclusive('\n').collect(),
        }
    }
}

/// Write `{stem}.py` next to the notebook at `path` and return its path.
pub fn convert_notebook(path: &Path) -> Result<PathBuf> {
    let content = fs::read_to_string(path)
        .map_err(|e| FctError::filesystem(path, format!("failed to read notebook: {}", e)))?;
    let notebook: Notebook = serde_json::from_str(&content)
        .map_err(|e| FctError::filesystem(path, format!("not a valid notebook: {}", e)))?;

    let script = render_script(&notebook);
    let target = path.with_extension("py");
    atomic_write(&target, script.as_bytes())?;

    tracing::debug!(notebook = %path.display(), script = %target.display(), "converted notebook");
    Ok(target)
}

fn is_import(line: &str) -> bool {
    line.starts_with("import") || line.starts_with("from")
}

/// Index of the first code line after the import header.
fn header_end(notebook: &Notebook) -> usize {
    notebook
        .cells
        .iter()
        .filter(|cell| cell.cell_type == "code")
        .flat_map(|cell| cell.source.lines())
        .take(IMPORT_SCAN_LINES)
        .enumerate()
        .filter(|(_, line)| is_import(line))
        .map(|(i, _)| i + 1)
        .last()
        .unwrap_or(0)
}

fn render_script(notebook: &Notebook) -> String {
    let header_end = header_end(notebook);
    let mut out = String::new();
    let mut indent = "";
    let mut code_line = 0;

    for cell in &notebook.cells {
        match cell.cell_type.as_str() {
            "code" => {
                for line in cell.source.lines() {
                    if code_line == header_end {
                        out.push('\n');
                        out.push_str(MAIN_GUARD);
                        indent = INDENT;
                    }
                    let line = if code_line >= header_end {
                        line.replace("os.getcwd()", "os.path.dirname(os.path.abspath(__file__))")
                    } else {
                        line.to_string()
                    };
                    push_line(&mut out, indent, &line);
                    code_line += 1;
                }
                out.push('\n');
            }
            "markdown" => {
                for line in cell.source.lines() {
                    push_line(&mut out, indent, &format!("# {}", line));
                }
                out.push('\n');
            }
            _ => {}
        }
    }

    out
}

fn push_line(out: &mut String, indent: &str, line: &str) {
    let body = line.trim_end_matches(['\n', '\r']);
    if !body.trim().is_empty() {
        out.push_str(indent);
        out.push_str(body.trim_end());
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn notebook_json(cells: &str) -> String {
        format!(
            r#"{{"cells": [{}], "metadata": {{}}, "nbformat": 4, "nbformat_minor": 5}}"#,
            cells
        )
    }

    #[test]
    fn converts_header_and_main_block() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("northing_calibration.ipynb");
        fs::write(
            &path,
            notebook_json(
                r##"{"cell_type": "markdown", "source": ["# Northing calibration\n"]},
                   {"cell_type": "code", "source": ["import os\n", "from pkg.models import load_floris\n", "root_path = os.getcwd()\n", "fi = load_floris()"]}"##,
            ),
        )
        .unwrap();

        let script_path = convert_notebook(&path).unwrap();
        let script = fs::read_to_string(&script_path).unwrap();

        assert_eq!(script_path, temp.path().join("northing_calibration.py"));
        assert_eq!(
            script,
            "# # Northing calibration\n\
             \n\
             import os\n\
             from pkg.models import load_floris\n\
             \n\
             if __name__ == \"__main__\":\n\
             \x20   root_path = os.path.dirname(os.path.abspath(__file__))\n\
             \x20   fi = load_floris()\n\
             \n"
        );
    }

    #[test]
    fn markdown_after_header_is_indented() {
        let notebook: Notebook = serde_json::from_str(&notebook_json(
            r#"{"cell_type": "code", "source": "import numpy as np\nx = np.zeros(3)\n"},
               {"cell_type": "markdown", "source": ["Plot results\n"]}"#,
        ))
        .unwrap();

        let script = render_script(&notebook);

        assert!(script.contains("    x = np.zeros(3)\n"));
        assert!(script.contains("    # Plot results\n"));
    }

    #[test]
    fn notebook_without_imports_guards_everything() {
        let notebook: Notebook = serde_json::from_str(&notebook_json(
            r#"{"cell_type": "code", "source": ["print('hi')\n"]}"#,
        ))
        .unwrap();

        let script = render_script(&notebook);

        assert!(script.starts_with("\nif __name__ == \"__main__\":\n    print('hi')\n"));
    }

    #[test]
    fn getcwd_in_header_is_kept() {
        let notebook: Notebook = serde_json::from_str(&notebook_json(
            r#"{"cell_type": "code", "source": ["import os; os.getcwd()\n", "from x import y\n"]}"#,
        ))
        .unwrap();

        assert!(render_script(&notebook).starts_with("import os; os.getcwd()\n"));
    }

    #[test]
    fn invalid_notebook_is_filesystem_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.ipynb");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            convert_notebook(&path),
            Err(FctError::Filesystem { .. })
        ));
        assert!(!temp.path().join("broken.py").exists());
    }
}
