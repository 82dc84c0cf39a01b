use crate::error::{FctError, Result};
use crate::fetch::ArchiveSource;
use std::cell::RefCell;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use zip::{CompressionMethod, ZipWriter};
use zip::write::SimpleFileOptions;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Build a ZIP archive in memory from `(name, content)` pairs.
pub(crate) fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
    build_zip_bytes(
        &files
            .iter()
            .map(|(name, content)| (*name, content.as_bytes()))
            .collect::<Vec<_>>(),
    )
}

pub(crate) fn build_zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    write_zip(files, SimpleFileOptions::default())
}

/// Like [`build_zip`], but members are stored uncompressed so their bytes
/// can be located and damaged in place.
pub(crate) fn build_stored_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let files: Vec<(&str, &[u8])> = files
        .iter()
        .map(|(name, content)| (*name, content.as_bytes()))
        .collect();
    write_zip(
        &files,
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
    )
}

fn write_zip(files: &[(&str, &[u8])], options: SimpleFileOptions) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Archive source serving one fixed body and recording requested URLs.
pub(crate) struct MemorySource {
    body: Vec<u8>,
    requested: RefCell<Vec<String>>,
}

impl MemorySource {
    pub(crate) fn new(body: Vec<u8>) -> Self {
        Self {
            body,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl ArchiveSource for MemorySource {
    fn open(&self, url: &str) -> Result<Box<dyn Read>> {
        self.requested.borrow_mut().push(url.to_string());
        Ok(Box::new(Cursor::new(self.body.clone())))
    }
}

/// Archive source that always fails like an unreachable host.
pub(crate) struct FailingSource;

impl ArchiveSource for FailingSource {
    fn open(&self, url: &str) -> Result<Box<dyn Read>> {
        Err(FctError::network(url, "server returned HTTP 503"))
    }
}

pub(crate) const MODELS_PY: &str = r#"import os

from floris.tools import FlorisInterface


def load_floris_artificial(wake_model="cc"):
    root_path = os.path.dirname(os.path.abspath(__file__))
    fn = os.path.join(root_path, "floris_input_artificial", "{:s}.yaml".format(wake_model))
    fi = FlorisInterface(fn)
    turbine_weights = None
    return (fi, turbine_weights)


def load_floris_smarteole(wake_model="cc"):
    root_path = os.path.dirname(os.path.abspath(__file__))
    fn = os.path.join(root_path, "floris_input_smarteole", "{:s}.yaml".format(wake_model))
    fi = FlorisInterface(fn)
    turbine_weights = [0, 1, 1, 0, 0, 0, 0]
    return (fi, turbine_weights)


if __name__ == "__main__":
    # Load and time the artificial FLORIS model
    fi, _ = load_floris_artificial()
    plot_floris_layout(fi, plot_terrain=False)

    # Load and time the Smarteole FLORIS model
    fi, _ = load_floris_smarteole()
    plot_floris_layout(fi, plot_terrain=False)
"#;

pub(crate) const FILTER_NOTEBOOK: &str = r#"{
 "cells": [
  {
   "cell_type": "code",
   "metadata": {},
   "source": [
    "import os\n",
    "import zipfile\n",
    "from flasc.examples.models import load_floris_artificial as load_floris\n",
    "root_path = os.getcwd()\n",
    "source_path = os.path.join(root_path, \"data\")\n",
    "with zipfile.ZipFile(os.path.join(source_path, \"raw_artificial_data.zip\")) as zf:\n",
    "    zipfile.extractall(\"data\")\n"
   ]
  }
 ],
 "metadata": {},
 "nbformat": 4,
 "nbformat_minor": 5
}
"#;

pub(crate) const ENERGY_RATIO_PY: &str =
    "from flasc.examples.models import load_floris_artificial as load_floris\n\nfi, _ = load_floris()\n";

pub(crate) const SMARTEOLE_NOTEBOOK: &str = r#"{
 "cells": [
  {
   "cell_type": "code",
   "metadata": {},
   "source": [
    "from flasc.examples.models import load_floris_smarteole as load_floris\n",
    "fi, turbine_weights = load_floris()\n"
   ]
  }
 ],
 "metadata": {},
 "nbformat": 4,
 "nbformat_minor": 5
}
"#;

pub(crate) const SMARTEOLE_HELPER_PY: &str =
    "from flasc.examples.models import load_floris_smarteole as load_floris\n";

/// A small archive laid out like the upstream FLASC repository for `branch`.
pub(crate) fn flasc_archive(branch: &str) -> Vec<u8> {
    let root = format!("flasc-{}", branch);
    let p = |rel: &str| format!("{}/{}", root, rel);
    let files: Vec<(String, Vec<u8>)> = vec![
        (p("README.md"), b"# FLASC\n".to_vec()),
        (p("flasc/examples/models.py"), MODELS_PY.as_bytes().to_vec()),
        (p("flasc/examples/floris_input_artificial/gch.yaml"), b"name: artificial\n".to_vec()),
        (p("flasc/examples/floris_input_smarteole/gch.yaml"), b"name: smarteole\n".to_vec()),
        (
            p("examples_artificial_data/raw_data_processing/filter_ws_power_curves.ipynb"),
            FILTER_NOTEBOOK.as_bytes().to_vec(),
        ),
        (
            p("examples_artificial_data/raw_data_processing/data/raw_artificial_data.zip"),
            vec![0x50, 0x4b, 0x05, 0x06, 0, 0, 0, 0],
        ),
        (
            p("examples_artificial_data/energy_ratio/energy_ratio_analysis.py"),
            ENERGY_RATIO_PY.as_bytes().to_vec(),
        ),
        (
            p("examples_smarteole/07_baseline_energy_ratio_analysis.ipynb"),
            SMARTEOLE_NOTEBOOK.as_bytes().to_vec(),
        ),
        (p("examples_smarteole/analysis/helpers.py"), SMARTEOLE_HELPER_PY.as_bytes().to_vec()),
        (p("examples_smarteole/data/README.txt"), b"downloaded by notebook 02\n".to_vec()),
    ];

    build_zip_bytes(
        &files
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_slice()))
            .collect::<Vec<_>>(),
    )
}
