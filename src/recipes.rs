//! Per-category specialization rules.
//!
//! Each upstream example category needs its own import rewrites, data
//! relocations and `models.py` trimming, since `models.py` upstream ships one
//! `load_floris_*` loader per category and the generated project keeps only
//! the selected one, renamed to `load_floris`. The rules live in a static
//! table; [`Recipe::for_category`] renders one row for a concrete project.

use crate::config::Category;
use crate::fs::Substitution;

/// Placeholder in replacement strings for the project's package name.
pub const SLUG_PLACEHOLDER: &str = "{project_slug}";

/// Location of the shared loader module, relative to the archive root.
pub const MODELS_SOURCE: &str = "flasc/examples/models.py";

/// File name of the loader module inside the project package.
pub const MODELS_DEST: &str = "models.py";

/// Directory name of the FLORIS inputs inside the project package.
pub const FLORIS_INPUTS_DEST: &str = "floris_inputs";

type Pair = (&'static str, &'static str);

struct RecipeRow {
    category: Category,
    script_rewrites: &'static [Pair],
    stage_scripts_into: Option<&'static str>,
    data_moves: &'static [Pair],
    file_rewrites: &'static [(&'static str, &'static [Pair])],
    models_rewrites: &'static [Pair],
    models_excisions: &'static [Pair],
    floris_inputs: &'static str,
}

static ARTIFICIAL_DATA: RecipeRow = RecipeRow {
    category: Category::ArtificialData,
    script_rewrites: &[(
        "from flasc.examples.models import load_floris_artificial as load_floris",
        "from {project_slug}.models import load_floris",
    )],
    stage_scripts_into: None,
    data_moves: &[(
        "raw_data_processing/data/raw_artificial_data.zip",
        "common_windfarm_information/raw_artificial_data.zip",
    )],
    file_rewrites: &[(
        "raw_data_processing/filter_ws_power_curves.ipynb",
        &[
            (
                r#"source_path = os.path.join(root_path, \"data\")"#,
                r#"source_path = os.path.join(root_path, \"..\", \"..\", \"common_windfarm_information\")"#,
            ),
            (
                r#"zipfile.extractall(\"data\")"#,
                "zipfile.extractall(source_path)",
            ),
        ],
    )],
    models_rewrites: &[
        ("load_floris_artificial", "load_floris"),
        ("floris_input_artificial", "floris_inputs"),
    ],
    models_excisions: &[
        ("def load_floris_smarteole(", "return (fi, turbine_weights)"),
        (
            "# Load and time the Smarteole FLORIS model",
            "plot_floris_layout(fi,",
        ),
    ],
    floris_inputs: "flasc/examples/floris_input_artificial",
};

static SMARTEOLE: RecipeRow = RecipeRow {
    category: Category::Smarteole,
    script_rewrites: &[(
        "from flasc.examples.models import load_floris_smarteole as load_floris",
        "from {project_slug}.models import load_floris",
    )],
    stage_scripts_into: Some("experiment_analysis"),
    data_moves: &[],
    file_rewrites: &[],
    models_rewrites: &[
        ("load_floris_smarteole", "load_floris"),
        ("floris_input_smarteole", "floris_inputs"),
    ],
    models_excisions: &[
        ("def load_floris_artificial(", "return (fi, turbine_weights)"),
        (
            "# Load and time the artificial FLORIS model",
            "plot_floris_layout(fi,",
        ),
    ],
    floris_inputs: "flasc/examples/floris_input_smarteole",
};

fn row(category: Category) -> &'static RecipeRow {
    match category {
        Category::ArtificialData => &ARTIFICIAL_DATA,
        Category::Smarteole => &SMARTEOLE,
    }
}

/// A `start .. end` marker pair for [`crate::fs::excise_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excision {
    pub start: &'static str,
    pub end: &'static str,
}

/// Substitutions applied to one specific file of the category subfolder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRewrite {
    /// Path relative to the category subfolder, `/`-separated.
    pub path: &'static str,
    pub substitutions: Vec<Substitution>,
}

/// Data file moved out of the category subfolder into the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMove {
    /// Path relative to the category subfolder, `/`-separated.
    pub from: &'static str,
    /// Path relative to the project directory, `/`-separated.
    pub to: &'static str,
}

/// Rendered rules for one category and project.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub category: Category,
    /// Applied to every script and notebook of the subfolder.
    pub script_rewrites: Vec<Substitution>,
    /// Subdirectory of the subfolder that scripts are gathered into.
    pub stage_scripts_into: Option<&'static str>,
    pub data_moves: Vec<DataMove>,
    pub file_rewrites: Vec<FileRewrite>,
    pub models_rewrites: Vec<Substitution>,
    pub models_excisions: Vec<Excision>,
    /// FLORIS input directory, relative to the archive root.
    pub floris_inputs: &'static str,
}

impl Recipe {
    /// Render the recipe for `category` with `project_slug` filled in.
    pub fn for_category(category: Category, project_slug: &str) -> Self {
        let row = row(category);

        let render = |pairs: &[Pair]| -> Vec<Substitution> {
            pairs
                .iter()
                .map(|(old, new)| Substitution::new(*old, new.replace(SLUG_PLACEHOLDER, project_slug)))
                .collect()
        };

        Self {
            category,
            script_rewrites: render(row.script_rewrites),
            stage_scripts_into: row.stage_scripts_into,
            data_moves: row
                .data_moves
                .iter()
                .map(|&(from, to)| DataMove { from, to })
                .collect(),
            file_rewrites: row
                .file_rewrites
                .iter()
                .map(|&(path, pairs)| FileRewrite {
                    path,
                    substitutions: render(pairs),
                })
                .collect(),
            models_rewrites: render(row.models_rewrites),
            models_excisions: row
                .models_excisions
                .iter()
                .map(|&(start, end)| Excision { start, end })
                .collect(),
            floris_inputs: row.floris_inputs,
        }
    }
}

#[cfg(test)]
impl Recipe {
    /// Every substring this recipe replaces.
    pub(crate) fn old_substrings(&self) -> Vec<&str> {
        self.script_rewrites
            .iter()
            .chain(self.file_rewrites.iter().flat_map(|f| f.substitutions.iter()))
            .chain(self.models_rewrites.iter())
            .map(|s| s.old.as_str())
            .collect()
    }
}
