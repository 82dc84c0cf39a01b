//! The provisioning pipeline.
//!
//! One run turns the generic upstream example corpus into a corpus
//! specialized for one generated project:
//!
//! 1. Acquire the scratch workspace (released on every exit path)
//! 2. Fetch the archive for the branch
//! 3. Extract it into the workspace
//! 4. Rewrite imports in every script and notebook of the category subfolder,
//!    gathering them into a staging subdirectory where the recipe says so
//! 5. Move data files into the project
//! 6. Apply file-specific rewrites
//! 7. Move the subfolder's entries into `python/`
//! 8. Specialize `models.py` and move it, with the FLORIS inputs, into the
//!    project package
//! 9. Optionally convert the notebooks that came from the archive to scripts
//!
//! Failures abort the run and carry the step they happened in. Files already
//! relocated before a failing step stay in place; nothing after it runs.

mod scripts;


use crate::archive::extract_archive;
use crate::config::{Branch, Category, Config};
use crate::context::{ARCHIVE_FILE_NAME, ProjectContext, join_relative};
use crate::error::{FctError, Result, Step};
use crate::fetch::{ArchiveSource, fetch_archive};
use crate::fs::{excise_block, relocate, relocate_to, rewrite_references};
use crate::notebook::convert_notebook;
use crate::recipes::{FLORIS_INPUTS_DEST, MODELS_DEST, MODELS_SOURCE, Recipe};
use crate::workspace::{self, ScratchWorkspace};
use std::fs;
use std::path::{Path, PathBuf};

use scripts::{collect_files_with_extension, collect_scripts};

/// What a successful run wrote.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub branch: Branch,
    pub category: Category,

    /// Every destination path written, files and directories, in write order.
    pub relocated: Vec<PathBuf>,

    /// Scripts generated from provisioned notebooks.
    pub converted: Vec<PathBuf>,

    /// Provisioned notebooks left unconverted because a script of the same
    /// name already existed.
    pub skipped_conversions: Vec<PathBuf>,

    /// Excisions whose end marker was never found.
    pub unterminated_excisions: usize,
}

impl ProvisionReport {
    fn new(branch: Branch, category: Category) -> Self {
        Self {
            branch,
            category,
            relocated: Vec::new(),
            converted: Vec::new(),
            skipped_conversions: Vec::new(),
            unterminated_excisions: 0,
        }
    }
}

/// Runs provisioning for one project.
pub struct Provisioner<'a> {
    config: &'a Config,
    ctx: &'a ProjectContext,
    source: &'a dyn ArchiveSource,
}

impl<'a> Provisioner<'a> {
    pub fn new(config: &'a Config, ctx: &'a ProjectContext, source: &'a dyn ArchiveSource) -> Self {
        Self {
            config,
            ctx,
            source,
        }
    }

    /// Fetch, specialize and relocate the `category` examples from `branch`.
    pub fn provision(&self, branch: Branch, category: Category) -> Result<ProvisionReport> {
        tracing::info!(%branch, %category, project = %self.ctx.project_dir.display(), "provisioning examples");

        let workspace = workspace::acquire(
            &self.ctx.scratch_dir(),
            self.config.stale_workspace_minutes,
            branch,
            category,
        )
        .map_err(|e| e.during(Step::Workspace))?;

        // On error the guard is dropped here and removes the workspace.
        let report = self.run(&workspace, branch, category).inspect_err(|e| {
            if let Some(step) = e.step() {
                tracing::error!(%step, "provisioning step failed");
            }
        })?;

        workspace.release().map_err(|e| e.during(Step::Cleanup))?;
        tracing::info!(
            relocated = report.relocated.len(),
            converted = report.converted.len(),
            "provisioning finished"
        );
        Ok(report)
    }

    fn run(
        &self,
        workspace: &ScratchWorkspace,
        branch: Branch,
        category: Category,
    ) -> Result<ProvisionReport> {
        let zip_path = fetch_archive(
            self.source,
            self.config,
            branch,
            &workspace.join(ARCHIVE_FILE_NAME),
        )
        .map_err(|e| e.during(Step::Fetch))?;

        extract_archive(&zip_path, workspace.path()).map_err(|e| e.during(Step::Extract))?;

        let archive_root = workspace.join(self.config.archive_root_name(branch));
        let subfolder = archive_root.join(category.subfolder());
        if !subfolder.is_dir() {
            return Err(FctError::filesystem(
                &subfolder,
                "archive does not contain the expected example subfolder",
            )
            .during(Step::Extract));
        }

        let recipe = Recipe::for_category(category, &self.ctx.project_slug);
        tracing::info!(
            category = %recipe.category,
            "importing example scripts and customizing them for this project"
        );
        let mut report = ProvisionReport::new(branch, category);

        self.specialize_scripts(&recipe, &subfolder)?;
        self.move_data(&recipe, &subfolder, &mut report)?;
        self.rewrite_files(&recipe, &subfolder)?;

        // Only notebooks from the archive are converted, never the template's own.
        let notebooks = if self.config.convert_notebooks {
            self.provisioned_notebooks(&subfolder)?
        } else {
            Vec::new()
        };

        self.move_scripts(&subfolder, &mut report)?;
        self.specialize_models(&recipe, &archive_root, &mut report)?;
        self.convert_notebooks(&notebooks, &mut report)?;

        Ok(report)
    }

    fn specialize_scripts(&self, recipe: &Recipe, subfolder: &Path) -> Result<()> {
        let scripts = collect_scripts(subfolder).map_err(|e| e.during(Step::Rewrite))?;
        tracing::debug!(count = scripts.len(), "found example scripts");

        for script in &scripts {
            rewrite_references(script, &recipe.script_rewrites)
                .map_err(|e| e.during(Step::Rewrite))?;
        }

        if let Some(stage) = recipe.stage_scripts_into {
            let stage_dir = subfolder.join(stage);
            fs::create_dir_all(&stage_dir).map_err(|e| {
                FctError::filesystem(&stage_dir, format!("failed to create staging directory: {}", e))
                    .during(Step::Relocate)
            })?;

            for script in &scripts {
                if script.parent() == Some(stage_dir.as_path()) {
                    continue;
                }
                let name = script.file_name().ok_or_else(|| {
                    FctError::filesystem(script, "script path has no file name").during(Step::Relocate)
                })?;
                relocate_to(script, &stage_dir.join(name)).map_err(|e| e.during(Step::Relocate))?;
            }
        }
        Ok(())
    }

    fn move_data(&self, recipe: &Recipe, subfolder: &Path, report: &mut ProvisionReport) -> Result<()> {
        for data in &recipe.data_moves {
            let from = join_relative(subfolder, data.from);
            let to = self.ctx.project_path(data.to);
            relocate_to(&from, &to).map_err(|e| e.during(Step::Relocate))?;
            report.relocated.push(to);
        }
        Ok(())
    }

    fn rewrite_files(&self, recipe: &Recipe, subfolder: &Path) -> Result<()> {
        for file in &recipe.file_rewrites {
            let path = join_relative(subfolder, file.path);
            rewrite_references(&path, &file.substitutions).map_err(|e| e.during(Step::Rewrite))?;
        }
        Ok(())
    }

    fn move_scripts(&self, subfolder: &Path, report: &mut ProvisionReport) -> Result<()> {
        let mut entries = fs::read_dir(subfolder)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<std::io::Result<Vec<_>>>()
            })
            .map_err(|e| {
                FctError::filesystem(subfolder, format!("failed to list example subfolder: {}", e))
                    .during(Step::Relocate)
            })?;
        entries.sort();

        let moved = relocate(&entries, &self.ctx.python_dir()).map_err(|e| e.during(Step::Relocate))?;
        report.relocated.extend(moved);
        Ok(())
    }

    fn specialize_models(
        &self,
        recipe: &Recipe,
        archive_root: &Path,
        report: &mut ProvisionReport,
    ) -> Result<()> {
        let models = join_relative(archive_root, MODELS_SOURCE);
        rewrite_references(&models, &recipe.models_rewrites).map_err(|e| e.during(Step::Rewrite))?;

        for excision in &recipe.models_excisions {
            let outcome = excise_block(&models, excision.start, excision.end)
                .map_err(|e| e.during(Step::Rewrite))?;
            if outcome.unterminated {
                report.unterminated_excisions += 1;
            }
        }

        let package_dir = self.ctx.package_dir();
        let inputs_dest = package_dir.join(FLORIS_INPUTS_DEST);
        relocate_to(&join_relative(archive_root, recipe.floris_inputs), &inputs_dest)
            .map_err(|e| e.during(Step::Relocate))?;
        report.relocated.push(inputs_dest);

        let models_dest = package_dir.join(MODELS_DEST);
        relocate_to(&models, &models_dest).map_err(|e| e.during(Step::Relocate))?;
        report.relocated.push(models_dest);
        Ok(())
    }

    /// Where each notebook of `subfolder` will land once moved into `python/`.
    fn provisioned_notebooks(&self, subfolder: &Path) -> Result<Vec<PathBuf>> {
        let python_dir = self.ctx.python_dir();
        let notebooks =
            collect_files_with_extension(subfolder, "ipynb").map_err(|e| e.during(Step::Rewrite))?;
        Ok(notebooks
            .iter()
            .filter_map(|path| path.strip_prefix(subfolder).ok())
            .map(|relative| python_dir.join(relative))
            .collect())
    }

    fn convert_notebooks(&self, notebooks: &[PathBuf], report: &mut ProvisionReport) -> Result<()> {
        for notebook in notebooks {
            let script = notebook.with_extension("py");
            if script.exists() {
                tracing::warn!(
                    notebook = %notebook.display(),
                    script = %script.display(),
                    "script already exists, leaving notebook unconverted"
                );
                report.skipped_conversions.push(notebook.clone());
                continue;
            }
            let script = convert_notebook(notebook).map_err(|e| e.during(Step::Rewrite))?;
            report.converted.push(script);
        }
        Ok(())
    }
}
