//! Single-file editing commands: `rewrite`, `excise` and `convert`.
//!
//! These expose the provisioning primitives directly, for fixing up a
//! project by hand or scripting the template differently.

use crate::cli::{ConvertArgs, ExciseArgs, RewriteArgs};
use crate::error::Result;
use crate::fs::{Substitution, excise_block, rewrite_references};
use crate::notebook::convert_notebook;

/// Execute the `fct-provision rewrite` command.
pub fn cmd_rewrite(args: RewriteArgs) -> Result<()> {
    let substitutions: Vec<Substitution> = args
        .pairs()
        .into_iter()
        .map(|(old, new)| Substitution::new(old, new))
        .collect();

    let changed = rewrite_references(&args.file, &substitutions)?;
    println!("{}: {} line(s) changed", args.file.display(), changed);
    Ok(())
}

/// Execute the `fct-provision excise` command.
pub fn cmd_excise(args: ExciseArgs) -> Result<()> {
    let outcome = excise_block(&args.file, &args.start, &args.end)?;

    println!(
        "{}: {} line(s) removed in {} block(s)",
        args.file.display(),
        outcome.removed_lines,
        outcome.blocks
    );
    if outcome.unterminated {
        println!("Warning: end marker not found; removed through end of file.");
    }
    Ok(())
}

/// Execute the `fct-provision convert` command.
pub fn cmd_convert(args: ConvertArgs) -> Result<()> {
    for notebook in &args.notebooks {
        let script = convert_notebook(notebook)?;
        println!("{} -> {}", notebook.display(), script.display());
    }
    Ok(())
}
