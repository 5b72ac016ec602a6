//! `givens inspect` - print a readable rendering of a fragment

use anyhow::{Context, Result};
use givens_compiler::dump;
use givens_core::ModuleFragment;
use std::fs;
use std::path::Path;

/// Run the inspect subcommand.
pub fn run(input: &Path) -> Result<()> {
    let json =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let module: ModuleFragment =
        serde_json::from_str(&json).with_context(|| format!("parsing {}", input.display()))?;
    for file_id in module.file_ids() {
        let file = module.file(file_id)?;
        print!("{}", dump::render_file(&module, file)?);
        println!();
    }
    Ok(())
}
