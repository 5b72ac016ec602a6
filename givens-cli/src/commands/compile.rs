//! `givens compile` - run the pipeline over a serialized fragment

use anyhow::{bail, Context, Result};
use givens_compiler::{CompileConfig, CompileLevel, CompilePipeline};
use givens_core::ModuleFragment;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Arguments of the compile subcommand.
pub struct CompileArgs {
    /// Input module fragment (JSON).
    pub input: PathBuf,
    /// Output path; defaults to `<input>.out.json`.
    pub output: Option<PathBuf>,
    /// Compile level name.
    pub level: String,
    /// Optional IR dump directory.
    pub dump_ir: Option<PathBuf>,
    /// Skip aggregate synthesis.
    pub no_aggregates: bool,
    /// Print statistics.
    pub stats: bool,
}

fn parse_level(level: &str) -> Result<CompileLevel> {
    Ok(match level {
        "transform" => CompileLevel::Transform,
        "standard" => CompileLevel::Standard,
        "aggressive" => CompileLevel::Aggressive,
        other => bail!("unknown compile level: {other}"),
    })
}

/// Run the compile subcommand.
pub fn run(args: CompileArgs) -> Result<()> {
    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let mut module: ModuleFragment =
        serde_json::from_str(&json).with_context(|| format!("parsing {}", args.input.display()))?;

    let mut config = CompileConfig::for_level(parse_level(&args.level)?);
    config.dump_dir = args.dump_ir;
    if args.no_aggregates {
        config.synthesize_aggregates = false;
    }

    let mut pipeline = CompilePipeline::new(config);
    let stats = pipeline.compile(&mut module)?;
    info!(module = %module.name, "compilation finished");

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("out.json"));
    let rendered = serde_json::to_string_pretty(&module)?;
    fs::write(&output, rendered).with_context(|| format!("writing {}", output.display()))?;
    info!(output = %output.display(), "transformed fragment written");

    if args.stats {
        print!("{stats}");
    }
    Ok(())
}
