//! Compilation pipeline
//!
//! One pipeline run is a fixed total order of passes over one module
//! fragment: index -> transform -> resolve intrinsics -> optimize ->
//! patch metadata. The order is load-bearing: each pass consumes maps
//! that only earlier passes populate, so passes must never be reordered.
//! Everything runs single-threaded and synchronously; a run either
//! completes or aborts with a fatal error.

use crate::aggregate::AggregatePass;
use crate::context::PassContext;
use crate::dump;
use crate::graph::DeclarationGraph;
use crate::index::DeclarationIndex;
use crate::metadata::MetadataPass;
use crate::optimize::{ModuleInlinePass, SingletonCachePass};
use crate::resolve::{
    ComponentGetResolver, ComponentIntrinsicResolver, GivenCallResolver, KeyOfResolver,
};
use crate::stats::CompileStats;
use crate::transform::{ComponentSynthesisPass, ProviderSynthesisPass, ReaderContextPass};
use givens_core::{ModuleFragment, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, trace};

/// How much of the pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileLevel {
    /// Transform and resolve only; skip optimizations.
    Transform,
    /// Transform, resolve, and cache singleton construction.
    Standard,
    /// Everything, including module-call inlining.
    Aggressive,
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Selected level.
    pub level: CompileLevel,
    /// Synthesize aggregate markers and accessors.
    pub synthesize_aggregates: bool,
    /// Cache singleton construction in static fields.
    pub cache_singletons: bool,
    /// Inline module accessor calls.
    pub inline_module_calls: bool,
    /// Directory for human-readable IR dumps, if any.
    pub dump_dir: Option<PathBuf>,
}

impl CompileConfig {
    /// Create config for a compile level.
    pub fn for_level(level: CompileLevel) -> Self {
        match level {
            CompileLevel::Transform => Self {
                level,
                synthesize_aggregates: true,
                cache_singletons: false,
                inline_module_calls: false,
                dump_dir: None,
            },
            CompileLevel::Standard => Self {
                level,
                synthesize_aggregates: true,
                cache_singletons: true,
                inline_module_calls: false,
                dump_dir: None,
            },
            CompileLevel::Aggressive => Self {
                level,
                synthesize_aggregates: true,
                cache_singletons: true,
                inline_module_calls: true,
                dump_dir: None,
            },
        }
    }
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self::for_level(CompileLevel::Standard)
    }
}

/// Trait for compiler passes.
pub trait CompilerPass {
    /// Name of the pass.
    fn name(&self) -> &str;

    /// Run the pass over the module.
    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        graph: &mut DeclarationGraph,
    ) -> Result<()>;

    /// Get statistics about the pass.
    fn stats(&self) -> String {
        format!("{} pass completed", self.name())
    }
}

/// The compilation pipeline.
pub struct CompilePipeline {
    config: CompileConfig,
    stats: CompileStats,
}

impl CompilePipeline {
    /// Create a new pipeline.
    pub fn new(config: CompileConfig) -> Self {
        Self {
            config,
            stats: CompileStats::new(),
        }
    }

    fn configure_passes(&self) -> Vec<Box<dyn CompilerPass>> {
        let mut passes: Vec<Box<dyn CompilerPass>> = vec![
            Box::new(ReaderContextPass::new()),
            Box::new(ProviderSynthesisPass::new()),
            Box::new(ComponentSynthesisPass::new()),
        ];
        if self.config.synthesize_aggregates {
            passes.push(Box::new(AggregatePass::new()));
        }
        passes.push(Box::new(KeyOfResolver::new()));
        passes.push(Box::new(ComponentGetResolver::new()));
        passes.push(Box::new(ComponentIntrinsicResolver::new()));
        passes.push(Box::new(GivenCallResolver::new()));
        if self.config.cache_singletons {
            passes.push(Box::new(SingletonCachePass::new()));
        }
        if self.config.inline_module_calls {
            passes.push(Box::new(ModuleInlinePass::new()));
        }
        passes.push(Box::new(MetadataPass::new()));
        passes
    }

    /// Run the full pipeline over a module fragment, in place.
    pub fn compile(&mut self, module: &mut ModuleFragment) -> Result<CompileStats> {
        let start = Instant::now();
        let mut ctx = PassContext::new();
        ctx.stats.decls_before = module.decl_ids().len();

        let index = DeclarationIndex::build(module)?;
        let mut graph = DeclarationGraph::new(index);

        let mut passes = self.configure_passes();
        for pass in &mut passes {
            debug!(pass = pass.name(), "running compiler pass");
            pass.run(module, &mut ctx, &mut graph)?;
            trace!("{}", pass.stats());
        }

        if let Some(dir) = self.config.dump_dir.clone() {
            dump::dump_module(module, &dir)?;
        }

        ctx.stats.decls_after = module.decl_ids().len();
        ctx.stats.compile_time_us = start.elapsed().as_micros() as u64;
        self.stats = ctx.stats.clone();
        Ok(self.stats.clone())
    }

    /// Get statistics of the last run.
    pub fn stats(&self) -> &CompileStats {
        &self.stats
    }
}

impl Default for CompilePipeline {
    fn default() -> Self {
        Self::new(CompileConfig::default())
    }
}
