//! Compilation statistics tracking

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters collected over one pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileStats {
    /// Number of declarations before the run
    pub decls_before: usize,
    /// Number of declarations after the run
    pub decls_after: usize,
    /// Number of functions given a transformed form
    pub functions_transformed: usize,
    /// Number of decoys spliced in for changed signatures
    pub decoys_inserted: usize,
    /// Number of provider classes synthesized for given classes
    pub providers_synthesized: usize,
    /// Number of component implementation classes synthesized
    pub components_synthesized: usize,
    /// Number of aggregate marker classes synthesized
    pub markers_synthesized: usize,
    /// Number of accessor functions synthesized
    pub accessors_synthesized: usize,
    /// Number of intrinsic calls resolved
    pub intrinsics_resolved: usize,
    /// Number of constructor calls rewritten to cached-field reads
    pub constructor_calls_cached: usize,
    /// Number of module accessor calls inlined
    pub calls_inlined: usize,
    /// Number of member snapshots refreshed
    pub snapshots_refreshed: usize,
    /// Number of metadata blobs attached
    pub metadata_attached: usize,
    /// Time spent compiling (microseconds)
    pub compile_time_us: u64,
}

impl CompileStats {
    /// Create a new statistics tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Total synthesized declarations of every kind
    pub fn total_synthesized(&self) -> usize {
        self.providers_synthesized
            + self.components_synthesized
            + self.markers_synthesized
            + self.accessors_synthesized
            + self.decoys_inserted
    }
}

impl fmt::Display for CompileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compilation Statistics:")?;
        writeln!(
            f,
            "  Declarations: {} -> {}",
            self.decls_before, self.decls_after
        )?;
        writeln!(f, "  Functions transformed: {}", self.functions_transformed)?;
        writeln!(f, "  Decoys inserted: {}", self.decoys_inserted)?;
        writeln!(f, "  Providers synthesized: {}", self.providers_synthesized)?;
        writeln!(
            f,
            "  Components synthesized: {}",
            self.components_synthesized
        )?;
        writeln!(f, "  Markers synthesized: {}", self.markers_synthesized)?;
        writeln!(f, "  Accessors synthesized: {}", self.accessors_synthesized)?;
        writeln!(f, "  Intrinsics resolved: {}", self.intrinsics_resolved)?;
        writeln!(
            f,
            "  Constructor calls cached: {}",
            self.constructor_calls_cached
        )?;
        writeln!(f, "  Module calls inlined: {}", self.calls_inlined)?;
        writeln!(f, "  Snapshots refreshed: {}", self.snapshots_refreshed)?;
        writeln!(f, "  Metadata blobs attached: {}", self.metadata_attached)?;
        writeln!(
            f,
            "  Time: {:.3}ms",
            self.compile_time_us as f64 / 1000.0
        )?;
        Ok(())
    }
}
