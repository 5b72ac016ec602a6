//! Pass-scoped compilation state
//!
//! Everything the passes share (the transform map, the decoy set, the
//! synthesized-implementation registry, the reader-context associations)
//! lives in one [`PassContext`] value that the pipeline constructs per run
//! and hands to each pass explicitly. Passes stay composable and testable
//! in isolation; there is no ambient global state.

use crate::stats::CompileStats;
use givens_core::{CompileError, DeclId, ModuleFragment, QualifiedName, Result};
use rustc_hash::{FxHashMap, FxHashSet};

/// The `original -> transformed` map of one pipeline run.
///
/// `transformed == original` means "inspected, no change needed"; a
/// distinct target means the original was replaced for internal call
/// sites. A key is recorded at most once per run.
#[derive(Debug, Default)]
pub struct TransformMap {
    map: FxHashMap<DeclId, DeclId>,
    transformed_values: FxHashSet<DeclId>,
}

impl TransformMap {
    /// The recorded transformed form, if the declaration was visited.
    pub fn transformed(&self, original: DeclId) -> Option<DeclId> {
        self.map.get(&original).copied()
    }

    /// The current form of a declaration: its transformed form when one
    /// was recorded, otherwise the declaration itself.
    pub fn current(&self, decl: DeclId) -> DeclId {
        self.map.get(&decl).copied().unwrap_or(decl)
    }

    /// Whether this declaration *is* the transformed form of some other
    /// original.
    pub fn is_transformed_value(&self, decl: DeclId) -> bool {
        self.transformed_values.contains(&decl)
    }

    /// Record a mapping. Returns the previously recorded target when the
    /// original was already transformed, leaving the map untouched.
    pub fn record(&mut self, original: DeclId, transformed: DeclId) -> Option<DeclId> {
        if let Some(&existing) = self.map.get(&original) {
            return Some(existing);
        }
        self.map.insert(original, transformed);
        if transformed != original {
            self.transformed_values.insert(transformed);
        }
        None
    }

    /// Originals whose transformed form differs from themselves, sorted
    /// by id for deterministic iteration.
    pub fn changed(&self) -> Vec<(DeclId, DeclId)> {
        let mut out: Vec<(DeclId, DeclId)> = self
            .map
            .iter()
            .filter(|(original, transformed)| original != transformed)
            .map(|(&o, &t)| (o, t))
            .collect();
        out.sort_by_key(|(o, _)| *o);
        out
    }
}

/// Decoys created so far: original declaration to its decoy.
#[derive(Debug, Default)]
pub struct DecoySet {
    map: FxHashMap<DeclId, DeclId>,
    decoy_values: FxHashSet<DeclId>,
}

impl DecoySet {
    /// Whether the original already has a decoy.
    pub fn has(&self, original: DeclId) -> bool {
        self.map.contains_key(&original)
    }

    /// Whether this declaration *is* a decoy.
    pub fn is_decoy(&self, decl: DeclId) -> bool {
        self.decoy_values.contains(&decl)
    }

    /// The decoy of an original, if one was created.
    pub fn decoy_of(&self, original: DeclId) -> Option<DeclId> {
        self.map.get(&original).copied()
    }

    /// Record a freshly created decoy.
    pub fn record(&mut self, original: DeclId, decoy: DeclId) {
        self.map.insert(original, decoy);
        self.decoy_values.insert(decoy);
    }

    /// Number of decoys created.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no decoys were created.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Shared state of one pipeline run, dependency-injected into every pass.
#[derive(Debug, Default)]
pub struct PassContext {
    /// The `original -> transformed` function map.
    pub transforms: TransformMap,
    /// Decoys created for changed signatures.
    pub decoys: DecoySet,
    /// Synthesized implementation classes, keyed by the qualified name of
    /// the declaration (or component type) they implement.
    pub implementations: FxHashMap<QualifiedName, DeclId>,
    /// Context class synthesized for each reader/given function (both the
    /// original and the transformed id map to the same context).
    pub reader_contexts: FxHashMap<DeclId, DeclId>,
    /// Contexts entered from within each context via resolved reader
    /// calls, in discovery order.
    pub run_reader_links: FxHashMap<DeclId, Vec<DeclId>>,
    /// Declarations that already received an aggregate marker.
    pub aggregated: FxHashSet<DeclId>,
    /// Counters collected across passes.
    pub stats: CompileStats,
}

impl PassContext {
    /// Fresh context for one pipeline run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transform, failing on double registration.
    pub fn record_transform(
        &mut self,
        module: &ModuleFragment,
        original: DeclId,
        transformed: DeclId,
    ) -> Result<()> {
        if let Some(existing) = self.transforms.record(original, transformed) {
            if existing != transformed {
                return Err(CompileError::Malformed {
                    name: module.qualified_name(original)?.dotted(),
                    reason: "transformed more than once in a single run".into(),
                });
            }
        }
        Ok(())
    }

    /// Record that `from` enters `to` through a resolved reader call.
    pub fn link_contexts(&mut self, from: DeclId, to: DeclId) {
        let entries = self.run_reader_links.entry(from).or_default();
        if !entries.contains(&to) {
            entries.push(to);
        }
    }
}
