//! Declaration graph
//!
//! Domain-specific queries over the declaration index. Every query pulls
//! raw candidates from a bucket, filters them by the shape predicates of
//! that binding kind, maps each survivor through the transform map so
//! callers always see the current (post-transform) form, and drops
//! candidates that never received a synthesized context or provider,
//! since those were not actually usable bindings. Results are memoized for the
//! lifetime of the run; appending new declarations mid-run is safe
//! because the index was built from the pre-mutation tree.

use crate::context::PassContext;
use crate::index::DeclarationIndex;
use givens_core::{
    BindingCategory, BindingKey, DeclId, DeclKind, IndexKey, ModuleFragment, Result,
};
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Query {
    Givens(String),
    MapEntries(String),
    SetElements(String),
    RootFactories,
    RunReaderContexts(DeclId),
}

/// Memoizing query layer over the [`DeclarationIndex`].
#[derive(Debug)]
pub struct DeclarationGraph {
    index: DeclarationIndex,
    memo: FxHashMap<Query, Vec<DeclId>>,
}

impl DeclarationGraph {
    /// Wrap an index built from the pre-mutation tree.
    pub fn new(index: DeclarationIndex) -> Self {
        Self {
            index,
            memo: FxHashMap::default(),
        }
    }

    /// The underlying index.
    pub fn index(&self) -> &DeclarationIndex {
        &self.index
    }

    /// Given bindings matching the key, in discovery order, mapped to
    /// their current form.
    pub fn givens(
        &mut self,
        module: &ModuleFragment,
        ctx: &PassContext,
        key: &BindingKey,
    ) -> Result<Vec<DeclId>> {
        let query = Query::Givens(key.canonical());
        if let Some(hit) = self.memo.get(&query) {
            trace!(key = %key, "graph memo hit");
            return Ok(hit.clone());
        }
        let index_key = IndexKey::new(BindingCategory::Given, key.canonical());
        let mut out = Vec::new();
        for id in self.index.all_indices(&index_key) {
            let decl = module.decl(id)?;
            if !decl.is_given() {
                continue;
            }
            let usable = match &decl.kind {
                // A given class is usable once its provider exists; the
                // provider pass rejects shape violations before this runs.
                DeclKind::Class(class) => {
                    class.constructors.len() == 1
                        && ctx
                            .implementations
                            .contains_key(&module.qualified_name(id)?)
                }
                DeclKind::Function(_) => {
                    ctx.reader_contexts.contains_key(&ctx.transforms.current(id))
                }
                DeclKind::Property(_) => false,
            };
            if usable {
                out.push(ctx.transforms.current(id));
            }
        }
        self.memo.insert(query, out.clone());
        Ok(out)
    }

    /// Map-entry contributions to the named map binding.
    pub fn given_map_entries(
        &mut self,
        module: &ModuleFragment,
        ctx: &PassContext,
        map_key: &str,
    ) -> Result<Vec<DeclId>> {
        self.keyed_contributions(
            module,
            ctx,
            Query::MapEntries(map_key.to_string()),
            IndexKey::new(BindingCategory::MapEntry, map_key),
        )
    }

    /// Set-element contributions to the named set binding.
    pub fn given_set_elements(
        &mut self,
        module: &ModuleFragment,
        ctx: &PassContext,
        set_key: &str,
    ) -> Result<Vec<DeclId>> {
        self.keyed_contributions(
            module,
            ctx,
            Query::SetElements(set_key.to_string()),
            IndexKey::new(BindingCategory::SetElement, set_key),
        )
    }

    fn keyed_contributions(
        &mut self,
        module: &ModuleFragment,
        ctx: &PassContext,
        query: Query,
        index_key: IndexKey,
    ) -> Result<Vec<DeclId>> {
        if let Some(hit) = self.memo.get(&query) {
            return Ok(hit.clone());
        }
        let mut out = Vec::new();
        for id in self.index.function_indices(&index_key) {
            let current = ctx.transforms.current(*id);
            if ctx.reader_contexts.contains_key(&current) {
                out.push(current);
            }
        }
        self.memo.insert(query, out.clone());
        Ok(out)
    }

    /// Every root-context factory of the module, across all contexts, in
    /// discovery order.
    pub fn root_context_factories(
        &mut self,
        module: &ModuleFragment,
        ctx: &PassContext,
    ) -> Result<Vec<DeclId>> {
        if let Some(hit) = self.memo.get(&Query::RootFactories) {
            return Ok(hit.clone());
        }
        let mut out = Vec::new();
        for key in self.index.keys_with_category(BindingCategory::RootFactory) {
            for id in self.index.all_indices(&key) {
                let decl = module.decl(id)?;
                let Some(context) = decl.root_factory_context() else {
                    continue;
                };
                // Usable once the component impl for its context exists.
                if ctx.implementations.contains_key(context) {
                    out.push(ctx.transforms.current(id));
                }
            }
        }
        self.memo.insert(Query::RootFactories, out.clone());
        Ok(out)
    }

    /// Contexts entered from `context` through resolved reader calls.
    pub fn run_reader_contexts(&mut self, ctx: &PassContext, context: DeclId) -> Vec<DeclId> {
        let query = Query::RunReaderContexts(context);
        if let Some(hit) = self.memo.get(&query) {
            return hit.clone();
        }
        let out = ctx
            .run_reader_links
            .get(&context)
            .cloned()
            .unwrap_or_default();
        self.memo.insert(query, out.clone());
        out
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
