//! Aggregate marker and accessor generation
//!
//! Dependent compilation units cannot see this unit's source; what they
//! can do is scan the well-known `givens.aggregate` package of the
//! compiled artifact. For every binding root this pass synthesizes one
//! empty marker class whose name deterministically encodes the
//! declaration (and its enclosing scope annotation), plus an accessor
//! function per given binding returning the synthesized implementation.
//! Markers are additive-only: created once, never mutated, never removed.

use crate::context::PassContext;
use crate::names;
use crate::pipeline::CompilerPass;
use crate::runtime::AGGREGATE_PACKAGE;
use givens_core::{
    ClassDecl, DeclId, DeclKind, Expr, FunctionDecl, ModuleFragment, Origin, QualifiedName,
    Result, ScopeRef, Signature, TypeRef,
};

struct MarkerTarget {
    id: DeclId,
    qualified: QualifiedName,
    scope_annotation: Option<QualifiedName>,
    accessor: Option<AccessorKind>,
}

enum AccessorKind {
    /// A given class: the accessor returns its provider.
    Provider(DeclId),
    /// A given function: the accessor returns its reader context.
    Context(DeclId),
}

/// Synthesizes aggregate markers and accessors.
#[derive(Default)]
pub struct AggregatePass {
    markers: usize,
    accessors: usize,
}

impl AggregatePass {
    /// Create the pass.
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_targets(
        module: &ModuleFragment,
        ctx: &PassContext,
    ) -> Result<Vec<MarkerTarget>> {
        let mut targets = Vec::new();
        for decl in module.decls() {
            if !matches!(decl.origin, Origin::Source) {
                continue;
            }
            if decl.binding_categories().is_empty() {
                continue;
            }
            if ctx.aggregated.contains(&decl.id) {
                continue;
            }
            let qualified = module.qualified_name(decl.id)?;
            let accessor = if decl.is_given() {
                match &decl.kind {
                    DeclKind::Class(_) => ctx
                        .implementations
                        .get(&qualified)
                        .copied()
                        .map(AccessorKind::Provider),
                    DeclKind::Function(_) => ctx
                        .reader_contexts
                        .get(&ctx.transforms.current(decl.id))
                        .copied()
                        .map(AccessorKind::Context),
                    DeclKind::Property(_) => None,
                }
            } else {
                None
            };
            targets.push(MarkerTarget {
                id: decl.id,
                qualified,
                scope_annotation: decl.scoped_to().cloned(),
                accessor,
            });
        }
        Ok(targets)
    }
}

impl CompilerPass for AggregatePass {
    fn name(&self) -> &str {
        "aggregate"
    }

    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        _graph: &mut crate::graph::DeclarationGraph,
    ) -> Result<()> {
        let targets = Self::collect_targets(module, ctx)?;
        if targets.is_empty() {
            return Ok(());
        }
        let file = module.add_file(
            QualifiedName::from_dotted(AGGREGATE_PACKAGE),
            "aggregates.gv",
            Origin::Synthesized,
        )?;
        for target in targets {
            module.add_decl(
                ScopeRef::File(file),
                names::marker_name(target.scope_annotation.as_ref(), &target.qualified),
                Origin::Synthesized,
                Vec::new(),
                DeclKind::Class(ClassDecl::default()),
            )?;
            ctx.aggregated.insert(target.id);
            self.markers += 1;
            ctx.stats.markers_synthesized += 1;

            let Some(accessor) = target.accessor else {
                continue;
            };
            let artifact = match accessor {
                AccessorKind::Provider(provider) => provider,
                AccessorKind::Context(context) => context,
            };
            let artifact_qn = module.qualified_name(artifact)?;
            let body = module.add_expr(Expr::ConstructorCall {
                class: artifact_qn.clone(),
                args: Vec::new(),
            })?;
            module.add_decl(
                ScopeRef::File(file),
                names::accessor_name(&target.qualified),
                Origin::Synthesized,
                Vec::new(),
                DeclKind::Function(FunctionDecl {
                    signature: Signature::returning(TypeRef::named(artifact_qn)),
                    body: Some(body),
                }),
            )?;
            self.accessors += 1;
            ctx.stats.accessors_synthesized += 1;
        }
        tracing::debug!(
            markers = self.markers,
            accessors = self.accessors,
            "aggregate namespace populated"
        );
        Ok(())
    }

    fn stats(&self) -> String {
        format!(
            "{} pass: {} markers, {} accessors",
            self.name(),
            self.markers,
            self.accessors
        )
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
