//! Singleton instance caching
//!
//! A given singleton class with a zero-parameter constructor gets one
//! static lazy `INSTANCE` field initialized by a single constructor call.
//! Every other constructor call site in the module is rewritten into a
//! read of that same cached field. This generates the runtime-visible
//! lazy-field pattern; the pass itself runs single-threaded like the rest
//! of the pipeline.

use crate::context::PassContext;
use crate::pipeline::CompilerPass;
use crate::visit;
use givens_core::{
    DeclId, Expr, Field, ModuleFragment, Origin, QualifiedName, Result, TypeRef,
};

/// Name of the cached instance field.
pub const INSTANCE_FIELD: &str = "INSTANCE";

/// Caches singleton construction in a static field.
#[derive(Default)]
pub struct SingletonCachePass {
    cached_reads: usize,
}

impl SingletonCachePass {
    /// Create the pass.
    pub fn new() -> Self {
        Self::default()
    }

    fn singleton_targets(module: &ModuleFragment) -> Result<Vec<(DeclId, QualifiedName)>> {
        let mut targets = Vec::new();
        for decl in module.decls() {
            if matches!(decl.origin, Origin::External) {
                continue;
            }
            let Some(class) = decl.as_class() else {
                continue;
            };
            if !decl.is_given() || !decl.is_singleton() {
                continue;
            }
            let zero_arg =
                class.constructors.len() == 1 && class.constructors[0].params.is_empty();
            if !zero_arg {
                continue;
            }
            if class.fields.iter().any(|f| f.name == INSTANCE_FIELD) {
                continue;
            }
            targets.push((decl.id, module.qualified_name(decl.id)?));
        }
        Ok(targets)
    }
}

impl CompilerPass for SingletonCachePass {
    fn name(&self) -> &str {
        "singleton-cache"
    }

    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        _graph: &mut crate::graph::DeclarationGraph,
    ) -> Result<()> {
        for (class_id, class_qn) in Self::singleton_targets(module)? {
            let init = module.add_expr(Expr::ConstructorCall {
                class: class_qn.clone(),
                args: Vec::new(),
            })?;
            if let Some(class) = module.decl_mut(class_id)?.as_class_mut() {
                class.fields.push(Field {
                    name: INSTANCE_FIELD.to_string(),
                    ty: TypeRef::named(class_qn.clone()),
                    is_static: true,
                    lazy: true,
                    initializer: Some(init),
                });
            }

            // Every construction outside the initializer reads the field.
            let mut cached = 0usize;
            for (_owner, root) in visit::expr_roots(module) {
                visit::rewrite_exprs(module, root, &mut |_module, id, expr| {
                    if id == init {
                        return Ok(None);
                    }
                    match expr {
                        Expr::ConstructorCall { class, .. } if class == &class_qn => {
                            cached += 1;
                            Ok(Some(Expr::CachedFieldRead {
                                class: class_qn.clone(),
                                field: INSTANCE_FIELD.to_string(),
                            }))
                        }
                        _ => Ok(None),
                    }
                })?;
            }
            self.cached_reads += cached;
            ctx.stats.constructor_calls_cached += cached;
        }
        Ok(())
    }

    fn stats(&self) -> String {
        format!(
            "{} pass: {} constructor calls cached",
            self.name(),
            self.cached_reads
        )
    }
}

#[cfg(test)]
#[path = "singleton_cache_tests.rs"]
mod tests;
