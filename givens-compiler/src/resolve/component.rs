//! `Component(...)` builder resolution
//!
//! Rewrites every component builder call into a constructor call of the
//! implementation class synthesized earlier in the pipeline. The impl is
//! located by the deterministic name derived from the component type; a
//! miss is a compiler bug, not user error.

use crate::context::PassContext;
use crate::names;
use crate::pipeline::CompilerPass;
use crate::runtime;
use crate::visit;
use givens_core::{CompileError, Expr, ModuleFragment, Result};

/// Resolves component builder intrinsics.
#[derive(Default)]
pub struct ComponentIntrinsicResolver {
    resolved: usize,
}

impl ComponentIntrinsicResolver {
    /// Create the resolver.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompilerPass for ComponentIntrinsicResolver {
    fn name(&self) -> &str {
        "component-intrinsic"
    }

    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        _graph: &mut crate::graph::DeclarationGraph,
    ) -> Result<()> {
        let mut resolved = 0usize;
        for (owner, root) in visit::expr_roots(module) {
            let owner_name = module.qualified_name(owner)?.dotted();
            let ctx_ref: &PassContext = ctx;
            visit::rewrite_exprs(module, root, &mut |module, _id, expr| {
                let Expr::Call(call) = expr else {
                    return Ok(None);
                };
                if call.callee != runtime::component_builder() {
                    return Ok(None);
                }
                let Some(ty) = call.type_args.first() else {
                    return Err(CompileError::Malformed {
                        name: owner_name.clone(),
                        reason: "component builder call requires a type argument".into(),
                    });
                };
                let implementation = ctx_ref
                    .implementations
                    .get(&ty.classifier)
                    .copied()
                    .ok_or_else(|| CompileError::MissingCounterpart {
                        name: ty.classifier.dotted(),
                        expected: names::component_impl_name(&ty.classifier),
                    })?;
                let class = module.qualified_name(implementation)?;
                resolved += 1;
                Ok(Some(Expr::ConstructorCall {
                    class,
                    args: call.args.clone(),
                }))
            })?;
        }
        self.resolved += resolved;
        ctx.stats.intrinsics_resolved += resolved;
        Ok(())
    }

    fn stats(&self) -> String {
        format!("{} pass: {} components resolved", self.name(), self.resolved)
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
