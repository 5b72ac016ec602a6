//! `keyOf<T>()` resolution
//!
//! Rewrites every `keyOf<T>(qualifiers...)` call into a fully resolved
//! key literal. A parameterized `T` produces a parameterized key that
//! recurses into the type arguments; qualifiers fold into the key so
//! differently-qualified equal types never collide. Rewriting the same
//! `T` and qualifiers twice yields structurally equal literals.

use crate::context::PassContext;
use crate::pipeline::CompilerPass;
use crate::runtime;
use crate::visit;
use givens_core::{BindingKey, CompileError, Expr, ModuleFragment, Result};

/// Resolves key-of intrinsics.
#[derive(Default)]
pub struct KeyOfResolver {
    resolved: usize,
}

impl KeyOfResolver {
    /// Create the resolver.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompilerPass for KeyOfResolver {
    fn name(&self) -> &str {
        "key-of"
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
            visit::rewrite_exprs(module, root, &mut |module, _id, expr| {
                let Expr::Call(call) = expr else {
                    return Ok(None);
                };
                if call.callee != runtime::key_of() {
                    return Ok(None);
                }
                let Some(ty) = call.type_args.first() else {
                    return Err(CompileError::Malformed {
                        name: owner_name.clone(),
                        reason: "keyOf requires a type argument".into(),
                    });
                };
                let qualifiers = super::literal_qualifiers(module, &call.args, &owner_name)?;
                resolved += 1;
                Ok(Some(Expr::KeyLiteral(BindingKey::of(ty, &qualifiers))))
            })?;
        }
        self.resolved += resolved;
        ctx.stats.intrinsics_resolved += resolved;
        Ok(())
    }

    fn stats(&self) -> String {
        format!("{} pass: {} keys resolved", self.name(), self.resolved)
    }
}

#[cfg(test)]
#[path = "key_of_tests.rs"]
mod tests;
