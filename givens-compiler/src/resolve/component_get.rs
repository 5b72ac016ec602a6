//! Reified `get<T>()` resolution
//!
//! Rewrites a reified `get<T>(qualifiers...)` call into a non-reified
//! member call taking the precomputed key fingerprint as an integer. The
//! member scope is chosen by the static extension-receiver type at the
//! call site: a component receiver dispatches to `Component.get`, a
//! component owner to `ComponentOwner.get`.

use crate::context::PassContext;
use crate::pipeline::CompilerPass;
use crate::runtime;
use crate::visit;
use givens_core::{BindingKey, CallExpr, CompileError, Expr, ModuleFragment, Result};

/// Resolves reified component-get intrinsics.
#[derive(Default)]
pub struct ComponentGetResolver {
    resolved: usize,
}

impl ComponentGetResolver {
    /// Create the resolver.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompilerPass for ComponentGetResolver {
    fn name(&self) -> &str {
        "component-get"
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
                if call.callee != runtime::get() {
                    return Ok(None);
                }
                let Some(ty) = call.type_args.first() else {
                    return Err(CompileError::Malformed {
                        name: owner_name.clone(),
                        reason: "get requires a type argument".into(),
                    });
                };
                let Some(receiver_ty) = &call.receiver_ty else {
                    return Err(CompileError::Malformed {
                        name: owner_name.clone(),
                        reason: "get requires a component or component-owner receiver".into(),
                    });
                };
                let member = if receiver_ty.classifier == runtime::component_owner_type() {
                    runtime::component_owner_get_member()
                } else if receiver_ty.classifier == runtime::component_type() {
                    runtime::component_get_member()
                } else {
                    return Err(CompileError::Malformed {
                        name: owner_name.clone(),
                        reason: format!(
                            "get receiver must be a component or component owner, got {}",
                            receiver_ty.render()
                        ),
                    });
                };
                let qualifiers = super::literal_qualifiers(module, &call.args, &owner_name)?;
                let fingerprint = BindingKey::of(ty, &qualifiers).fingerprint();
                let key_arg = module.add_expr(Expr::Int(fingerprint as i64))?;
                resolved += 1;
                Ok(Some(Expr::Call(CallExpr {
                    callee: member,
                    type_args: Vec::new(),
                    args: vec![key_arg],
                    receiver: call.receiver,
                    receiver_ty: call.receiver_ty.clone(),
                })))
            })?;
        }
        self.resolved += resolved;
        ctx.stats.intrinsics_resolved += resolved;
        Ok(())
    }

    fn stats(&self) -> String {
        format!("{} pass: {} gets resolved", self.name(), self.resolved)
    }
}

#[cfg(test)]
#[path = "component_get_tests.rs"]
mod tests;
