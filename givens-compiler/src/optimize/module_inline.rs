//! Module accessor inlining
//!
//! Zero-parameter functions of module-annotated classes are thin
//! forwarders; calling through them costs an extra frame for nothing.
//! This pass inlines their bodies at the call site via subtree copy.

use crate::context::PassContext;
use crate::pipeline::CompilerPass;
use crate::visit;
use givens_core::{DeclKind, Expr, ExprId, ModuleFragment, QualifiedName, Result};
use rustc_hash::FxHashMap;

/// Inlines module accessor calls.
#[derive(Default)]
pub struct ModuleInlinePass {
    inlined: usize,
}

impl ModuleInlinePass {
    /// Create the pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-parameter module member functions with a body.
    fn inlinable(module: &ModuleFragment) -> Result<FxHashMap<QualifiedName, ExprId>> {
        let mut inlinable = FxHashMap::default();
        for decl in module.decls() {
            let Some(class) = decl.as_class() else {
                continue;
            };
            if !decl.is_module() {
                continue;
            }
            for &member in &class.members {
                let member_decl = module.decl(member)?;
                if let DeclKind::Function(function) = &member_decl.kind {
                    if function.signature.params.is_empty() {
                        if let Some(body) = function.body {
                            inlinable.insert(module.qualified_name(member)?, body);
                        }
                    }
                }
            }
        }
        Ok(inlinable)
    }
}

impl CompilerPass for ModuleInlinePass {
    fn name(&self) -> &str {
        "module-inline"
    }

    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        _graph: &mut crate::graph::DeclarationGraph,
    ) -> Result<()> {
        let inlinable = Self::inlinable(module)?;
        if inlinable.is_empty() {
            return Ok(());
        }
        let mut inlined = 0usize;
        for (owner, root) in visit::expr_roots(module) {
            let owner_qn = module.qualified_name(owner)?;
            visit::rewrite_exprs(module, root, &mut |module, _id, expr| {
                let Expr::Call(call) = expr else {
                    return Ok(None);
                };
                if !call.args.is_empty() || call.receiver.is_some() {
                    return Ok(None);
                }
                // Never inline an accessor into itself.
                if call.callee == owner_qn {
                    return Ok(None);
                }
                let Some(&body) = inlinable.get(&call.callee) else {
                    return Ok(None);
                };
                let copied = module.copy_expr(body)?;
                let replacement = module.expr(copied)?.clone();
                inlined += 1;
                Ok(Some(replacement))
            })?;
        }
        self.inlined += inlined;
        ctx.stats.calls_inlined += inlined;
        Ok(())
    }

    fn stats(&self) -> String {
        format!("{} pass: {} calls inlined", self.name(), self.inlined)
    }
}

#[cfg(test)]
#[path = "module_inline_tests.rs"]
mod tests;
