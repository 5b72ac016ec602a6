//! Expression-tree traversal helpers
//!
//! Resolvers and optimization passes share one bottom-up rewrite driver:
//! children are rewritten before their parent, and a rewrite replaces the
//! arena entry in place so every other reference to the id observes the
//! new node.

use givens_core::{DeclId, Expr, ExprId, ModuleFragment, Result};

/// Root expressions of every function body and field initializer in the
/// module, paired with the declaration that owns them. Creation order.
pub fn expr_roots(module: &ModuleFragment) -> Vec<(DeclId, ExprId)> {
    let mut roots = Vec::new();
    for decl in module.decls() {
        match &decl.kind {
            givens_core::DeclKind::Function(f) => {
                if let Some(body) = f.body {
                    roots.push((decl.id, body));
                }
            }
            givens_core::DeclKind::Class(c) => {
                for field in &c.fields {
                    if let Some(init) = field.initializer {
                        roots.push((decl.id, init));
                    }
                }
            }
            givens_core::DeclKind::Property(_) => {}
        }
    }
    roots
}

/// Child expression ids of a node.
pub fn children(expr: &Expr) -> Vec<ExprId> {
    match expr {
        Expr::Call(call) => {
            let mut out = Vec::new();
            if let Some(receiver) = call.receiver {
                out.push(receiver);
            }
            out.extend(call.args.iter().copied());
            out
        }
        Expr::ConstructorCall { args, .. } => args.clone(),
        Expr::Block(items) => items.clone(),
        Expr::Return(Some(value)) => vec![*value],
        _ => Vec::new(),
    }
}

/// Rewrite every expression reachable from `root`, bottom-up. The
/// callback returns `Some(new_expr)` to replace a node and `None` to keep
/// it. Replacement happens in place; ids are stable. The callback gets
/// mutable arena access so it can allocate argument expressions for the
/// node it returns.
pub fn rewrite_exprs<F>(module: &mut ModuleFragment, root: ExprId, rewrite: &mut F) -> Result<()>
where
    F: FnMut(&mut ModuleFragment, ExprId, &Expr) -> Result<Option<Expr>>,
{
    let child_ids = children(module.expr(root)?);
    for child in child_ids {
        rewrite_exprs(module, child, rewrite)?;
    }
    let current = module.expr(root)?.clone();
    if let Some(new_expr) = rewrite(module, root, &current)? {
        *module.expr_mut(root)? = new_expr;
    }
    Ok(())
}

/// Walk every expression reachable from `root`, bottom-up, without
/// mutating anything.
pub fn walk_exprs<F>(module: &ModuleFragment, root: ExprId, visit: &mut F) -> Result<()>
where
    F: FnMut(ExprId, &Expr) -> Result<()>,
{
    let expr = module.expr(root)?;
    for child in children(expr) {
        walk_exprs(module, child, visit)?;
    }
    visit(root, module.expr(root)?)
}

#[cfg(test)]
#[path = "visit_tests.rs"]
mod tests;
