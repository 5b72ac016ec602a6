#[cfg(test)]
mod tests {
    use crate::visit::*;
    use givens_core::{
        CallExpr, Expr, ModuleFragment, Origin, QualifiedName,
    };

    fn module() -> ModuleFragment {
        let mut module = ModuleFragment::new("app-main");
        module
            .add_file(QualifiedName::from_dotted("p"), "main.gv", Origin::Source)
            .unwrap();
        module
    }

    #[test]
    fn test_children_of_call() {
        let mut module = module();
        let receiver = module.add_expr(Expr::ParamRef("self".into())).unwrap();
        let arg = module.add_expr(Expr::Int(1)).unwrap();
        let call = module
            .add_expr(Expr::Call(CallExpr {
                callee: QualifiedName::from_dotted("p.run"),
                type_args: vec![],
                args: vec![arg],
                receiver: Some(receiver),
                receiver_ty: None,
            }))
            .unwrap();
        let expr = module.expr(call).unwrap().clone();
        assert_eq!(children(&expr), vec![receiver, arg]);
    }

    #[test]
    fn test_rewrite_is_bottom_up() {
        let mut module = module();
        let inner = module.add_expr(Expr::Int(1)).unwrap();
        let block = module.add_expr(Expr::Block(vec![inner])).unwrap();

        let mut order = Vec::new();
        rewrite_exprs(&mut module, block, &mut |_, id, _| {
            order.push(id);
            Ok(None)
        })
        .unwrap();
        assert_eq!(order, vec![inner, block]);
    }

    #[test]
    fn test_rewrite_replaces_in_place() {
        let mut module = module();
        let inner = module.add_expr(Expr::Int(1)).unwrap();
        let block = module.add_expr(Expr::Block(vec![inner])).unwrap();

        rewrite_exprs(&mut module, block, &mut |_, _, expr| {
            Ok(match expr {
                Expr::Int(n) => Some(Expr::Int(n + 41)),
                _ => None,
            })
        })
        .unwrap();
        assert_eq!(module.expr(inner).unwrap(), &Expr::Int(42));
        // The block still references the same child id.
        assert_eq!(module.expr(block).unwrap(), &Expr::Block(vec![inner]));
    }

    #[test]
    fn test_walk_visits_every_node() {
        let mut module = module();
        let a = module.add_expr(Expr::Int(1)).unwrap();
        let b = module.add_expr(Expr::Str("two".into())).unwrap();
        let block = module.add_expr(Expr::Block(vec![a, b])).unwrap();

        let mut seen = 0usize;
        walk_exprs(&module, block, &mut |_, _| {
            seen += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, 3);
    }
}
