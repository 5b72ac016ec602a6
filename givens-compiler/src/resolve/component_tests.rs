#[cfg(test)]
mod tests {
    use crate::context::PassContext;
    use crate::graph::DeclarationGraph;
    use crate::index::DeclarationIndex;
    use crate::pipeline::CompilerPass;
    use crate::resolve::ComponentIntrinsicResolver;
    use crate::runtime;
    use crate::transform::ComponentSynthesisPass;
    use givens_core::{
        CallExpr, CompileError, DeclKind, Expr, ExprId, FileId, FunctionDecl, ModuleFragment,
        Origin, QualifiedName, ScopeRef, Signature, TypeRef,
    };

    fn module_with_file() -> (ModuleFragment, FileId) {
        let mut module = ModuleFragment::new("app-main");
        let file = module
            .add_file(QualifiedName::from_dotted("p"), "main.gv", Origin::Source)
            .unwrap();
        (module, file)
    }

    fn ty(name: &str) -> TypeRef {
        TypeRef::named(QualifiedName::from_dotted(name))
    }

    fn builder_call(module: &mut ModuleFragment, file: FileId) -> ExprId {
        let arg = module.add_expr(Expr::Int(7)).unwrap();
        let call = module
            .add_expr(Expr::Call(CallExpr {
                callee: runtime::component_builder(),
                type_args: vec![ty("p.AppComponent")],
                args: vec![arg],
                receiver: None,
                receiver_ty: None,
            }))
            .unwrap();
        let body = module.add_expr(Expr::Block(vec![call])).unwrap();
        module
            .add_decl(
                ScopeRef::File(file),
                "build_app",
                Origin::Source,
                vec![],
                DeclKind::Function(FunctionDecl {
                    signature: Signature::returning(ty("p.AppComponent")),
                    body: Some(body),
                }),
            )
            .unwrap();
        call
    }

    #[test]
    fn test_builder_call_becomes_impl_construction() {
        let (mut module, file) = module_with_file();
        let call = builder_call(&mut module, file);

        let index = DeclarationIndex::build(&module).unwrap();
        let mut graph = DeclarationGraph::new(index);
        let mut ctx = PassContext::new();
        ComponentSynthesisPass::new()
            .run(&mut module, &mut ctx, &mut graph)
            .unwrap();
        ComponentIntrinsicResolver::new()
            .run(&mut module, &mut ctx, &mut graph)
            .unwrap();

        match module.expr(call).unwrap() {
            Expr::ConstructorCall { class, args } => {
                assert_eq!(class.dotted(), "p.p_AppComponent_Impl");
                assert_eq!(args.len(), 1, "builder arguments are preserved");
            }
            other => panic!("expected impl construction, got {other:?}"),
        }
        assert_eq!(ctx.stats.components_synthesized, 1);
    }

    #[test]
    fn test_one_impl_per_component_type() {
        let (mut module, file) = module_with_file();
        builder_call(&mut module, file);
        // A second site for the same component type.
        let call = module
            .add_expr(Expr::Call(CallExpr {
                callee: runtime::component_builder(),
                type_args: vec![ty("p.AppComponent")],
                args: vec![],
                receiver: None,
                receiver_ty: None,
            }))
            .unwrap();
        let body = module.add_expr(Expr::Block(vec![call])).unwrap();
        module
            .add_decl(
                ScopeRef::File(file),
                "build_again",
                Origin::Source,
                vec![],
                DeclKind::Function(FunctionDecl {
                    signature: Signature::returning(ty("p.AppComponent")),
                    body: Some(body),
                }),
            )
            .unwrap();

        let index = DeclarationIndex::build(&module).unwrap();
        let mut graph = DeclarationGraph::new(index);
        let mut ctx = PassContext::new();
        ComponentSynthesisPass::new()
            .run(&mut module, &mut ctx, &mut graph)
            .unwrap();
        assert_eq!(ctx.stats.components_synthesized, 1);
        assert_eq!(ctx.implementations.len(), 1);
    }

    #[test]
    fn test_missing_impl_fails_fast() {
        let (mut module, file) = module_with_file();
        builder_call(&mut module, file);

        let index = DeclarationIndex::build(&module).unwrap();
        let mut graph = DeclarationGraph::new(index);
        let mut ctx = PassContext::new();
        // Resolver without the synthesis pass: the counterpart is absent.
        let err = ComponentIntrinsicResolver::new()
            .run(&mut module, &mut ctx, &mut graph)
            .unwrap_err();
        assert!(matches!(err, CompileError::MissingCounterpart { .. }));
    }
}
