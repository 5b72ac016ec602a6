#[cfg(test)]
mod tests {
    use crate::context::PassContext;
    use crate::graph::DeclarationGraph;
    use crate::index::DeclarationIndex;
    use crate::pipeline::CompilerPass;
    use crate::resolve::GivenCallResolver;
    use crate::runtime::{self, CONTEXT_PARAM};
    use crate::transform::{ProviderSynthesisPass, ReaderContextPass};
    use givens_core::{
        Annotation, CallExpr, ClassDecl, CompileError, Constructor, DeclId, DeclKind, Expr,
        ExprId, FileId, FunctionDecl, ModuleFragment, Origin, Param, QualifiedName, ScopeRef,
        Signature, TypeRef,
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

    fn add_given_class(module: &mut ModuleFragment, file: FileId, name: &str) -> DeclId {
        module
            .add_decl(
                ScopeRef::File(file),
                name,
                Origin::Source,
                vec![Annotation::Given],
                DeclKind::Class(ClassDecl {
                    constructors: vec![Constructor { params: vec![] }],
                    ..ClassDecl::default()
                }),
            )
            .unwrap()
    }

    fn given_request(module: &mut ModuleFragment, target: &str) -> ExprId {
        module
            .add_expr(Expr::Call(CallExpr {
                callee: runtime::given(),
                type_args: vec![ty(target)],
                args: vec![],
                receiver: None,
                receiver_ty: None,
            }))
            .unwrap()
    }

    fn add_reader_fn(
        module: &mut ModuleFragment,
        file: FileId,
        name: &str,
        body: ExprId,
    ) -> DeclId {
        module
            .add_decl(
                ScopeRef::File(file),
                name,
                Origin::Source,
                vec![Annotation::Reader],
                DeclKind::Function(FunctionDecl {
                    signature: Signature::returning(ty("p.R")),
                    body: Some(body),
                }),
            )
            .unwrap()
    }

    #[derive(Debug)]
    struct Prepared {
        ctx: PassContext,
    }

    fn run_pipeline_prefix(module: &mut ModuleFragment) -> givens_core::Result<Prepared> {
        let index = DeclarationIndex::build(module)?;
        let mut graph = DeclarationGraph::new(index);
        let mut ctx = PassContext::new();
        ReaderContextPass::new().run(module, &mut ctx, &mut graph)?;
        ProviderSynthesisPass::new().run(module, &mut ctx, &mut graph)?;
        GivenCallResolver::new().run(module, &mut ctx, &mut graph)?;
        Ok(Prepared { ctx })
    }

    #[test]
    fn test_given_request_resolves_to_provider_lookup() {
        let (mut module, file) = module_with_file();
        add_given_class(&mut module, file, "Foo");
        let request = given_request(&mut module, "p.Foo");
        let body = module.add_expr(Expr::Block(vec![request])).unwrap();
        add_reader_fn(&mut module, file, "consume", body);

        run_pipeline_prefix(&mut module).unwrap();

        match module.expr(request).unwrap() {
            Expr::Call(call) => {
                assert_eq!(call.callee.dotted(), "p.p_Foo_Provider.get");
                assert_eq!(call.args.len(), 1);
                assert_eq!(
                    module.expr(call.args[0]).unwrap(),
                    &Expr::ParamRef(CONTEXT_PARAM.into()),
                    "a reader caller passes its own context through"
                );
            }
            other => panic!("expected provider lookup, got {other:?}"),
        }
    }

    #[test]
    fn test_given_request_resolves_to_transformed_function_call() {
        let (mut module, file) = module_with_file();
        let provide_body = module.add_expr(Expr::Block(vec![])).unwrap();
        module
            .add_decl(
                ScopeRef::File(file),
                "provide_config",
                Origin::Source,
                vec![Annotation::Given],
                DeclKind::Function(FunctionDecl {
                    signature: Signature::returning(ty("p.Config")),
                    body: Some(provide_body),
                }),
            )
            .unwrap();
        let request = given_request(&mut module, "p.Config");
        let body = module.add_expr(Expr::Block(vec![request])).unwrap();
        add_reader_fn(&mut module, file, "consume", body);

        let prepared = run_pipeline_prefix(&mut module).unwrap();

        match module.expr(request).unwrap() {
            Expr::Call(call) => {
                assert_eq!(call.callee.dotted(), "p.provide_config");
                assert_eq!(call.args.len(), 1);
            }
            other => panic!("expected direct call, got {other:?}"),
        }
        // Crossing from the consumer's context into the binding's context
        // was recorded.
        let consume = module
            .decls()
            .find(|d| d.name == "consume" && prepared.ctx.transforms.is_transformed_value(d.id))
            .map(|d| d.id)
            .unwrap();
        let from = prepared.ctx.reader_contexts[&consume];
        assert_eq!(prepared.ctx.run_reader_links[&from].len(), 1);
    }

    #[test]
    fn test_missing_binding_fails_fast() {
        let (mut module, file) = module_with_file();
        let request = given_request(&mut module, "p.Missing");
        let body = module.add_expr(Expr::Block(vec![request])).unwrap();
        add_reader_fn(&mut module, file, "consume", body);

        let err = run_pipeline_prefix(&mut module).unwrap_err();
        assert!(matches!(err, CompileError::MissingCounterpart { .. }));
    }

    #[test]
    fn test_stale_call_to_changed_function_gains_context_argument() {
        let (mut module, file) = module_with_file();
        let load_body = module.add_expr(Expr::Block(vec![])).unwrap();
        let load = module
            .add_decl(
                ScopeRef::File(file),
                "load",
                Origin::Source,
                vec![Annotation::Reader],
                DeclKind::Function(FunctionDecl {
                    signature: Signature {
                        type_params: vec![],
                        params: vec![Param::new("x", ty("p.Arg"))],
                        ret: ty("p.Data"),
                    },
                    body: Some(load_body),
                }),
            )
            .unwrap();
        // A plain, non-reader caller still using the old one-argument shape.
        let arg = module.add_expr(Expr::ParamRef("x".into())).unwrap();
        let stale = module
            .add_expr(Expr::Call(CallExpr {
                callee: QualifiedName::from_dotted("p.load"),
                type_args: vec![],
                args: vec![arg],
                receiver: None,
                receiver_ty: None,
            }))
            .unwrap();
        let caller_body = module.add_expr(Expr::Block(vec![stale])).unwrap();
        module
            .add_decl(
                ScopeRef::File(file),
                "caller",
                Origin::Source,
                vec![],
                DeclKind::Function(FunctionDecl {
                    signature: Signature {
                        type_params: vec![],
                        params: vec![Param::new("x", ty("p.Arg"))],
                        ret: ty("p.Data"),
                    },
                    body: Some(caller_body),
                }),
            )
            .unwrap();

        let prepared = run_pipeline_prefix(&mut module).unwrap();
        let transformed = prepared.ctx.transforms.transformed(load).unwrap();
        let context_class = prepared.ctx.reader_contexts[&transformed];

        match module.expr(stale).unwrap() {
            Expr::Call(call) => {
                assert_eq!(call.args.len(), 2, "context argument appended");
                match module.expr(call.args[1]).unwrap() {
                    Expr::ConstructorCall { class, .. } => {
                        assert_eq!(
                            class,
                            &module.qualified_name(context_class).unwrap(),
                            "a non-reader caller enters a fresh context"
                        );
                    }
                    other => panic!("expected context construction, got {other:?}"),
                }
            }
            other => panic!("expected retargeted call, got {other:?}"),
        }
    }

    #[test]
    fn test_given_request_outside_reader_context_is_malformed() {
        let (mut module, file) = module_with_file();
        add_given_class(&mut module, file, "Foo");
        let request = given_request(&mut module, "p.Foo");
        let body = module.add_expr(Expr::Block(vec![request])).unwrap();
        // Not a reader: no context parameter to pass through, and a class
        // binding has no context of its own to enter.
        module
            .add_decl(
                ScopeRef::File(file),
                "plain",
                Origin::Source,
                vec![],
                DeclKind::Function(FunctionDecl {
                    signature: Signature::returning(ty("p.R")),
                    body: Some(body),
                }),
            )
            .unwrap();

        let err = run_pipeline_prefix(&mut module).unwrap_err();
        assert!(matches!(err, CompileError::Malformed { .. }));
    }
}
