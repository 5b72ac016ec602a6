#[cfg(test)]
mod tests {
    use crate::context::PassContext;
    use crate::graph::DeclarationGraph;
    use crate::index::DeclarationIndex;
    use crate::pipeline::CompilerPass;
    use crate::runtime::CONTEXT_PARAM;
    use crate::transform::reader::ReaderContextPass;
    use givens_core::{
        Annotation, DeclId, DeclKind, Expr, FileId, FunctionDecl, ModuleFragment, Origin, Param,
        QualifiedName, ScopeRef, Signature, TypeRef,
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

    fn add_reader_fn(module: &mut ModuleFragment, file: FileId, name: &str) -> DeclId {
        let body = module.add_expr(Expr::Block(vec![])).unwrap();
        module
            .add_decl(
                ScopeRef::File(file),
                name,
                Origin::Source,
                vec![Annotation::Reader],
                DeclKind::Function(FunctionDecl {
                    signature: Signature {
                        type_params: vec![],
                        params: vec![Param::new("x", ty("p.Arg"))],
                        ret: ty("p.Data"),
                    },
                    body: Some(body),
                }),
            )
            .unwrap()
    }

    fn run(module: &mut ModuleFragment, ctx: &mut PassContext) {
        let index = DeclarationIndex::build(module).unwrap();
        let mut graph = DeclarationGraph::new(index);
        ReaderContextPass::new().run(module, ctx, &mut graph).unwrap();
    }

    #[test]
    fn test_reader_function_gains_context_parameter() {
        let (mut module, file) = module_with_file();
        let load = add_reader_fn(&mut module, file, "load");
        let mut ctx = PassContext::new();
        run(&mut module, &mut ctx);

        let t = ctx.transforms.transformed(load).unwrap();
        assert_ne!(t, load);
        let signature = &module.decl(t).unwrap().as_function().unwrap().signature;
        assert_eq!(signature.params.len(), 2);
        assert_eq!(signature.params[1].name, CONTEXT_PARAM);
        assert_eq!(signature.params[1].ty.render(), "p.p_load_Context");
    }

    #[test]
    fn test_context_class_is_synthesized_in_the_same_file() {
        let (mut module, file) = module_with_file();
        let load = add_reader_fn(&mut module, file, "load");
        let mut ctx = PassContext::new();
        run(&mut module, &mut ctx);

        let t = ctx.transforms.transformed(load).unwrap();
        let context = ctx.reader_contexts[&t];
        assert_eq!(ctx.reader_contexts[&load], context);
        let decl = module.decl(context).unwrap();
        assert_eq!(decl.name, "p_load_Context");
        assert_eq!(decl.origin, Origin::Synthesized);
        assert_eq!(module.containing_file(context).unwrap(), file);
        // Zero-argument constructible so decoys can enter fresh contexts.
        let class = decl.as_class().unwrap();
        assert_eq!(class.constructors.len(), 1);
        assert!(class.constructors[0].params.is_empty());
    }

    #[test]
    fn test_body_moves_to_the_transformed_form() {
        let (mut module, file) = module_with_file();
        let load = add_reader_fn(&mut module, file, "load");
        let mut ctx = PassContext::new();
        run(&mut module, &mut ctx);

        let t = ctx.transforms.transformed(load).unwrap();
        assert!(module.decl(load).unwrap().as_function().unwrap().body.is_none());
        assert!(module.decl(t).unwrap().as_function().unwrap().body.is_some());
    }

    #[test]
    fn test_decoy_enters_a_fresh_context() {
        let (mut module, file) = module_with_file();
        let load = add_reader_fn(&mut module, file, "load");
        let mut ctx = PassContext::new();
        run(&mut module, &mut ctx);

        let decoy = ctx.decoys.decoy_of(load).unwrap();
        let decoy_fn = module.decl(decoy).unwrap().as_function().unwrap();
        // Original signature preserved for binary linkage.
        assert_eq!(decoy_fn.signature.params.len(), 1);
        let body = decoy_fn.body.unwrap();
        match module.expr(body).unwrap() {
            Expr::Call(call) => {
                assert_eq!(call.args.len(), 2);
                match module.expr(call.args[1]).unwrap() {
                    Expr::ConstructorCall { class, args } => {
                        assert_eq!(class.dotted(), "p.p_load_Context");
                        assert!(args.is_empty());
                    }
                    other => panic!("expected context construction, got {other:?}"),
                }
            }
            other => panic!("expected forwarding call, got {other:?}"),
        }
    }

    #[test]
    fn test_given_function_is_also_transformed() {
        let (mut module, file) = module_with_file();
        let body = module.add_expr(Expr::Block(vec![])).unwrap();
        let provide = module
            .add_decl(
                ScopeRef::File(file),
                "provide_config",
                Origin::Source,
                vec![Annotation::Given],
                DeclKind::Function(FunctionDecl {
                    signature: Signature::returning(ty("p.Config")),
                    body: Some(body),
                }),
            )
            .unwrap();
        let mut ctx = PassContext::new();
        run(&mut module, &mut ctx);
        let t = ctx.transforms.transformed(provide).unwrap();
        assert_ne!(t, provide);
        assert!(ctx.reader_contexts.contains_key(&t));
    }

    #[test]
    fn test_plain_function_is_left_alone() {
        let (mut module, file) = module_with_file();
        let body = module.add_expr(Expr::Block(vec![])).unwrap();
        let plain = module
            .add_decl(
                ScopeRef::File(file),
                "plain",
                Origin::Source,
                vec![],
                DeclKind::Function(FunctionDecl {
                    signature: Signature::returning(ty("p.Data")),
                    body: Some(body),
                }),
            )
            .unwrap();
        let mut ctx = PassContext::new();
        run(&mut module, &mut ctx);
        assert_eq!(ctx.transforms.transformed(plain), Some(plain));
        assert!(ctx.decoys.decoy_of(plain).is_none());
    }

    #[test]
    fn test_external_reader_gets_signature_only_stand_ins() {
        let (mut module, file) = module_with_file();
        let dep = module
            .add_decl(
                ScopeRef::File(file),
                "dep_load",
                Origin::External,
                vec![Annotation::Reader],
                DeclKind::Function(FunctionDecl {
                    signature: Signature::returning(ty("p.Data")),
                    body: None,
                }),
            )
            .unwrap();
        let mut ctx = PassContext::new();
        run(&mut module, &mut ctx);

        let t = ctx.transforms.transformed(dep).unwrap();
        let decl = module.decl(t).unwrap();
        assert_eq!(decl.origin, Origin::External);
        assert!(decl.as_function().unwrap().body.is_none());
        let context = ctx.reader_contexts[&t];
        assert_eq!(module.decl(context).unwrap().origin, Origin::External);
    }
}
