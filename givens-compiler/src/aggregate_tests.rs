#[cfg(test)]
mod tests {
    use crate::aggregate::AggregatePass;
    use crate::context::PassContext;
    use crate::graph::DeclarationGraph;
    use crate::index::DeclarationIndex;
    use crate::pipeline::CompilerPass;
    use crate::runtime::AGGREGATE_PACKAGE;
    use crate::transform::{ProviderSynthesisPass, ReaderContextPass};
    use givens_core::{
        Annotation, ClassDecl, Constructor, DeclKind, FileId, ModuleFragment, Origin,
        QualifiedName, ScopeRef,
    };

    fn module_with_file() -> (ModuleFragment, FileId) {
        let mut module = ModuleFragment::new("app-main");
        let file = module
            .add_file(QualifiedName::from_dotted("p"), "main.gv", Origin::Source)
            .unwrap();
        (module, file)
    }

    fn add_given_class(
        module: &mut ModuleFragment,
        file: FileId,
        name: &str,
        extra: Vec<Annotation>,
    ) {
        let mut annotations = vec![Annotation::Given];
        annotations.extend(extra);
        module
            .add_decl(
                ScopeRef::File(file),
                name,
                Origin::Source,
                annotations,
                DeclKind::Class(ClassDecl {
                    constructors: vec![Constructor { params: vec![] }],
                    ..ClassDecl::default()
                }),
            )
            .unwrap();
    }

    fn run_all(module: &mut ModuleFragment, ctx: &mut PassContext) {
        let index = DeclarationIndex::build(module).unwrap();
        let mut graph = DeclarationGraph::new(index);
        ReaderContextPass::new().run(module, ctx, &mut graph).unwrap();
        ProviderSynthesisPass::new()
            .run(module, ctx, &mut graph)
            .unwrap();
        AggregatePass::new().run(module, ctx, &mut graph).unwrap();
    }

    fn aggregate_file(module: &ModuleFragment) -> Option<givens_core::FileId> {
        module
            .files()
            .find(|f| f.package.dotted() == AGGREGATE_PACKAGE)
            .map(|f| f.id)
    }

    #[test]
    fn test_one_marker_per_binding_with_distinct_names() {
        let (mut module, file) = module_with_file();
        add_given_class(&mut module, file, "Foo", vec![]);
        add_given_class(&mut module, file, "Bar", vec![]);
        let mut ctx = PassContext::new();
        run_all(&mut module, &mut ctx);

        let aggregate = aggregate_file(&module).expect("aggregate file appended");
        let members = module.members_of(ScopeRef::File(aggregate)).unwrap();
        let mut marker_names: Vec<String> = members
            .iter()
            .filter_map(|&id| {
                let decl = module.decl(id).unwrap();
                matches!(decl.kind, DeclKind::Class(_)).then(|| decl.name.clone())
            })
            .collect();
        marker_names.sort();
        assert_eq!(marker_names, vec!["p_Bar", "p_Foo"]);
        assert_eq!(ctx.stats.markers_synthesized, 2);
    }

    #[test]
    fn test_marker_names_encode_the_scope_annotation() {
        let (mut module, file) = module_with_file();
        add_given_class(
            &mut module,
            file,
            "Foo",
            vec![Annotation::Scoped {
                scope: QualifiedName::from_dotted("p.RequestScope"),
            }],
        );
        let mut ctx = PassContext::new();
        run_all(&mut module, &mut ctx);

        let aggregate = aggregate_file(&module).unwrap();
        let members = module.members_of(ScopeRef::File(aggregate)).unwrap();
        assert!(members
            .iter()
            .any(|&id| module.decl(id).unwrap().name == "p_RequestScope__p_Foo"));
    }

    #[test]
    fn test_markers_are_empty_synthesized_classes() {
        let (mut module, file) = module_with_file();
        add_given_class(&mut module, file, "Foo", vec![]);
        let mut ctx = PassContext::new();
        run_all(&mut module, &mut ctx);

        let aggregate = aggregate_file(&module).unwrap();
        let members = module.members_of(ScopeRef::File(aggregate)).unwrap();
        let marker = members
            .iter()
            .find(|&&id| module.decl(id).unwrap().name == "p_Foo")
            .copied()
            .unwrap();
        let decl = module.decl(marker).unwrap();
        assert_eq!(decl.origin, Origin::Synthesized);
        let class = decl.as_class().unwrap();
        assert!(class.members.is_empty());
        assert!(class.fields.is_empty());
    }

    #[test]
    fn test_accessor_returns_the_synthesized_provider() {
        let (mut module, file) = module_with_file();
        add_given_class(&mut module, file, "Foo", vec![]);
        let mut ctx = PassContext::new();
        run_all(&mut module, &mut ctx);

        let aggregate = aggregate_file(&module).unwrap();
        let members = module.members_of(ScopeRef::File(aggregate)).unwrap();
        let accessor = members
            .iter()
            .find(|&&id| module.decl(id).unwrap().name == "p_Foo_accessor")
            .copied()
            .expect("accessor synthesized");
        let function = module.decl(accessor).unwrap().as_function().unwrap();
        // The provider lives next to the class it serves, in package `p`.
        assert_eq!(function.signature.ret.render(), "p.p_Foo_Provider");
    }

    #[test]
    fn test_nothing_is_synthesized_twice() {
        let (mut module, file) = module_with_file();
        add_given_class(&mut module, file, "Foo", vec![]);
        let mut ctx = PassContext::new();
        run_all(&mut module, &mut ctx);

        let files_before = module.file_ids().len();
        let decls_before = module.decl_ids().len();
        // A second run finds every binding already aggregated.
        let index = DeclarationIndex::build(&module).unwrap();
        let mut graph = DeclarationGraph::new(index);
        AggregatePass::new().run(&mut module, &mut ctx, &mut graph).unwrap();
        assert_eq!(module.file_ids().len(), files_before);
        assert_eq!(module.decl_ids().len(), decls_before);
    }

    #[test]
    fn test_external_declarations_get_no_markers() {
        let (mut module, file) = module_with_file();
        module
            .add_decl(
                ScopeRef::File(file),
                "DepBinding",
                Origin::External,
                vec![Annotation::Given],
                DeclKind::Class(ClassDecl {
                    constructors: vec![Constructor { params: vec![] }],
                    ..ClassDecl::default()
                }),
            )
            .unwrap();
        let mut ctx = PassContext::new();
        run_all(&mut module, &mut ctx);
        assert!(aggregate_file(&module).is_none());
        assert_eq!(ctx.stats.markers_synthesized, 0);
    }
}
