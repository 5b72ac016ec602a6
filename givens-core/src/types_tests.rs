#[cfg(test)]
mod tests {
    use crate::types::*;

    // ===== QualifiedName Tests =====

    #[test]
    fn test_qualified_name_from_dotted() {
        let qn = QualifiedName::from_dotted("app.data.Repository");
        assert_eq!(qn.segments().len(), 3);
        assert_eq!(qn.name(), "Repository");
        assert_eq!(qn.dotted(), "app.data.Repository");
    }

    #[test]
    fn test_qualified_name_child_and_parent() {
        let pkg = QualifiedName::from_dotted("app.data");
        let class = pkg.child("Repository");
        assert_eq!(class.dotted(), "app.data.Repository");
        assert_eq!(class.parent().unwrap(), pkg);

        let root = QualifiedName::from_dotted("app");
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_qualified_name_mangled() {
        let qn = QualifiedName::from_dotted("app.data-layer.Repository");
        assert_eq!(qn.mangled(), "app_data_layer_Repository");
    }

    #[test]
    fn test_qualified_name_is_under() {
        let pkg = QualifiedName::from_dotted("givens.aggregate");
        let marker = QualifiedName::from_dotted("givens.aggregate.app_Foo");
        let other = QualifiedName::from_dotted("app.Foo");
        assert!(marker.is_under(&pkg));
        assert!(!other.is_under(&pkg));
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let qn = QualifiedName::from_dotted("app..data");
        assert_eq!(qn.dotted(), "app.data");
    }

    // ===== TypeRef Tests =====

    #[test]
    fn test_type_ref_render_simple() {
        let ty = TypeRef::named(QualifiedName::from_dotted("app.User"));
        assert_eq!(ty.render(), "app.User");
    }

    #[test]
    fn test_type_ref_render_parameterized() {
        let ty = TypeRef::parameterized(
            QualifiedName::from_dotted("app.Store"),
            vec![
                TypeRef::named(QualifiedName::from_dotted("app.User")),
                TypeRef::named(QualifiedName::from_dotted("app.Config")),
            ],
        );
        assert_eq!(ty.render(), "app.Store<app.User, app.Config>");
    }

    #[test]
    fn test_type_ref_structural_equality() {
        let a = TypeRef::parameterized(
            QualifiedName::from_dotted("app.Store"),
            vec![TypeRef::named(QualifiedName::from_dotted("app.User"))],
        );
        let b = TypeRef::parameterized(
            QualifiedName::from_dotted("app.Store"),
            vec![TypeRef::named(QualifiedName::from_dotted("app.User"))],
        );
        assert_eq!(a, b);
    }
}
