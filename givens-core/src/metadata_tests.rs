#[cfg(test)]
mod tests {
    use crate::key::BindingCategory;
    use crate::metadata::*;

    // ===== DeclarationMetadata Tests =====

    #[test]
    fn test_metadata_blob_round_trip() {
        let meta = DeclarationMetadata {
            qualified_name: "app.Foo".to_string(),
            category: Some(BindingCategory::Given),
            key_fingerprint: Some(0xdead_beef),
            signature: Some("() -> app.Foo".to_string()),
            provenance: "synthesized".to_string(),
        };
        let blob = meta.encode().unwrap();
        let decoded = DeclarationMetadata::decode(&blob).unwrap();
        assert_eq!(decoded, meta);
    }

    #[test]
    fn test_metadata_blob_is_base64() {
        let meta = DeclarationMetadata {
            qualified_name: "app.Foo".to_string(),
            category: None,
            key_fingerprint: None,
            signature: None,
            provenance: "transformed".to_string(),
        };
        let blob = meta.encode().unwrap();
        assert!(!blob.contains('{'), "blob must not leak raw JSON: {blob}");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(DeclarationMetadata::decode("not-base64!!!").is_err());
    }

    // ===== MemberSnapshot Tests =====

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MemberSnapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
    }

    #[test]
    fn test_snapshot_equality_is_ordered() {
        let a = MemberSnapshot {
            members: vec![
                MemberDescriptor {
                    name: "foo".into(),
                    kind: MemberKind::Function,
                    signature: "() -> app.Foo".into(),
                },
                MemberDescriptor {
                    name: "Bar".into(),
                    kind: MemberKind::Class,
                    signature: "app.Bar".into(),
                },
            ],
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.members.reverse();
        assert_ne!(a, b);
    }
}
