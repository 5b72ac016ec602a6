//! Declaration index
//!
//! One traversal of the module fragment buckets every annotated
//! declaration by `IndexKey`, in discovery order. The index never mutates
//! the tree and empty buckets are valid results: absence of a binding is
//! diagnosed by the frontend's resolution layer, not here.

use givens_core::{
    BindingCategory, DeclId, DeclKind, Declaration, IndexKey, ModuleFragment, Result, TypeRef,
};
use rustc_hash::FxHashMap;

/// The type a declaration binds: the class itself, a function's return
/// type, or a property's type.
pub fn binding_type(module: &ModuleFragment, decl: &Declaration) -> Result<TypeRef> {
    match &decl.kind {
        DeclKind::Class(_) => Ok(TypeRef::named(module.qualified_name(decl.id)?)),
        DeclKind::Function(f) => Ok(f.signature.ret.clone()),
        DeclKind::Property(p) => Ok(p.ty.clone()),
    }
}

/// The bucket qualifier for one declaration under one category.
fn index_qualifier(
    module: &ModuleFragment,
    decl: &Declaration,
    category: BindingCategory,
) -> Result<String> {
    Ok(match category {
        BindingCategory::Given => {
            let ty = binding_type(module, decl)?;
            givens_core::BindingKey::of(&ty, &decl.qualifiers()).canonical()
        }
        BindingCategory::MapEntry => decl.map_entry_key().unwrap_or_default().to_string(),
        BindingCategory::SetElement => decl.set_element_key().unwrap_or_default().to_string(),
        BindingCategory::Module => decl
            .scoped_to()
            .map(|s| s.dotted())
            .unwrap_or_default(),
        BindingCategory::RootFactory => decl
            .root_factory_context()
            .map(|c| c.dotted())
            .unwrap_or_default(),
        BindingCategory::Effect => decl
            .effect_target()
            .map(|t| t.dotted())
            .unwrap_or_default(),
    })
}

/// Buckets of annotated declarations, queryable by index key.
#[derive(Debug, Default)]
pub struct DeclarationIndex {
    class_buckets: FxHashMap<IndexKey, Vec<DeclId>>,
    function_buckets: FxHashMap<IndexKey, Vec<DeclId>>,
    property_buckets: FxHashMap<IndexKey, Vec<DeclId>>,
    keys: Vec<IndexKey>,
}

impl DeclarationIndex {
    /// Scan the whole module once and build the buckets.
    pub fn build(module: &ModuleFragment) -> Result<Self> {
        let mut index = DeclarationIndex::default();
        for decl in module.decls() {
            for category in decl.binding_categories() {
                let key = IndexKey::new(category, index_qualifier(module, decl, category)?);
                let bucket = match decl.kind {
                    DeclKind::Class(_) => &mut index.class_buckets,
                    DeclKind::Function(_) => &mut index.function_buckets,
                    DeclKind::Property(_) => &mut index.property_buckets,
                };
                if !index.keys.contains(&key) {
                    index.keys.push(key.clone());
                }
                bucket.entry(key).or_default().push(decl.id);
            }
        }
        tracing::debug!(
            keys = index.keys.len(),
            "declaration index built"
        );
        Ok(index)
    }

    /// Class declarations bucketed under the key.
    pub fn class_indices(&self, key: &IndexKey) -> &[DeclId] {
        self.class_buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Function declarations bucketed under the key.
    pub fn function_indices(&self, key: &IndexKey) -> &[DeclId] {
        self.function_buckets
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Property declarations bucketed under the key.
    pub fn property_indices(&self, key: &IndexKey) -> &[DeclId] {
        self.property_buckets
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All declarations bucketed under the key: classes, then functions,
    /// then properties, each in discovery order.
    pub fn all_indices(&self, key: &IndexKey) -> Vec<DeclId> {
        let mut out = Vec::new();
        out.extend_from_slice(self.class_indices(key));
        out.extend_from_slice(self.function_indices(key));
        out.extend_from_slice(self.property_indices(key));
        out
    }

    /// Every distinct key, in discovery order.
    pub fn keys(&self) -> &[IndexKey] {
        &self.keys
    }

    /// Keys of one category, in discovery order.
    pub fn keys_with_category(&self, category: BindingCategory) -> Vec<IndexKey> {
        self.keys
            .iter()
            .filter(|k| k.category == category)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
