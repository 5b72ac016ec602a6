//! Binding keys and index keys
//!
//! A binding key identifies one logical binding: a type plus its
//! qualifier tags. Independent compilation units must derive the same key
//! (and the same fingerprint) for the same logical binding, so everything
//! here is computed deterministically from annotation contents and type
//! signatures, never from process state.

use crate::types::{QualifiedName, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of one logical binding.
///
/// A type without arguments produces a `Simple` key; a parameterized type
/// recurses into its arguments. Qualifiers are stored sorted so the key
/// is independent of annotation order at the declaration site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKey {
    /// Key for an unparameterized type.
    Simple {
        /// The type's classifier.
        classifier: QualifiedName,
        /// Sorted qualifier tags.
        qualifiers: Vec<String>,
    },
    /// Key for a parameterized type.
    Parameterized {
        /// The type's classifier.
        classifier: QualifiedName,
        /// Sorted qualifier tags.
        qualifiers: Vec<String>,
        /// Keys of the type arguments, in declaration order.
        arguments: Vec<BindingKey>,
    },
}

impl BindingKey {
    /// Build the key for a type plus qualifier tags.
    pub fn of(ty: &TypeRef, qualifiers: &[String]) -> Self {
        let mut qualifiers: Vec<String> = qualifiers.to_vec();
        qualifiers.sort();
        if ty.arguments.is_empty() {
            BindingKey::Simple {
                classifier: ty.classifier.clone(),
                qualifiers,
            }
        } else {
            BindingKey::Parameterized {
                classifier: ty.classifier.clone(),
                qualifiers,
                // Qualifiers apply to the outer binding only.
                arguments: ty.arguments.iter().map(|a| BindingKey::of(a, &[])).collect(),
            }
        }
    }

    /// Canonical rendering, e.g. `app.Store<app.User>@cache+io`.
    ///
    /// This is the serialized form of the key; the fingerprint hashes it,
    /// and aggregate marker names embed a mangled variant of it.
    pub fn canonical(&self) -> String {
        let (classifier, qualifiers, arguments) = match self {
            BindingKey::Simple {
                classifier,
                qualifiers,
            } => (classifier, qualifiers, None),
            BindingKey::Parameterized {
                classifier,
                qualifiers,
                arguments,
            } => (classifier, qualifiers, Some(arguments)),
        };
        let mut out = classifier.dotted();
        if let Some(arguments) = arguments {
            let rendered: Vec<String> = arguments.iter().map(BindingKey::canonical).collect();
            out.push('<');
            out.push_str(&rendered.join(", "));
            out.push('>');
        }
        if !qualifiers.is_empty() {
            out.push('@');
            out.push_str(&qualifiers.join("+"));
        }
        out
    }

    /// Stable 64-bit fingerprint of the key.
    ///
    /// FNV-1a over the canonical rendering. Must never fall back to
    /// `DefaultHasher`, which is seeded per process; the whole point is
    /// that separately compiled units agree on this number.
    pub fn fingerprint(&self) -> u64 {
        fnv1a(self.canonical().as_bytes())
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Category half of an index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingCategory {
    /// Plain given binding.
    Given,
    /// Map-entry contribution.
    MapEntry,
    /// Set-element contribution.
    SetElement,
    /// Scoped module.
    Module,
    /// Root context factory.
    RootFactory,
    /// Effect application.
    Effect,
}

impl BindingCategory {
    /// Short tag used in marker names and metadata.
    pub fn tag(&self) -> &'static str {
        match self {
            BindingCategory::Given => "given",
            BindingCategory::MapEntry => "map_entry",
            BindingCategory::SetElement => "set_element",
            BindingCategory::Module => "module",
            BindingCategory::RootFactory => "root_factory",
            BindingCategory::Effect => "effect",
        }
    }
}

/// Composite key bucketing declarations in the index: a category plus a
/// qualifier string (usually a canonical binding-key rendering).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexKey {
    /// The annotation-derived category.
    pub category: BindingCategory,
    /// Canonical qualifier string for the bucket.
    pub qualifier: String,
}

impl IndexKey {
    /// Build an index key.
    pub fn new(category: BindingCategory, qualifier: impl Into<String>) -> Self {
        Self {
            category,
            qualifier: qualifier.into(),
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category.tag(), self.qualifier)
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
