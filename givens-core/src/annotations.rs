//! The closed set of recognized annotations
//!
//! Behavior is entirely data-driven by these annotations; there is no
//! other configuration channel for the compiler core.

use crate::types::QualifiedName;
use serde::{Deserialize, Serialize};

/// An annotation attached to a declaration.
///
/// `Metadata` is synthetic: the compiler attaches it to carry the
/// serialized per-declaration blob into the compiled artifact, and decodes
/// it again when the declaration is loaded from a dependency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Annotation {
    /// Automatically resolvable dependency.
    Given,
    /// One shared instance per module.
    Singleton,
    /// Scoped module aggregating bindings.
    Module,
    /// Binding scoped to the named scope class.
    Scoped {
        /// The scope class.
        scope: QualifiedName,
    },
    /// Function whose body resolves givens through an injected context.
    Reader,
    /// Contribution to a keyed map binding.
    MapEntry {
        /// Key of the map binding this entry contributes to.
        key: String,
    },
    /// Contribution to a keyed set binding.
    SetElement {
        /// Key of the set binding this element contributes to.
        key: String,
    },
    /// Factory producing a root reader context.
    RootFactory {
        /// The context class the factory produces.
        context: QualifiedName,
    },
    /// Effect applied to the annotated declaration's binding.
    Effect {
        /// The effect implementation.
        target: QualifiedName,
    },
    /// Disambiguating tag folded into the binding key.
    Qualifier {
        /// The qualifier tag.
        tag: String,
    },
    /// Synthetic: base64-encoded serialized declaration metadata.
    Metadata {
        /// The encoded blob.
        blob: String,
    },
}

impl Annotation {
    /// Whether this annotation marks a declaration as a binding root of
    /// any kind (something the index should bucket).
    pub fn is_binding(&self) -> bool {
        matches!(
            self,
            Annotation::Given
                | Annotation::Module
                | Annotation::MapEntry { .. }
                | Annotation::SetElement { .. }
                | Annotation::RootFactory { .. }
                | Annotation::Effect { .. }
        )
    }
}
