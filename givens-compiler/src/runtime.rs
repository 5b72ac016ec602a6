//! Well-known runtime names
//!
//! The compiler recognizes intrinsic calls purely by their fully-qualified
//! callee under the `givens.runtime` package, and places synthesized
//! cross-unit artifacts under `givens.aggregate`.

use givens_core::QualifiedName;

/// Package hosting the compile-time-only intrinsics.
pub const RUNTIME_PACKAGE: &str = "givens.runtime";

/// Package hosting the aggregate marker classes and accessors.
pub const AGGREGATE_PACKAGE: &str = "givens.aggregate";

/// Name of the context parameter appended to transformed functions.
pub const CONTEXT_PARAM: &str = "context";

/// `keyOf<T>(qualifiers...)`, resolved to a key literal.
pub fn key_of() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.keyOf")
}

/// Reified `get<T>(qualifiers...)`, resolved to a fingerprint-keyed call.
pub fn get() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.get")
}

/// `given<T>()`, resolved through the declaration graph.
pub fn given() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.given")
}

/// `Component(...)` builder, resolved to the synthesized impl class.
pub fn component_builder() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.Component")
}

/// The component type itself (also the extension receiver of `get`).
pub fn component_type() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.Component")
}

/// The component-owner type (the other possible `get` receiver).
pub fn component_owner_type() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.ComponentOwner")
}

/// Non-reified member `Component.get(key)`.
pub fn component_get_member() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.Component.get")
}

/// Non-reified member `ComponentOwner.get(key)`.
pub fn component_owner_get_member() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.ComponentOwner.get")
}

/// Base type of every reader context; the parameter type of synthesized
/// provider entry points.
pub fn context_type() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.Context")
}

/// Catch-all argument type for synthesized component constructors.
pub fn any_type() -> QualifiedName {
    QualifiedName::from_dotted("givens.runtime.Any")
}
