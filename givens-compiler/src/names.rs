//! Deterministic name derivation for synthesized artifacts
//!
//! Dependent units recompute these names without source access, so every
//! derivation must be a pure function of qualified names.

use givens_core::QualifiedName;

/// Name of the context class synthesized for a reader/given function.
pub fn reader_context_name(function: &QualifiedName) -> String {
    format!("{}_Context", function.mangled())
}

/// Name of the provider class synthesized for a given class.
pub fn provider_name(class: &QualifiedName) -> String {
    format!("{}_Provider", class.mangled())
}

/// Name of the implementation class synthesized for a component type.
pub fn component_impl_name(component: &QualifiedName) -> String {
    format!("{}_Impl", component.mangled())
}

/// Name of the aggregate marker class for a declaration, optionally
/// prefixed by its enclosing scope annotation.
pub fn marker_name(scope: Option<&QualifiedName>, declaration: &QualifiedName) -> String {
    match scope {
        Some(scope) => format!("{}__{}", scope.mangled(), declaration.mangled()),
        None => declaration.mangled(),
    }
}

/// Name of the accessor function for a given binding.
pub fn accessor_name(declaration: &QualifiedName) -> String {
    format!("{}_accessor", declaration.mangled())
}

#[cfg(test)]
#[path = "names_tests.rs"]
mod tests;
