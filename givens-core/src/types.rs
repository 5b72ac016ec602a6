//! Qualified names and nominal type references

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dot-separated qualified name, e.g. `app.data.Repository`.
///
/// Every derived artifact name (providers, contexts, aggregate markers)
/// is computed from a qualified name, so equality and ordering must be
/// purely structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Create a qualified name from explicit segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse a dotted string like `app.data.Repository`.
    pub fn from_dotted(dotted: &str) -> Self {
        Self {
            segments: dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The individual segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, or an empty string for the root name.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Append a segment, producing a child name.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    /// Drop the last segment, producing the enclosing name.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The dotted rendering, e.g. `app.data.Repository`.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// A single-identifier rendering usable as a synthesized class or
    /// function name: segments joined with `_`, dashes flattened.
    ///
    /// Independent compilations must derive the same mangled name for the
    /// same qualified name, so this must stay purely deterministic.
    pub fn mangled(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.replace('-', "_"))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Whether this name lives under the given package prefix.
    pub fn is_under(&self, prefix: &QualifiedName) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// A nominal type reference: a classifier plus type arguments.
///
/// The frontend has already resolved all types; the compiler only reads
/// them and builds new, fully-resolved references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Fully-qualified classifier name.
    pub classifier: QualifiedName,
    /// Type arguments, empty for unparameterized types.
    pub arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// An unparameterized reference to the named classifier.
    pub fn named(classifier: QualifiedName) -> Self {
        Self {
            classifier,
            arguments: Vec::new(),
        }
    }

    /// A parameterized reference.
    pub fn parameterized(classifier: QualifiedName, arguments: Vec<TypeRef>) -> Self {
        Self {
            classifier,
            arguments,
        }
    }

    /// The unit type used for value-less returns.
    pub fn unit() -> Self {
        Self::named(QualifiedName::from_dotted("givens.runtime.Unit"))
    }

    /// Source-like rendering, e.g. `app.Store<app.User>`.
    pub fn render(&self) -> String {
        if self.arguments.is_empty() {
            self.classifier.dotted()
        } else {
            let args: Vec<String> = self.arguments.iter().map(TypeRef::render).collect();
            format!("{}<{}>", self.classifier.dotted(), args.join(", "))
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
