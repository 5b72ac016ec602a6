//! Error types for the givens compiler

use thiserror::Error;

/// Fatal compilation errors.
///
/// Index and graph lookups returning empty collections are *not* errors:
/// absence of a binding is diagnosed by the frontend's resolution layer.
/// Everything here aborts the pipeline run.
#[derive(Error, Debug)]
pub enum CompileError {
    /// A declaration matched an annotation but violates a structural
    /// precondition (e.g. a provider class with two constructors).
    #[error("malformed declaration {name}: {reason}")]
    Malformed { name: String, reason: String },

    /// A synthesized counterpart that an earlier pass should have produced
    /// could not be located. Always a compiler bug, never user error.
    #[error("missing synthesized counterpart for {name}: expected {expected}")]
    MissingCounterpart { name: String, expected: String },

    /// A transform returned without registering its result in the
    /// transform map.
    #[error("transform for {name} returned without registering its result")]
    TransformNotRegistered { name: String },

    /// An id referenced a declaration or expression not present in the
    /// module fragment.
    #[error("dangling {kind} id in {context}")]
    DanglingId { kind: &'static str, context: String },

    /// Id space exhausted.
    #[error("module id overflow: maximum number of entries reached")]
    IdOverflow,

    /// Metadata blob (de)serialization failed.
    #[error("metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Metadata blob was not valid base64.
    #[error("invalid metadata blob: {0}")]
    MetadataDecode(#[from] base64::DecodeError),

    /// Filesystem error from the dump side channel or the CLI boundary.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result alias used throughout the compiler.
pub type Result<T> = std::result::Result<T, CompileError>;
