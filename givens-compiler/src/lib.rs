//! givens transformation pipeline
//!
//! The compile-time dependency-injection engine: indexes annotated
//! declarations into a queryable graph, synthesizes providers, reader
//! contexts, component implementations, aggregate markers and decoy
//! bridges, resolves the compile-time-only intrinsic calls into ordinary
//! code, optimizes singleton construction, and keeps serialized metadata
//! consistent with the mutated tree.

#![warn(missing_docs)]

pub mod aggregate;
pub mod context;
pub mod dump;
pub mod graph;
pub mod index;
pub mod metadata;
pub mod names;
pub mod optimize;
pub mod pipeline;
pub mod resolve;
pub mod runtime;
pub mod stats;
pub mod transform;
pub mod visit;

pub use context::{DecoySet, PassContext, TransformMap};
pub use graph::DeclarationGraph;
pub use index::DeclarationIndex;
pub use pipeline::{CompileConfig, CompileLevel, CompilePipeline, CompilerPass};
pub use stats::CompileStats;
