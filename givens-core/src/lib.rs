//! givens core IR and data model
//!
//! This crate defines what the compile-time dependency-injection pipeline
//! operates on:
//! - the arena-backed module IR (files, declarations, expressions)
//! - qualified names and nominal type references
//! - the closed annotation set driving all behavior
//! - binding keys with a stable cross-unit fingerprint
//! - serializable member snapshots and per-declaration metadata blobs
//! - the compiler error taxonomy

#![warn(missing_docs)]

pub mod annotations;
pub mod error;
pub mod ir;
pub mod key;
pub mod metadata;
pub mod types;

pub use annotations::Annotation;
pub use error::{CompileError, Result};
pub use ir::{
    CallExpr, ClassDecl, Constructor, DeclId, DeclKind, Declaration, Expr, ExprId, Field, File,
    FileId, FunctionDecl, ModuleFragment, Origin, Param, PropertyDecl, ScopeRef, Signature,
};
pub use key::{BindingCategory, BindingKey, IndexKey};
pub use metadata::{DeclarationMetadata, MemberDescriptor, MemberKind, MemberSnapshot};
pub use types::{QualifiedName, TypeRef};
