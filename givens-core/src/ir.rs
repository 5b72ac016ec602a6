//! Module IR
//!
//! The typed intermediate representation of one compilation unit, handed
//! over by the host frontend after type checking. The tree is arena
//! backed: a [`ModuleFragment`] owns every file, declaration and
//! expression behind `NonZeroU32` id newtypes, and passes mutate entries
//! in place or append new ones. Nothing is ever deep-copied implicitly;
//! ids are never reused.

use crate::annotations::Annotation;
use crate::error::{CompileError, Result};
use crate::key::BindingCategory;
use crate::metadata::MemberSnapshot;
use crate::types::{QualifiedName, TypeRef};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub NonZeroU32);

        impl $name {
            /// Create from a raw value; zero is the reserved null id.
            pub fn new(value: u32) -> Option<Self> {
                NonZeroU32::new(value).map($name)
            }

            /// The raw value.
            pub fn get(&self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a file in the module fragment.
    FileId,
    "f"
);
id_type!(
    /// Identifier of a declaration.
    DeclId,
    "d"
);
id_type!(
    /// Identifier of an expression.
    ExprId,
    "e"
);

/// Where a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Written by the user in this compilation unit.
    Source,
    /// Synthesized by a compiler pass.
    Synthesized,
    /// Loaded from a dependency unit; no body available.
    External,
}

/// The scope owning a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeRef {
    /// Top-level declaration in a file.
    File(FileId),
    /// Member of a class.
    Class(DeclId),
}

/// A source file (or synthesized file) of the compilation unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    /// This file's id.
    pub id: FileId,
    /// The package the file belongs to.
    pub package: QualifiedName,
    /// File name without directory.
    pub name: String,
    /// Provenance of the file as a whole.
    pub origin: Origin,
    /// Top-level declarations in source order.
    pub members: Vec<DeclId>,
    /// Serialized member snapshot; refreshed by the metadata patcher.
    pub snapshot: MemberSnapshot,
}

/// A function or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub ty: TypeRef,
}

impl Param {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A function signature. Compared structurally: two signatures are the
/// same shape iff type parameters, value parameters and return type all
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Type parameter names.
    pub type_params: Vec<String>,
    /// Value parameters in order.
    pub params: Vec<Param>,
    /// Return type.
    pub ret: TypeRef,
}

impl Signature {
    /// Signature with no parameters returning `ret`.
    pub fn returning(ret: TypeRef) -> Self {
        Self {
            type_params: Vec::new(),
            params: Vec::new(),
            ret,
        }
    }

    /// Source-like rendering used in snapshots and dumps.
    pub fn render(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty.render()))
            .collect();
        if self.type_params.is_empty() {
            format!("({}) -> {}", params.join(", "), self.ret.render())
        } else {
            format!(
                "<{}>({}) -> {}",
                self.type_params.join(", "),
                params.join(", "),
                self.ret.render()
            )
        }
    }
}

/// A class constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    /// Constructor parameters.
    pub params: Vec<Param>,
}

/// A class field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: TypeRef,
    /// Static (per-class) rather than per-instance.
    pub is_static: bool,
    /// Initialized on first read rather than eagerly.
    pub lazy: bool,
    /// Initializer expression.
    pub initializer: Option<ExprId>,
}

/// Class payload of a declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Member declarations in order.
    pub members: Vec<DeclId>,
    /// Constructors; givens require exactly one.
    pub constructors: Vec<Constructor>,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Serialized member snapshot; refreshed by the metadata patcher.
    pub snapshot: MemberSnapshot,
}

/// Function payload of a declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// The signature.
    pub signature: Signature,
    /// Root body expression; `None` for externals.
    pub body: Option<ExprId>,
}

/// Property payload of a declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDecl {
    /// Property type.
    pub ty: TypeRef,
    /// Getter function declaration, when the property has one.
    pub getter: Option<DeclId>,
}

/// Declaration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeclKind {
    /// A class.
    Class(ClassDecl),
    /// A function.
    Function(FunctionDecl),
    /// A property.
    Property(PropertyDecl),
}

/// A node in the declaration tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    /// This declaration's id.
    pub id: DeclId,
    /// Simple name.
    pub name: String,
    /// Provenance.
    pub origin: Origin,
    /// Attached annotations.
    pub annotations: Vec<Annotation>,
    /// Owning scope.
    pub scope: ScopeRef,
    /// Payload.
    pub kind: DeclKind,
}

impl Declaration {
    /// Whether any annotation satisfies the predicate.
    pub fn has_annotation(&self, pred: impl Fn(&Annotation) -> bool) -> bool {
        self.annotations.iter().any(pred)
    }

    /// Given binding root.
    pub fn is_given(&self) -> bool {
        self.has_annotation(|a| matches!(a, Annotation::Given))
    }

    /// Singleton given.
    pub fn is_singleton(&self) -> bool {
        self.has_annotation(|a| matches!(a, Annotation::Singleton))
    }

    /// Scoped module.
    pub fn is_module(&self) -> bool {
        self.has_annotation(|a| matches!(a, Annotation::Module))
    }

    /// Reader function.
    pub fn is_reader(&self) -> bool {
        self.has_annotation(|a| matches!(a, Annotation::Reader))
    }

    /// Qualifier tags in annotation order.
    pub fn qualifiers(&self) -> Vec<String> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Qualifier { tag } => Some(tag.clone()),
                _ => None,
            })
            .collect()
    }

    /// Map-binding key, when annotated as a map entry.
    pub fn map_entry_key(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::MapEntry { key } => Some(key.as_str()),
            _ => None,
        })
    }

    /// Set-binding key, when annotated as a set element.
    pub fn set_element_key(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::SetElement { key } => Some(key.as_str()),
            _ => None,
        })
    }

    /// Root-factory context, when annotated as a root factory.
    pub fn root_factory_context(&self) -> Option<&QualifiedName> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::RootFactory { context } => Some(context),
            _ => None,
        })
    }

    /// Effect target, when annotated with an effect.
    pub fn effect_target(&self) -> Option<&QualifiedName> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Effect { target } => Some(target),
            _ => None,
        })
    }

    /// Scope class, when annotated as scoped.
    pub fn scoped_to(&self) -> Option<&QualifiedName> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Scoped { scope } => Some(scope),
            _ => None,
        })
    }

    /// The binding categories this declaration contributes to.
    pub fn binding_categories(&self) -> Vec<BindingCategory> {
        let mut out = Vec::new();
        for a in &self.annotations {
            let category = match a {
                Annotation::Given => Some(BindingCategory::Given),
                Annotation::MapEntry { .. } => Some(BindingCategory::MapEntry),
                Annotation::SetElement { .. } => Some(BindingCategory::SetElement),
                Annotation::Module => Some(BindingCategory::Module),
                Annotation::RootFactory { .. } => Some(BindingCategory::RootFactory),
                Annotation::Effect { .. } => Some(BindingCategory::Effect),
                _ => None,
            };
            if let Some(category) = category {
                if !out.contains(&category) {
                    out.push(category);
                }
            }
        }
        out
    }

    /// Function payload, if this is a function.
    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Mutable function payload.
    pub fn as_function_mut(&mut self) -> Option<&mut FunctionDecl> {
        match &mut self.kind {
            DeclKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Class payload, if this is a class.
    pub fn as_class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            DeclKind::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable class payload.
    pub fn as_class_mut(&mut self) -> Option<&mut ClassDecl> {
        match &mut self.kind {
            DeclKind::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Property payload, if this is a property.
    pub fn as_property(&self) -> Option<&PropertyDecl> {
        match &self.kind {
            DeclKind::Property(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable property payload.
    pub fn as_property_mut(&mut self) -> Option<&mut PropertyDecl> {
        match &mut self.kind {
            DeclKind::Property(p) => Some(p),
            _ => None,
        }
    }
}

/// A call expression. Intrinsic calls are ordinary calls whose callee
/// lives under the `givens.runtime` package; resolvers rewrite them away
/// before the tree leaves the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    /// Fully-qualified callee.
    pub callee: QualifiedName,
    /// Explicit type arguments.
    pub type_args: Vec<TypeRef>,
    /// Value arguments.
    pub args: Vec<ExprId>,
    /// Receiver expression for member/extension calls.
    pub receiver: Option<ExprId>,
    /// Static type of the receiver at the call site; drives member-scope
    /// selection during intrinsic resolution.
    pub receiver_ty: Option<TypeRef>,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A function call.
    Call(CallExpr),
    /// Direct constructor invocation.
    ConstructorCall {
        /// Class being constructed.
        class: QualifiedName,
        /// Constructor arguments.
        args: Vec<ExprId>,
    },
    /// Read of a static field that is initialized on first read.
    CachedFieldRead {
        /// Owning class.
        class: QualifiedName,
        /// Field name.
        field: String,
    },
    /// A fully resolved binding key.
    KeyLiteral(crate::key::BindingKey),
    /// Integer literal.
    Int(i64),
    /// String literal.
    Str(String),
    /// Boolean literal.
    Bool(bool),
    /// Reference to a parameter of the enclosing function.
    ParamRef(String),
    /// Sequential block; value of the last expression.
    Block(Vec<ExprId>),
    /// Early return.
    Return(Option<ExprId>),
    /// The unit value.
    Unit,
}

/// The whole compilation unit's IR tree: root of ownership for all files,
/// declarations and expressions. Lives for the duration of one pipeline
/// run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleFragment {
    /// Module name, e.g. the Gradle-ish coordinate of the unit.
    pub name: String,
    files: FxHashMap<FileId, File>,
    file_order: Vec<FileId>,
    decls: FxHashMap<DeclId, Declaration>,
    decl_order: Vec<DeclId>,
    exprs: FxHashMap<ExprId, Expr>,
    next_file: u32,
    next_decl: u32,
    next_expr: u32,
}

impl ModuleFragment {
    /// Create an empty module fragment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: FxHashMap::default(),
            file_order: Vec::new(),
            decls: FxHashMap::default(),
            decl_order: Vec::new(),
            exprs: FxHashMap::default(),
            next_file: 1,
            next_decl: 1,
            next_expr: 1,
        }
    }

    /// Append a new file.
    pub fn add_file(
        &mut self,
        package: QualifiedName,
        name: impl Into<String>,
        origin: Origin,
    ) -> Result<FileId> {
        let id = FileId::new(self.next_file).ok_or(CompileError::IdOverflow)?;
        self.next_file = self.next_file.checked_add(1).ok_or(CompileError::IdOverflow)?;
        self.files.insert(
            id,
            File {
                id,
                package,
                name: name.into(),
                origin,
                members: Vec::new(),
                snapshot: MemberSnapshot::empty(),
            },
        );
        self.file_order.push(id);
        Ok(id)
    }

    /// Append a declaration and attach it to its scope's member list.
    pub fn add_decl(
        &mut self,
        scope: ScopeRef,
        name: impl Into<String>,
        origin: Origin,
        annotations: Vec<Annotation>,
        kind: DeclKind,
    ) -> Result<DeclId> {
        let id = self.add_detached_decl(scope, name, origin, annotations, kind)?;
        self.attach_member(scope, id)?;
        Ok(id)
    }

    /// Append a declaration without touching any member list. Used for
    /// property getters, which are reachable through their property
    /// rather than the container.
    pub fn add_detached_decl(
        &mut self,
        scope: ScopeRef,
        name: impl Into<String>,
        origin: Origin,
        annotations: Vec<Annotation>,
        kind: DeclKind,
    ) -> Result<DeclId> {
        let id = DeclId::new(self.next_decl).ok_or(CompileError::IdOverflow)?;
        self.next_decl = self.next_decl.checked_add(1).ok_or(CompileError::IdOverflow)?;
        self.decls.insert(
            id,
            Declaration {
                id,
                name: name.into(),
                origin,
                annotations,
                scope,
                kind,
            },
        );
        self.decl_order.push(id);
        Ok(id)
    }

    /// Push an existing declaration onto its scope's member list.
    pub fn attach_member(&mut self, scope: ScopeRef, id: DeclId) -> Result<()> {
        match scope {
            ScopeRef::File(file) => {
                self.file_mut(file)?.members.push(id);
            }
            ScopeRef::Class(class) => {
                let decl = self.decl_mut(class)?;
                let class_name = decl.name.clone();
                decl.as_class_mut()
                    .ok_or_else(|| CompileError::Malformed {
                        name: class_name,
                        reason: "member scope is not a class".into(),
                    })?
                    .members
                    .push(id);
            }
        }
        Ok(())
    }

    /// Replace one entry of a scope's member list in place, keeping the
    /// member order stable.
    pub fn replace_member(&mut self, scope: ScopeRef, old: DeclId, new: DeclId) -> Result<()> {
        let members = match scope {
            ScopeRef::File(file) => &mut self.file_mut(file)?.members,
            ScopeRef::Class(class) => {
                let decl = self.decl_mut(class)?;
                let class_name = decl.name.clone();
                &mut decl
                    .as_class_mut()
                    .ok_or_else(|| CompileError::Malformed {
                        name: class_name,
                        reason: "member scope is not a class".into(),
                    })?
                    .members
            }
        };
        match members.iter_mut().find(|m| **m == old) {
            Some(slot) => {
                *slot = new;
                Ok(())
            }
            None => Err(CompileError::DanglingId {
                kind: "member",
                context: format!("{old} not in scope member list"),
            }),
        }
    }

    /// Append an expression node.
    pub fn add_expr(&mut self, expr: Expr) -> Result<ExprId> {
        let id = ExprId::new(self.next_expr).ok_or(CompileError::IdOverflow)?;
        self.next_expr = self.next_expr.checked_add(1).ok_or(CompileError::IdOverflow)?;
        self.exprs.insert(id, expr);
        Ok(id)
    }

    /// Deep-copy an expression subtree, allocating fresh ids.
    pub fn copy_expr(&mut self, id: ExprId) -> Result<ExprId> {
        let expr = self.expr(id)?.clone();
        let copied = match expr {
            Expr::Call(call) => {
                let args = self.copy_exprs(&call.args)?;
                let receiver = match call.receiver {
                    Some(r) => Some(self.copy_expr(r)?),
                    None => None,
                };
                Expr::Call(CallExpr {
                    callee: call.callee,
                    type_args: call.type_args,
                    args,
                    receiver,
                    receiver_ty: call.receiver_ty,
                })
            }
            Expr::ConstructorCall { class, args } => Expr::ConstructorCall {
                class,
                args: self.copy_exprs(&args)?,
            },
            Expr::Block(items) => Expr::Block(self.copy_exprs(&items)?),
            Expr::Return(value) => Expr::Return(match value {
                Some(v) => Some(self.copy_expr(v)?),
                None => None,
            }),
            leaf => leaf,
        };
        self.add_expr(copied)
    }

    fn copy_exprs(&mut self, ids: &[ExprId]) -> Result<Vec<ExprId>> {
        ids.iter().map(|&id| self.copy_expr(id)).collect()
    }

    /// Look up a file.
    pub fn get_file(&self, id: FileId) -> Option<&File> {
        self.files.get(&id)
    }

    /// Look up a file, treating absence as an internal error.
    pub fn file(&self, id: FileId) -> Result<&File> {
        self.files.get(&id).ok_or_else(|| CompileError::DanglingId {
            kind: "file",
            context: self.name.clone(),
        })
    }

    /// Mutable file lookup, treating absence as an internal error.
    pub fn file_mut(&mut self, id: FileId) -> Result<&mut File> {
        let name = self.name.clone();
        self.files.get_mut(&id).ok_or(CompileError::DanglingId {
            kind: "file",
            context: name,
        })
    }

    /// Look up a declaration.
    pub fn get_decl(&self, id: DeclId) -> Option<&Declaration> {
        self.decls.get(&id)
    }

    /// Look up a declaration, treating absence as an internal error.
    pub fn decl(&self, id: DeclId) -> Result<&Declaration> {
        self.decls.get(&id).ok_or_else(|| CompileError::DanglingId {
            kind: "declaration",
            context: self.name.clone(),
        })
    }

    /// Mutable declaration lookup, treating absence as an internal error.
    pub fn decl_mut(&mut self, id: DeclId) -> Result<&mut Declaration> {
        let name = self.name.clone();
        self.decls.get_mut(&id).ok_or(CompileError::DanglingId {
            kind: "declaration",
            context: name,
        })
    }

    /// Look up an expression.
    pub fn get_expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(&id)
    }

    /// Look up an expression, treating absence as an internal error.
    pub fn expr(&self, id: ExprId) -> Result<&Expr> {
        self.exprs.get(&id).ok_or_else(|| CompileError::DanglingId {
            kind: "expression",
            context: self.name.clone(),
        })
    }

    /// Mutable expression lookup, treating absence as an internal error.
    pub fn expr_mut(&mut self, id: ExprId) -> Result<&mut Expr> {
        let name = self.name.clone();
        self.exprs.get_mut(&id).ok_or(CompileError::DanglingId {
            kind: "expression",
            context: name,
        })
    }

    /// File ids in creation order. Returns an owned list so callers can
    /// keep iterating while appending new files.
    pub fn file_ids(&self) -> Vec<FileId> {
        self.file_order.clone()
    }

    /// Declaration ids in creation order, as an owned snapshot.
    pub fn decl_ids(&self) -> Vec<DeclId> {
        self.decl_order.clone()
    }

    /// Files in creation order.
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.file_order.iter().filter_map(|id| self.files.get(id))
    }

    /// Declarations in creation order.
    pub fn decls(&self) -> impl Iterator<Item = &Declaration> {
        self.decl_order.iter().filter_map(|id| self.decls.get(id))
    }

    /// Member ids of a scope, in member order.
    pub fn members_of(&self, scope: ScopeRef) -> Result<Vec<DeclId>> {
        match scope {
            ScopeRef::File(file) => Ok(self.file(file)?.members.clone()),
            ScopeRef::Class(class) => {
                let decl = self.decl(class)?;
                let class_decl = decl.as_class().ok_or_else(|| CompileError::Malformed {
                    name: decl.name.clone(),
                    reason: "member scope is not a class".into(),
                })?;
                Ok(class_decl.members.clone())
            }
        }
    }

    /// Compute the fully-qualified name of a declaration by walking its
    /// scope chain up to the owning file's package.
    pub fn qualified_name(&self, id: DeclId) -> Result<QualifiedName> {
        let mut names = Vec::new();
        let mut current = id;
        loop {
            let decl = self.decl(current)?;
            names.push(decl.name.clone());
            match decl.scope {
                ScopeRef::File(file) => {
                    let mut qn = self.file(file)?.package.clone();
                    for name in names.iter().rev() {
                        qn = qn.child(name);
                    }
                    return Ok(qn);
                }
                ScopeRef::Class(class) => current = class,
            }
        }
    }

    /// The file transitively containing a declaration.
    pub fn containing_file(&self, id: DeclId) -> Result<FileId> {
        let mut current = id;
        loop {
            match self.decl(current)?.scope {
                ScopeRef::File(file) => return Ok(file),
                ScopeRef::Class(class) => current = class,
            }
        }
    }

    /// Whether the declaration was loaded from a dependency unit.
    pub fn is_external(&self, id: DeclId) -> Result<bool> {
        Ok(matches!(self.decl(id)?.origin, Origin::External))
    }
}

#[cfg(test)]
#[path = "ir_tests.rs"]
mod tests;
