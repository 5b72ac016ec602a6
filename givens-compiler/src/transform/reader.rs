//! Reader-context transformation
//!
//! Every reader or binding function gains a trailing context parameter
//! typed by a freshly synthesized per-function context class. The
//! original signature survives as a decoy (patched in by the engine), so
//! dependency units compiled against the old shape still link.

use crate::context::PassContext;
use crate::names;
use crate::pipeline::CompilerPass;
use crate::runtime::CONTEXT_PARAM;
use crate::transform::engine::{FunctionTransform, FunctionTransformer, Order};
use givens_core::{
    ClassDecl, CompileError, Constructor, DeclId, DeclKind, Declaration, Expr, ExprId,
    FunctionDecl, ModuleFragment, Origin, Param, Result, ScopeRef, TypeRef,
};

/// The concrete transform: context-parameter injection.
pub struct ReaderTransform;

impl ReaderTransform {
    fn synthesize_context_class(
        module: &mut ModuleFragment,
        f: DeclId,
        origin: Origin,
    ) -> Result<DeclId> {
        let qualified = module.qualified_name(f)?;
        let file = module.containing_file(f)?;
        module.add_decl(
            ScopeRef::File(file),
            names::reader_context_name(&qualified),
            origin,
            Vec::new(),
            DeclKind::Class(ClassDecl {
                constructors: vec![Constructor { params: Vec::new() }],
                ..ClassDecl::default()
            }),
        )
    }

    fn rewrite_signature(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        f: DeclId,
        origin: Origin,
    ) -> Result<DeclId> {
        let context_class = Self::synthesize_context_class(module, f, origin)?;
        let context_ty = TypeRef::named(module.qualified_name(context_class)?);

        let decl = module.decl(f)?;
        let function = decl.as_function().ok_or_else(|| CompileError::Malformed {
            name: decl.name.clone(),
            reason: "context injection applied to a non-function".into(),
        })?;
        let scope = decl.scope;
        let name = decl.name.clone();
        let annotations = decl.annotations.clone();
        let mut signature = function.signature.clone();
        let body = function.body;
        signature.params.push(Param::new(CONTEXT_PARAM, context_ty));

        // The body moves to the transformed form; the original keeps only
        // its signature, which is all the decoy needs.
        if let Some(function) = module.decl_mut(f)?.as_function_mut() {
            function.body = None;
        }
        let transformed = module.add_detached_decl(
            scope,
            name,
            origin,
            annotations,
            DeclKind::Function(FunctionDecl { signature, body }),
        )?;

        ctx.reader_contexts.insert(f, context_class);
        ctx.reader_contexts.insert(transformed, context_class);
        ctx.record_transform(module, f, transformed)?;
        Ok(transformed)
    }
}

impl FunctionTransform for ReaderTransform {
    fn name(&self) -> &str {
        "reader-context"
    }

    fn order(&self) -> Order {
        Order::BottomUp
    }

    fn needs_transform(&self, _module: &ModuleFragment, decl: &Declaration) -> bool {
        matches!(decl.kind, DeclKind::Function(_))
            && (decl.is_reader() || !decl.binding_categories().is_empty())
    }

    fn transform(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        f: DeclId,
    ) -> Result<DeclId> {
        self.rewrite_signature(module, ctx, f, Origin::Synthesized)
    }

    fn transform_external(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        f: DeclId,
    ) -> Result<DeclId> {
        // The dependency unit already synthesized the context class and
        // the new signature on its side; materialize matching external
        // stand-ins so call sites in this unit resolve.
        self.rewrite_signature(module, ctx, f, Origin::External)
    }

    fn default_argument(
        &mut self,
        module: &mut ModuleFragment,
        _ctx: &PassContext,
        param: &Param,
    ) -> Result<ExprId> {
        // Context classes are zero-argument constructible, so a decoy can
        // always enter a fresh context.
        module.add_expr(Expr::ConstructorCall {
            class: param.ty.classifier.clone(),
            args: Vec::new(),
        })
    }
}

/// Pipeline pass wrapping the engine around [`ReaderTransform`].
pub struct ReaderContextPass {
    transformer: FunctionTransformer<ReaderTransform>,
}

impl ReaderContextPass {
    /// Create the pass.
    pub fn new() -> Self {
        Self {
            transformer: FunctionTransformer::new(ReaderTransform),
        }
    }
}

impl Default for ReaderContextPass {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerPass for ReaderContextPass {
    fn name(&self) -> &str {
        "reader-context"
    }

    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        _graph: &mut crate::graph::DeclarationGraph,
    ) -> Result<()> {
        self.transformer.run_module(module, ctx)
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
