//! The function-transform engine
//!
//! A generic driver that visits every function and property getter of
//! every file and class, asks a [`FunctionTransform`] implementor whether
//! and how to rewrite each one, and patches decoys into containers
//! whose functions changed signature.
//!
//! State machine per declaration: untouched -> (needs transform?) ->
//! transformed | unchanged. The idempotency guards in
//! [`FunctionTransformer::transform_function_if_needed`] guarantee at
//! most one transform attempt per function per run, including the case
//! where the implementor inspects a function and legitimately leaves it
//! alone.

use crate::context::PassContext;
use givens_core::{
    CallExpr, CompileError, DeclId, DeclKind, Declaration, Expr, ExprId, FunctionDecl,
    ModuleFragment, Origin, Param, Result, ScopeRef, Signature,
};
use tracing::trace;

/// Traversal order of one transform run.
///
/// Bottom-up transforms nested class members before the enclosing scope's
/// functions, so an implementor deciding on an outer function already
/// sees its nested declarations in transformed form. Top-down rewrites
/// the enclosing scope first, for transforms that must fix the outer
/// shape before inner code can be regenerated against it. Each transform
/// fixes one order for its whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Nested scopes first.
    BottomUp,
    /// Enclosing scope first.
    TopDown,
}

/// A concrete rewrite plugged into the engine.
pub trait FunctionTransform {
    /// Name for logs.
    fn name(&self) -> &str;

    /// Traversal order for the whole run.
    fn order(&self) -> Order;

    /// Whether the function needs this transform at all.
    fn needs_transform(&self, module: &ModuleFragment, decl: &Declaration) -> bool;

    /// Rewrite a function defined in this compilation unit. Must register
    /// the new form via [`PassContext::record_transform`] before
    /// returning.
    fn transform(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        f: DeclId,
    ) -> Result<DeclId>;

    /// Rewrite a function loaded from a dependency. Only signature-level
    /// changes are possible since the body is unavailable. Must register
    /// the new form like [`FunctionTransform::transform`].
    fn transform_external(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        f: DeclId,
    ) -> Result<DeclId>;

    /// Produce the argument a decoy passes for a parameter the original
    /// signature does not have.
    fn default_argument(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &PassContext,
        param: &Param,
    ) -> Result<ExprId> {
        let _ = (ctx, param);
        module.add_expr(Expr::Unit)
    }
}

enum MemberShape {
    Function,
    Property(Option<DeclId>),
    Class,
}

/// Generic driver running one [`FunctionTransform`] over a module.
pub struct FunctionTransformer<T: FunctionTransform> {
    /// The concrete rewrite.
    pub transform: T,
}

impl<T: FunctionTransform> FunctionTransformer<T> {
    /// Wrap a concrete transform.
    pub fn new(transform: T) -> Self {
        Self { transform }
    }

    /// Visit every file of the module.
    pub fn run_module(&mut self, module: &mut ModuleFragment, ctx: &mut PassContext) -> Result<()> {
        for file in module.file_ids() {
            self.visit_scope(module, ctx, ScopeRef::File(file))?;
        }
        Ok(())
    }

    fn member_shape(module: &ModuleFragment, id: DeclId) -> Result<MemberShape> {
        Ok(match &module.decl(id)?.kind {
            DeclKind::Function(_) => MemberShape::Function,
            DeclKind::Property(p) => MemberShape::Property(p.getter),
            DeclKind::Class(_) => MemberShape::Class,
        })
    }

    fn visit_scope(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        scope: ScopeRef,
    ) -> Result<()> {
        let members = module.members_of(scope)?;
        match self.transform.order() {
            Order::BottomUp => {
                self.visit_nested(module, ctx, &members)?;
                self.visit_functions(module, ctx, scope, &members)?;
            }
            Order::TopDown => {
                self.visit_functions(module, ctx, scope, &members)?;
                self.visit_nested(module, ctx, &members)?;
            }
        }
        self.patch_with_decoys(module, ctx, scope)
    }

    fn visit_nested(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        members: &[DeclId],
    ) -> Result<()> {
        for &member in members {
            if matches!(Self::member_shape(module, member)?, MemberShape::Class) {
                self.visit_scope(module, ctx, ScopeRef::Class(member))?;
            }
        }
        Ok(())
    }

    fn visit_functions(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        scope: ScopeRef,
        members: &[DeclId],
    ) -> Result<()> {
        for &member in members {
            match Self::member_shape(module, member)? {
                MemberShape::Function => {
                    let transformed = self.transform_function_if_needed(module, ctx, member)?;
                    if transformed != member {
                        module.replace_member(scope, member, transformed)?;
                    }
                }
                MemberShape::Property(Some(getter)) => {
                    let transformed = self.transform_function_if_needed(module, ctx, getter)?;
                    if transformed != getter {
                        if let Some(property) = module.decl_mut(member)?.as_property_mut() {
                            property.getter = Some(transformed);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Transform one function at most once.
    ///
    /// Returns immediately when the function already has a recorded
    /// transformed form, already *is* someone's transformed form, or
    /// already carries a decoy (finalized in an earlier scope visit).
    /// A "no change needed" verdict is recorded as `f -> f` so the
    /// question is never asked twice.
    pub fn transform_function_if_needed(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        f: DeclId,
    ) -> Result<DeclId> {
        if let Some(transformed) = ctx.transforms.transformed(f) {
            return Ok(transformed);
        }
        if ctx.transforms.is_transformed_value(f) {
            return Ok(f);
        }
        if ctx.decoys.has(f) || ctx.decoys.is_decoy(f) {
            return Ok(f);
        }
        let (needs, external) = {
            let decl = module.decl(f)?;
            (
                self.transform.needs_transform(module, decl),
                matches!(decl.origin, Origin::External),
            )
        };
        if !needs {
            ctx.transforms.record(f, f);
            return Ok(f);
        }
        let result = if external {
            self.transform.transform_external(module, ctx, f)?
        } else {
            self.transform.transform(module, ctx, f)?
        };
        match ctx.transforms.transformed(f) {
            Some(recorded) if recorded == result => {
                if result != f {
                    ctx.stats.functions_transformed += 1;
                    trace!(
                        transform = self.transform.name(),
                        original = %f,
                        transformed = %result,
                        "function transformed"
                    );
                }
                Ok(result)
            }
            _ => Err(CompileError::TransformNotRegistered {
                name: module.qualified_name(f)?.dotted(),
            }),
        }
    }

    /// Splice decoys into a scope for every original whose transformed
    /// form now has a different signature.
    ///
    /// A decoy keeps the original signature and forwards to the
    /// transformed function, so external callers compiled against the old
    /// shape still link. For properties the decoy becomes the getter and
    /// the transformed getter is relocated into the container as a plain
    /// function.
    pub fn patch_with_decoys(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        scope: ScopeRef,
    ) -> Result<()> {
        for (original, transformed) in ctx.transforms.changed() {
            if ctx.decoys.has(original) {
                continue;
            }
            if module.decl(transformed)?.scope != scope {
                continue;
            }
            let original_decl = module.decl(original)?;
            let (original_sig, original_name) = match original_decl.as_function() {
                Some(f) => (f.signature.clone(), original_decl.name.clone()),
                None => continue,
            };
            let new_sig = match module.decl(transformed)?.as_function() {
                Some(f) => f.signature.clone(),
                None => continue,
            };
            if original_sig == new_sig {
                continue;
            }
            let decoy = self.synthesize_decoy(
                module,
                ctx,
                scope,
                original_name,
                original_sig,
                transformed,
                &new_sig,
            )?;
            let owning_property = self.owning_property(module, scope, transformed)?;
            match owning_property {
                Some(property) => {
                    if let Some(p) = module.decl_mut(property)?.as_property_mut() {
                        p.getter = Some(decoy);
                    }
                    module.attach_member(scope, transformed)?;
                }
                None => {
                    module.attach_member(scope, decoy)?;
                }
            }
            ctx.decoys.record(original, decoy);
            ctx.stats.decoys_inserted += 1;
        }
        Ok(())
    }

    fn owning_property(
        &self,
        module: &ModuleFragment,
        scope: ScopeRef,
        getter: DeclId,
    ) -> Result<Option<DeclId>> {
        for member in module.members_of(scope)? {
            if let DeclKind::Property(p) = &module.decl(member)?.kind {
                if p.getter == Some(getter) {
                    return Ok(Some(member));
                }
            }
        }
        Ok(None)
    }

    #[allow(clippy::too_many_arguments)]
    fn synthesize_decoy(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        scope: ScopeRef,
        name: String,
        original_sig: Signature,
        transformed: DeclId,
        new_sig: &Signature,
    ) -> Result<DeclId> {
        let callee = module.qualified_name(transformed)?;
        let mut args = Vec::with_capacity(new_sig.params.len());
        for param in &new_sig.params {
            if original_sig.params.iter().any(|p| p.name == param.name) {
                args.push(module.add_expr(Expr::ParamRef(param.name.clone()))?);
            } else {
                args.push(self.transform.default_argument(module, ctx, param)?);
            }
        }
        let body = module.add_expr(Expr::Call(CallExpr {
            callee,
            type_args: Vec::new(),
            args,
            receiver: None,
            receiver_ty: None,
        }))?;
        module.add_detached_decl(
            scope,
            name,
            Origin::Synthesized,
            Vec::new(),
            DeclKind::Function(FunctionDecl {
                signature: original_sig,
                body: Some(body),
            }),
        )
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
