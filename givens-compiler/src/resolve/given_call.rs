//! Given request and reader call resolution
//!
//! Two rewrites share this pass:
//!
//! 1. `given<T>(qualifiers...)` requests resolve through the declaration
//!    graph to the matching binding: a given class becomes a provider
//!    lookup, a given function becomes a direct call of its transformed
//!    form. Both receive the enclosing function's context argument.
//! 2. Calls to original reader/given functions are re-targeted to their
//!    transformed forms by appending the context argument the new
//!    signature expects.
//!
//! Whenever a resolved call crosses from one reader context into another,
//! the association is recorded for the graph's run-reader query.

use crate::context::PassContext;
use crate::graph::DeclarationGraph;
use crate::pipeline::CompilerPass;
use crate::runtime::{self, CONTEXT_PARAM};
use crate::visit;
use givens_core::{
    BindingKey, CallExpr, CompileError, DeclId, DeclKind, Expr, ModuleFragment, QualifiedName,
    Result,
};
use rustc_hash::FxHashMap;

enum CandidateShape {
    Class,
    Function { params: usize },
}

/// Resolves given requests and re-targets reader calls.
#[derive(Default)]
pub struct GivenCallResolver {
    resolved: usize,
}

impl GivenCallResolver {
    /// Create the resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualified names of originals whose transformed form has a changed
    /// signature, with the original parameter count used to recognize
    /// stale call sites.
    fn changed_functions(
        module: &ModuleFragment,
        ctx: &PassContext,
    ) -> Result<FxHashMap<QualifiedName, (usize, DeclId)>> {
        let mut changed = FxHashMap::default();
        for (original, transformed) in ctx.transforms.changed() {
            let Some(function) = module.decl(original)?.as_function() else {
                continue;
            };
            changed.insert(
                module.qualified_name(original)?,
                (function.signature.params.len(), transformed),
            );
        }
        Ok(changed)
    }

    fn context_argument(
        module: &mut ModuleFragment,
        owner_has_context: bool,
        callee_context: Option<DeclId>,
        owner_name: &str,
    ) -> Result<givens_core::ExprId> {
        if owner_has_context {
            return module.add_expr(Expr::ParamRef(CONTEXT_PARAM.to_string()));
        }
        // A non-reader caller enters a fresh context of the callee.
        let Some(context) = callee_context else {
            return Err(CompileError::Malformed {
                name: owner_name.to_string(),
                reason: "given request outside a reader context".into(),
            });
        };
        let class = module.qualified_name(context)?;
        module.add_expr(Expr::ConstructorCall {
            class,
            args: Vec::new(),
        })
    }
}

impl CompilerPass for GivenCallResolver {
    fn name(&self) -> &str {
        "given-call"
    }

    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        graph: &mut DeclarationGraph,
    ) -> Result<()> {
        let changed = Self::changed_functions(module, ctx)?;
        let mut resolved = 0usize;
        let mut links: Vec<(DeclId, DeclId)> = Vec::new();

        for (owner, root) in visit::expr_roots(module) {
            let owner_name = module.qualified_name(owner)?.dotted();
            let owner_has_context = module
                .decl(owner)?
                .as_function()
                .map(|f| {
                    f.signature
                        .params
                        .last()
                        .map(|p| p.name == CONTEXT_PARAM)
                        .unwrap_or(false)
                })
                .unwrap_or(false);
            let owner_context = ctx.reader_contexts.get(&owner).copied();

            let ctx_ref: &PassContext = ctx;
            visit::rewrite_exprs(module, root, &mut |module, _id, expr| {
                let Expr::Call(call) = expr else {
                    return Ok(None);
                };

                // given<T>() requests
                if call.callee == runtime::given() {
                    let Some(ty) = call.type_args.first() else {
                        return Err(CompileError::Malformed {
                            name: owner_name.clone(),
                            reason: "given request requires a type argument".into(),
                        });
                    };
                    let qualifiers =
                        super::literal_qualifiers(module, &call.args, &owner_name)?;
                    let key = BindingKey::of(ty, &qualifiers);
                    let candidates = graph.givens(module, ctx_ref, &key)?;
                    let Some(&candidate) = candidates.first() else {
                        return Err(CompileError::MissingCounterpart {
                            name: key.canonical(),
                            expected: "a usable given binding for the requested key".into(),
                        });
                    };
                    let candidate_qn = module.qualified_name(candidate)?;
                    let candidate_shape = match &module.decl(candidate)?.kind {
                        DeclKind::Class(_) => CandidateShape::Class,
                        DeclKind::Function(function) => CandidateShape::Function {
                            params: function.signature.params.len(),
                        },
                        DeclKind::Property(_) => {
                            return Err(CompileError::MissingCounterpart {
                                name: candidate_qn.dotted(),
                                expected: "a class or function binding".into(),
                            })
                        }
                    };
                    let new_call = match candidate_shape {
                        CandidateShape::Class => {
                            let provider = ctx_ref
                                .implementations
                                .get(&candidate_qn)
                                .copied()
                                .ok_or_else(|| CompileError::MissingCounterpart {
                                    name: candidate_qn.dotted(),
                                    expected: "a synthesized provider class".into(),
                                })?;
                            let provider_qn = module.qualified_name(provider)?;
                            let context_arg = Self::context_argument(
                                module,
                                owner_has_context,
                                ctx_ref.reader_contexts.get(&candidate).copied(),
                                &owner_name,
                            )?;
                            CallExpr {
                                callee: provider_qn.child("get"),
                                type_args: Vec::new(),
                                args: vec![context_arg],
                                receiver: None,
                                receiver_ty: None,
                            }
                        }
                        CandidateShape::Function { params } => {
                            if params != 1 {
                                return Err(CompileError::Malformed {
                                    name: candidate_qn.dotted(),
                                    reason:
                                        "a given function with parameters cannot satisfy a given request"
                                            .into(),
                                });
                            }
                            let callee_context =
                                ctx_ref.reader_contexts.get(&candidate).copied();
                            let context_arg = Self::context_argument(
                                module,
                                owner_has_context,
                                callee_context,
                                &owner_name,
                            )?;
                            if let (Some(from), Some(to)) = (owner_context, callee_context) {
                                links.push((from, to));
                            }
                            CallExpr {
                                callee: candidate_qn,
                                type_args: Vec::new(),
                                args: vec![context_arg],
                                receiver: None,
                                receiver_ty: None,
                            }
                        }
                    };
                    resolved += 1;
                    return Ok(Some(Expr::Call(new_call)));
                }

                // stale calls to originals whose signature changed
                if let Some(&(original_params, transformed)) = changed.get(&call.callee) {
                    if call.args.len() == original_params && call.receiver.is_none() {
                        let callee_context = ctx_ref.reader_contexts.get(&transformed).copied();
                        let context_arg = Self::context_argument(
                            module,
                            owner_has_context,
                            callee_context,
                            &owner_name,
                        )?;
                        if let (Some(from), Some(to)) = (owner_context, callee_context) {
                            links.push((from, to));
                        }
                        let mut args = call.args.clone();
                        args.push(context_arg);
                        resolved += 1;
                        return Ok(Some(Expr::Call(CallExpr {
                            callee: call.callee.clone(),
                            type_args: call.type_args.clone(),
                            args,
                            receiver: None,
                            receiver_ty: None,
                        })));
                    }
                }

                Ok(None)
            })?;

            for (from, to) in links.drain(..) {
                ctx.link_contexts(from, to);
            }
        }

        self.resolved += resolved;
        ctx.stats.intrinsics_resolved += resolved;
        Ok(())
    }

    fn stats(&self) -> String {
        format!(
            "{} pass: {} given requests and reader calls resolved",
            self.name(),
            self.resolved
        )
    }
}

#[cfg(test)]
#[path = "given_call_tests.rs"]
mod tests;
