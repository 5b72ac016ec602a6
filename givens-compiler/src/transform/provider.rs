//! Provider synthesis for given classes
//!
//! Every given class gets one provider class wrapping its constructor:
//! `X_Provider.get(context)` constructs `X`, resolving each constructor
//! parameter through a `given<P>()` request that the call resolvers
//! elaborate later in the pipeline.

use crate::context::PassContext;
use crate::names;
use crate::pipeline::CompilerPass;
use crate::runtime::{self, CONTEXT_PARAM};
use givens_core::{
    CallExpr, ClassDecl, CompileError, Constructor, DeclId, DeclKind, Expr, FunctionDecl,
    ModuleFragment, Origin, Param, QualifiedName, Result, ScopeRef, Signature, TypeRef,
};

/// Synthesizes one provider class per given class.
#[derive(Default)]
pub struct ProviderSynthesisPass {
    synthesized: usize,
}

impl ProviderSynthesisPass {
    /// Create the pass.
    pub fn new() -> Self {
        Self::default()
    }

    fn provider_target(
        module: &ModuleFragment,
        id: DeclId,
    ) -> Result<Option<(QualifiedName, Constructor)>> {
        let decl = module.decl(id)?;
        let class = match decl.as_class() {
            Some(class) if decl.is_given() && matches!(decl.origin, Origin::Source) => class,
            _ => return Ok(None),
        };
        let qualified = module.qualified_name(id)?;
        if class.constructors.len() != 1 {
            return Err(CompileError::Malformed {
                name: qualified.dotted(),
                reason: format!(
                    "given class must declare exactly one constructor, found {}",
                    class.constructors.len()
                ),
            });
        }
        Ok(Some((qualified, class.constructors[0].clone())))
    }

    fn synthesize_provider(
        &mut self,
        module: &mut ModuleFragment,
        class_id: DeclId,
        class: &QualifiedName,
        constructor: &Constructor,
    ) -> Result<DeclId> {
        // One given<P>() request per constructor parameter; the given-call
        // resolver turns these into provider lookups against `context`.
        let mut args = Vec::with_capacity(constructor.params.len());
        for param in &constructor.params {
            args.push(module.add_expr(Expr::Call(CallExpr {
                callee: runtime::given(),
                type_args: vec![param.ty.clone()],
                args: Vec::new(),
                receiver: None,
                receiver_ty: None,
            }))?);
        }
        let body = module.add_expr(Expr::ConstructorCall {
            class: class.clone(),
            args,
        })?;

        // The provider lands next to the class it serves.
        let file = module.containing_file(class_id)?;
        let provider = module.add_decl(
            ScopeRef::File(file),
            names::provider_name(class),
            Origin::Synthesized,
            Vec::new(),
            DeclKind::Class(ClassDecl {
                constructors: vec![Constructor { params: Vec::new() }],
                ..ClassDecl::default()
            }),
        )?;
        module.add_decl(
            ScopeRef::Class(provider),
            "get",
            Origin::Synthesized,
            Vec::new(),
            DeclKind::Function(FunctionDecl {
                signature: Signature {
                    type_params: Vec::new(),
                    params: vec![Param::new(
                        CONTEXT_PARAM,
                        TypeRef::named(runtime::context_type()),
                    )],
                    ret: TypeRef::named(class.clone()),
                },
                body: Some(body),
            }),
        )?;
        Ok(provider)
    }
}

impl CompilerPass for ProviderSynthesisPass {
    fn name(&self) -> &str {
        "provider-synthesis"
    }

    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        _graph: &mut crate::graph::DeclarationGraph,
    ) -> Result<()> {
        for id in module.decl_ids() {
            let Some((qualified, constructor)) = Self::provider_target(module, id)? else {
                continue;
            };
            if ctx.implementations.contains_key(&qualified) {
                continue;
            }
            let provider = self.synthesize_provider(module, id, &qualified, &constructor)?;
            ctx.implementations.insert(qualified, provider);
            self.synthesized += 1;
            ctx.stats.providers_synthesized += 1;
        }
        Ok(())
    }

    fn stats(&self) -> String {
        format!(
            "{} pass: {} providers synthesized",
            self.name(),
            self.synthesized
        )
    }
}
