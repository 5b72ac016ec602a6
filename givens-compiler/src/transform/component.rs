//! Component implementation synthesis
//!
//! `Component(...)` builder calls and root-factory declarations both name
//! a component type that needs a concrete implementation class. This pass
//! synthesizes exactly one per component type, ahead of the resolvers
//! that rewrite the call sites to construct it.

use crate::context::PassContext;
use crate::pipeline::CompilerPass;
use crate::runtime;
use crate::visit;
use crate::names;
use givens_core::{
    ClassDecl, CompileError, Constructor, DeclKind, Expr, FileId, ModuleFragment, Origin, Param,
    QualifiedName, Result, ScopeRef, TypeRef,
};

/// Synthesizes component implementation classes.
#[derive(Default)]
pub struct ComponentSynthesisPass {
    synthesized: usize,
}

impl ComponentSynthesisPass {
    /// Create the pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Component types demanded by builder calls and root factories, with
    /// the constructor arity and the file to synthesize into. First
    /// appearance wins; order is discovery order.
    fn collect_demands(
        module: &ModuleFragment,
    ) -> Result<Vec<(QualifiedName, usize, FileId)>> {
        let mut demands: Vec<(QualifiedName, usize, FileId)> = Vec::new();
        for (owner, root) in visit::expr_roots(module) {
            let mut sites: Vec<(Option<QualifiedName>, usize)> = Vec::new();
            visit::walk_exprs(module, root, &mut |_, expr| {
                if let Expr::Call(call) = expr {
                    if call.callee == runtime::component_builder() {
                        sites.push((
                            call.type_args.first().map(|t| t.classifier.clone()),
                            call.args.len(),
                        ));
                    }
                }
                Ok(())
            })?;
            if sites.is_empty() {
                continue;
            }
            let file = module.containing_file(owner)?;
            let owner_name = module.qualified_name(owner)?.dotted();
            for (classifier, arity) in sites {
                let Some(classifier) = classifier else {
                    return Err(CompileError::Malformed {
                        name: owner_name,
                        reason: "component builder call requires a type argument".into(),
                    });
                };
                if !demands.iter().any(|(c, _, _)| c == &classifier) {
                    demands.push((classifier, arity, file));
                }
            }
        }
        for decl in module.decls() {
            if matches!(decl.origin, Origin::External) {
                continue;
            }
            if let Some(context) = decl.root_factory_context() {
                if !demands.iter().any(|(c, _, _)| c == context) {
                    let file = module.containing_file(decl.id)?;
                    demands.push((context.clone(), 0, file));
                }
            }
        }
        Ok(demands)
    }
}

impl CompilerPass for ComponentSynthesisPass {
    fn name(&self) -> &str {
        "component-synthesis"
    }

    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        _graph: &mut crate::graph::DeclarationGraph,
    ) -> Result<()> {
        for (component, arity, file) in Self::collect_demands(module)? {
            if ctx.implementations.contains_key(&component) {
                continue;
            }
            let params = (0..arity)
                .map(|i| Param::new(format!("arg{i}"), TypeRef::named(runtime::any_type())))
                .collect();
            let implementation = module.add_decl(
                ScopeRef::File(file),
                names::component_impl_name(&component),
                Origin::Synthesized,
                Vec::new(),
                DeclKind::Class(ClassDecl {
                    constructors: vec![Constructor { params }],
                    ..ClassDecl::default()
                }),
            )?;
            ctx.implementations.insert(component, implementation);
            self.synthesized += 1;
            ctx.stats.components_synthesized += 1;
        }
        Ok(())
    }

    fn stats(&self) -> String {
        format!(
            "{} pass: {} component impls synthesized",
            self.name(),
            self.synthesized
        )
    }
}
