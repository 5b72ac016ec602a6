//! Intrinsic call resolvers
//!
//! Each resolver rewrites one category of compile-time-only call
//! expression into ordinary code, keyed by the callee's fully-qualified
//! name under `givens.runtime`. All of them fail fast when an expected
//! synthesized counterpart is missing; silently emitting broken code is
//! never an option.

pub mod component;
pub mod component_get;
pub mod given_call;
pub mod key_of;

pub use component::ComponentIntrinsicResolver;
pub use component_get::ComponentGetResolver;
pub use given_call::GivenCallResolver;
pub use key_of::KeyOfResolver;

use givens_core::{CompileError, Expr, ExprId, ModuleFragment, Result};

/// Extract qualifier tags from intrinsic call arguments, which must all
/// be string literals.
pub(crate) fn literal_qualifiers(
    module: &ModuleFragment,
    args: &[ExprId],
    call_site: &str,
) -> Result<Vec<String>> {
    let mut qualifiers = Vec::with_capacity(args.len());
    for &arg in args {
        match module.expr(arg)? {
            Expr::Str(tag) => qualifiers.push(tag.clone()),
            _ => {
                return Err(CompileError::Malformed {
                    name: call_site.to_string(),
                    reason: "intrinsic qualifiers must be string literals".into(),
                })
            }
        }
    }
    Ok(qualifiers)
}
