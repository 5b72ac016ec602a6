//! Human-readable IR dumps
//!
//! An optional side channel: renders the final tree of every file to a
//! text file under a configured directory. Read by humans and tests
//! only, never by later compiler stages.

use givens_core::{DeclId, DeclKind, Expr, ExprId, File, ModuleFragment, Result};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Render one file of the module as text.
pub fn render_file(module: &ModuleFragment, file: &File) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "// module {}", module.name);
    let _ = writeln!(out, "package {}", file.package.dotted());
    let _ = writeln!(out, "// file {}", file.name);
    for &member in &file.members {
        render_decl(module, member, 0, &mut out)?;
    }
    Ok(out)
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn render_decl(module: &ModuleFragment, id: DeclId, depth: usize, out: &mut String) -> Result<()> {
    let decl = module.decl(id)?;
    for annotation in &decl.annotations {
        indent(out, depth);
        let _ = writeln!(out, "@{annotation:?}");
    }
    match &decl.kind {
        DeclKind::Class(class) => {
            indent(out, depth);
            let _ = writeln!(out, "class {} {{", decl.name);
            for constructor in &class.constructors {
                indent(out, depth + 1);
                let params: Vec<String> = constructor
                    .params
                    .iter()
                    .map(|p| format!("{}: {}", p.name, p.ty.render()))
                    .collect();
                let _ = writeln!(out, "constructor({})", params.join(", "));
            }
            for field in &class.fields {
                indent(out, depth + 1);
                let modifier = match (field.is_static, field.lazy) {
                    (true, true) => "static lazy ",
                    (true, false) => "static ",
                    _ => "",
                };
                let init = match field.initializer {
                    Some(init) => format!(" = {}", render_expr(module, init)?),
                    None => String::new(),
                };
                let _ = writeln!(
                    out,
                    "{}val {}: {}{}",
                    modifier,
                    field.name,
                    field.ty.render(),
                    init
                );
            }
            for &member in &class.members {
                render_decl(module, member, depth + 1, out)?;
            }
            indent(out, depth);
            out.push_str("}\n");
        }
        DeclKind::Function(function) => {
            indent(out, depth);
            let _ = writeln!(out, "fun {}{}", decl.name, function.signature.render());
            if let Some(body) = function.body {
                indent(out, depth + 1);
                let _ = writeln!(out, "= {}", render_expr(module, body)?);
            }
        }
        DeclKind::Property(property) => {
            indent(out, depth);
            let _ = writeln!(out, "val {}: {}", decl.name, property.ty.render());
            if let Some(getter) = property.getter {
                render_decl(module, getter, depth + 1, out)?;
            }
        }
    }
    Ok(())
}

fn render_expr(module: &ModuleFragment, id: ExprId) -> Result<String> {
    Ok(match module.expr(id)? {
        Expr::Call(call) => {
            let args = render_args(module, &call.args)?;
            let receiver = match call.receiver {
                Some(receiver) => format!("{}.", render_expr(module, receiver)?),
                None => String::new(),
            };
            format!("{}{}({})", receiver, call.callee.dotted(), args)
        }
        Expr::ConstructorCall { class, args } => {
            format!("new {}({})", class.dotted(), render_args(module, args)?)
        }
        Expr::CachedFieldRead { class, field } => format!("{}.{}", class.dotted(), field),
        Expr::KeyLiteral(key) => format!("key({}, {:#x})", key.canonical(), key.fingerprint()),
        Expr::Int(value) => value.to_string(),
        Expr::Str(value) => format!("{value:?}"),
        Expr::Bool(value) => value.to_string(),
        Expr::ParamRef(name) => name.clone(),
        Expr::Block(items) => {
            let rendered: Result<Vec<String>> =
                items.iter().map(|&item| render_expr(module, item)).collect();
            format!("{{ {} }}", rendered?.join("; "))
        }
        Expr::Return(Some(value)) => format!("return {}", render_expr(module, *value)?),
        Expr::Return(None) => "return".to_string(),
        Expr::Unit => "()".to_string(),
    })
}

fn render_args(module: &ModuleFragment, args: &[ExprId]) -> Result<String> {
    let rendered: Result<Vec<String>> = args.iter().map(|&arg| render_expr(module, arg)).collect();
    Ok(rendered?.join(", "))
}

/// Write one text file per module file under `dir`, returning how many
/// files were written.
pub fn dump_module(module: &ModuleFragment, dir: &Path) -> Result<usize> {
    let mut written = 0usize;
    for file_id in module.file_ids() {
        let file = module.file(file_id)?;
        let rendered = render_file(module, file)?;
        let package_dir = dir.join(file.package.dotted());
        std::fs::create_dir_all(&package_dir)?;
        let path = package_dir.join(format!("{}.ir.txt", file.name));
        std::fs::write(&path, rendered)?;
        written += 1;
    }
    info!(files = written, dir = %dir.display(), "IR dump written");
    Ok(written)
}

#[cfg(test)]
#[path = "dump_tests.rs"]
mod tests;
