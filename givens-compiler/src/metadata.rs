//! Metadata patching
//!
//! Runs once, last: refreshes the serialized member snapshot of every
//! file and class to match the live member lists (the compiled artifact
//! becomes unreadable downstream otherwise), and attaches the
//! base64-encoded declaration blob to everything this run synthesized or
//! transformed.

use crate::context::PassContext;
use crate::index::binding_type;
use crate::pipeline::CompilerPass;
use givens_core::{
    Annotation, BindingKey, DeclId, DeclKind, DeclarationMetadata, MemberDescriptor, MemberKind,
    MemberSnapshot, ModuleFragment, Origin, Result,
};

/// Refreshes snapshots and attaches metadata blobs.
#[derive(Default)]
pub struct MetadataPass {
    refreshed: usize,
    attached: usize,
}

impl MetadataPass {
    /// Create the pass.
    pub fn new() -> Self {
        Self::default()
    }

    fn descriptor(module: &ModuleFragment, id: DeclId) -> Result<MemberDescriptor> {
        let decl = module.decl(id)?;
        let (kind, signature) = match &decl.kind {
            DeclKind::Class(_) => (MemberKind::Class, module.qualified_name(id)?.dotted()),
            DeclKind::Function(f) => (MemberKind::Function, f.signature.render()),
            DeclKind::Property(p) => (MemberKind::Property, p.ty.render()),
        };
        Ok(MemberDescriptor {
            name: decl.name.clone(),
            kind,
            signature,
        })
    }

    fn snapshot(module: &ModuleFragment, members: &[DeclId]) -> Result<MemberSnapshot> {
        Ok(MemberSnapshot {
            members: members
                .iter()
                .map(|&id| Self::descriptor(module, id))
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

impl CompilerPass for MetadataPass {
    fn name(&self) -> &str {
        "metadata"
    }

    fn run(
        &mut self,
        module: &mut ModuleFragment,
        ctx: &mut PassContext,
        _graph: &mut crate::graph::DeclarationGraph,
    ) -> Result<()> {
        // File snapshots.
        for file_id in module.file_ids() {
            let snapshot = Self::snapshot(module, &module.file(file_id)?.members.clone())?;
            module.file_mut(file_id)?.snapshot = snapshot;
            self.refreshed += 1;
        }
        // Class snapshots.
        for id in module.decl_ids() {
            let members = match module.decl(id)?.as_class() {
                Some(class) => class.members.clone(),
                None => continue,
            };
            let snapshot = Self::snapshot(module, &members)?;
            if let Some(class) = module.decl_mut(id)?.as_class_mut() {
                class.snapshot = snapshot;
            }
            self.refreshed += 1;
        }
        ctx.stats.snapshots_refreshed += self.refreshed;

        // Per-declaration blobs for everything synthesized or transformed.
        let mut blobs: Vec<(DeclId, String)> = Vec::new();
        for id in module.decl_ids() {
            let decl = module.decl(id)?;
            let transformed = ctx.transforms.is_transformed_value(id);
            if !(matches!(decl.origin, Origin::Synthesized) || transformed) {
                continue;
            }
            if decl
                .annotations
                .iter()
                .any(|a| matches!(a, Annotation::Metadata { .. }))
            {
                continue;
            }
            let categories = decl.binding_categories();
            let key_fingerprint = if categories.is_empty() {
                None
            } else {
                Some(BindingKey::of(&binding_type(module, decl)?, &decl.qualifiers()).fingerprint())
            };
            let signature = match &decl.kind {
                DeclKind::Function(f) => Some(f.signature.render()),
                DeclKind::Property(p) => Some(p.ty.render()),
                DeclKind::Class(_) => None,
            };
            let metadata = DeclarationMetadata {
                qualified_name: module.qualified_name(id)?.dotted(),
                category: categories.first().copied(),
                key_fingerprint,
                signature,
                provenance: if transformed {
                    "transformed".to_string()
                } else {
                    "synthesized".to_string()
                },
            };
            blobs.push((id, metadata.encode()?));
        }
        for (id, blob) in blobs {
            module.decl_mut(id)?.annotations.push(Annotation::Metadata { blob });
            self.attached += 1;
        }
        ctx.stats.metadata_attached += self.attached;
        Ok(())
    }

    fn stats(&self) -> String {
        format!(
            "{} pass: {} snapshots refreshed, {} blobs attached",
            self.name(),
            self.refreshed,
            self.attached
        )
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
