//! Serializable declaration metadata
//!
//! Two persistence surfaces survive a compilation: the ordered member
//! snapshot of every file and class (read back when the artifact is
//! deserialized), and a per-declaration blob attached as a synthetic
//! annotation so a later, source-less compilation can decode what was
//! synthesized here.

use crate::error::Result;
use crate::key::BindingCategory;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Kind tag of a member descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberKind {
    /// A class member.
    Class,
    /// A function member.
    Function,
    /// A property member.
    Property,
}

/// One entry of a member snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    /// Member name.
    pub name: String,
    /// Member kind.
    pub kind: MemberKind,
    /// Rendered signature or type.
    pub signature: String,
}

/// The ordered set of member descriptors saved for a file or class.
///
/// Downstream deserialization walks this list, so it must exactly match
/// the live member list whenever a pass adds or removes declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    /// Descriptors in member order.
    pub members: Vec<MemberDescriptor>,
}

impl MemberSnapshot {
    /// Snapshot with no members.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of recorded members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the snapshot records no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Per-declaration metadata persisted into the compiled artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationMetadata {
    /// Dotted qualified name of the declaration.
    pub qualified_name: String,
    /// Binding category, when the declaration is a binding.
    pub category: Option<BindingCategory>,
    /// Fingerprint of the binding key, when the declaration is a binding.
    pub key_fingerprint: Option<u64>,
    /// Rendered signature, for functions and properties.
    pub signature: Option<String>,
    /// How the declaration came to be: `synthesized` or `transformed`.
    pub provenance: String,
}

impl DeclarationMetadata {
    /// Encode into the base64 blob carried by the synthetic annotation.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(BASE64.encode(json))
    }

    /// Decode a blob produced by [`DeclarationMetadata::encode`].
    pub fn decode(blob: &str) -> Result<Self> {
        let json = BASE64.decode(blob)?;
        Ok(serde_json::from_slice(&json)?)
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
