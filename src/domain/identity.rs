//! Identity Registry
//!
//! Maps canonical semantic keys to short generated ids. The key format is part
//! of the output contract: changing a separator silently breaks deduplication.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque short id of a rendered node or edge, e.g. `n1a` or `e3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CytoId(String);

impl CytoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CytoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id namespace. Node and edge ids never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Node,
    Edge,
}

impl IdKind {
    fn prefix(self) -> char {
        match self {
            IdKind::Node => 'n',
            IdKind::Edge => 'e',
        }
    }
}

/// Canonical key of an entity before id assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticKey(String);

impl SemanticKey {
    /// `func~<qualified-name>`
    pub fn function(qualified_name: &str) -> Self {
        SemanticKey(format!("func~{}", qualified_name))
    }

    /// `recv~<package-path>~<type-signature>`
    pub fn receiver(package_path: &str, type_signature: &str) -> Self {
        SemanticKey(format!("recv~{}~{}", package_path, type_signature))
    }

    /// `pkg~<package-path>`
    pub fn package(package_path: &str) -> Self {
        SemanticKey(format!("pkg~{}", package_path))
    }

    /// `call@<source-position>~<caller>-><callee>`
    pub fn call(position: &str, caller: &str, callee: &str) -> Self {
        SemanticKey(format!("call@{}~{}->{}", position, caller, callee))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SemanticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grow-only bijection between semantic keys and generated ids.
///
/// Not synchronized: one assembler owns one registry.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    ids: HashMap<SemanticKey, CytoId>,
    node_counter: u64,
    edge_counter: u64,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `key`, allocating the next id of `kind` on first use.
    /// The flag is `true` when the id was freshly allocated.
    pub fn resolve(&mut self, key: &SemanticKey, kind: IdKind) -> (CytoId, bool) {
        if let Some(id) = self.ids.get(key) {
            debug_assert_eq!(
                id.0.chars().next(),
                Some(kind.prefix()),
                "key {} reused across namespaces",
                key
            );
            return (id.clone(), false);
        }

        let counter = match kind {
            IdKind::Node => &mut self.node_counter,
            IdKind::Edge => &mut self.edge_counter,
        };
        *counter += 1;
        let id = CytoId(format!("{}{:x}", kind.prefix(), *counter));
        self.ids.insert(key.clone(), id.clone());
        (id, true)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
