// Rendered graph model for cytocall.
// Nodes and edges live in flat arenas and refer to each other by id only.

use std::collections::HashMap;

use crate::domain::color::Color;
use crate::domain::hierarchy::{NodeDraft, NodeKind};
use crate::domain::identity::CytoId;

/// A package, type or function node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: CytoId,
    pub kind: NodeKind,
    pub label: String,
    pub description: Option<String>,
    /// `None` only for package nodes.
    pub parent: Option<CytoId>,
    pub color: Color,
    pub classes: Vec<String>,
}

/// A call site between two function nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub id: CytoId,
    pub source: CytoId,
    pub target: CytoId,
    pub classes: Vec<String>,
}

/// Assembled graph, in creation order.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_index: HashMap<CytoId, usize>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &CytoId) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Nodes of one kind, in creation order.
    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Walk the parent chain from `id` up to its package.
    pub fn ancestors(&self, id: &CytoId) -> Vec<&GraphNode> {
        let mut chain = Vec::new();
        let mut current = self.node(id).and_then(|n| n.parent.as_ref());
        while let Some(parent_id) = current {
            match self.node(parent_id) {
                Some(parent) => {
                    chain.push(parent);
                    current = parent.parent.as_ref();
                }
                None => break,
            }
        }
        chain
    }

    pub(crate) fn push_node(&mut self, id: CytoId, parent: Option<CytoId>, draft: NodeDraft) {
        self.node_index.insert(id.clone(), self.nodes.len());
        self.nodes.push(GraphNode {
            id,
            kind: draft.kind,
            label: draft.label,
            description: draft.description,
            parent,
            color: draft.color,
            classes: draft.classes,
        });
    }

    pub(crate) fn push_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }
}
