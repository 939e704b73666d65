//! Graph Assembler
//!
//! One pass over the call edges. Admitted edges create their endpoint nodes
//! (and the type/package nodes above them) on first reference; node creation
//! is a side effect of edge processing, there is no separate node pass.

use std::collections::BTreeMap;

use crate::config::RenderOptions;
use crate::domain::callgraph::{
    CallEdge, CallGraph, FunctionDescriptor, PackageRef, ReceiverDescriptor,
};
use crate::domain::classifier::{EdgeClassifier, Rejection};
use crate::domain::cytograph::{GraphEdge, GraphModel};
use crate::domain::hierarchy::{HierarchyBuilder, Parent};
use crate::domain::identity::{CytoId, IdKind, IdentityRegistry, SemanticKey};
use crate::domain::root_library::RootLibrary;

/// Counters collected while assembling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub admitted: usize,
    /// Admitted edges whose call site was already rendered.
    pub duplicates: usize,
    pub rejected: BTreeMap<String, usize>,
}

impl AssemblyStats {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    fn reject(&mut self, reason: Rejection) {
        *self.rejected.entry(reason.to_string()).or_default() += 1;
    }
}

pub struct GraphAssembler<'a> {
    registry: IdentityRegistry,
    model: GraphModel,
    hierarchy: HierarchyBuilder<'a>,
    classifier: EdgeClassifier<'a>,
    stats: AssemblyStats,
}

impl<'a> GraphAssembler<'a> {
    pub fn new(options: RenderOptions, root_library: &'a RootLibrary) -> Self {
        Self {
            registry: IdentityRegistry::new(),
            model: GraphModel::new(),
            hierarchy: HierarchyBuilder::new(root_library),
            classifier: EdgeClassifier::new(options, root_library),
            stats: AssemblyStats::default(),
        }
    }

    /// Feed every edge, in the order given.
    pub fn run<'g, I>(mut self, edges: I) -> (GraphModel, AssemblyStats)
    where
        I: IntoIterator<Item = CallEdge<'g>>,
    {
        for edge in edges {
            self.process_edge(&edge);
        }
        (self.model, self.stats)
    }

    /// Returns the edge id when the edge is admitted.
    pub fn process_edge(&mut self, edge: &CallEdge<'_>) -> Option<CytoId> {
        if let Err(reason) = self.classifier.check(edge) {
            tracing::trace!(
                caller = %edge.caller.name,
                callee = %edge.callee.name,
                %reason,
                "edge rejected"
            );
            self.stats.reject(reason);
            return None;
        }
        self.stats.admitted += 1;

        let key = SemanticKey::call(edge.position, &edge.caller.name, &edge.callee.name);
        let (id, fresh) = self.registry.resolve(&key, IdKind::Edge);
        if !fresh {
            self.stats.duplicates += 1;
            return Some(id);
        }

        let source = self.ensure_function(edge.caller);
        let target = self.ensure_function(edge.callee);
        self.model.push_edge(GraphEdge {
            id: id.clone(),
            source,
            target,
            classes: EdgeClassifier::tags_for(edge),
        });
        Some(id)
    }

    fn ensure_function(&mut self, func: &FunctionDescriptor) -> CytoId {
        let key = HierarchyBuilder::function_key(func);
        let (id, fresh) = self.registry.resolve(&key, IdKind::Node);
        if !fresh {
            return id;
        }

        let parent = match self.hierarchy.parent_of(func) {
            Some(Parent::Receiver(recv)) => self.ensure_receiver(recv),
            Some(Parent::Package(pkg)) => self.ensure_package(pkg),
            None => unreachable!("classifier admitted {} without a package", func.name),
        };
        let draft = self.hierarchy.function_node(func);
        self.model.push_node(id.clone(), Some(parent), draft);
        id
    }

    fn ensure_receiver(&mut self, recv: &ReceiverDescriptor) -> CytoId {
        let key = HierarchyBuilder::receiver_key(recv);
        let (id, fresh) = self.registry.resolve(&key, IdKind::Node);
        if !fresh {
            return id;
        }

        let parent = self.ensure_package(&recv.package);
        let draft = self.hierarchy.receiver_node(recv);
        self.model.push_node(id.clone(), Some(parent), draft);
        id
    }

    fn ensure_package(&mut self, pkg: &PackageRef) -> CytoId {
        let (id, fresh) = self.registry.resolve(&HierarchyBuilder::package_key(pkg), IdKind::Node);
        if fresh {
            let draft = self.hierarchy.package_node(pkg);
            self.model.push_node(id.clone(), None, draft);
        }
        id
    }
}

/// Strip synthetic bookkeeping nodes, then render every admitted edge.
pub fn assemble(
    graph: &mut CallGraph,
    options: RenderOptions,
    root_library: &RootLibrary,
) -> (GraphModel, AssemblyStats) {
    graph.delete_synthetic_nodes();
    let (model, stats) = GraphAssembler::new(options, root_library).run(graph.edges());
    tracing::info!(
        nodes = model.nodes().len(),
        edges = model.edges().len(),
        admitted = stats.admitted,
        rejected = stats.rejected_total(),
        "assembled graph"
    );
    (model, stats)
}
