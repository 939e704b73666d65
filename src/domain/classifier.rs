//! Edge Classifier
//!
//! Decides which call edges are rendered and which classes they carry.

use std::fmt;

use crate::config::RenderOptions;
use crate::domain::callgraph::CallEdge;
use crate::domain::root_library::RootLibrary;

/// Why an edge was left out of the rendered graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Callee is a compiler generated wrapper.
    SyntheticCallee,
    /// Caller is the engine's shared root node.
    SharedCaller,
    /// Callee has no package to be placed in.
    OrphanCallee,
    RootLibraryCallee,
    UnexportedCallee,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::SyntheticCallee => "synthetic callee",
            Rejection::SharedCaller => "shared caller",
            Rejection::OrphanCallee => "callee without package",
            Rejection::RootLibraryCallee => "root-library callee",
            Rejection::UnexportedCallee => "unexported callee",
        };
        f.write_str(reason)
    }
}

pub struct EdgeClassifier<'a> {
    options: RenderOptions,
    root_library: &'a RootLibrary,
}

impl<'a> EdgeClassifier<'a> {
    pub fn new(options: RenderOptions, root_library: &'a RootLibrary) -> Self {
        Self { options, root_library }
    }

    /// First failing rule, if any. Structural rules run before the
    /// configurable ones.
    pub fn check(&self, edge: &CallEdge<'_>) -> Result<(), Rejection> {
        if edge.callee.is_synthetic() {
            return Err(Rejection::SyntheticCallee);
        }
        if edge.caller.is_shared_root() {
            return Err(Rejection::SharedCaller);
        }
        if edge.callee.is_shared_root() {
            return Err(Rejection::OrphanCallee);
        }
        if !self.options.include_root_library && self.root_library.owns(edge.callee) {
            return Err(Rejection::RootLibraryCallee);
        }
        if !self.options.include_unexported && edge.callee.is_unexported() {
            return Err(Rejection::UnexportedCallee);
        }
        Ok(())
    }

    pub fn admit(&self, edge: &CallEdge<'_>) -> bool {
        self.check(edge).is_ok()
    }

    /// Classes of an edge: its call description split into words, e.g.
    /// `concurrent static function call`.
    pub fn tags_for(edge: &CallEdge<'_>) -> Vec<String> {
        edge.description.split_whitespace().map(str::to_string).collect()
    }
}
