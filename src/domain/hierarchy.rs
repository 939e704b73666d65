//! Hierarchy Builder
//!
//! Structural containment of rendered nodes: a function sits inside its
//! receiver type or directly inside its package, a type sits inside its
//! package. Parents never come from call edges, so the hierarchy is a forest
//! even when calls are recursive.

use crate::domain::callgraph::{unqualified, FunctionDescriptor, PackageRef, ReceiverDescriptor};
use crate::domain::color::{Color, ColorEncoder};
use crate::domain::identity::SemanticKey;
use crate::domain::root_library::RootLibrary;

/// Classification tags attached to nodes.
pub mod tags {
    pub const GLOBAL: &str = "global";
    pub const UNEXPORTED: &str = "unexported";
    pub const ROOT_LIBRARY: &str = "root-library";
    pub const TYPE: &str = "type";
    pub const EMBEDDED: &str = "embedded";
    pub const FIELD: &str = "field";
    pub const PACKAGE: &str = "package";
}

/// Structural parent of a function node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent<'g> {
    Receiver(&'g ReceiverDescriptor),
    Package(&'g PackageRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Package,
    Type,
    Function,
}

/// Everything about a node except its id and parent id.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDraft {
    pub kind: NodeKind,
    pub label: String,
    pub description: Option<String>,
    pub color: Color,
    pub classes: Vec<String>,
}

pub struct HierarchyBuilder<'a> {
    root_library: &'a RootLibrary,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(root_library: &'a RootLibrary) -> Self {
        Self { root_library }
    }

    pub fn is_root_library(&self, func: &FunctionDescriptor) -> bool {
        self.root_library.owns(func)
    }

    /// `None` for functions without a package, which never reach rendering.
    pub fn parent_of<'g>(&self, func: &'g FunctionDescriptor) -> Option<Parent<'g>> {
        match (&func.receiver, &func.package) {
            (Some(recv), _) => Some(Parent::Receiver(recv)),
            (None, Some(pkg)) => Some(Parent::Package(pkg)),
            (None, None) => None,
        }
    }

    pub fn function_key(func: &FunctionDescriptor) -> SemanticKey {
        SemanticKey::function(&func.name)
    }

    /// Keyed by package path and full type signature so same-named types in
    /// different packages stay apart.
    pub fn receiver_key(recv: &ReceiverDescriptor) -> SemanticKey {
        SemanticKey::receiver(&recv.package.path, &recv.type_name)
    }

    pub fn package_key(pkg: &PackageRef) -> SemanticKey {
        SemanticKey::package(&pkg.path)
    }

    pub fn function_node(&self, func: &FunctionDescriptor) -> NodeDraft {
        let mut classes = Vec::new();
        if func.is_global() {
            classes.push(tags::GLOBAL.to_string());
        }
        if func.is_unexported() {
            classes.push(tags::UNEXPORTED.to_string());
        }
        if self.is_root_library(func) {
            classes.push(tags::ROOT_LIBRARY.to_string());
        }

        NodeDraft {
            kind: NodeKind::Function,
            label: func.short_name().to_string(),
            description: None,
            color: ColorEncoder::signature_color(&func.params, &func.results),
            classes,
        }
    }

    pub fn receiver_node(&self, recv: &ReceiverDescriptor) -> NodeDraft {
        let mut classes = vec![tags::TYPE.to_string()];
        if recv.embedded {
            classes.push(tags::EMBEDDED.to_string());
        }
        if recv.field {
            classes.push(tags::FIELD.to_string());
        }
        if !recv.exported {
            classes.push(tags::UNEXPORTED.to_string());
        }

        NodeDraft {
            kind: NodeKind::Type,
            label: type_label(&recv.type_name).to_string(),
            description: None,
            color: ColorEncoder::label_color(&recv.type_name),
            classes,
        }
    }

    pub fn package_node(&self, pkg: &PackageRef) -> NodeDraft {
        NodeDraft {
            kind: NodeKind::Package,
            label: pkg.name.clone(),
            description: Some(pkg.path.clone()),
            color: ColorEncoder::label_color(&pkg.name),
            classes: vec![tags::PACKAGE.to_string()],
        }
    }
}

/// Bare type name: `*github.com/acme/store.DB` becomes `DB`.
pub fn type_label(type_signature: &str) -> &str {
    unqualified(type_signature)
}
