// Call graph structures for cytocall.
// The graph is produced by an external analysis engine; this module only
// validates it and removes synthetic bookkeeping nodes before rendering.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::domain::error::{GraphError, Result};

/// Identifier of a function inside one call graph document.
pub type FunctionId = u64;

/// A package as seen by the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    /// Full import path, e.g. `github.com/acme/app/store`.
    pub path: String,
    /// Short package name, e.g. `store`.
    pub name: String,
}

/// The type a method is declared on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverDescriptor {
    pub package: PackageRef,
    /// Full type signature, e.g. `*github.com/acme/app/store.DB`.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub embedded: bool,
    #[serde(default)]
    pub field: bool,
    #[serde(default = "default_true")]
    pub exported: bool,
}

fn default_true() -> bool {
    true
}

/// A function node of the call graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub id: FunctionId,
    /// Fully qualified name, e.g. `github.com/acme/app/store.(*DB).Get`.
    pub name: String,
    /// Declaring package. `None` marks the engine's shared root node.
    #[serde(default)]
    pub package: Option<PackageRef>,
    /// `None` when the function has no source-level declaration (closures).
    #[serde(default)]
    pub exported: Option<bool>,
    /// Non-empty when the function is compiler generated (wrappers, thunks).
    #[serde(default)]
    pub synthetic: Option<String>,
    /// Explicit root-library flag; resolved through `RootLibrary` when absent.
    #[serde(default)]
    pub root_library: Option<bool>,
    /// Name of the lexically enclosing function, set for closures.
    #[serde(default)]
    pub enclosing: Option<String>,
    #[serde(default)]
    pub receiver: Option<ReceiverDescriptor>,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub results: Vec<String>,
}

impl FunctionDescriptor {
    pub fn is_synthetic(&self) -> bool {
        self.synthetic.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Only functions backed by a declaration can be unexported.
    pub fn is_unexported(&self) -> bool {
        self.exported == Some(false)
    }

    /// Package-level declaration, not a closure.
    pub fn is_global(&self) -> bool {
        self.enclosing.is_none()
    }

    pub fn is_shared_root(&self) -> bool {
        self.package.is_none()
    }

    pub fn is_package_init(&self) -> bool {
        match &self.package {
            Some(pkg) => self
                .name
                .strip_prefix(pkg.path.as_str())
                .is_some_and(|rest| rest == ".init"),
            None => false,
        }
    }

    /// Name with package path and receiver qualifiers stripped.
    pub fn short_name(&self) -> &str {
        unqualified(&self.name)
    }
}

/// Text after the last `.` that is not inside a type-argument list, so
/// `app.Map[example.com/x.T]` becomes `Map[example.com/x.T]`.
pub fn unqualified(name: &str) -> &str {
    let mut depth = 0usize;
    let mut last_dot = None;
    for (i, ch) in name.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => last_dot = Some(i),
            _ => {}
        }
    }
    match last_dot {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

/// One call site as emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub caller: FunctionId,
    pub callee: FunctionId,
    /// Source position of the call, e.g. `store/db.go:42:9`.
    #[serde(default)]
    pub position: String,
    /// Call kind, e.g. `concurrent static function call`.
    #[serde(default)]
    pub description: String,
}

impl CallSite {
    fn identity(&self) -> (FunctionId, String, FunctionId) {
        (self.caller, self.position.clone(), self.callee)
    }
}

/// Raw engine output before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallGraphDocument {
    /// Analysed main packages, listed on the HTML page.
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
    #[serde(default)]
    pub calls: Vec<CallSite>,
}

impl CallGraphDocument {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A call edge with both endpoints resolved.
#[derive(Debug, Clone, Copy)]
pub struct CallEdge<'g> {
    pub caller: &'g FunctionDescriptor,
    pub callee: &'g FunctionDescriptor,
    pub position: &'g str,
    pub description: &'g str,
}

/// The validated call graph.
#[derive(Debug, Clone)]
pub struct CallGraph {
    packages: Vec<String>,
    functions: Vec<FunctionDescriptor>,
    index: HashMap<FunctionId, usize>,
    calls: Vec<CallSite>,
}

impl CallGraph {
    pub fn from_document(doc: CallGraphDocument) -> Result<Self> {
        if doc.calls.is_empty() {
            return Err(GraphError::EmptyCallGraph);
        }

        let mut index = HashMap::with_capacity(doc.functions.len());
        for (pos, func) in doc.functions.iter().enumerate() {
            if index.insert(func.id, pos).is_some() {
                return Err(GraphError::DuplicateFunction(func.id));
            }
        }

        for (i, call) in doc.calls.iter().enumerate() {
            for id in [call.caller, call.callee] {
                if !index.contains_key(&id) {
                    return Err(GraphError::UnknownFunction { index: i, id });
                }
            }
        }

        Ok(Self {
            packages: doc.packages,
            functions: doc.functions,
            index,
            calls: doc.calls,
        })
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn functions(&self) -> &[FunctionDescriptor] {
        &self.functions
    }

    pub fn function(&self, id: FunctionId) -> Option<&FunctionDescriptor> {
        self.index.get(&id).map(|&pos| &self.functions[pos])
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Edges in document order, followed by bypass edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = CallEdge<'_>> + '_ {
        self.calls.iter().map(move |call| CallEdge {
            caller: &self.functions[self.index[&call.caller]],
            callee: &self.functions[self.index[&call.callee]],
            position: &call.position,
            description: &call.description,
        })
    }

    /// The engine's root: a function without package that no call targets.
    /// Package-less functions that are called, such as thunks for methods of
    /// builtin interfaces, are ordinary wrappers.
    pub fn is_engine_root(&self, func: &FunctionDescriptor) -> bool {
        func.is_shared_root() && !self.calls.iter().any(|c| c.callee == func.id)
    }

    /// Remove synthetic functions, rewiring every caller of a removed node to
    /// each of its callees through the original call site. The engine root and
    /// package initializers are kept. Returns the number of removed functions.
    pub fn delete_synthetic_nodes(&mut self) -> usize {
        let doomed: Vec<FunctionId> = self
            .functions
            .iter()
            .filter(|f| f.is_synthetic() && !f.is_package_init() && !self.is_engine_root(f))
            .map(|f| f.id)
            .collect();
        if doomed.is_empty() {
            return 0;
        }

        let mut seen: HashSet<(FunctionId, String, FunctionId)> =
            self.calls.iter().map(CallSite::identity).collect();

        for &id in &doomed {
            let incoming: Vec<CallSite> = self
                .calls
                .iter()
                .filter(|c| c.callee == id && c.caller != id)
                .cloned()
                .collect();
            let outgoing: Vec<CallSite> = self
                .calls
                .iter()
                .filter(|c| c.caller == id && c.callee != id)
                .cloned()
                .collect();

            for e_in in &incoming {
                for e_out in &outgoing {
                    let bypass = CallSite {
                        caller: e_in.caller,
                        callee: e_out.callee,
                        position: e_in.position.clone(),
                        description: e_in.description.clone(),
                    };
                    if seen.insert(bypass.identity()) {
                        self.calls.push(bypass);
                    }
                }
            }

            self.calls.retain(|c| c.caller != id && c.callee != id);
        }

        let doomed: HashSet<FunctionId> = doomed.into_iter().collect();
        self.functions.retain(|f| !doomed.contains(&f.id));
        self.index = self
            .functions
            .iter()
            .enumerate()
            .map(|(pos, f)| (f.id, pos))
            .collect();

        tracing::debug!(
            removed = doomed.len(),
            calls = self.calls.len(),
            "deleted synthetic nodes"
        );
        doomed.len()
    }
}
