use anyhow::Result;

use crate::domain::callgraph::CallGraph;
use crate::domain::cytograph::GraphModel;

pub mod cyto_exporter;

/// Anything that can hand over a fully computed call graph.
pub trait CallGraphSource {
    fn load(&self) -> Result<CallGraph>;

    /// Short human description for logs.
    fn describe(&self) -> String;
}

/// Renders an assembled graph into output bytes.
pub trait OutputExporter {
    fn render(&self, model: &GraphModel, packages: &[String]) -> Result<Vec<u8>>;
}
