use anyhow::{Context, Result};

use crate::config::RenderOptions;
use crate::domain::assembler::{self, AssemblyStats};
use crate::domain::root_library::RootLibrary;
use crate::infrastructure::OutputTarget;
use crate::ports::{CallGraphSource, OutputExporter};

/// Load a call graph, assemble the visual graph, render it, write it.
pub struct AnalyzeUsecase<'a> {
    pub source: &'a dyn CallGraphSource,
    pub exporter: &'a dyn OutputExporter,
    pub options: RenderOptions,
    pub root_library: &'a RootLibrary,
    /// Listed on the HTML page when the source does not name its packages.
    pub fallback_packages: &'a [String],
}

impl<'a> AnalyzeUsecase<'a> {
    /// Render everything in memory, then write. A failure anywhere leaves the
    /// target untouched, except for I/O failures of the final write itself.
    pub fn run(&self, target: &OutputTarget) -> Result<AssemblyStats> {
        let (bytes, stats) = self.render()?;
        target.write_all(&bytes)?;
        tracing::info!(bytes = bytes.len(), %target, "graph written");
        Ok(stats)
    }

    pub fn render(&self) -> Result<(Vec<u8>, AssemblyStats)> {
        tracing::info!(source = %self.source.describe(), "loading call graph");
        let mut graph = self
            .source
            .load()
            .with_context(|| {
                format!("could not load call graph from {}", self.source.describe())
            })?;

        let (model, stats) = assembler::assemble(&mut graph, self.options, self.root_library);

        let packages = if graph.packages().is_empty() {
            self.fallback_packages
        } else {
            graph.packages()
        };
        let bytes = self.exporter.render(&model, packages)?;
        Ok((bytes, stats))
    }
}
