//! Cytoscape Exporters
//!
//! Render an assembled graph as raw Cytoscape JSON or as a standalone HTML
//! page embedding that JSON.

use anyhow::{Context, Result};

use crate::api::{dto, html};
use crate::domain::cytograph::GraphModel;
use crate::ports::OutputExporter;

/// Raw `{"nodes": [...], "edges": [...]}` document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pub pretty: bool,
}

impl OutputExporter for JsonExporter {
    fn render(&self, model: &GraphModel, _packages: &[String]) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        dto::write_json(model, &mut buf, self.pretty).context("could not write graph JSON")?;
        Ok(buf)
    }
}

/// `index.html` with the graph embedded.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExporter;

impl OutputExporter for HtmlExporter {
    fn render(&self, model: &GraphModel, packages: &[String]) -> Result<Vec<u8>> {
        let json = dto::to_json_string(model, false).context("could not write graph to buffer")?;
        Ok(html::render_page(&json, packages).into_bytes())
    }
}
