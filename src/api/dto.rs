use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::domain::cytograph::{GraphEdge, GraphModel, GraphNode};
use crate::domain::identity::CytoId;

/// Cytoscape elements document: `{"nodes": [...], "edges": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CytoJson {
    pub nodes: Vec<CytoNode>,
    pub edges: Vec<CytoEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: CytoId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<CytoId>,
    /// `#rrggbb`
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CytoNode {
    pub data: NodeData,
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub id: CytoId,
    pub source: CytoId,
    pub target: CytoId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CytoEdge {
    pub data: EdgeData,
    pub classes: Vec<String>,
}

impl From<&GraphNode> for CytoNode {
    fn from(n: &GraphNode) -> Self {
        CytoNode {
            data: NodeData {
                id: n.id.clone(),
                label: n.label.clone(),
                description: n.description.clone(),
                parent: n.parent.clone(),
                color: n.color.to_hex(),
            },
            classes: n.classes.clone(),
        }
    }
}

impl From<&GraphEdge> for CytoEdge {
    fn from(e: &GraphEdge) -> Self {
        CytoEdge {
            data: EdgeData {
                id: e.id.clone(),
                source: e.source.clone(),
                target: e.target.clone(),
            },
            classes: e.classes.clone(),
        }
    }
}

impl From<&GraphModel> for CytoJson {
    fn from(model: &GraphModel) -> Self {
        CytoJson {
            nodes: model.nodes().iter().map(CytoNode::from).collect(),
            edges: model.edges().iter().map(CytoEdge::from).collect(),
        }
    }
}

/// Structural mapping of the model onto the wire format.
pub fn render(model: &GraphModel) -> CytoJson {
    CytoJson::from(model)
}

/// Serialize the model followed by a newline.
pub fn write_json<W: Write>(
    model: &GraphModel,
    mut writer: W,
    pretty: bool,
) -> std::io::Result<()> {
    let doc = render(model);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &doc)?;
    } else {
        serde_json::to_writer(&mut writer, &doc)?;
    }
    writer.write_all(b"\n")
}

/// Serialize the model into an in-memory string.
pub fn to_json_string(model: &GraphModel, pretty: bool) -> serde_json::Result<String> {
    let doc = render(model);
    let mut out = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    out.push('\n');
    Ok(out)
}
