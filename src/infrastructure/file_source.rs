use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::callgraph::{CallGraph, CallGraphDocument};
use crate::ports::CallGraphSource;

/// Reads a call graph document exported earlier by the analysis engine.
/// The path `-` means standard input.
pub struct FileCallGraphSource {
    pub path: PathBuf,
}

impl FileCallGraphSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

impl CallGraphSource for FileCallGraphSource {
    fn load(&self) -> Result<CallGraph> {
        let doc = if self.is_stdin() {
            CallGraphDocument::from_reader(io::stdin().lock())
                .context("could not read call graph from stdin")?
        } else {
            let file = File::open(&self.path)
                .with_context(|| format!("Failed to open call graph {}", self.path.display()))?;
            CallGraphDocument::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse call graph {}", self.path.display()))?
        };
        Ok(CallGraph::from_document(doc)?)
    }

    fn describe(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}
