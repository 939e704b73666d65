//! Configuration for cytocall.
//!
//! Options come from an optional TOML file; CLI flags are applied on top.
//!
//! ```toml
//! [render]
//! include_root_library = false
//! include_unexported = true
//!
//! [engine]
//! command = "go-callgraph"
//! extra_args = ["-v"]
//!
//! [root_library]
//! extra_prefixes = ["golang.org/x"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::root_library::RootLibrary;

/// Which edges make it into the rendered graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Admit calls into root/standard-library code.
    pub include_root_library: bool,
    /// Admit calls into unexported functions.
    pub include_unexported: bool,
}

/// External analysis engine invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub command: String,
    pub extra_args: Vec<String>,
}

impl EngineConfig {
    pub const DEFAULT_COMMAND: &'static str = "go-callgraph";
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: Self::DEFAULT_COMMAND.to_string(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootLibraryConfig {
    /// Package path prefixes treated as part of the root library.
    pub extra_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderOptions,
    pub engine: EngineConfig,
    pub root_library: RootLibraryConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn root_library(&self) -> RootLibrary {
        RootLibrary::new(self.root_library.extra_prefixes.clone())
    }
}
