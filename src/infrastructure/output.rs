use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Where rendered output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Standard output when no path is given.
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => OutputTarget::File(p),
            None => OutputTarget::Stdout,
        }
    }

    /// Write the whole rendered document and flush it.
    pub fn write_all(&self, bytes: &[u8]) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes).context("could not write output to std out")?;
                out.flush().context("could not flush std out")?;
            }
            OutputTarget::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("could not create file {}", path.display()))?;
                let mut w = BufWriter::new(file);
                w.write_all(bytes)
                    .with_context(|| format!("could not write output to {}", path.display()))?;
                w.flush()
                    .with_context(|| format!("could not flush output to {}", path.display()))?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputTarget::Stdout => write!(f, "std out"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}
