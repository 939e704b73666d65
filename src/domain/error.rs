/// Error types for call graph loading and rendering.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("call graph contains no calls")]
    EmptyCallGraph,
    #[error("function id {0} is declared more than once")]
    DuplicateFunction(u64),
    #[error("call {index} references unknown function id {id}")]
    UnknownFunction { index: usize, id: u64 },
    #[error("malformed call graph document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
