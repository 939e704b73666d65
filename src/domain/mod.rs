// Domain model and algorithms for cytocall.

pub mod analysis_mode;
pub mod assembler;
pub mod callgraph;
pub mod classifier;
pub mod color;
pub mod cytograph;
pub mod error;
pub mod hierarchy;
pub mod identity;
pub mod root_library;
