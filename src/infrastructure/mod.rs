// Infrastructure implementations for cytocall.

pub mod engine_runner;
pub mod file_source;
pub mod output;

pub use engine_runner::{EngineCallGraphSource, EngineRequest};
pub use file_source::FileCallGraphSource;
pub use output::OutputTarget;
