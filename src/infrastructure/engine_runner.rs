/// Analysis Engine Runner.
///
/// Runs the external call graph engine for the selected analysis mode and
/// reads the call graph document it prints on stdout.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::config::EngineConfig;
use crate::domain::analysis_mode::AnalysisMode;
use crate::domain::callgraph::{CallGraph, CallGraphDocument};
use crate::ports::CallGraphSource;

/// What to analyse and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineRequest {
    /// Package patterns, e.g. `./...`.
    pub patterns: Vec<String>,
    pub mode: AnalysisMode,
    /// Treat test files as entry points.
    pub tests: bool,
    pub build_flags: Vec<String>,
    /// Directory to query packages from. Current directory if `None`.
    pub query_dir: Option<PathBuf>,
}

/// Split a space separated build flag string, as given on the command line.
pub fn parse_build_flags(flags: &str) -> Vec<String> {
    flags.split_whitespace().map(str::to_string).collect()
}

/// The command that would be run for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

/// Build the command specification for a request (testable function).
pub fn build_command_spec(config: &EngineConfig, request: &EngineRequest) -> EngineCommandSpec {
    let mut args = config.extra_args.clone();
    args.push(format!("-algo={}", request.mode.name()));
    if request.tests {
        args.push("-tests".to_string());
    }
    if !request.build_flags.is_empty() {
        args.push(format!("-build={}", request.build_flags.join(" ")));
    }
    args.push("-format=json".to_string());
    args.extend(request.patterns.iter().cloned());

    EngineCommandSpec {
        program: config.command.clone(),
        args,
        current_dir: request.query_dir.clone(),
    }
}

/// Modes that start from `main` packages produce an empty graph without them.
pub fn lacks_main_packages(mode: AnalysisMode, doc: &CallGraphDocument) -> bool {
    mode.strategy().needs_mains && doc.packages.is_empty()
}

pub struct EngineCallGraphSource {
    pub config: EngineConfig,
    pub request: EngineRequest,
}

impl EngineCallGraphSource {
    pub fn new(config: EngineConfig, request: EngineRequest) -> Self {
        Self { config, request }
    }
}

impl CallGraphSource for EngineCallGraphSource {
    fn load(&self) -> Result<CallGraph> {
        let spec = build_command_spec(&self.config, &self.request);
        let strategy = self.request.mode.strategy();
        tracing::info!(
            program = %spec.program,
            args = ?spec.args,
            mode = strategy.name,
            "running {}",
            strategy.description
        );

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).stdout(Stdio::piped()).stderr(Stdio::inherit());
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().with_context(|| {
            format!("Failed to execute analysis engine '{}'. Is it installed?", spec.program)
        })?;
        if !output.status.success() {
            bail!(
                "analysis engine '{}' failed with exit code: {:?}",
                spec.program,
                output.status.code()
            );
        }

        let doc = CallGraphDocument::from_reader(output.stdout.as_slice())
            .context("could not parse analysis engine output")?;
        if lacks_main_packages(self.request.mode, &doc) {
            tracing::warn!(
                mode = strategy.name,
                "engine reported no main packages; the graph may be empty"
            );
        }
        tracing::debug!(
            functions = doc.functions.len(),
            calls = doc.calls.len(),
            "engine output parsed"
        );

        Ok(CallGraph::from_document(doc)?)
    }

    fn describe(&self) -> String {
        format!("{} ({} analysis)", self.config.command, self.request.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EngineRequest {
        EngineRequest {
            patterns: vec!["./cmd/...".to_string()],
            mode: AnalysisMode::RapidType,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_command_spec_minimal() {
        let spec = build_command_spec(&EngineConfig::default(), &request());
        assert_eq!(spec.program, "go-callgraph");
        assert_eq!(spec.args, vec!["-algo=rta", "-format=json", "./cmd/..."]);
        assert_eq!(spec.current_dir, None);
    }

    #[test]
    fn test_build_command_spec_full() {
        let config = EngineConfig {
            command: "cg".to_string(),
            extra_args: vec!["-v".to_string()],
        };
        let req = EngineRequest {
            tests: true,
            build_flags: parse_build_flags("-tags  integration -race"),
            query_dir: Some(PathBuf::from("/src/app")),
            ..request()
        };
        let spec = build_command_spec(&config, &req);
        assert_eq!(spec.program, "cg");
        assert_eq!(
            spec.args,
            vec![
                "-v",
                "-algo=rta",
                "-tests",
                "-build=-tags integration -race",
                "-format=json",
                "./cmd/...",
            ]
        );
        assert_eq!(spec.current_dir, Some(PathBuf::from("/src/app")));
    }

    #[test]
    fn test_missing_engine_is_an_error() {
        let config = EngineConfig {
            command: "cytocall-engine-that-does-not-exist".to_string(),
            extra_args: vec![],
        };
        let source = EngineCallGraphSource::new(config, request());
        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("Failed to execute analysis engine"));
    }

    const DOC: &str = r#"{
        "functions": [{"id": 1, "name": "app.main", "package": {"path": "app", "name": "main"}}],
        "calls": [{"caller": 1, "callee": 1, "position": "main.go:3:2", "description": "static call"}]
    }"#;

    #[cfg(unix)]
    fn shell_engine(script: &str) -> EngineConfig {
        // The request arguments become positional parameters of the script.
        EngineConfig {
            command: "sh".to_string(),
            extra_args: vec!["-c".to_string(), script.to_string(), "engine".to_string()],
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_engine_is_an_error() {
        let config = EngineConfig {
            command: "false".to_string(),
            extra_args: vec![],
        };
        let err = EngineCallGraphSource::new(config, request()).load().unwrap_err();
        assert!(err.to_string().contains("analysis engine 'false' failed with exit code: Some(1)"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_json_output_is_an_error() {
        let config = EngineConfig {
            command: "echo".to_string(),
            extra_args: vec!["not a call graph".to_string()],
        };
        let err = EngineCallGraphSource::new(config, request()).load().unwrap_err();
        assert!(format!("{:#}", err).contains("could not parse analysis engine output"));
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_document_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("callgraph.json");
        std::fs::write(&path, DOC).unwrap();

        let config = shell_engine(&format!("cat '{}'", path.display()));
        let graph = EngineCallGraphSource::new(config, request()).load().unwrap();
        assert_eq!(graph.call_count(), 1);
        assert_eq!(graph.function(1).map(|f| f.short_name()), Some("main"));
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_runs_in_query_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("callgraph.json"), DOC).unwrap();

        let req = EngineRequest {
            query_dir: Some(dir.path().to_path_buf()),
            ..request()
        };
        let source = EngineCallGraphSource::new(shell_engine("cat callgraph.json"), req);
        let graph = source.load().unwrap();
        assert_eq!(graph.functions().len(), 1);
    }

    #[test]
    fn test_missing_main_packages_only_matter_for_whole_program_modes() {
        let empty = CallGraphDocument::from_json_str(DOC).unwrap();
        let with_mains = CallGraphDocument {
            packages: vec!["app".to_string()],
            ..empty.clone()
        };
        assert!(lacks_main_packages(AnalysisMode::Pointer, &empty));
        assert!(lacks_main_packages(AnalysisMode::RapidType, &empty));
        assert!(!lacks_main_packages(AnalysisMode::Static, &empty));
        assert!(!lacks_main_packages(AnalysisMode::ClassHierarchy, &empty));
        assert!(!lacks_main_packages(AnalysisMode::Pointer, &with_mains));
    }
}
