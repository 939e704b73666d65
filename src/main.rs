// Command-line entry point for cytocall.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cytocall::application::AnalyzeUsecase;
use cytocall::config::Config;
use cytocall::domain::analysis_mode::AnalysisMode;
use cytocall::infrastructure::engine_runner::parse_build_flags;
use cytocall::infrastructure::{
    EngineCallGraphSource, EngineRequest, FileCallGraphSource, OutputTarget,
};
use cytocall::ports::cyto_exporter::{HtmlExporter, JsonExporter};
use cytocall::ports::{CallGraphSource, OutputExporter};

/// Render a call graph as a nested Cytoscape graph.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Package patterns handed to the analysis engine
    #[arg(required_unless_present = "input")]
    patterns: Vec<String>,

    /// Write a standalone index.html instead of raw JSON
    #[arg(long)]
    web: bool,

    /// Include test code as entry points
    #[arg(long)]
    tests: bool,

    /// Keep calls into the root/standard library
    #[arg(long, visible_alias = "go-root")]
    root_library: bool,

    /// Keep calls into unexported functions
    #[arg(long)]
    unexported: bool,

    /// Directory to query packages from
    #[arg(long)]
    query_dir: Option<PathBuf>,

    /// Call graph construction algorithm (pointer, static, cha, rta)
    #[arg(long, default_value = "pointer")]
    mode: AnalysisMode,

    /// Build flags passed to the engine, space separated
    #[arg(long, default_value = "")]
    build: String,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Read a call graph document instead of running the engine ("-" for stdin)
    #[arg(long)]
    input: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("cytocall={}", level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    // Flags only switch options on; the config file may already have.
    config.render.include_root_library |= cli.root_library;
    config.render.include_unexported |= cli.unexported;

    let root_library = config.root_library();

    let source: Box<dyn CallGraphSource> = match &cli.input {
        Some(path) => Box::new(FileCallGraphSource::new(path.clone())),
        None => Box::new(EngineCallGraphSource::new(
            config.engine.clone(),
            EngineRequest {
                patterns: cli.patterns.clone(),
                mode: cli.mode,
                tests: cli.tests,
                build_flags: parse_build_flags(&cli.build),
                query_dir: cli.query_dir.clone(),
            },
        )),
    };

    let exporter: Box<dyn OutputExporter> = if cli.web {
        Box::new(HtmlExporter)
    } else {
        Box::new(JsonExporter { pretty: cli.pretty })
    };

    let usecase = AnalyzeUsecase {
        source: source.as_ref(),
        exporter: exporter.as_ref(),
        options: config.render,
        root_library: &root_library,
        fallback_packages: &cli.patterns,
    };

    let target = OutputTarget::from_option(cli.out.clone());
    let stats = usecase.run(&target)?;
    if stats.rejected_total() > 0 {
        tracing::debug!(rejected = ?stats.rejected, "edges left out");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
