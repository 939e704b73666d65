/// End-to-end rendering of the sample call graph fixture:
/// file source -> assembler -> exporter -> output target.

use std::path::PathBuf;

use cytocall::api::dto::CytoJson;
use cytocall::application::AnalyzeUsecase;
use cytocall::config::{Config, RenderOptions};
use cytocall::domain::root_library::RootLibrary;
use cytocall::infrastructure::{FileCallGraphSource, OutputTarget};
use cytocall::ports::cyto_exporter::{HtmlExporter, JsonExporter};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_callgraph.json")
}

fn render_json(options: RenderOptions) -> String {
    let source = FileCallGraphSource::new(fixture());
    let lookup = RootLibrary::default();
    let usecase = AnalyzeUsecase {
        source: &source,
        exporter: &JsonExporter::default(),
        options,
        root_library: &lookup,
        fallback_packages: &[],
    };
    let (bytes, _) = usecase.render().unwrap();
    String::from_utf8(bytes).unwrap()
}

fn label_of(doc: &CytoJson, id: &str) -> String {
    doc.nodes
        .iter()
        .find(|n| n.data.id.as_str() == id)
        .map(|n| n.data.label.clone())
        .unwrap_or_default()
}

#[test]
fn test_default_render_of_fixture() {
    let doc: CytoJson = serde_json::from_str(&render_json(RenderOptions::default())).unwrap();

    let labels: Vec<&str> = doc.nodes.iter().map(|n| n.data.label.as_str()).collect();
    assert_eq!(labels, vec!["main", "main", "store", "Open", "DB", "Get", "main$1"]);

    let ids: Vec<&str> = doc.nodes.iter().map(|n| n.data.id.as_str()).collect();
    assert_eq!(ids, vec!["n2", "n1", "n4", "n3", "n6", "n5", "n7"]);

    let calls: Vec<(String, String)> = doc
        .edges
        .iter()
        .map(|e| (label_of(&doc, e.data.source.as_str()), label_of(&doc, e.data.target.as_str())))
        .collect();
    let pair = |a: &str, b: &str| (a.to_string(), b.to_string());
    assert_eq!(
        calls,
        vec![
            pair("main", "Open"),
            pair("main", "Get"),
            pair("main", "Get"),
            pair("main", "main$1"),
            pair("main$1", "Get"),
        ]
    );

    // The bypass edge keeps the call site that led into the wrapper.
    assert_eq!(doc.edges[4].classes, vec!["dynamic", "function", "call"]);
    assert_eq!(doc.edges[3].classes, vec!["concurrent", "static", "function", "call"]);
}

#[test]
fn test_fixture_node_classes() {
    let doc: CytoJson = serde_json::from_str(&render_json(RenderOptions::default())).unwrap();
    let classes = |label: &str| -> Vec<String> {
        doc.nodes
            .iter()
            .filter(|n| n.data.label == label)
            .last()
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    };

    assert_eq!(classes("main"), vec!["global", "unexported"]);
    assert_eq!(classes("Open"), vec!["global"]);
    assert_eq!(classes("DB"), vec!["type"]);
    assert_eq!(classes("store"), vec!["package"]);
    assert!(classes("main$1").is_empty());
}

#[test]
fn test_toggles_admit_more_edges() {
    let narrow: CytoJson = serde_json::from_str(&render_json(RenderOptions::default())).unwrap();
    let wide: CytoJson = serde_json::from_str(&render_json(RenderOptions {
        include_root_library: true,
        include_unexported: true,
    }))
    .unwrap();

    assert_eq!(narrow.edges.len(), 5);
    assert_eq!(wide.edges.len(), 7);
    assert_eq!(wide.nodes.len(), 10);
    assert!(wide.nodes.iter().any(|n| n.data.label == "lookup"));
    assert!(wide.nodes.iter().any(|n| n.data.label == "Println"
        && n.classes.contains(&"root-library".to_string())));
}

#[test]
fn test_render_is_byte_identical_across_runs() {
    let first = render_json(RenderOptions::default());
    let second = render_json(RenderOptions::default());
    assert_eq!(first, second);
    assert!(first.ends_with('\n'));
}

#[test]
fn test_every_function_sits_under_its_package() {
    let doc: CytoJson = serde_json::from_str(&render_json(RenderOptions {
        include_root_library: true,
        include_unexported: true,
    }))
    .unwrap();
    let by_id = |id: &str| doc.nodes.iter().find(|n| n.data.id.as_str() == id);

    for node in &doc.nodes {
        let mut current = node;
        let mut depth = 0;
        while let Some(parent) = current.data.parent.as_ref() {
            current = by_id(parent.as_str()).expect("parent node is rendered");
            depth += 1;
        }
        assert!(
            current.classes.contains(&"package".to_string()),
            "{} has no package root",
            node.data.label
        );
        assert!(depth <= 2);
    }
}

#[test]
fn test_html_page_written_to_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("index.html");
    let source = FileCallGraphSource::new(fixture());
    let lookup = RootLibrary::default();
    let usecase = AnalyzeUsecase {
        source: &source,
        exporter: &HtmlExporter,
        options: RenderOptions::default(),
        root_library: &lookup,
        fallback_packages: &[],
    };
    let stats = usecase.run(&OutputTarget::File(out.clone())).unwrap();
    assert_eq!(stats.admitted, 5);
    assert_eq!(stats.rejected_total(), 4);

    let page = std::fs::read_to_string(&out).unwrap();
    assert!(page.contains("example.com/shop/cmd/shop\n"));
    assert!(page.contains("\"label\":\"Open\""));
}

#[test]
fn test_config_prefixes_extend_root_library() {
    let config = Config::from_toml_str(
        r#"
[render]
include_unexported = true

[root_library]
extra_prefixes = ["example.com/shop/store"]
"#,
    )
    .unwrap();
    let source = FileCallGraphSource::new(fixture());
    let lookup = config.root_library();
    let usecase = AnalyzeUsecase {
        source: &source,
        exporter: &JsonExporter::default(),
        options: config.render,
        root_library: &lookup,
        fallback_packages: &[],
    };
    let (bytes, stats) = usecase.render().unwrap();
    let doc: CytoJson = serde_json::from_slice(&bytes).unwrap();
    assert!(doc.nodes.iter().all(|n| n.data.label != "store"));
    assert_eq!(stats.rejected.get("root-library callee"), Some(&6));
}

#[test]
fn test_missing_input_file_is_an_error() {
    let source = FileCallGraphSource::new("/nonexistent/callgraph.json");
    let lookup = RootLibrary::default();
    let usecase = AnalyzeUsecase {
        source: &source,
        exporter: &JsonExporter::default(),
        options: RenderOptions::default(),
        root_library: &lookup,
        fallback_packages: &[],
    };
    let err = usecase.render().unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to open call graph"));
}
