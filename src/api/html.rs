//! Self-contained HTML page with the graph JSON embedded.

const TEMPLATE: &str = include_str!("../../assets/index.html");

const PACKAGES_SLOT: &str = "{{PACKAGES}}";
const GRAPH_SLOT: &str = "{{GRAPH_JSON}}";

/// Fill the bundled template with the analysed package list and the graph.
pub fn render_page(graph_json: &str, packages: &[String]) -> String {
    let package_list: String = packages
        .iter()
        .map(|p| format!("{}\n", escape_html(p)))
        .collect();

    // The package slot precedes the graph slot, so graph text cannot shadow it.
    TEMPLATE
        .replacen(GRAPH_SLOT, &escape_script(graph_json.trim_end()), 1)
        .replacen(PACKAGES_SLOT, &package_list, 1)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// JSON is valid JavaScript, but `</script>` inside a string literal would
/// still close the element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_embeds_graph_and_packages() {
        let packages = ["github.com/acme/app".to_string()];
        let page = render_page("{\"nodes\":[],\"edges\":[]}\n", &packages);
        assert!(page.contains("const graph = {\"nodes\":[],\"edges\":[]};"));
        assert!(page.contains("github.com/acme/app\n</pre>"));
        assert!(!page.contains(GRAPH_SLOT));
        assert!(!page.contains(PACKAGES_SLOT));
    }

    #[test]
    fn test_script_terminator_is_escaped() {
        let page = render_page("{\"label\":\"</script><b>\"}", &[]);
        assert!(page.contains("<\\/script><b>"));
        assert_eq!(page.matches("</script>").count(), TEMPLATE.matches("</script>").count());
    }

    #[test]
    fn test_package_names_are_escaped() {
        let page = render_page("{}", &["a<b>&c".to_string()]);
        assert!(page.contains("a&lt;b&gt;&amp;c"));
    }
}
