/// Root Library Lookup
///
/// Decides whether a package path belongs to the language's bundled standard
/// library. Engines may tag functions directly; this lookup covers the rest.

use crate::domain::callgraph::FunctionDescriptor;

/// Top-level directories of the Go standard library.
const STD_ROOTS: &[&str] = &[
    "archive", "arena", "bufio", "builtin", "bytes", "cmd", "cmp", "compress", "container",
    "context", "crypto", "database", "debug", "embed", "encoding", "errors", "expvar", "flag",
    "fmt", "go", "hash", "html", "image", "index", "internal", "io", "iter", "log", "maps",
    "math", "mime", "net", "os", "path", "plugin", "reflect", "regexp", "runtime", "slices",
    "sort", "strconv", "strings", "structs", "sync", "syscall", "testing", "text", "time",
    "unicode", "unique", "unsafe", "vendor", "weak",
];

#[derive(Debug, Clone, Default)]
pub struct RootLibrary {
    extra_prefixes: Vec<String>,
}

impl RootLibrary {
    pub fn new(extra_prefixes: Vec<String>) -> Self {
        Self { extra_prefixes }
    }

    pub fn contains(&self, package_path: &str) -> bool {
        let first = package_path.split('/').next().unwrap_or_default();
        if STD_ROOTS.contains(&first) {
            return true;
        }
        self.extra_prefixes.iter().any(|prefix| {
            package_path == prefix
                || package_path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// An explicit engine flag wins over the package lookup.
    pub fn owns(&self, func: &FunctionDescriptor) -> bool {
        match (func.root_library, &func.package) {
            (Some(flag), _) => flag,
            (None, Some(pkg)) => self.contains(&pkg.path),
            (None, None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_packages() {
        let lookup = RootLibrary::default();
        assert!(lookup.contains("fmt"));
        assert!(lookup.contains("net/http"));
        assert!(lookup.contains("internal/poll"));
        assert!(!lookup.contains("github.com/acme/app"));
        assert!(!lookup.contains("formatter"));
    }

    #[test]
    fn test_extra_prefixes_match_whole_segments() {
        let lookup = RootLibrary::new(vec!["golang.org/x".to_string()]);
        assert!(lookup.contains("golang.org/x"));
        assert!(lookup.contains("golang.org/x/tools/go/ssa"));
        assert!(!lookup.contains("golang.org/xerrors"));
    }
}
