/// Analysis Mode Domain Module
///
/// Call graph construction algorithms offered by the external analysis engine.
/// cytocall never computes call graphs itself; each mode only selects the
/// engine strategy.

use std::fmt;
use std::str::FromStr;

/// Supported call graph algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnalysisMode {
    /// Inclusion-based pointer analysis over the main packages.
    #[default]
    Pointer,
    /// Static calls only.
    Static,
    /// Class hierarchy analysis.
    ClassHierarchy,
    /// Rapid type analysis rooted at `init` and `main`.
    RapidType,
}

/// Row of the strategy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub mode: AnalysisMode,
    /// CLI name, also passed to the engine as the algorithm.
    pub name: &'static str,
    pub description: &'static str,
    /// Needs `main` packages among the analysed patterns.
    pub needs_mains: bool,
}

const STRATEGIES: [Strategy; 4] = [
    Strategy {
        mode: AnalysisMode::Pointer,
        name: "pointer",
        description: "pointer analysis, precise dynamic calls",
        needs_mains: true,
    },
    Strategy {
        mode: AnalysisMode::Static,
        name: "static",
        description: "static calls only",
        needs_mains: false,
    },
    Strategy {
        mode: AnalysisMode::ClassHierarchy,
        name: "cha",
        description: "class hierarchy analysis, every implementation of a called interface",
        needs_mains: false,
    },
    Strategy {
        mode: AnalysisMode::RapidType,
        name: "rta",
        description: "rapid type analysis from init and main",
        needs_mains: true,
    },
];

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 4] = [
        AnalysisMode::Pointer,
        AnalysisMode::Static,
        AnalysisMode::ClassHierarchy,
        AnalysisMode::RapidType,
    ];

    pub fn strategy(&self) -> &'static Strategy {
        match self {
            AnalysisMode::Pointer => &STRATEGIES[0],
            AnalysisMode::Static => &STRATEGIES[1],
            AnalysisMode::ClassHierarchy => &STRATEGIES[2],
            AnalysisMode::RapidType => &STRATEGIES[3],
        }
    }

    pub fn name(&self) -> &'static str {
        self.strategy().name
    }

    /// Parse mode from string (CLI input).
    pub fn parse(s: &str) -> Option<AnalysisMode> {
        let lower = s.to_lowercase();
        STRATEGIES.iter().find(|st| st.name == lower).map(|st| st.mode)
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            let names: Vec<&str> = STRATEGIES.iter().map(|st| st.name).collect();
            format!("analysis mode not recognized: {} (expected one of: {})", s, names.join(", "))
        })
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
