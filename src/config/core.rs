use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};

/// Root configuration structure, read from `.covstat.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CovstatConfig {
    /// Module path trimmed from every file name in the report
    #[serde(default)]
    pub root_module: Option<String>,

    /// Default output format
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Sort packages, files and functions in the output
    #[serde(default)]
    pub sort: Option<bool>,
}

impl CovstatConfig {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: CovstatConfig) -> CovstatConfig {
        CovstatConfig {
            root_module: other.root_module.or(self.root_module),
            format: other.format.or(self.format),
            sort: other.sort.or(self.sort),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    pub fn sort(&self) -> bool {
        self.sort.unwrap_or(false)
    }
}
