//! Report types produced by the aggregator.
//!
//! Plain data. Package and file order inside a [`Coverage`] is unspecified;
//! use [`Coverage::sorted`] when a stable order matters.

use serde::{Deserialize, Serialize};

/// Coverage statistics for a whole profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    /// Percent of all statements covered, weighted by statement count.
    pub percent: f64,
    /// Statement total the percentage was computed from.
    #[serde(default)]
    pub stmts: u64,
    #[serde(default)]
    pub covered_stmts: u64,
    pub packages: Vec<PackageCoverage>,
}

impl Coverage {
    pub fn package(&self, name: &str) -> Option<&PackageCoverage> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Copy with packages sorted by name and each package sorted as in
    /// [`PackageCoverage::sorted`].
    pub fn sorted(&self) -> Coverage {
        let mut packages: Vec<PackageCoverage> =
            self.packages.iter().map(PackageCoverage::sorted).collect();
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Coverage {
            percent: self.percent,
            stmts: self.stmts,
            covered_stmts: self.covered_stmts,
            packages,
        }
    }
}

/// Coverage of a single package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageCoverage {
    pub name: String,
    pub files: Vec<FileCoverage>,
}

impl PackageCoverage {
    /// All functions of the package, file by file.
    pub fn functions(&self) -> Vec<FunctionCoverage> {
        self.files
            .iter()
            .flat_map(|f| f.functions.iter().cloned())
            .collect()
    }

    pub fn file(&self, name: &str) -> Option<&FileCoverage> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Copy with files sorted by path and functions by line, then name.
    pub fn sorted(&self) -> PackageCoverage {
        let mut files = self.files.clone();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        for file in &mut files {
            file.functions
                .sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.name.cmp(&b.name)));
        }
        PackageCoverage {
            name: self.name.clone(),
            files,
        }
    }
}

/// Coverage of a single file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    /// File path as reported by the statement profile.
    pub name: String,
    pub percent: f64,
    pub stmts: u64,
    pub covered_stmts: u64,
    /// Empty unless the function summary had rows for this file.
    pub functions: Vec<FunctionCoverage>,
}

/// Coverage of a single function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCoverage {
    pub name: String,
    pub percent: f64,
    pub file: String,
    pub line: u32,
    /// True for unexported functions (name starts with `a`-`z`).
    pub internal: bool,
}
