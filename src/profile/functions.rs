//! Function summary reader.
//!
//! Parses the table printed by `go tool cover -func=<profile>`:
//!
//! ```text
//! github.com/acme/project/cover.go:17:    newCoverage     100.0%
//! github.com/acme/project/cover.go:42:    percent         66.7%
//! total:                                  (statements)    80.0%
//! ```

use super::paths::{package_of, RootTrim};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;

const TOTAL_LABEL: &str = "total:";

/// One row of the function summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Package the function's file belongs to.
    pub package: String,
    /// File path, already trimmed.
    pub file: String,
    /// Declaration line.
    pub line: u32,
    pub function: String,
    pub percent: f64,
}

/// Parsed function summary, rows in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionProfile {
    pub functions: Vec<FunctionRecord>,
    /// Percentage from the trailing `total:` row, `0.0` when absent.
    pub total_percent: f64,
}

/// Function rows of one package, grouped by file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageFunctions {
    pub package: String,
    pub files: HashMap<String, Vec<FunctionRecord>>,
}

impl PackageFunctions {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            files: HashMap::new(),
        }
    }

    /// Append `record` to the group for its file.
    pub fn push(&mut self, record: FunctionRecord) {
        self.files.entry(record.file.clone()).or_default().push(record);
    }
}

/// Source of function-side coverage data.
pub trait FunctionReader: Send + Sync {
    fn read(&self, input: &mut dyn BufRead) -> Result<FunctionProfile>;
}

/// Reader for `go tool cover -func` output.
#[derive(Debug, Clone, Default)]
pub struct GoFuncReader {
    trim: RootTrim,
}

impl GoFuncReader {
    pub fn new(trim: RootTrim) -> Self {
        Self { trim }
    }

    fn parse_row(&self, fields: &[&str], line_no: usize) -> Result<FunctionRecord> {
        let &[location, function, pct] = fields else {
            return Err(Error::parse(
                line_no,
                format!("expected 3 columns, found {}", fields.len()),
            ));
        };

        let location = location.strip_suffix(':').unwrap_or(location);
        let (file, line) = location
            .rsplit_once(':')
            .ok_or_else(|| Error::parse(line_no, format!("missing line number in {:?}", location)))?;
        let line = line
            .parse::<u32>()
            .map_err(|e| Error::parse(line_no, format!("invalid line number {:?}: {}", line, e)))?;

        Ok(FunctionRecord {
            package: package_of(file).to_string(),
            file: self.trim.trim(file).to_string(),
            line,
            function: function.to_string(),
            percent: parse_percent(pct, line_no)?,
        })
    }
}

impl FunctionReader for GoFuncReader {
    fn read(&self, input: &mut dyn BufRead) -> Result<FunctionProfile> {
        let mut profile = FunctionProfile::default();

        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [] => continue,
                [TOTAL_LABEL, _, pct] => profile.total_percent = parse_percent(pct, line_no)?,
                _ => profile.functions.push(self.parse_row(&fields, line_no)?),
            }
        }

        log::debug!("Read {} function rows", profile.functions.len());
        Ok(profile)
    }
}

fn parse_percent(field: &str, line_no: usize) -> Result<f64> {
    let number = field
        .strip_suffix('%')
        .ok_or_else(|| Error::parse(line_no, format!("expected percentage, found {:?}", field)))?;
    number
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| Error::parse(line_no, format!("invalid percentage {:?}", field)))
}

/// Group rows by package, then by file.
///
/// Packages come back in first-seen order; rows inside each file group keep
/// their input order.
pub fn by_package(profile: &FunctionProfile) -> Vec<PackageFunctions> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut packages: Vec<PackageFunctions> = Vec::new();

    for record in &profile.functions {
        let slot = *index.entry(record.package.as_str()).or_insert_with(|| {
            packages.push(PackageFunctions::new(record.package.clone()));
            packages.len() - 1
        });
        packages[slot].push(record.clone());
    }

    packages
}
