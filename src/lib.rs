//! Coverage and test-run statistics for Go projects.
//!
//! [`CoverageParser`] merges a `go test -coverprofile` statement profile
//! with `go tool cover -func` output into a [`Coverage`] tree of packages,
//! files and functions. [`TestParser`] turns a `go test -json` event stream
//! into a [`TestRun`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod errors;
pub mod formatting;
pub mod gotool;
pub mod output;
pub mod parser;
pub mod profile;
pub mod testrun;

pub use crate::coverage::{
    aggregate, percent, Coverage, CoverageAggregator, FileCoverage, FunctionCoverage,
    PackageCoverage,
};
pub use crate::errors::{Error, Result};
pub use crate::parser::{cover, cover_from_readers, tests, tests_from_reader, CoverageParser, TestParser};
pub use crate::profile::{GoCoverProfileReader, GoFuncReader, RootTrim};
pub use crate::testrun::{Outcome, TestRun};
