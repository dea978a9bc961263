//! Entry points tying readers, the Go tool and the aggregator together.
//!
//! # Example
//!
//! ```no_run
//! use covstat::CoverageParser;
//!
//! let parser = CoverageParser::new().with_root_module("github.com/acme/project");
//! let coverage = parser.cover("cover.out")?;
//! println!("{:.1}%", coverage.percent);
//! # Ok::<(), covstat::errors::Error>(())
//! ```

use crate::coverage::{Coverage, CoverageAggregator};
use crate::errors::{Error, Result};
use crate::gotool::run_func_cover;
use crate::profile::{
    by_package, FunctionProfile, FunctionReader, GoCoverProfileReader, GoFuncReader,
    PackageStatements, RootTrim, StatementReader,
};
use crate::testrun::{read_json, TestRun};
use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Parses statement profiles and function summaries into a [`Coverage`].
///
/// Configuration is fixed once built; every method takes `&self`.
#[derive(Default)]
pub struct CoverageParser {
    trim: RootTrim,
    statement_reader: Option<Box<dyn StatementReader>>,
    function_reader: Option<Box<dyn FunctionReader>>,
    aggregator: CoverageAggregator,
}

impl fmt::Debug for CoverageParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverageParser")
            .field("trim", &self.trim)
            .field("custom_statement_reader", &self.statement_reader.is_some())
            .field("custom_function_reader", &self.function_reader.is_some())
            .finish()
    }
}

impl CoverageParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim `module` from file names on both sides of the merge.
    pub fn with_root_module(mut self, module: &str) -> Self {
        self.trim = RootTrim::new(module);
        self
    }

    /// Replace the default statement reader. The root trim is not applied to
    /// custom readers.
    pub fn with_statement_reader(mut self, reader: impl StatementReader + 'static) -> Self {
        self.statement_reader = Some(Box::new(reader));
        self
    }

    /// Replace the default function reader. The root trim is not applied to
    /// custom readers.
    pub fn with_function_reader(mut self, reader: impl FunctionReader + 'static) -> Self {
        self.function_reader = Some(Box::new(reader));
        self
    }

    /// Read both inputs and aggregate them.
    pub fn stats(&self, cover_profile: impl Read, func_profile: impl Read) -> Result<Coverage> {
        let statements = self
            .read_statements(&mut BufReader::new(cover_profile))
            .map_err(|e| Error::CoverProfile(Box::new(e)))?;
        let functions = self
            .read_functions(&mut BufReader::new(func_profile))
            .map_err(|e| Error::FuncProfile(Box::new(e)))?;

        Ok(self.aggregator.aggregate(&statements, &by_package(&functions)))
    }

    /// Parse the profile at `cover_profile`, generating the function summary
    /// with `go tool cover`.
    pub fn cover(&self, cover_profile: impl AsRef<Path>) -> Result<Coverage> {
        let path = cover_profile.as_ref();
        let cover = read_file(path, "error reading coverage profile")?;
        let func = run_func_cover(path)?;
        self.stats(cover.as_slice(), func.as_slice())
    }

    /// Parse an existing profile and function summary from disk.
    pub fn cover_with_func(
        &self,
        cover_profile: impl AsRef<Path>,
        func_profile: impl AsRef<Path>,
    ) -> Result<Coverage> {
        let cover = read_file(cover_profile.as_ref(), "error reading coverage profile")?;
        let func = read_file(func_profile.as_ref(), "error reading function profile")?;
        self.stats(cover.as_slice(), func.as_slice())
    }

    fn read_statements(&self, input: &mut dyn BufRead) -> Result<Vec<PackageStatements>> {
        match &self.statement_reader {
            Some(reader) => reader.read(input),
            None => GoCoverProfileReader::new(self.trim.clone()).read(input),
        }
    }

    fn read_functions(&self, input: &mut dyn BufRead) -> Result<FunctionProfile> {
        match &self.function_reader {
            Some(reader) => reader.read(input),
            None => GoFuncReader::new(self.trim.clone()).read(input),
        }
    }
}

/// Parse a profile file with default options, running `go tool cover` for
/// the function summary.
pub fn cover(cover_profile: impl AsRef<Path>) -> Result<Coverage> {
    CoverageParser::new().cover(cover_profile)
}

/// Parse a profile and its function summary from readers with default
/// options.
pub fn cover_from_readers(cover_profile: impl Read, func_profile: impl Read) -> Result<Coverage> {
    CoverageParser::new().stats(cover_profile, func_profile)
}

/// Parses `go test -json` output into a [`TestRun`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TestParser;

impl TestParser {
    pub fn new() -> Self {
        Self
    }

    pub fn stats(&self, out_json: impl Read) -> Result<TestRun> {
        let events = read_json(&mut BufReader::new(out_json))?;
        Ok(TestRun::from_events(&events))
    }
}

/// Parse test output JSON from a file.
pub fn tests(out_file: impl AsRef<Path>) -> Result<TestRun> {
    let bytes = read_file(out_file.as_ref(), "couldn't read file")?;
    TestParser::new().stats(bytes.as_slice())
}

pub fn tests_from_reader(out_json: impl Read) -> Result<TestRun> {
    TestParser::new().stats(out_json)
}

fn read_file(path: &Path, message: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::file_system(message, path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::FileStatements;
    use indoc::indoc;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PROFILE: &str = indoc! {"
        mode: count
        github.com/acme/proj/a.go:1.1,3.2 3 2
        github.com/acme/proj/a.go:3.2,5.2 1 0
    "};

    const SUMMARY: &str = indoc! {"
        github.com/acme/proj/a.go:1:\trun\t75.0%
        total:\t(statements)\t75.0%
    "};

    struct FixedStatements;

    impl StatementReader for FixedStatements {
        fn read(&self, _input: &mut dyn BufRead) -> Result<Vec<PackageStatements>> {
            let mut files = HashMap::new();
            files.insert("fixed.go".to_string(), FileStatements::new(10, 10));
            Ok(vec![PackageStatements::from_files("fixed", files)])
        }
    }

    #[test]
    fn test_stats_from_readers() {
        let coverage = cover_from_readers(PROFILE.as_bytes(), SUMMARY.as_bytes()).unwrap();

        assert_eq!(coverage.percent, 75.0);
        let pkg = coverage.package("github.com/acme/proj").unwrap();
        let file = pkg.file("github.com/acme/proj/a.go").unwrap();
        assert_eq!(file.functions.len(), 1);
        assert!(file.functions[0].internal);
    }

    #[test]
    fn test_root_module_applies_to_both_readers() {
        let parser = CoverageParser::new().with_root_module("github.com/acme/proj/");
        let coverage = parser.stats(PROFILE.as_bytes(), SUMMARY.as_bytes()).unwrap();

        let file = coverage.package("github.com/acme/proj").unwrap().file("a.go").unwrap();
        assert_eq!(file.functions[0].file, "a.go");
    }

    #[test]
    fn test_errors_name_the_failing_profile() {
        let err = cover_from_readers("garbage".as_bytes(), SUMMARY.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::CoverProfile(_)));

        let err = cover_from_readers(PROFILE.as_bytes(), "a.go 1".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::FuncProfile(_)));
    }

    #[test]
    fn test_custom_statement_reader() {
        let parser = CoverageParser::new().with_statement_reader(FixedStatements);
        let coverage = parser.stats("".as_bytes(), "".as_bytes()).unwrap();

        assert_eq!(coverage.percent, 100.0);
        assert!(coverage.package("fixed").is_some());
    }

    #[test]
    fn test_cover_with_func_reads_files() {
        let mut profile = NamedTempFile::new().unwrap();
        profile.write_all(PROFILE.as_bytes()).unwrap();
        let mut summary = NamedTempFile::new().unwrap();
        summary.write_all(SUMMARY.as_bytes()).unwrap();

        let coverage = CoverageParser::new()
            .cover_with_func(profile.path(), summary.path())
            .unwrap();
        assert_eq!(coverage.percent, 75.0);
    }

    #[test]
    fn test_missing_file_is_file_system_error() {
        let err = CoverageParser::new()
            .cover_with_func("/nonexistent/cover.out", "/nonexistent/func.out")
            .unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }

    #[test]
    fn test_tests_from_reader() {
        let stream = indoc! {r#"
            {"Action":"run","Package":"p","Test":"TestA"}
            {"Action":"pass","Package":"p","Test":"TestA","Elapsed":0.1}
            {"Action":"pass","Package":"p","Elapsed":0.2}
        "#};

        let run = tests_from_reader(stream.as_bytes()).unwrap();
        assert!(run.passed());
        assert_eq!(run.count().passed, 1);
    }
}
