//! Merge statement totals and function rows into a [`Coverage`] tree.
//!
//! Statement data decides which packages and files exist. Function rows are
//! attached to those files when package and path both match; rows for any
//! package or file the statement side never mentioned are dropped without
//! error, since the two tools legitimately disagree on empty packages.

use super::percent::percent;
use super::types::{Coverage, FileCoverage, FunctionCoverage, PackageCoverage};
use crate::profile::{FunctionRecord, PackageFunctions, PackageStatements};
use std::collections::HashMap;

/// Builds coverage reports from already-parsed reader output.
///
/// Holds no per-call state, so one instance can serve any number of
/// aggregations, including concurrent ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageAggregator;

/// How much function data found a home during a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub merged_files: usize,
    pub dropped_files: usize,
    pub dropped_packages: usize,
}

impl CoverageAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(
        &self,
        statements: &[PackageStatements],
        functions: &[PackageFunctions],
    ) -> Coverage {
        self.aggregate_with_stats(statements, functions).0
    }

    /// Like [`aggregate`](Self::aggregate), also reporting what was dropped.
    pub fn aggregate_with_stats(
        &self,
        statements: &[PackageStatements],
        functions: &[PackageFunctions],
    ) -> (Coverage, MergeStats) {
        let mut packages: HashMap<&str, PackageCoverage> = HashMap::with_capacity(statements.len());
        let (mut covered, mut total) = (0u64, 0u64);

        for pkg in statements {
            packages.insert(pkg.package.as_str(), package_coverage(pkg));
            covered = covered.saturating_add(pkg.covered_stmts);
            total = total.saturating_add(pkg.stmts);
        }

        let mut stats = MergeStats::default();
        for pkg_fns in functions {
            match packages.get_mut(pkg_fns.package.as_str()) {
                Some(pkg) => merge_package(pkg, pkg_fns, &mut stats),
                None => stats.dropped_packages += 1,
            }
        }

        log::debug!(
            "Merged function data into {} files ({} file groups and {} packages had no statement data)",
            stats.merged_files,
            stats.dropped_files,
            stats.dropped_packages
        );

        let coverage = Coverage {
            percent: percent(covered, total),
            stmts: total,
            covered_stmts: covered,
            packages: packages.into_values().collect(),
        };
        (coverage, stats)
    }
}

/// Aggregate with a default [`CoverageAggregator`].
pub fn aggregate(statements: &[PackageStatements], functions: &[PackageFunctions]) -> Coverage {
    CoverageAggregator::new().aggregate(statements, functions)
}

fn package_coverage(stmts: &PackageStatements) -> PackageCoverage {
    let files = stmts
        .files
        .iter()
        .map(|(name, file)| FileCoverage {
            name: name.clone(),
            percent: file.percent,
            stmts: file.stmts,
            covered_stmts: file.covered_stmts,
            functions: Vec::new(),
        })
        .collect();

    PackageCoverage {
        name: stmts.package.clone(),
        files,
    }
}

// A file path listed twice in one package only ever updates the first entry.
fn merge_package(pkg: &mut PackageCoverage, pkg_fns: &PackageFunctions, stats: &mut MergeStats) {
    for (name, records) in &pkg_fns.files {
        match pkg.files.iter_mut().find(|f| &f.name == name) {
            Some(file) => {
                file.functions = to_functions(records);
                stats.merged_files += 1;
            }
            None => stats.dropped_files += 1,
        }
    }
}

fn to_functions(records: &[FunctionRecord]) -> Vec<FunctionCoverage> {
    records
        .iter()
        .map(|r| FunctionCoverage {
            name: r.function.clone(),
            percent: r.percent,
            file: r.file.clone(),
            line: r.line,
            internal: is_internal(&r.function),
        })
        .collect()
}

/// Whether `name` denotes an unexported function.
///
/// Only a leading ASCII lowercase letter counts; an empty name is exported.
pub fn is_internal(name: &str) -> bool {
    name.as_bytes().first().is_some_and(u8::is_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::FileStatements;
    use pretty_assertions::assert_eq;

    fn stmts(package: &str, files: &[(&str, u64, u64)]) -> PackageStatements {
        let files = files
            .iter()
            .map(|(name, total, covered)| (name.to_string(), FileStatements::new(*total, *covered)))
            .collect();
        PackageStatements::from_files(package, files)
    }

    fn record(package: &str, file: &str, function: &str, line: u32) -> FunctionRecord {
        FunctionRecord {
            package: package.into(),
            file: file.into(),
            line,
            function: function.into(),
            percent: 50.0,
        }
    }

    fn funcs(package: &str, records: Vec<FunctionRecord>) -> PackageFunctions {
        let mut pkg = PackageFunctions::new(package);
        for r in records {
            pkg.push(r);
        }
        pkg
    }

    fn function_names(file: &FileCoverage) -> Vec<&str> {
        file.functions.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_overall_percent_is_weighted_by_statements() {
        let statements = vec![
            stmts("a", &[("a/x.go", 10, 8)]),
            stmts("b", &[("b/y.go", 5, 0)]),
        ];

        let coverage = aggregate(&statements, &[]);
        assert_eq!(coverage.percent, 53.3);
        assert_eq!(coverage.packages.len(), 2);
    }

    #[test]
    fn test_report_totals_come_from_package_totals() {
        let mut pkg = stmts("p", &[("p/x.go", 4, 1)]);
        pkg.stmts = 20;
        pkg.covered_stmts = 10;

        let coverage = aggregate(&[pkg], &[]);
        assert_eq!((coverage.covered_stmts, coverage.stmts), (10, 20));
        assert_eq!(coverage.percent, 50.0);
    }

    #[test]
    fn test_package_totals_saturate() {
        let statements = vec![
            stmts("a", &[("a/x.go", u64::MAX, u64::MAX)]),
            stmts("b", &[("b/y.go", 7, 7)]),
        ];

        let coverage = aggregate(&statements, &[]);
        assert_eq!(coverage.stmts, u64::MAX);
        assert!((0.0..=100.0).contains(&coverage.percent));
    }

    #[test]
    fn test_empty_inputs_give_zero_percent() {
        let coverage = aggregate(&[], &[]);
        assert_eq!(coverage, Coverage::default());
    }

    #[test]
    fn test_file_values_copied_from_statement_side() {
        let mut pkg = stmts("p", &[("p/x.go", 3, 1)]);
        // a reader-supplied percentage is kept as-is, never recomputed
        pkg.files.get_mut("p/x.go").unwrap().percent = 12.5;
        let functions = vec![funcs("p", vec![record("p", "p/x.go", "F", 1)])];

        let coverage = aggregate(&[pkg], &functions);
        let file = coverage.package("p").unwrap().file("p/x.go").unwrap();
        assert_eq!((file.percent, file.stmts, file.covered_stmts), (12.5, 3, 1));
    }

    #[test]
    fn test_unmatched_packages_are_dropped() {
        let statements = vec![stmts("A", &[("A/a.go", 1, 1)]), stmts("B", &[("B/b.go", 1, 0)])];
        let functions = vec![
            funcs("B", vec![record("B", "B/b.go", "Run", 3)]),
            funcs("C", vec![record("C", "C/c.go", "Lost", 1)]),
        ];

        let (coverage, stats) = CoverageAggregator::new().aggregate_with_stats(&statements, &functions);

        assert!(coverage.package("A").unwrap().files[0].functions.is_empty());
        assert_eq!(function_names(&coverage.package("B").unwrap().files[0]), vec!["Run"]);
        assert!(coverage.package("C").is_none());
        assert_eq!(
            stats,
            MergeStats {
                merged_files: 1,
                dropped_files: 0,
                dropped_packages: 1,
            }
        );
    }

    #[test]
    fn test_unmatched_files_are_dropped() {
        let statements = vec![stmts("P", &[("x.go", 4, 2)])];
        let functions = vec![funcs(
            "P",
            vec![record("P", "x.go", "X", 1), record("P", "y.go", "Y", 1)],
        )];

        let (coverage, stats) = CoverageAggregator::new().aggregate_with_stats(&statements, &functions);
        let pkg = coverage.package("P").unwrap();

        assert_eq!(pkg.files.len(), 1);
        assert_eq!(function_names(&pkg.files[0]), vec!["X"]);
        assert_eq!(stats.dropped_files, 1);
    }

    #[test]
    fn test_every_matching_file_group_is_merged() {
        let statements = vec![stmts("P", &[("a.go", 1, 1), ("b.go", 1, 1), ("c.go", 1, 1)])];
        let functions = vec![funcs(
            "P",
            vec![
                record("P", "a.go", "A", 1),
                record("P", "b.go", "B", 1),
                record("P", "c.go", "C", 1),
            ],
        )];

        let coverage = aggregate(&statements, &functions);
        let pkg = coverage.package("P").unwrap();
        assert!(pkg.files.iter().all(|f| f.functions.len() == 1));
    }

    #[test]
    fn test_later_merge_replaces_functions() {
        let statements = vec![stmts("P", &[("x.go", 2, 2)])];
        let functions = vec![
            funcs("P", vec![record("P", "x.go", "F1", 1)]),
            funcs("P", vec![record("P", "x.go", "F2", 7)]),
        ];

        let coverage = aggregate(&statements, &functions);
        let file = coverage.package("P").unwrap().file("x.go").unwrap();
        assert_eq!(function_names(file), vec!["F2"]);
    }

    #[test]
    fn test_function_fields_and_order_preserved() {
        let statements = vec![stmts("P", &[("x.go", 2, 2)])];
        let functions = vec![funcs(
            "P",
            vec![record("P", "x.go", "Do", 20), record("P", "x.go", "do", 5)],
        )];

        let coverage = aggregate(&statements, &functions);
        let file = coverage.package("P").unwrap().file("x.go").unwrap();
        assert_eq!(
            file.functions,
            vec![
                FunctionCoverage {
                    name: "Do".into(),
                    percent: 50.0,
                    file: "x.go".into(),
                    line: 20,
                    internal: false,
                },
                FunctionCoverage {
                    name: "do".into(),
                    percent: 50.0,
                    file: "x.go".into(),
                    line: 5,
                    internal: true,
                },
            ]
        );
    }

    #[test]
    fn test_is_internal_classification() {
        assert!(!is_internal("Do"));
        assert!(is_internal("do"));
        assert!(!is_internal("_helper"));
        assert!(!is_internal("9lives"));
        assert!(!is_internal("(*T).run"));
        assert!(!is_internal("école"));
        assert!(!is_internal(""));
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let statements = vec![
            stmts("a", &[("a/1.go", 3, 1), ("a/2.go", 2, 2)]),
            stmts("b", &[("b/1.go", 1, 0)]),
        ];
        let mut reversed = statements.clone();
        reversed.reverse();

        let first = aggregate(&statements, &[]).sorted();
        let second = aggregate(&reversed, &[]).sorted();
        assert_eq!(first, second);
    }
}
