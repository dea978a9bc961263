//! Coverage aggregation.
//!
//! Reconciles the statement-side and function-side reader outputs into one
//! `Coverage → PackageCoverage → FileCoverage → FunctionCoverage` tree.
//!
//! # Module Structure
//!
//! - [`types`] - Report data structures (pure data)
//! - [`percent`] - Rounding arithmetic (pure function)
//! - [`aggregate`] - Build and merge phases
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use covstat::coverage::aggregate;
//! use covstat::profile::{FileStatements, PackageStatements};
//!
//! let mut files = HashMap::new();
//! files.insert("x.go".to_string(), FileStatements::new(3, 1));
//! let statements = vec![PackageStatements::from_files("example.com/p", files)];
//!
//! let coverage = aggregate(&statements, &[]);
//! assert_eq!(coverage.percent, 33.3);
//! ```

pub mod aggregate;
pub mod percent;
pub mod types;

pub use aggregate::{aggregate, is_internal, CoverageAggregator, MergeStats};
pub use percent::percent;
pub use types::{Coverage, FileCoverage, FunctionCoverage, PackageCoverage};
