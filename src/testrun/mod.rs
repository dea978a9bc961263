//! Test results from `go test -json` output.
//!
//! Independent of the coverage side: [`events`] decodes the stream and
//! [`tree`] rebuilds the package/test/subtest hierarchy from it.

pub mod events;
pub mod tree;

pub use events::{read_json, Action, TestEvent};
pub use tree::{Outcome, PackageRun, Test, TestCounts, TestRun};
