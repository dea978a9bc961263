//! Readers for raw coverage text.
//!
//! - [`statements`] - `go test -coverprofile` blocks into per-file totals
//! - [`functions`] - `go tool cover -func` rows into per-file function lists
//! - [`paths`] - root trimming and package derivation shared by both
//!
//! Both readers take the same [`RootTrim`], so a file path reported on the
//! statement side always matches the same file on the function side.

pub mod functions;
pub mod paths;
pub mod statements;

pub use functions::{
    by_package, FunctionProfile, FunctionReader, FunctionRecord, GoFuncReader, PackageFunctions,
};
pub use paths::{package_of, RootTrim, ROOT_PACKAGE};
pub use statements::{
    FileStatements, GoCoverProfileReader, PackageStatements, ProfileMode, StatementReader,
};
