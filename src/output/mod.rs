//! Rendering of coverage reports and test runs.

pub mod json;
pub mod terminal;

pub use json::JsonWriter;
pub use terminal::TerminalWriter;

use crate::coverage::Coverage;
use crate::formatting::Palette;
use crate::testrun::TestRun;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Terminal,
}

pub trait OutputWriter {
    fn write_coverage(&mut self, coverage: &Coverage) -> anyhow::Result<()>;
    fn write_tests(&mut self, run: &TestRun) -> anyhow::Result<()>;
}

pub fn create_writer<'a>(
    format: OutputFormat,
    destination: &'a mut dyn Write,
    palette: Palette,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination, palette)),
    }
}
