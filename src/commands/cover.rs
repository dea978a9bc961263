use super::write_report;
use crate::config::CovstatConfig;
use crate::formatting::FormattingConfig;
use crate::output::OutputFormat;
use crate::parser::CoverageParser;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CoverConfig {
    pub profile: PathBuf,
    pub func: Option<PathBuf>,
    pub root_module: Option<String>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub sort: bool,
}

impl CoverConfig {
    /// Flags given on the command line, as a config layer.
    fn overrides(&self) -> CovstatConfig {
        CovstatConfig {
            root_module: self.root_module.clone(),
            format: self.format,
            sort: self.sort.then_some(true),
        }
    }
}

pub fn handle_cover(
    config: CoverConfig,
    file_config: CovstatConfig,
    formatting: FormattingConfig,
) -> Result<()> {
    let settings = file_config.merge(config.overrides());

    let mut parser = CoverageParser::new();
    if let Some(module) = settings.root_module.as_deref() {
        parser = parser.with_root_module(module);
    }
    log::debug!("Using {:?}", parser);

    let coverage = match &config.func {
        Some(func) => parser.cover_with_func(&config.profile, func),
        None => parser.cover(&config.profile),
    }
    .with_context(|| format!("Failed to read coverage from {}", config.profile.display()))?;

    let coverage = if settings.sort() {
        coverage.sorted()
    } else {
        coverage
    };

    write_report(
        settings.format(),
        config.output.as_deref(),
        formatting,
        |writer| writer.write_coverage(&coverage),
    )
}
