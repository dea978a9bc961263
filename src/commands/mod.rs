//! Subcommand handlers for the `covstat` binary.

pub mod cover;

use crate::formatting::{FormattingConfig, Palette};
use crate::output::{create_writer, OutputFormat, OutputWriter};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Render through the writer for `format`, to `output` or stdout.
///
/// Colors are only considered for stdout.
pub(crate) fn write_report<F>(
    format: OutputFormat,
    output: Option<&Path>,
    formatting: FormattingConfig,
    render: F,
) -> Result<()>
where
    F: FnOnce(&mut dyn OutputWriter) -> Result<()>,
{
    let (mut destination, palette): (Box<dyn Write>, Palette) = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), Palette::plain())
        }
        None => (Box::new(io::stdout().lock()), Palette::new(formatting)),
    };

    {
        let mut writer = create_writer(format, &mut *destination, palette);
        render(writer.as_mut())?;
    }
    destination.flush().context("Failed to flush output")?;
    Ok(())
}
