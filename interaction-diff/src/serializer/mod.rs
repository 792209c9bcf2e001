mod json;
mod text;

use crate::{configuration::OutputFormat, diff::DiffReport, error::Result};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Emit equal body runs line by line instead of folding each into a
    /// single marker.
    pub show_equal: bool,
    pub pretty: bool,
}

/// Writes the report to `writer`. The report itself is never modified.
pub fn write_report<W: Write>(
    report: &DiffReport,
    options: &RenderOptions,
    mut writer: W,
) -> Result<()> {
    match options.format {
        OutputFormat::Json => {
            let document = json::render(report, options.show_equal);
            if options.pretty {
                serde_json::to_writer_pretty(&mut writer, &document)?;
            } else {
                serde_json::to_writer(&mut writer, &document)?;
            }
            writeln!(writer)?;
        }
        OutputFormat::Text => text::render(report, options.show_equal, &mut writer)?,
    }

    writer.flush()?;
    Ok(())
}
