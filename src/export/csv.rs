//! CSV export implementation.
//!
//! Exports one row per project package, in build order, for spreadsheet use.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or line breaks.
    fn escape_field(value: &str) -> String {
        if value.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "order,project,guid,format,package,version")?;

        for (i, project) in data.projects.iter().enumerate() {
            let prefix = format!(
                "{},{},{},{}",
                i + 1,
                Self::escape_field(&project.name),
                Self::escape_field(&project.guid),
                project.format.label()
            );

            // Projects without packages still get a row so the order is complete
            if project.packages.is_empty() {
                writeln!(writer, "{},,", prefix)?;
                continue;
            }

            for package in &project.packages {
                writeln!(
                    writer,
                    "{},{},{}",
                    prefix,
                    Self::escape_field(&package.id),
                    Self::escape_field(&package.version)
                )?;
            }
        }

        Ok(())
    }
}
