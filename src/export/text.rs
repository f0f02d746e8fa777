//! Plain text export for terminal output.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "Solution: {} ({} projects, {} packages)",
            data.solution_name,
            data.projects.len(),
            data.package_count()
        )?;
        writeln!(writer)?;
        writeln!(writer, "Build order:")?;

        let width = data.projects.len().to_string().len();
        for (i, project) in data.projects.iter().enumerate() {
            let deps = data.dependency_names(project);
            if deps.is_empty() {
                writeln!(writer, "  {:>width$}. {}", i + 1, project.name)?;
            } else {
                writeln!(
                    writer,
                    "  {:>width$}. {} (after {})",
                    i + 1,
                    project.name,
                    deps.join(", ")
                )?;
            }

            for package in &project.packages {
                writeln!(writer, "  {:width$}    - {}", "", package)?;
            }
        }

        Ok(())
    }
}
