//! Markdown export implementation.
//!
//! Exports the solution analysis in Markdown format for documentation and reporting.

use super::{ExportData, Exporter};
use crate::parser::ProjectFormat;
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Solution Analysis Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Solution:** {}", data.solution_name)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Projects | {} |", data.projects.len())?;
        writeln!(
            writer,
            "| SDK-style Projects | {} |",
            data.format_count(ProjectFormat::Sdk)
        )?;
        writeln!(
            writer,
            "| Legacy Projects | {} |",
            data.format_count(ProjectFormat::Legacy)
        )?;
        writeln!(writer, "| Package References | {} |", data.package_count())?;
        writeln!(
            writer,
            "| Distinct Packages | {} |",
            data.distinct_package_count()
        )?;
        writeln!(writer)?;

        // Build order
        writeln!(writer, "## Build Order")?;
        writeln!(writer)?;
        writeln!(writer, "| # | Project | Format | Depends On |")?;
        writeln!(writer, "|---|---------|--------|------------|")?;
        for (i, project) in data.projects.iter().enumerate() {
            let deps = data.dependency_names(project);
            let deps = if deps.is_empty() {
                "-".to_string()
            } else {
                deps.join(", ")
            };
            writeln!(
                writer,
                "| {} | {} | {} | {} |",
                i + 1,
                project.name,
                project.format,
                deps
            )?;
        }
        writeln!(writer)?;

        // Packages per project
        let with_packages: Vec<_> = data.projects.iter().filter(|p| p.has_packages()).collect();
        if !with_packages.is_empty() {
            writeln!(writer, "## Packages")?;
            writeln!(writer)?;

            for project in with_packages {
                writeln!(
                    writer,
                    "### {} ({})",
                    project.name,
                    project.packages.len()
                )?;
                writeln!(writer)?;
                writeln!(writer, "| Package | Version |")?;
                writeln!(writer, "|---------|---------|")?;
                for package in &project.packages {
                    writeln!(writer, "| {} | {} |", package.id, package.version)?;
                }
                writeln!(writer)?;
            }
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by pkganalyzer*")?;

        Ok(())
    }
}
