//! Export functionality for solution analysis results.
//!
//! This module provides exporters for outputting the build order and the
//! packages of each project in various formats: plain text, JSON, CSV and
//! Markdown.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod text;

use crate::parser::{ProjectFormat, ProjectItem, SolutionItem};
use std::collections::{BTreeSet, HashMap};
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Plain text - terminal output
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - spreadsheet-friendly
    Csv,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
///
/// Holds the solution's projects in build order together with a GUID to
/// name lookup for rendering dependencies.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Solution name
    pub solution_name: String,
    /// Path of the solution file, as given
    pub solution_path: String,
    /// Projects in build order
    pub projects: Vec<ProjectItem>,
    names_by_guid: HashMap<String, String>,
}

impl ExportData {
    /// Create new export data from a resolved solution.
    pub fn new(solution: &SolutionItem) -> Self {
        Self {
            solution_name: solution.name.clone(),
            solution_path: solution.path.display().to_string(),
            projects: solution.projects.clone(),
            names_by_guid: solution
                .projects
                .iter()
                .map(|p| (p.guid.clone(), p.name.clone()))
                .collect(),
        }
    }

    /// Names of the projects `project` depends on, in declaration order.
    pub fn dependency_names(&self, project: &ProjectItem) -> Vec<&str> {
        project
            .dependencies
            .iter()
            .filter_map(|guid| self.names_by_guid.get(guid).map(String::as_str))
            .collect()
    }

    /// Get count of package references across all projects
    pub fn package_count(&self) -> usize {
        self.projects.iter().map(|p| p.packages.len()).sum()
    }

    /// Get count of distinct package ids (case-insensitive)
    pub fn distinct_package_count(&self) -> usize {
        self.projects
            .iter()
            .flat_map(|p| p.packages.iter().map(|pkg| pkg.id.to_lowercase()))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Get count of projects with the given format
    pub fn format_count(&self, format: ProjectFormat) -> usize {
        self.projects.iter().filter(|p| p.format == format).count()
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::TextExporter.export(data, writer),
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::parser::{PackageItem, ProjectFormat, ProjectItem, SolutionItem};
    use std::path::PathBuf;

    /// ProjectC <- ProjectB <- ProjectA, already in build order.
    pub fn sample_solution() -> SolutionItem {
        SolutionItem {
            name: "Sample".to_string(),
            path: PathBuf::from("Sample.sln"),
            projects: vec![
                ProjectItem {
                    name: "ProjectC".to_string(),
                    guid: "{C}".to_string(),
                    path: PathBuf::from("ProjectC/ProjectC.csproj"),
                    format: ProjectFormat::Legacy,
                    packages: vec![PackageItem::new("Newtonsoft.Json", "12.0.1")],
                    ..Default::default()
                },
                ProjectItem {
                    name: "ProjectB".to_string(),
                    guid: "{B}".to_string(),
                    path: PathBuf::from("ProjectB/ProjectB.csproj"),
                    dependencies: vec!["{C}".to_string()],
                    ..Default::default()
                },
                ProjectItem {
                    name: "ProjectA".to_string(),
                    guid: "{A}".to_string(),
                    path: PathBuf::from("ProjectA/ProjectA.csproj"),
                    packages: vec![
                        PackageItem::new("Serilog", "2.8.0"),
                        PackageItem::new("newtonsoft.json", "12.0.1"),
                    ],
                    dependencies: vec!["{B}".to_string(), "{C}".to_string()],
                    ..Default::default()
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(
            "md".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("invalid".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Text), "text");
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Csv), "csv");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_export_data_counts() {
        let data = ExportData::new(&test_support::sample_solution());

        assert_eq!(data.package_count(), 3);
        assert_eq!(data.distinct_package_count(), 2);
        assert_eq!(data.format_count(ProjectFormat::Sdk), 2);
        assert_eq!(data.format_count(ProjectFormat::Legacy), 1);
    }

    #[test]
    fn test_dependency_names() {
        let data = ExportData::new(&test_support::sample_solution());
        assert_eq!(
            data.dependency_names(&data.projects[2]),
            vec!["ProjectB", "ProjectC"]
        );
        assert!(data.dependency_names(&data.projects[0]).is_empty());
    }

    #[test]
    fn test_export_to_string_every_format() {
        let data = ExportData::new(&test_support::sample_solution());
        for format in [
            ExportFormat::Text,
            ExportFormat::Json,
            ExportFormat::Csv,
            ExportFormat::Markdown,
        ] {
            let output = export_to_string(format, &data).unwrap();
            assert!(output.contains("ProjectA"), "{format} output lacks ProjectA");
        }
    }
}
