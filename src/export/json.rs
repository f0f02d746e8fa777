//! JSON export implementation.
//!
//! Exports the solution analysis in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::parser::ProjectFormat;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable package for JSON output.
#[derive(Serialize)]
struct JsonPackage<'a> {
    id: &'a str,
    version: &'a str,
}

/// Serializable project for JSON output.
#[derive(Serialize)]
struct JsonProject<'a> {
    order: usize,
    name: &'a str,
    guid: &'a str,
    path: String,
    format: ProjectFormat,
    dependencies: Vec<&'a str>,
    packages: Vec<JsonPackage<'a>>,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    projects: usize,
    sdk_projects: usize,
    legacy_projects: usize,
    package_references: usize,
    distinct_packages: usize,
}

/// Solution info for JSON output.
#[derive(Serialize)]
struct JsonSolution<'a> {
    name: &'a str,
    path: &'a str,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    solution: JsonSolution<'a>,
    summary: JsonSummary,
    build_order: Vec<JsonProject<'a>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let build_order: Vec<JsonProject> = data
            .projects
            .iter()
            .enumerate()
            .map(|(i, p)| JsonProject {
                order: i + 1,
                name: &p.name,
                guid: &p.guid,
                path: p.path.display().to_string(),
                format: p.format,
                dependencies: data.dependency_names(p),
                packages: p
                    .packages
                    .iter()
                    .map(|pkg| JsonPackage {
                        id: &pkg.id,
                        version: &pkg.version,
                    })
                    .collect(),
            })
            .collect();

        let export = JsonExport {
            solution: JsonSolution {
                name: &data.solution_name,
                path: &data.solution_path,
            },
            summary: JsonSummary {
                projects: data.projects.len(),
                sdk_projects: data.format_count(ProjectFormat::Sdk),
                legacy_projects: data.format_count(ProjectFormat::Legacy),
                package_references: data.package_count(),
                distinct_packages: data.distinct_package_count(),
            },
            build_order,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
