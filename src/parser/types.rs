//! Shared types for solution parsing.
//!
//! This module defines the data structures used to represent a solution,
//! its projects and the packages each project declares.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A parsed solution with its projects in build order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionItem {
    /// Solution name (the `.sln` file stem).
    pub name: String,

    /// Path to the `.sln` file.
    pub path: PathBuf,

    /// Projects, ordered so that every project follows its dependencies.
    pub projects: Vec<ProjectItem>,
}

impl SolutionItem {
    /// Finds a project by its solution GUID.
    pub fn project_by_guid(&self, guid: &str) -> Option<&ProjectItem> {
        self.projects
            .iter()
            .find(|p| p.guid.eq_ignore_ascii_case(guid))
    }

    /// Returns the total count of package references across all projects.
    pub fn package_count(&self) -> usize {
        self.projects.iter().map(|p| p.packages.len()).sum()
    }
}

/// Project file flavor.
///
/// SDK-style projects declare packages inline with `PackageReference`;
/// legacy projects list them in a sibling `packages.config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectFormat {
    /// `<Project Sdk="...">` style project. An `<Sdk Name="..." />` child or
    /// an `<Import Sdk="..." />` also marks a project as SDK-style.
    #[default]
    Sdk,

    /// Classic MSBuild project with `packages.config`.
    Legacy,
}

impl ProjectFormat {
    /// Returns a short label for the project format.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectFormat::Sdk => "sdk",
            ProjectFormat::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ProjectFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectFormat::Sdk => "SDK-style",
            ProjectFormat::Legacy => "legacy",
        };
        write!(f, "{}", s)
    }
}

/// A project of the solution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectItem {
    /// Project name as declared in the solution.
    pub name: String,

    /// Project GUID, upper-case with braces (e.g. `{6F2A...}`).
    pub guid: String,

    /// Absolute path to the project file.
    pub path: PathBuf,

    /// Project file flavor.
    pub format: ProjectFormat,

    /// Packages the project declares.
    pub packages: Vec<PackageItem>,

    /// `ProjectReference` entries, with paths resolved.
    pub project_references: Vec<ProjectReferenceItem>,

    /// GUIDs of the solution projects that must build first.
    pub dependencies: Vec<String>,
}

impl ProjectItem {
    /// Returns true if the project declares any package.
    pub fn has_packages(&self) -> bool {
        !self.packages.is_empty()
    }
}

impl fmt::Display for ProjectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.guid)
    }
}

/// A package reference of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageItem {
    /// The package id (e.g. "Newtonsoft.Json").
    pub id: String,

    /// The declared version, verbatim. Empty when none is declared.
    pub version: String,
}

impl PackageItem {
    /// Creates a new PackageItem instance.
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}@{}", self.id, self.version)
        }
    }
}

/// A `<ProjectReference>` from one project file to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReferenceItem {
    /// Referenced project name (the file stem).
    pub name: String,

    /// Referenced project file, resolved against the referencing project.
    pub path: PathBuf,
}
