//! Parser module for pkganalyzer.
//!
//! This module reads .NET solution and project files and turns them into
//! the [`SolutionItem`] model, with projects in build order.
//!
//! # Supported Formats
//!
//! - **.sln** (Visual Studio solution) - project list and solution-level dependencies
//! - **.csproj / .vbproj / .fsproj** - SDK-style and legacy MSBuild projects
//! - **packages.config** - legacy NuGet package lists
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pkganalyzer::parser::solution;
//!
//! let solution = solution::parse_file(Path::new("App.sln")).unwrap();
//!
//! for project in &solution.projects {
//!     println!("{} ({} packages)", project.name, project.packages.len());
//! }
//! ```

pub mod project;
pub mod solution;
pub mod types;

use std::path::{Component, Path, PathBuf};

use crate::graph::CycleInfo;

// Re-export commonly used types for convenience
pub use project::ProjectDocument;
pub use solution::{parse_file, resolve_build_order};
pub use types::{PackageItem, ProjectFormat, ProjectItem, ProjectReferenceItem, SolutionItem};

/// Errors that can occur while reading a solution.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read a file from disk.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse XML content.
    #[error("Failed to parse XML in '{path}': {source}")]
    Xml {
        path: PathBuf,
        source: quick_xml::Error,
    },

    /// The solution file structure is invalid.
    #[error("Invalid solution '{path}' at line {line}: {message}")]
    InvalidSolution {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The project file structure is invalid.
    #[error("Invalid project '{path}': {message}")]
    InvalidProject { path: PathBuf, message: String },

    /// The projects depend on each other in a circle. Both fields hold
    /// project names.
    #[error(
        "Circular dependency detected: {}",
        cycles.iter().map(|c| c.cycle_path()).collect::<Vec<_>>().join("; ")
    )]
    CircularDependency {
        unresolved: Vec<String>,
        cycles: Vec<CycleInfo>,
    },
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Resolves a path written in a solution or project file against `base`.
///
/// Both `\` and `/` are accepted as separators. `.` and `..` components are
/// folded lexically, since the target may not exist on disk.
pub(crate) fn resolve_relative(base: &Path, raw: &str) -> PathBuf {
    let mut relative = PathBuf::new();
    if raw.starts_with(['\\', '/']) {
        relative.push(std::path::MAIN_SEPARATOR_STR);
    }
    relative.extend(raw.split(['\\', '/']).filter(|s| !s.is_empty()));
    normalize(&base.join(relative))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Key used to compare project paths: separator-normalized and lower-cased,
/// since solution files are written on case-insensitive filesystems.
pub(crate) fn path_key(path: &Path) -> String {
    normalize(path)
        .to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}
