//! Parser for Visual Studio solution (`.sln`) files.
//!
//! Reads the `Project(...) = ...` blocks and their `ProjectDependencies`
//! sections, parses every referenced project file, links project
//! references to the projects of the solution and orders the projects so
//! that each one follows everything it depends on.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use super::types::{ProjectItem, SolutionItem};
use super::{path_key, project, resolve_relative, ParseError, ParseResult};
use crate::graph::{build_graph_in_order, resolve, CycleInfo, ResolveError};

/// Project type GUID of solution folders, which have no project file.
pub const SOLUTION_FOLDER_KIND: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

const SOLUTION_HEADER: &str = "Microsoft Visual Studio Solution File";

static PROJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^Project\("(?P<kind>\{[^}]+\})"\)\s*=\s*"(?P<name>[^"]*)"\s*,\s*"(?P<path>[^"]*)"\s*,\s*"(?P<guid>\{[^}]+\})""#,
    )
    .unwrap_or_else(|_| panic!("Invalid Regex"))
});

static DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<guid>\{[^}]+\})\s*=\s*\{[^}]+\}")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// One `Project(...)` block of a solution file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionEntry {
    /// Project type GUID (upper case).
    pub kind: String,

    /// Project name.
    pub name: String,

    /// Project file path as written, relative to the solution.
    pub path: String,

    /// Project GUID (upper case).
    pub guid: String,

    /// GUIDs listed in the `ProjectDependencies` section, in order.
    pub dependencies: Vec<String>,
}

impl SolutionEntry {
    /// Returns true for solution folders.
    pub fn is_folder(&self) -> bool {
        self.kind == SOLUTION_FOLDER_KIND
    }
}

enum State {
    Top,
    InProject { entry: SolutionEntry, line: usize },
    InDependencies { entry: SolutionEntry, line: usize },
}

/// Parses a solution file, every project it lists, and returns the projects
/// in build order.
///
/// # Errors
///
/// Fails when a file cannot be read or parsed, or when the projects depend
/// on each other in a circle.
pub fn parse_file(path: &Path) -> ParseResult<SolutionItem> {
    let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_str(&content, path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut projects = Vec::with_capacity(entries.len());
    for entry in entries.into_iter().filter(|e| !e.is_folder()) {
        let project_path = resolve_relative(base_dir, &entry.path);
        let document = project::parse_file(&project_path)?;

        if let Some(declared) = document.guid.as_deref() {
            if declared != entry.guid {
                debug!(
                    project = %entry.name,
                    declared,
                    solution = %entry.guid,
                    "project GUID differs from solution, using solution GUID"
                );
            }
        }

        projects.push(ProjectItem {
            name: entry.name,
            guid: entry.guid,
            path: project_path,
            format: document.format,
            packages: document.packages,
            project_references: document.project_references,
            dependencies: entry.dependencies,
        });
    }

    link_project_references(&mut projects);
    let projects = resolve_build_order(projects)?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!(
        solution = %name,
        projects = projects.len(),
        "resolved build order"
    );

    Ok(SolutionItem {
        name,
        path: path.to_path_buf(),
        projects,
    })
}

/// Parses solution file content into its project entries, in file order.
///
/// `path` is only used for error reporting.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use pkganalyzer::parser::solution::parse_str;
///
/// let sln = r#"
/// Microsoft Visual Studio Solution File, Format Version 12.00
/// Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Core", "Core\Core.csproj", "{11111111-1111-1111-1111-111111111111}"
/// EndProject
/// "#;
///
/// let entries = parse_str(sln, Path::new("App.sln")).unwrap();
/// assert_eq!(entries[0].name, "Core");
/// ```
pub fn parse_str(content: &str, path: &Path) -> ParseResult<Vec<SolutionEntry>> {
    let invalid = |line: usize, message: &str| ParseError::InvalidSolution {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    };

    let mut entries: Vec<SolutionEntry> = Vec::new();
    let mut seen_guids = HashSet::new();
    let mut seen_header = false;
    let mut state = State::Top;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim().trim_start_matches('\u{feff}');
        if line.is_empty() {
            continue;
        }
        if !seen_header {
            if !line.starts_with(SOLUTION_HEADER) {
                return Err(invalid(line_no, "missing solution file header"));
            }
            seen_header = true;
            continue;
        }

        state = match state {
            State::Top => {
                if !line.starts_with("Project(") {
                    State::Top
                } else {
                    let caps = PROJECT_RE
                        .captures(line)
                        .ok_or_else(|| invalid(line_no, "malformed Project line"))?;
                    let entry = SolutionEntry {
                        kind: caps["kind"].to_uppercase(),
                        name: caps["name"].to_string(),
                        path: caps["path"].to_string(),
                        guid: caps["guid"].to_uppercase(),
                        dependencies: Vec::new(),
                    };
                    if !seen_guids.insert(entry.guid.clone()) {
                        return Err(invalid(line_no, "duplicate project GUID"));
                    }
                    State::InProject {
                        entry,
                        line: line_no,
                    }
                }
            }
            State::InProject { entry, line: start } => {
                if line == "EndProject" {
                    entries.push(entry);
                    State::Top
                } else if line.starts_with("Project(") {
                    return Err(invalid(start, "unterminated Project block"));
                } else if line.starts_with("ProjectSection(ProjectDependencies)") {
                    State::InDependencies { entry, line: start }
                } else {
                    State::InProject { entry, line: start }
                }
            }
            State::InDependencies {
                mut entry,
                line: start,
            } => {
                if line == "EndProjectSection" {
                    State::InProject { entry, line: start }
                } else if let Some(caps) = DEPENDENCY_RE.captures(line) {
                    let guid = caps["guid"].to_uppercase();
                    if !entry.dependencies.contains(&guid) {
                        entry.dependencies.push(guid);
                    }
                    State::InDependencies { entry, line: start }
                } else {
                    warn!(line = line_no, "unrecognized project dependency entry skipped");
                    State::InDependencies { entry, line: start }
                }
            }
        };
    }

    if !seen_header {
        return Err(invalid(1, "missing solution file header"));
    }
    match state {
        State::Top => Ok(entries),
        State::InProject { line, .. } | State::InDependencies { line, .. } => {
            Err(invalid(line, "unterminated Project block"))
        }
    }
}

/// Adds each project reference that points at a project of the solution to
/// the referencing project's dependencies, after the solution-level ones.
///
/// References to files outside the solution are left out.
pub fn link_project_references(projects: &mut [ProjectItem]) {
    let guids_by_path: HashMap<String, String> = projects
        .iter()
        .map(|p| (path_key(&p.path), p.guid.clone()))
        .collect();

    for project in projects.iter_mut() {
        for reference in &project.project_references {
            match guids_by_path.get(&path_key(&reference.path)) {
                Some(guid) => {
                    if !project.dependencies.contains(guid) {
                        project.dependencies.push(guid.clone());
                    }
                }
                None => debug!(
                    project = %project.name,
                    reference = %reference.path.display(),
                    "project reference outside the solution ignored"
                ),
            }
        }
    }
}

/// Orders projects so that each one follows all of its dependencies.
///
/// Projects keep their relative order whenever the dependencies allow it.
/// Dependency GUIDs that name no project of the solution are dropped.
///
/// # Errors
///
/// Returns [`ParseError::CircularDependency`] when the projects depend on
/// each other in a circle.
pub fn resolve_build_order(projects: Vec<ProjectItem>) -> ParseResult<Vec<ProjectItem>> {
    let names: HashMap<&str, &str> = projects
        .iter()
        .map(|p| (p.guid.as_str(), p.name.as_str()))
        .collect();

    let graph = build_graph_in_order(projects.iter().map(|project| {
        let dependencies: Vec<String> = project
            .dependencies
            .iter()
            .filter(|guid| {
                let found = names.contains_key(guid.as_str());
                if !found {
                    warn!(
                        project = %project.name,
                        dependency = %guid,
                        "unknown dependency GUID ignored"
                    );
                }
                found
            })
            .cloned()
            .collect();
        (project.guid.clone(), dependencies)
    }));

    let order = match resolve(&graph) {
        Ok(order) => order,
        Err(ResolveError::CycleDetected { unresolved }) => {
            let name_of = |guid: &String| {
                names
                    .get(guid.as_str())
                    .map_or_else(|| guid.clone(), |name| name.to_string())
            };
            let cycles: Vec<CycleInfo> = graph
                .detect_cycles()
                .into_iter()
                .map(|cycle| CycleInfo {
                    nodes: cycle.nodes.iter().map(name_of).collect(),
                })
                .collect();
            return Err(ParseError::CircularDependency {
                unresolved: unresolved.iter().map(name_of).collect(),
                cycles,
            });
        }
    };

    let mut by_guid: HashMap<String, ProjectItem> = projects
        .into_iter()
        .map(|p| (p.guid.clone(), p))
        .collect();
    Ok(order
        .into_iter()
        .filter_map(|guid| by_guid.remove(&guid))
        .collect())
}
