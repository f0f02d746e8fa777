//! Parser for MSBuild project files and `packages.config`.
//!
//! Extracts the declared packages, the project references and the optional
//! `<ProjectGuid>` from `.csproj`, `.vbproj` and `.fsproj` files. Element
//! and attribute names are matched case-insensitively, like MSBuild does.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use super::types::{PackageItem, ProjectFormat, ProjectReferenceItem};
use super::{resolve_relative, ParseError, ParseResult};

/// Everything read from a single project file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDocument {
    /// SDK-style or legacy project.
    pub format: ProjectFormat,

    /// `<ProjectGuid>`, normalized to upper case, if declared.
    pub guid: Option<String>,

    /// Declared packages, in document order, without duplicate ids.
    pub packages: Vec<PackageItem>,

    /// `<ProjectReference>` entries, in document order.
    pub project_references: Vec<ProjectReferenceItem>,
}

impl ProjectDocument {
    fn push_package(&mut self, package: PackageItem) {
        if self
            .packages
            .iter()
            .any(|p| p.id.eq_ignore_ascii_case(&package.id))
        {
            warn!(package = %package.id, "duplicate package reference ignored");
            return;
        }
        self.packages.push(package);
    }
}

/// Parses a project file, merging a sibling `packages.config` when present.
///
/// # Arguments
///
/// * `path` - Path to the project file
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use pkganalyzer::parser::project::parse_file;
///
/// let project = parse_file(Path::new("src/Core/Core.csproj")).unwrap();
/// println!("{} packages", project.packages.len());
/// ```
pub fn parse_file(path: &Path) -> ParseResult<ProjectDocument> {
    let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut project = parse_str(&content, path)?;

    let config_path = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("packages.config");
    if config_path.is_file() {
        let config = fs::read_to_string(&config_path).map_err(|source| ParseError::Io {
            path: config_path.clone(),
            source,
        })?;
        for package in parse_packages_config(&config, &config_path)? {
            project.push_package(package);
        }
    }

    debug!(
        path = %path.display(),
        format = project.format.label(),
        packages = project.packages.len(),
        references = project.project_references.len(),
        "parsed project"
    );
    Ok(project)
}

/// Parses project file content.
///
/// `path` is where the content lives; relative `ProjectReference` paths are
/// resolved against its directory and errors name it. The file itself is
/// not read.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use pkganalyzer::parser::project::parse_str;
///
/// let xml = r#"<Project Sdk="Microsoft.NET.Sdk">
///   <ItemGroup>
///     <PackageReference Include="Serilog" Version="2.8.0" />
///     <ProjectReference Include="..\Core\Core.csproj" />
///   </ItemGroup>
/// </Project>"#;
///
/// let project = parse_str(xml, Path::new("/src/App/App.csproj")).unwrap();
/// assert_eq!(project.packages[0].id, "Serilog");
/// assert_eq!(project.project_references[0].name, "Core");
/// ```
pub fn parse_str(content: &str, path: &Path) -> ParseResult<ProjectDocument> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let xml_error = |source| ParseError::Xml {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut project = ProjectDocument::default();
    let mut seen_root = false;
    // PackageReference whose nested <Version> may still follow
    let mut open_package: Option<PackageItem> = None;
    let mut text_target = TextTarget::None;

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = e.local_name();
                let name = name.as_ref();

                if !seen_root {
                    if !name.eq_ignore_ascii_case(b"Project") {
                        return Err(ParseError::InvalidProject {
                            path: path.to_path_buf(),
                            message: "root element is not <Project>".to_string(),
                        });
                    }
                    seen_root = true;
                    if attribute(e, "Sdk").map_err(xml_error)?.is_none() {
                        project.format = ProjectFormat::Legacy;
                    }
                    continue;
                }

                // Only an open element can carry the text that follows
                text_target = TextTarget::None;

                if name.eq_ignore_ascii_case(b"PackageReference") {
                    let Some(package) = package_reference(e).map_err(xml_error)? else {
                        continue;
                    };
                    if is_empty {
                        project.push_package(package);
                    } else {
                        open_package = Some(package);
                    }
                } else if name.eq_ignore_ascii_case(b"Version") {
                    if !is_empty && open_package.is_some() {
                        text_target = TextTarget::PackageVersion;
                    }
                } else if name.eq_ignore_ascii_case(b"ProjectGuid") {
                    if !is_empty {
                        text_target = TextTarget::ProjectGuid;
                    }
                } else if name.eq_ignore_ascii_case(b"Sdk") {
                    project.format = ProjectFormat::Sdk;
                } else if name.eq_ignore_ascii_case(b"Import") {
                    if attribute(e, "Sdk").map_err(xml_error)?.is_some() {
                        project.format = ProjectFormat::Sdk;
                    }
                } else if name.eq_ignore_ascii_case(b"ProjectReference") {
                    if let Some(include) = attribute(e, "Include").map_err(xml_error)? {
                        project
                            .project_references
                            .push(project_reference(base_dir, &include));
                    }
                }
            }
            Event::Text(ref t) => {
                let text = String::from_utf8_lossy(t).trim().to_string();
                match text_target {
                    TextTarget::PackageVersion => {
                        if let Some(package) = open_package.as_mut() {
                            package.version = text;
                        }
                    }
                    TextTarget::ProjectGuid => {
                        project.guid = Some(text.to_uppercase());
                    }
                    TextTarget::None => {}
                }
            }
            Event::End(ref e) => {
                let name = e.local_name();
                if name.as_ref().eq_ignore_ascii_case(b"PackageReference") {
                    if let Some(package) = open_package.take() {
                        project.push_package(package);
                    }
                }
                text_target = TextTarget::None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(ParseError::InvalidProject {
            path: path.to_path_buf(),
            message: "missing <Project> root element".to_string(),
        });
    }

    Ok(project)
}

/// Parses a `packages.config` file into package items.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use pkganalyzer::parser::project::parse_packages_config;
///
/// let xml = r#"<packages>
///   <package id="Newtonsoft.Json" version="12.0.1" targetFramework="net461" />
/// </packages>"#;
///
/// let packages = parse_packages_config(xml, Path::new("packages.config")).unwrap();
/// assert_eq!(packages[0].version, "12.0.1");
/// ```
pub fn parse_packages_config(content: &str, path: &Path) -> ParseResult<Vec<PackageItem>> {
    let xml_error = |source| ParseError::Xml {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);
    let mut packages = Vec::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref().eq_ignore_ascii_case(b"package") =>
            {
                let Some(id) = attribute(e, "id").map_err(xml_error)? else {
                    warn!(path = %path.display(), "package entry without id ignored");
                    continue;
                };
                let version = attribute(e, "version").map_err(xml_error)?;
                packages.push(PackageItem::new(id, version.unwrap_or_default()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(packages)
}

#[derive(Debug, Clone, Copy)]
enum TextTarget {
    None,
    PackageVersion,
    ProjectGuid,
}

/// Reads a `PackageReference` element. Central package management uses
/// `Update` instead of `Include`.
fn package_reference(e: &BytesStart<'_>) -> Result<Option<PackageItem>, quick_xml::Error> {
    let id = match attribute(e, "Include")? {
        Some(id) => id,
        None => match attribute(e, "Update")? {
            Some(id) => id,
            None => return Ok(None),
        },
    };
    let version = attribute(e, "Version")?.unwrap_or_default();
    Ok(Some(PackageItem::new(id, version)))
}

fn project_reference(base_dir: &Path, include: &str) -> ProjectReferenceItem {
    let path: PathBuf = resolve_relative(base_dir, include);
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    ProjectReferenceItem { name, path }
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, quick_xml::Error> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr
            .key
            .local_name()
            .as_ref()
            .eq_ignore_ascii_case(name.as_bytes())
        {
            return Ok(Some(String::from_utf8_lossy(&attr.value).trim().to_string()));
        }
    }
    Ok(None)
}
