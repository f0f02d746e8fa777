//! Common test utilities and helpers
//!
//! Builds small solutions on disk inside a temporary directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CSHARP_KIND: &str = "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}";
pub const FOLDER_KIND: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

pub const GUID_A: &str = "{AAAAAAAA-0000-0000-0000-000000000001}";
pub const GUID_B: &str = "{BBBBBBBB-0000-0000-0000-000000000002}";
pub const GUID_C: &str = "{CCCCCCCC-0000-0000-0000-000000000003}";

/// Test solution context
pub struct TestSolution {
    /// Temporary directory holding the solution
    pub dir: TempDir,
}

impl TestSolution {
    /// Create an empty test solution directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the solution directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Path of a file inside the solution directory
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Create a file, including its parent directories
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }
}

impl Default for TestSolution {
    fn default() -> Self {
        Self::new()
    }
}

/// A `Project(...)` block of a solution file.
pub fn sln_project(kind: &str, name: &str, path: &str, guid: &str, deps: &[&str]) -> String {
    let mut block = format!("Project(\"{kind}\") = \"{name}\", \"{path}\", \"{guid}\"\n");
    if !deps.is_empty() {
        block.push_str("\tProjectSection(ProjectDependencies) = postProject\n");
        for dep in deps {
            block.push_str(&format!("\t\t{dep} = {dep}\n"));
        }
        block.push_str("\tEndProjectSection\n");
    }
    block.push_str("EndProject\n");
    block
}

/// A complete solution file around the given project blocks.
pub fn sln(projects: &[String]) -> String {
    let mut content = String::from(
        "\nMicrosoft Visual Studio Solution File, Format Version 12.00\n\
         # Visual Studio Version 16\n\
         VisualStudioVersion = 16.0.29230.47\n",
    );
    for project in projects {
        content.push_str(project);
    }
    content.push_str(
        "Global\n\
         \tGlobalSection(SolutionConfigurationPlatforms) = preSolution\n\
         \t\tDebug|Any CPU = Debug|Any CPU\n\
         \tEndGlobalSection\n\
         EndGlobal\n",
    );
    content
}

/// An SDK-style project with the given packages and project references.
pub fn sdk_project(packages: &[(&str, &str)], references: &[&str]) -> String {
    let mut content = String::from(
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <TargetFramework>netstandard2.0</TargetFramework>\n  </PropertyGroup>\n",
    );
    if !packages.is_empty() {
        content.push_str("  <ItemGroup>\n");
        for (id, version) in packages {
            content.push_str(&format!(
                "    <PackageReference Include=\"{id}\" Version=\"{version}\" />\n"
            ));
        }
        content.push_str("  </ItemGroup>\n");
    }
    if !references.is_empty() {
        content.push_str("  <ItemGroup>\n");
        for reference in references {
            content.push_str(&format!(
                "    <ProjectReference Include=\"{reference}\" />\n"
            ));
        }
        content.push_str("  </ItemGroup>\n");
    }
    content.push_str("</Project>\n");
    content
}

/// A legacy (non-SDK) project declaring its GUID.
pub fn legacy_project(guid: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <Project ToolsVersion=\"15.0\" xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">\n\
         \x20 <PropertyGroup>\n\
         \x20   <ProjectGuid>{guid}</ProjectGuid>\n\
         \x20   <OutputType>Library</OutputType>\n\
         \x20 </PropertyGroup>\n\
         \x20 <ItemGroup>\n\
         \x20   <Reference Include=\"System\" />\n\
         \x20 </ItemGroup>\n\
         </Project>\n"
    )
}

/// A packages.config listing the given packages.
pub fn packages_config(packages: &[(&str, &str)]) -> String {
    let mut content =
        String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<packages>\n");
    for (id, version) in packages {
        content.push_str(&format!(
            "  <package id=\"{id}\" version=\"{version}\" targetFramework=\"net472\" />\n"
        ));
    }
    content.push_str("</packages>\n");
    content
}

/// ProjectA -> ProjectB -> ProjectC through project references, listed in
/// that order. ProjectC is a legacy project with a packages.config.
pub fn chained_solution() -> TestSolution {
    let solution = TestSolution::new();
    solution.create_file(
        "Sample.sln",
        &sln(&[
            sln_project(CSHARP_KIND, "ProjectA", "ProjectA\\ProjectA.csproj", GUID_A, &[]),
            sln_project(CSHARP_KIND, "ProjectB", "ProjectB\\ProjectB.csproj", GUID_B, &[]),
            sln_project(CSHARP_KIND, "ProjectC", "ProjectC\\ProjectC.csproj", GUID_C, &[]),
        ]),
    );
    solution.create_file(
        "ProjectA/ProjectA.csproj",
        &sdk_project(
            &[("Serilog", "2.8.0")],
            &["..\\ProjectB\\ProjectB.csproj"],
        ),
    );
    solution.create_file(
        "ProjectB/ProjectB.csproj",
        &sdk_project(&[], &["..\\ProjectC\\ProjectC.csproj"]),
    );
    solution.create_file("ProjectC/ProjectC.csproj", &legacy_project(GUID_C));
    solution.create_file(
        "ProjectC/packages.config",
        &packages_config(&[("Newtonsoft.Json", "12.0.1")]),
    );
    solution
}

/// Two projects referencing each other.
pub fn cyclic_solution() -> TestSolution {
    let solution = TestSolution::new();
    solution.create_file(
        "Cycle.sln",
        &sln(&[
            sln_project(CSHARP_KIND, "ProjectA", "ProjectA\\ProjectA.csproj", GUID_A, &[]),
            sln_project(CSHARP_KIND, "ProjectB", "ProjectB\\ProjectB.csproj", GUID_B, &[]),
        ]),
    );
    solution.create_file(
        "ProjectA/ProjectA.csproj",
        &sdk_project(&[], &["..\\ProjectB\\ProjectB.csproj"]),
    );
    solution.create_file(
        "ProjectB/ProjectB.csproj",
        &sdk_project(&[], &["..\\ProjectA\\ProjectA.csproj"]),
    );
    solution
}
