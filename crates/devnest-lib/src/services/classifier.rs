// Project Classifier
// Pure marker-set to project type decision, no file system access

use crate::models::project::ProjectType;

const RUST_MARKERS: &[&str] = &["Cargo.toml"];
const NODE_MARKERS: &[&str] = &["package.json"];
const PYTHON_MARKERS: &[&str] = &[
    "pyproject.toml",
    "requirements.txt",
    "setup.py",
    "setup.cfg",
    "Pipfile",
];
const JAVA_MARKERS: &[&str] = &[
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
];
const GO_MARKERS: &[&str] = &["go.mod"];
const DOTNET_EXTENSIONS: &[&str] = &[".sln", ".csproj", ".fsproj", ".vbproj"];

const VCS_MARKERS: &[&str] = &[".git", ".hg", ".svn"];

/// Classify a directory from the names of its immediate entries.
///
/// Checked in a fixed order so directories carrying several manifests
/// resolve deterministically: Rust, Node, Python, Java, Go, .NET.
pub fn classify<S: AsRef<str>>(markers: &[S]) -> ProjectType {
    let has_any = |names: &[&str]| {
        markers
            .iter()
            .any(|m| names.iter().any(|n| *n == m.as_ref()))
    };

    if has_any(RUST_MARKERS) {
        ProjectType::Rust
    } else if has_any(NODE_MARKERS) {
        ProjectType::Nodejs
    } else if has_any(PYTHON_MARKERS) {
        ProjectType::Python
    } else if has_any(JAVA_MARKERS) {
        ProjectType::Java
    } else if has_any(GO_MARKERS) {
        ProjectType::Go
    } else if markers.iter().any(|m| is_dotnet_marker(m.as_ref())) {
        ProjectType::Dotnet
    } else {
        ProjectType::Generic
    }
}

fn is_dotnet_marker(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    DOTNET_EXTENSIONS
        .iter()
        .any(|ext| lower.len() > ext.len() && lower.ends_with(ext))
}

/// Directory is the root of a version-controlled checkout
pub fn is_vcs_root<S: AsRef<str>>(markers: &[S]) -> bool {
    markers
        .iter()
        .any(|m| VCS_MARKERS.contains(&m.as_ref()))
}

/// Registration rule: typed projects, or untyped VCS checkouts
pub fn is_candidate<S: AsRef<str>>(project_type: ProjectType, markers: &[S]) -> bool {
    project_type != ProjectType::Generic || is_vcs_root(markers)
}
