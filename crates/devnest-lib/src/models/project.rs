// Project data models
// A registered project directory and its scan-preserving metadata

use serde::{Deserialize, Serialize};

use super::language_stats::LanguageStats;

/// Project type verdict from the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ProjectType {
    Rust,
    Nodejs,
    Python,
    Java,
    Go,
    Dotnet,
    #[default]
    Generic,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Rust => "Rust",
            ProjectType::Nodejs => "Nodejs",
            ProjectType::Python => "Python",
            ProjectType::Java => "Java",
            ProjectType::Go => "Go",
            ProjectType::Dotnet => "Dotnet",
            ProjectType::Generic => "Generic",
        }
    }

    /// Parse a stored value; unknown strings fall back to Generic
    pub fn from_db(value: &str) -> Self {
        match value {
            "Rust" => ProjectType::Rust,
            "Nodejs" => ProjectType::Nodejs,
            "Python" => ProjectType::Python,
            "Java" => ProjectType::Java,
            "Go" => ProjectType::Go,
            "Dotnet" => ProjectType::Dotnet,
            _ => ProjectType::Generic,
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional per-project metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    /// Up to three IDE ids, most preferred first
    #[serde(default)]
    pub ide_preferences: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_stats: Option<LanguageStats>,
}

/// A registered project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Absolute path, unique across the catalog
    pub path: String,
    pub project_type: ProjectType,
    pub favorite: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub metadata: ProjectMetadata,
}

impl Project {
    pub fn new(path: String, name: String, project_type: ProjectType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            path,
            project_type,
            favorite: false,
            tags: Vec::new(),
            last_opened: None,
            last_modified: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            display_order: 0,
            metadata: ProjectMetadata::default(),
        }
    }
}

/// Manual project registration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectInput {
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project_type: Option<ProjectType>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response of `scan_projects`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProjectsResponse {
    /// Projects created or updated by this scan
    pub projects: Vec<Project>,
    /// Subdirectories skipped because they could not be read
    pub skipped_directories: usize,
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_serializes_camel_case() {
        let project = Project::new(
            "/work/app".to_string(),
            "app".to_string(),
            ProjectType::Nodejs,
        );
        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["projectType"], "Nodejs");
        assert_eq!(json["favorite"], false);
        assert!(json["metadata"]["idePreferences"].as_array().unwrap().is_empty());
        assert!(json.get("lastOpened").is_none());
    }

    #[test]
    fn test_project_type_from_db_falls_back_to_generic() {
        assert_eq!(ProjectType::from_db("Rust"), ProjectType::Rust);
        assert_eq!(ProjectType::from_db("Cobol"), ProjectType::Generic);
    }
}
