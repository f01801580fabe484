// Launch request / outcome models

use serde::{Deserialize, Serialize};

/// Blocking behavior requested by the caller
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOptions {
    /// Wait for Cli/Terminal tools to exit; ignored for Gui/Browser
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub project_id: String,
    #[serde(default)]
    pub ide_id: Option<String>,
    /// When present, persisted as the project's new preference list
    #[serde(default)]
    pub preferences: Option<Vec<String>>,
    #[serde(default)]
    pub wait: bool,
}

impl LaunchRequest {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    pub fn with_ide(mut self, ide_id: impl Into<String>) -> Self {
        self.ide_id = Some(ide_id.into());
        self
    }

    pub fn options(&self) -> LaunchOptions {
        LaunchOptions { wait: self.wait }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOutcome {
    pub project_id: String,
    pub ide_id: String,
    pub args: Vec<String>,
    pub launched_at: String,
}
