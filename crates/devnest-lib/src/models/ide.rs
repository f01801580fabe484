// IDE catalog models
// Configured external tools launchable against a project

use serde::{Deserialize, Serialize};

/// Default argument template
pub const DEFAULT_ARGS_TEMPLATE: &str = "{projectPath}";

/// Default priority for manually added IDEs
pub const DEFAULT_IDE_PRIORITY: i32 = 200;

/// Tool category, selects the spawn strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum IdeCategory {
    #[default]
    Gui,
    Cli,
    Terminal,
    Browser,
}

impl IdeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeCategory::Gui => "Gui",
            IdeCategory::Cli => "Cli",
            IdeCategory::Terminal => "Terminal",
            IdeCategory::Browser => "Browser",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "Cli" => IdeCategory::Cli,
            "Terminal" => IdeCategory::Terminal,
            "Browser" => IdeCategory::Browser,
            _ => IdeCategory::Gui,
        }
    }

    /// Whether the tool runs inside a console host
    pub fn is_console(&self) -> bool {
        matches!(self, IdeCategory::Cli | IdeCategory::Terminal)
    }
}

/// A configured IDE / editor / terminal / browser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdeConfig {
    pub id: String,
    pub name: String,
    /// Absolute path or command name resolvable on PATH
    pub executable: String,
    pub args_template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub category: IdeCategory,
    /// Lower is more preferred
    pub priority: i32,
    pub auto_detected: bool,
}

/// User-submitted IDE definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeForm {
    /// Generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub executable: String,
    #[serde(default)]
    pub args_template: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub category: Option<IdeCategory>,
    #[serde(default)]
    pub priority: Option<i32>,
}
