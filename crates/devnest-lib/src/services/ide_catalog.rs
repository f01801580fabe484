// IDE Catalog
// Known tool families, name prettification and catalog entry validation

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ide::{
    IdeCategory, IdeConfig, IdeForm, DEFAULT_ARGS_TEMPLATE, DEFAULT_IDE_PRIORITY,
};
use crate::services::launcher::split_args_template;
use crate::utils::error::{DevNestError, Result};

/// Priority for detected tools outside the family table
pub const UNRECOGNIZED_PRIORITY: i32 = 500;

/// A tool family the detector knows how to find
#[derive(Debug, Clone, Copy)]
pub struct IdeFamily {
    pub id: &'static str,
    /// Command names looked up on PATH, in order
    pub commands: &'static [&'static str],
    pub args_template: &'static str,
    pub category: IdeCategory,
    pub priority: i32,
}

const fn family(
    id: &'static str,
    commands: &'static [&'static str],
    args_template: &'static str,
    category: IdeCategory,
    priority: i32,
) -> IdeFamily {
    IdeFamily {
        id,
        commands,
        args_template,
        category,
        priority,
    }
}

pub const IDE_FAMILIES: &[IdeFamily] = &[
    // Editors and IDEs
    family("vscode", &["code"], "{projectPath}", IdeCategory::Gui, 100),
    family("vscode-insiders", &["code-insiders"], "{projectPath}", IdeCategory::Gui, 105),
    family("cursor", &["cursor"], "{projectPath}", IdeCategory::Gui, 110),
    family("windsurf", &["windsurf"], "{projectPath}", IdeCategory::Gui, 112),
    family("zed", &["zed", "zeditor"], "{projectPath}", IdeCategory::Gui, 115),
    family("sublime", &["subl", "sublime_text"], "{projectPath}", IdeCategory::Gui, 118),
    family("webstorm", &["webstorm"], "{projectPath}", IdeCategory::Gui, 120),
    family("intellij", &["idea", "intellij-idea-ultimate", "intellij-idea-community"], "{projectPath}", IdeCategory::Gui, 121),
    family("pycharm", &["pycharm", "pycharm-professional", "pycharm-community"], "{projectPath}", IdeCategory::Gui, 122),
    family("clion", &["clion"], "{projectPath}", IdeCategory::Gui, 123),
    family("goland", &["goland"], "{projectPath}", IdeCategory::Gui, 124),
    family("rider", &["rider"], "{projectPath}", IdeCategory::Gui, 125),
    family("rustrover", &["rustrover"], "{projectPath}", IdeCategory::Gui, 126),
    family("fleet", &["fleet"], "{projectPath}", IdeCategory::Gui, 127),
    family("android-studio", &["studio", "android-studio"], "{projectPath}", IdeCategory::Gui, 128),
    // Console editors
    family("neovim", &["nvim"], "{projectPath}", IdeCategory::Cli, 200),
    family("vim", &["vim"], "{projectPath}", IdeCategory::Cli, 201),
    family("emacs", &["emacs"], "{projectPath}", IdeCategory::Gui, 202),
    family("helix", &["hx", "helix"], "{projectPath}", IdeCategory::Cli, 203),
    // Coding agents run in the project directory without arguments
    family("claude", &["claude"], "", IdeCategory::Cli, 210),
    family("codex", &["codex"], "", IdeCategory::Cli, 211),
    family("opencode", &["opencode"], "", IdeCategory::Cli, 212),
    // Terminals
    family("windows-terminal", &["wt"], "-d {projectPath}", IdeCategory::Terminal, 300),
    family("iterm", &["iterm2"], "{projectPath}", IdeCategory::Terminal, 301),
    family("alacritty", &["alacritty"], "--working-directory {projectPath}", IdeCategory::Terminal, 302),
    family("kitty", &["kitty"], "--directory {projectPath}", IdeCategory::Terminal, 303),
    family("wezterm", &["wezterm"], "start --cwd {projectPath}", IdeCategory::Terminal, 304),
    // Browsers
    family("chrome", &["google-chrome", "google-chrome-stable", "chrome", "chromium"], "{projectPath}", IdeCategory::Browser, 400),
    family("firefox", &["firefox"], "{projectPath}", IdeCategory::Browser, 401),
];

pub fn find_family(id: &str) -> Option<&'static IdeFamily> {
    IDE_FAMILIES.iter().find(|f| f.id == id)
}

/// Curated display names keyed by lower-cased executable stem
static NAME_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("code", "Visual Studio Code"),
        ("code-insiders", "Visual Studio Code Insiders"),
        ("cursor", "Cursor"),
        ("windsurf", "Windsurf"),
        ("zed", "Zed"),
        ("zeditor", "Zed"),
        ("subl", "Sublime Text"),
        ("sublime_text", "Sublime Text"),
        ("webstorm", "WebStorm"),
        ("webstorm64", "WebStorm"),
        ("idea", "IntelliJ IDEA"),
        ("idea64", "IntelliJ IDEA"),
        ("intellij-idea-ultimate", "IntelliJ IDEA"),
        ("intellij-idea-community", "IntelliJ IDEA Community"),
        ("pycharm", "PyCharm"),
        ("pycharm64", "PyCharm"),
        ("pycharm-professional", "PyCharm"),
        ("pycharm-community", "PyCharm Community"),
        ("clion", "CLion"),
        ("clion64", "CLion"),
        ("goland", "GoLand"),
        ("goland64", "GoLand"),
        ("rider", "Rider"),
        ("rider64", "Rider"),
        ("rustrover", "RustRover"),
        ("rustrover64", "RustRover"),
        ("fleet", "Fleet"),
        ("studio", "Android Studio"),
        ("studio64", "Android Studio"),
        ("android-studio", "Android Studio"),
        ("nvim", "Neovim"),
        ("vim", "Vim"),
        ("gvim", "Vim"),
        ("emacs", "Emacs"),
        ("hx", "Helix"),
        ("helix", "Helix"),
        ("claude", "Claude CLI"),
        ("codex", "Codex CLI"),
        ("opencode", "OpenCode CLI"),
        ("wt", "Windows Terminal"),
        ("iterm2", "iTerm"),
        ("alacritty", "Alacritty"),
        ("kitty", "kitty"),
        ("wezterm", "WezTerm"),
        ("wezterm-gui", "WezTerm"),
        ("google-chrome", "Google Chrome"),
        ("google-chrome-stable", "Google Chrome"),
        ("chrome", "Google Chrome"),
        ("chromium", "Chromium"),
        ("firefox", "Firefox"),
    ])
});

const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "cmd", "bat", "sh", "AppImage"];

static SEPARATORS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[-_.\s]+").ok());

/// Curated label for an executable, if its stem is a known tool
pub fn curated_name(executable: &str) -> Option<&'static str> {
    let stem = executable_stem(executable).to_lowercase();
    NAME_TABLE.get(stem.as_str()).copied()
}

/// Turn an executable path or file name into a human label
pub fn prettify_name(executable: &str) -> String {
    if let Some(name) = curated_name(executable) {
        return name.to_string();
    }
    let stem = executable_stem(executable);

    let base = match stem.strip_suffix("64") {
        Some(rest) if !rest.is_empty() => rest,
        _ => stem.as_str(),
    };

    let words: Vec<&str> = match SEPARATORS.as_ref() {
        Some(re) => re.split(base).collect(),
        None => base
            .split(|c: char| matches!(c, '-' | '_' | '.') || c.is_whitespace())
            .collect(),
    };
    words
        .into_iter()
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn executable_stem(executable: &str) -> String {
    // Split on both separators so Windows paths work on every host
    let file_name = executable
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(executable);
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && EXECUTABLE_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext)) =>
        {
            stem.to_string()
        }
        _ => file_name.to_string(),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Comparison key for executables (case-insensitive on Windows)
#[cfg(target_os = "windows")]
pub fn normalize_executable(executable: &str) -> String {
    executable.trim().replace('/', "\\").to_lowercase()
}

#[cfg(not(target_os = "windows"))]
pub fn normalize_executable(executable: &str) -> String {
    executable.trim().to_string()
}

/// Validate a submitted form and turn it into a catalog entry
pub fn ide_from_form(form: IdeForm) -> Result<IdeConfig> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(DevNestError::InvalidInput("IDE name must not be empty".to_string()));
    }
    let executable = form.executable.trim();
    if executable.is_empty() {
        return Err(DevNestError::InvalidInput(
            "IDE executable must not be empty".to_string(),
        ));
    }

    let args_template = form
        .args_template
        .unwrap_or_else(|| DEFAULT_ARGS_TEMPLATE.to_string());
    split_args_template(&args_template)?;

    let id = form
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    // Ids name icon cache files
    if id == "." || id.contains(['/', '\\']) || id.contains("..") {
        return Err(DevNestError::InvalidInput(format!("Invalid IDE id: {}", id)));
    }

    Ok(IdeConfig {
        id,
        name: name.to_string(),
        executable: executable.to_string(),
        args_template,
        icon: form.icon,
        category: form.category.unwrap_or_default(),
        priority: form.priority.unwrap_or(DEFAULT_IDE_PRIORITY),
        auto_detected: false,
    })
}
