// Linux platform
// Install locations, desktop-entry discovery and terminal hosting

use std::path::{Path, PathBuf};

use super::{sibling_icon, DiscoveredTool, LaunchCommand, Platform};
use crate::models::ide::IdeCategory;
use crate::utils::error::{DevNestError, Result};
use crate::utils::path_resolver;

/// Desktop categories that mark an entry as an editor or IDE
const EDITOR_CATEGORIES: &[&str] = &["IDE", "TextEditor"];

/// Icon theme directories searched for desktop-entry icons, best first
const ICON_SEARCH_DIRS: &[&str] = &[
    "/usr/share/icons/hicolor/256x256/apps",
    "/usr/share/icons/hicolor/128x128/apps",
    "/usr/share/icons/hicolor/scalable/apps",
    "/usr/share/icons/hicolor/48x48/apps",
    "/usr/share/pixmaps",
];

/// Terminal emulators and how each is told to run a command in a directory
#[derive(Debug, Clone, Copy)]
enum TerminalKind {
    Gnome,
    Konsole,
    Alacritty,
    Kitty,
    Debian,
    Xterm,
}

const TERMINALS: &[(&str, TerminalKind)] = &[
    ("x-terminal-emulator", TerminalKind::Debian),
    ("gnome-terminal", TerminalKind::Gnome),
    ("konsole", TerminalKind::Konsole),
    ("alacritty", TerminalKind::Alacritty),
    ("kitty", TerminalKind::Kitty),
    ("xterm", TerminalKind::Xterm),
];

#[derive(Debug, Clone)]
pub struct LinuxPlatform {
    /// Directories holding `*.desktop` files
    pub application_dirs: Vec<PathBuf>,
}

impl Default for LinuxPlatform {
    fn default() -> Self {
        let mut application_dirs = vec![
            PathBuf::from("/usr/share/applications"),
            PathBuf::from("/usr/local/share/applications"),
            PathBuf::from("/var/lib/flatpak/exports/share/applications"),
        ];
        if let Some(home) = path_resolver::get_home_dir() {
            application_dirs.push(home.join(".local/share/applications"));
            application_dirs.push(home.join(".local/share/flatpak/exports/share/applications"));
        }
        Self { application_dirs }
    }
}

/// The parts of a `.desktop` file the detector cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: String,
    pub exec: String,
    pub icon: Option<String>,
}

/// Parse the `[Desktop Entry]` group; `None` unless it is a visible editor/IDE
pub fn parse_desktop_entry(content: &str) -> Option<DesktopEntry> {
    let mut in_main_group = false;
    let mut name = None;
    let mut exec = None;
    let mut icon = None;
    let mut categories = String::new();
    let mut hidden = false;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_main_group = line == "[Desktop Entry]";
            continue;
        }
        if !in_main_group || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Name" => name = Some(value.to_string()),
            "Exec" => exec = Some(value.to_string()),
            "Icon" if !value.is_empty() => icon = Some(value.to_string()),
            "Categories" => categories = value.to_string(),
            "NoDisplay" | "Hidden" if value.eq_ignore_ascii_case("true") => hidden = true,
            _ => {}
        }
    }

    let is_editor = categories
        .split(';')
        .any(|c| EDITOR_CATEGORIES.contains(&c.trim()));
    if hidden || !is_editor {
        return None;
    }

    Some(DesktopEntry {
        name: name?,
        exec: exec?,
        icon,
    })
}

/// Program part of an `Exec=` line, skipping an `env VAR=value` prefix
pub fn exec_program(exec: &str) -> Option<String> {
    let words = shlex::split(exec)?;
    words
        .into_iter()
        .filter(|w| !(w.starts_with('%') && w.len() == 2))
        .find(|w| w != "env" && !w.contains('='))
}

impl LinuxPlatform {
    fn desktop_entries(&self) -> Vec<DesktopEntry> {
        let mut entries = Vec::new();
        for dir in &self.application_dirs {
            let Ok(read_dir) = std::fs::read_dir(dir) else {
                continue;
            };
            let mut files: Vec<PathBuf> = read_dir
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.extension().map(|e| e == "desktop").unwrap_or(false))
                .collect();
            files.sort();
            for file in files {
                match std::fs::read_to_string(&file) {
                    Ok(content) => entries.extend(parse_desktop_entry(&content)),
                    Err(e) => log::debug!("[Detector] Cannot read {}: {}", file.display(), e),
                }
            }
        }
        entries
    }

    fn resolve_exec(&self, exec: &str) -> Option<PathBuf> {
        let program = exec_program(exec)?;
        if path_resolver::looks_like_path(&program) {
            let path = PathBuf::from(program);
            return path_resolver::is_executable(&path).then_some(path);
        }
        self.find_command(&program)
    }

    fn find_terminal(&self) -> Option<(PathBuf, TerminalKind)> {
        TERMINALS
            .iter()
            .find_map(|(name, kind)| self.find_command(name).map(|path| (path, *kind)))
    }
}

/// Resolve a desktop-entry `Icon=` value to a file
pub fn resolve_icon_name(icon: &str) -> Option<PathBuf> {
    let direct = PathBuf::from(icon);
    if direct.is_absolute() {
        return direct.is_file().then_some(direct);
    }
    for dir in ICON_SEARCH_DIRS {
        for ext in ["png", "svg"] {
            let candidate = Path::new(dir).join(format!("{}.{}", icon, ext));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

impl Platform for LinuxPlatform {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn install_locations(&self, family_id: &str) -> Vec<String> {
        let patterns: &[&str] = match family_id {
            "vscode" => &[
                "/usr/share/code/bin/code",
                "/snap/bin/code",
                "/var/lib/flatpak/exports/bin/com.visualstudio.code",
                "~/.local/share/flatpak/exports/bin/com.visualstudio.code",
            ],
            "vscode-insiders" => &["/usr/share/code-insiders/bin/code-insiders"],
            "cursor" => &[
                "/opt/cursor/cursor",
                "/usr/share/cursor/bin/cursor",
                "~/Applications/[Cc]ursor*.AppImage",
                "~/.local/bin/[Cc]ursor*.AppImage",
            ],
            "windsurf" => &["/usr/share/windsurf/bin/windsurf"],
            "zed" => &["~/.local/bin/zed", "~/.local/zed.app/bin/zed"],
            "sublime" => &["/opt/sublime_text/sublime_text"],
            "webstorm" => &[
                "~/.local/share/JetBrains/Toolbox/scripts/webstorm",
                "/opt/WebStorm*/bin/webstorm.sh",
            ],
            "intellij" => &[
                "~/.local/share/JetBrains/Toolbox/scripts/idea",
                "/opt/idea*/bin/idea.sh",
            ],
            "pycharm" => &[
                "~/.local/share/JetBrains/Toolbox/scripts/pycharm",
                "/opt/pycharm*/bin/pycharm.sh",
            ],
            "clion" => &[
                "~/.local/share/JetBrains/Toolbox/scripts/clion",
                "/opt/clion*/bin/clion.sh",
            ],
            "goland" => &[
                "~/.local/share/JetBrains/Toolbox/scripts/goland",
                "/opt/GoLand*/bin/goland.sh",
            ],
            "rider" => &["~/.local/share/JetBrains/Toolbox/scripts/rider"],
            "rustrover" => &["~/.local/share/JetBrains/Toolbox/scripts/rustrover"],
            "fleet" => &["~/.local/share/JetBrains/Toolbox/scripts/fleet"],
            "android-studio" => &[
                "/opt/android-studio/bin/studio.sh",
                "~/android-studio/bin/studio.sh",
            ],
            "neovim" => &["~/.local/bin/nvim", "/opt/nvim-linux64/bin/nvim"],
            "helix" => &["~/.cargo/bin/hx"],
            "claude" => &["~/.claude/local/claude", "~/.npm-global/bin/claude"],
            "wezterm" => &["/usr/bin/wezterm"],
            _ => &[],
        };
        patterns.iter().map(|p| p.to_string()).collect()
    }

    fn discover_extra_tools(&self) -> Vec<DiscoveredTool> {
        self.desktop_entries()
            .into_iter()
            .filter_map(|entry| {
                let executable = self.resolve_exec(&entry.exec)?;
                Some(DiscoveredTool {
                    name: Some(entry.name),
                    icon: entry.icon.as_deref().and_then(resolve_icon_name),
                    executable,
                })
            })
            .collect()
    }

    fn console_command(
        &self,
        category: IdeCategory,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> LaunchCommand {
        let direct = LaunchCommand::new(program)
            .args(args.iter().cloned())
            .current_dir(cwd);
        if category != IdeCategory::Cli {
            return direct;
        }

        let Some((terminal, kind)) = self.find_terminal() else {
            log::warn!("[Launcher] No terminal emulator found, starting {} directly", program.display());
            return direct;
        };
        let program = program.to_string_lossy().to_string();
        let cwd_str = cwd.to_string_lossy().to_string();
        let command = LaunchCommand::new(terminal).current_dir(cwd);
        match kind {
            TerminalKind::Gnome => command
                .arg(format!("--working-directory={}", cwd_str))
                .arg("--")
                .arg(program)
                .args(args.iter().cloned()),
            TerminalKind::Konsole => command
                .args(["--workdir".to_string(), cwd_str, "-e".to_string(), program])
                .args(args.iter().cloned()),
            TerminalKind::Alacritty => command
                .args(["--working-directory".to_string(), cwd_str, "-e".to_string(), program])
                .args(args.iter().cloned()),
            TerminalKind::Kitty => command
                .args(["--directory".to_string(), cwd_str, program])
                .args(args.iter().cloned()),
            TerminalKind::Debian | TerminalKind::Xterm => {
                command.arg("-e").arg(program).args(args.iter().cloned())
            }
        }
    }

    fn derive_icon(&self, executable: &Path) -> Option<PathBuf> {
        if let Some(icon) = sibling_icon(executable) {
            return Some(icon);
        }
        let from_entry = self.desktop_entries().into_iter().find_map(|entry| {
            let resolved = self.resolve_exec(&entry.exec)?;
            if resolved == executable {
                entry.icon.as_deref().and_then(resolve_icon_name)
            } else {
                None
            }
        });
        from_entry.or_else(|| {
            let stem = executable.file_stem()?.to_string_lossy().to_string();
            resolve_icon_name(&stem)
        })
    }

    fn file_manager_command(&self, path: &Path) -> LaunchCommand {
        LaunchCommand::new("xdg-open").arg(path.to_string_lossy())
    }

    fn terminal_command(&self, path: &Path) -> Result<LaunchCommand> {
        let (terminal, kind) = self.find_terminal().ok_or_else(|| {
            DevNestError::launch_failed("terminal", "no terminal emulator found")
        })?;
        let dir = path.to_string_lossy().to_string();
        let command = LaunchCommand::new(terminal).current_dir(path);
        Ok(match kind {
            TerminalKind::Gnome => command.arg(format!("--working-directory={}", dir)),
            TerminalKind::Konsole => command.args(["--workdir".to_string(), dir]),
            TerminalKind::Alacritty => command.args(["--working-directory".to_string(), dir]),
            TerminalKind::Kitty => command.args(["--directory".to_string(), dir]),
            TerminalKind::Debian | TerminalKind::Xterm => command,
        })
    }
}
