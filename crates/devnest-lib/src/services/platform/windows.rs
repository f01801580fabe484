// Windows platform
// Program Files / LocalAppData locations and Windows Terminal hosting

use std::path::{Path, PathBuf};

use super::{sibling_icon, LaunchCommand, Platform};
use crate::models::ide::IdeCategory;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPlatform;

const JETBRAINS_PRODUCTS: &[(&str, &str, &str)] = &[
    ("webstorm", "WebStorm", "webstorm64.exe"),
    ("intellij", "IntelliJ IDEA*", "idea64.exe"),
    ("pycharm", "PyCharm*", "pycharm64.exe"),
    ("clion", "CLion*", "clion64.exe"),
    ("goland", "GoLand*", "goland64.exe"),
    ("rider", "*Rider*", "rider64.exe"),
    ("rustrover", "RustRover*", "rustrover64.exe"),
    ("fleet", "Fleet", "fleet.exe"),
];

impl WindowsPlatform {
    fn find_windows_terminal(&self) -> Option<PathBuf> {
        self.find_command("wt")
    }
}

impl Platform for WindowsPlatform {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn install_locations(&self, family_id: &str) -> Vec<String> {
        if let Some((_, folder, exe)) = JETBRAINS_PRODUCTS.iter().find(|(id, _, _)| *id == family_id) {
            return vec![
                format!("$LOCALAPPDATA\\Programs\\{}\\bin\\{}", folder, exe),
                format!("$LOCALAPPDATA\\JetBrains\\Toolbox\\apps\\{}\\bin\\{}", folder, exe),
                format!("C:\\Program Files\\JetBrains\\{}\\bin\\{}", folder, exe),
                format!("C:\\Program Files (x86)\\JetBrains\\{}\\bin\\{}", folder, exe),
            ];
        }

        let patterns: &[&str] = match family_id {
            "vscode" => &[
                "$LOCALAPPDATA\\Programs\\Microsoft VS Code\\Code.exe",
                "C:\\Program Files\\Microsoft VS Code\\Code.exe",
                "C:\\Program Files (x86)\\Microsoft VS Code\\Code.exe",
            ],
            "vscode-insiders" => &[
                "$LOCALAPPDATA\\Programs\\Microsoft VS Code Insiders\\Code - Insiders.exe",
            ],
            "cursor" => &[
                "$LOCALAPPDATA\\Programs\\cursor\\Cursor.exe",
                "$USERPROFILE\\AppData\\Local\\cursor\\cursor.exe",
                "C:\\Program Files\\cursor\\cursor.exe",
            ],
            "windsurf" => &["$LOCALAPPDATA\\Programs\\Windsurf\\Windsurf.exe"],
            "zed" => &["$LOCALAPPDATA\\Programs\\Zed\\Zed.exe"],
            "sublime" => &["C:\\Program Files\\Sublime Text*\\sublime_text.exe"],
            "android-studio" => &[
                "C:\\Program Files\\Android\\Android Studio\\bin\\studio64.exe",
                "$LOCALAPPDATA\\Programs\\Android Studio\\bin\\studio64.exe",
            ],
            "neovim" => &[
                "C:\\Program Files\\Neovim\\bin\\nvim.exe",
                "C:\\tools\\neovim\\bin\\nvim.exe",
            ],
            "vim" => &["C:\\Program Files\\Vim\\vim*\\vim.exe"],
            "windows-terminal" => &["$LOCALAPPDATA\\Microsoft\\WindowsApps\\wt.exe"],
            "chrome" => &[
                "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",
                "$LOCALAPPDATA\\Google\\Chrome\\Application\\chrome.exe",
            ],
            "firefox" => &["C:\\Program Files\\Mozilla Firefox\\firefox.exe"],
            _ => &[],
        };
        patterns.iter().map(|p| p.to_string()).collect()
    }

    fn console_command(
        &self,
        category: IdeCategory,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> LaunchCommand {
        let is_wt = program
            .file_stem()
            .map(|s| s.to_string_lossy().eq_ignore_ascii_case("wt"))
            .unwrap_or(false);
        if category.is_console() && !is_wt {
            if let Some(wt) = self.find_windows_terminal() {
                return LaunchCommand::new(wt)
                    .arg("-d")
                    .arg(cwd.to_string_lossy())
                    .arg(program.to_string_lossy())
                    .args(args.iter().cloned());
            }
            return LaunchCommand::new("cmd")
                .args(["/C", "start", "", "/D"])
                .arg(cwd.to_string_lossy())
                .arg(program.to_string_lossy())
                .args(args.iter().cloned())
                .current_dir(cwd);
        }
        LaunchCommand::new(program)
            .args(args.iter().cloned())
            .current_dir(cwd)
    }

    fn derive_icon(&self, executable: &Path) -> Option<PathBuf> {
        sibling_icon(executable)
    }

    fn file_manager_command(&self, path: &Path) -> LaunchCommand {
        LaunchCommand::new("explorer").arg(path.to_string_lossy())
    }

    fn terminal_command(&self, path: &Path) -> Result<LaunchCommand> {
        let dir = path.to_string_lossy().to_string();
        Ok(match self.find_windows_terminal() {
            Some(wt) => LaunchCommand::new(wt).arg("-d").arg(dir),
            None => LaunchCommand::new("cmd")
                .args(["/C", "start", "cmd", "/K"])
                .arg(format!("cd /d \"{}\"", dir))
                .current_dir(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jetbrains_locations_use_64bit_launchers() {
        let locations = WindowsPlatform.install_locations("intellij");
        assert!(locations.iter().all(|l| l.ends_with("idea64.exe")));
        assert!(locations.iter().any(|l| l.starts_with("$LOCALAPPDATA")));
    }

    #[test]
    fn test_gui_tools_are_not_wrapped() {
        let command = WindowsPlatform.console_command(
            IdeCategory::Gui,
            Path::new("C:\\Code\\Code.exe"),
            &["C:\\work".to_string()],
            Path::new("C:\\work"),
        );
        assert_eq!(command.program, PathBuf::from("C:\\Code\\Code.exe"));
        assert_eq!(command.args, vec!["C:\\work"]);
    }
}
