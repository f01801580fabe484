// macOS platform
// Application bundles, Terminal.app hosting and bundle icons

use std::path::{Path, PathBuf};

use super::{sibling_icon, LaunchCommand, Platform};
use crate::models::ide::IdeCategory;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct MacPlatform;

/// The enclosing `.app` bundle of an executable
pub fn app_bundle(executable: &Path) -> Option<PathBuf> {
    executable
        .ancestors()
        .find(|p| p.extension().map(|e| e == "app").unwrap_or(false))
        .map(Path::to_path_buf)
}

/// AppleScript that runs a command in a new Terminal window
pub fn terminal_script(program: &Path, args: &[String], cwd: &Path) -> String {
    let mut words = vec![program.to_string_lossy().to_string()];
    words.extend(args.iter().cloned());
    let command = shlex::try_join(words.iter().map(String::as_str))
        .unwrap_or_else(|_| words.join(" "));
    let cwd = cwd.to_string_lossy().to_string();
    let cd = shlex::try_quote(&cwd)
        .map(|q| q.to_string())
        .unwrap_or(cwd.clone());
    let shell_line = format!("cd {} && {}", cd, command);
    format!(
        "tell application \"Terminal\" to do script \"{}\"",
        shell_line.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

impl Platform for MacPlatform {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn install_locations(&self, family_id: &str) -> Vec<String> {
        let apps: &[(&str, &str)] = match family_id {
            "vscode" => &[("Visual Studio Code.app", "Contents/Resources/app/bin/code")],
            "vscode-insiders" => &[(
                "Visual Studio Code - Insiders.app",
                "Contents/Resources/app/bin/code-insiders",
            )],
            "cursor" => &[("Cursor.app", "Contents/Resources/app/bin/cursor")],
            "windsurf" => &[("Windsurf.app", "Contents/Resources/app/bin/windsurf")],
            "zed" => &[("Zed.app", "Contents/MacOS/cli")],
            "sublime" => &[("Sublime Text.app", "Contents/SharedSupport/bin/subl")],
            "webstorm" => &[("WebStorm.app", "Contents/MacOS/webstorm")],
            "intellij" => &[
                ("IntelliJ IDEA.app", "Contents/MacOS/idea"),
                ("IntelliJ IDEA CE.app", "Contents/MacOS/idea"),
            ],
            "pycharm" => &[
                ("PyCharm.app", "Contents/MacOS/pycharm"),
                ("PyCharm CE.app", "Contents/MacOS/pycharm"),
            ],
            "clion" => &[("CLion.app", "Contents/MacOS/clion")],
            "goland" => &[("GoLand.app", "Contents/MacOS/goland")],
            "rider" => &[("Rider.app", "Contents/MacOS/rider")],
            "rustrover" => &[("RustRover.app", "Contents/MacOS/rustrover")],
            "fleet" => &[("Fleet.app", "Contents/MacOS/Fleet")],
            "android-studio" => &[("Android Studio.app", "Contents/MacOS/studio")],
            "emacs" => &[("Emacs.app", "Contents/MacOS/Emacs")],
            "iterm" => &[("iTerm.app", "Contents/MacOS/iTerm2")],
            "alacritty" => &[("Alacritty.app", "Contents/MacOS/alacritty")],
            "kitty" => &[("kitty.app", "Contents/MacOS/kitty")],
            "wezterm" => &[("WezTerm.app", "Contents/MacOS/wezterm")],
            "chrome" => &[("Google Chrome.app", "Contents/MacOS/Google Chrome")],
            "firefox" => &[("Firefox.app", "Contents/MacOS/firefox")],
            _ => &[],
        };

        let mut locations = Vec::new();
        for (bundle, binary) in apps {
            locations.push(format!("/Applications/{}/{}", bundle, binary));
            locations.push(format!("~/Applications/{}/{}", bundle, binary));
        }
        if family_id == "claude" {
            locations.push("~/.claude/local/claude".to_string());
        }
        locations
    }

    fn console_command(
        &self,
        category: IdeCategory,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> LaunchCommand {
        match category {
            IdeCategory::Cli => LaunchCommand::new("osascript")
                .arg("-e")
                .arg(terminal_script(program, args, cwd)),
            // Terminal apps open a window themselves when their bundle is opened on a folder
            _ => match app_bundle(program) {
                Some(bundle) => LaunchCommand::new("open")
                    .arg("-a")
                    .arg(bundle.to_string_lossy())
                    .arg(cwd.to_string_lossy()),
                None => LaunchCommand::new(program)
                    .args(args.iter().cloned())
                    .current_dir(cwd),
            },
        }
    }

    fn derive_icon(&self, executable: &Path) -> Option<PathBuf> {
        let Some(bundle) = app_bundle(executable) else {
            return sibling_icon(executable);
        };
        let resources = bundle.join("Contents/Resources");
        let mut icons: Vec<PathBuf> = std::fs::read_dir(&resources)
            .ok()?
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().map(|e| e == "icns").unwrap_or(false))
            .collect();
        icons.sort();

        // Prefer the icon named after the bundle, then the conventional names
        let bundle_stem = bundle.file_stem()?.to_string_lossy().to_string();
        let preferred = [bundle_stem.as_str(), "AppIcon", "app", "Code"];
        preferred
            .iter()
            .find_map(|name| {
                icons
                    .iter()
                    .find(|p| p.file_stem().map(|s| s == *name).unwrap_or(false))
                    .cloned()
            })
            .or_else(|| icons.into_iter().next())
    }

    fn file_manager_command(&self, path: &Path) -> LaunchCommand {
        LaunchCommand::new("open").arg(path.to_string_lossy())
    }

    fn terminal_command(&self, path: &Path) -> Result<LaunchCommand> {
        Ok(LaunchCommand::new("open")
            .args(["-a", "Terminal"])
            .arg(path.to_string_lossy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_app_bundle() {
        let exe = Path::new("/Applications/Visual Studio Code.app/Contents/Resources/app/bin/code");
        assert_eq!(
            app_bundle(exe),
            Some(PathBuf::from("/Applications/Visual Studio Code.app"))
        );
        assert_eq!(app_bundle(Path::new("/usr/local/bin/nvim")), None);
    }

    #[test]
    fn test_terminal_script_quotes_paths() {
        let script = terminal_script(
            Path::new("/usr/local/bin/nvim"),
            &["/Users/me/My Project".to_string()],
            Path::new("/Users/me/My Project"),
        );
        assert!(script.starts_with("tell application \"Terminal\" to do script"));
        assert!(script.contains("nvim"));
        assert!(script.contains("My Project"));
    }

    #[test]
    fn test_bundle_icon_lookup() {
        let dir = tempdir().unwrap();
        let bundle = dir.path().join("Lapce.app");
        std::fs::create_dir_all(bundle.join("Contents/MacOS")).unwrap();
        std::fs::create_dir_all(bundle.join("Contents/Resources")).unwrap();
        std::fs::write(bundle.join("Contents/Resources/Document.icns"), "x").unwrap();
        std::fs::write(bundle.join("Contents/Resources/Lapce.icns"), "x").unwrap();

        let icon = MacPlatform
            .derive_icon(&bundle.join("Contents/MacOS/lapce"))
            .unwrap();
        assert_eq!(icon, bundle.join("Contents/Resources/Lapce.icns"));
    }

    #[test]
    fn test_install_locations_cover_user_applications() {
        let locations = MacPlatform.install_locations("cursor");
        assert!(locations.iter().any(|l| l.starts_with("~/Applications/")));
        assert!(MacPlatform.install_locations("unknown").is_empty());
    }
}
