// Platform capabilities
// One implementation per host OS, selected once at startup

pub mod linux;
pub mod macos;
pub mod windows;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::ide::IdeCategory;
use crate::utils::error::Result;
use crate::utils::path_resolver;

pub use linux::LinuxPlatform;
pub use macos::MacPlatform;
pub use windows::WindowsPlatform;

/// Image extensions accepted as icons
pub const ICON_EXTENSIONS: &[&str] = &["png", "svg", "ico", "jpg", "jpeg", "webp", "icns"];

/// A fully resolved process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl LaunchCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

/// A tool advertised by the host outside the known family table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTool {
    pub name: Option<String>,
    pub executable: PathBuf,
    pub icon: Option<PathBuf>,
}

/// OS integration used by detection, launching and reveal actions
pub trait Platform: Send + Sync {
    fn name(&self) -> &'static str;

    /// Install location patterns for a family; may contain `~`, `$VAR` and `*`
    fn install_locations(&self, family_id: &str) -> Vec<String>;

    /// Tools the host advertises beyond the family table
    fn discover_extra_tools(&self) -> Vec<DiscoveredTool> {
        Vec::new()
    }

    /// Resolve a bare command name
    fn find_command(&self, name: &str) -> Option<PathBuf> {
        path_resolver::find_tool(name)
    }

    /// Command that hosts a console tool detached from the caller
    fn console_command(
        &self,
        category: IdeCategory,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> LaunchCommand {
        let _ = category;
        LaunchCommand::new(program).args(args.iter().cloned()).current_dir(cwd)
    }

    /// Icon image for an executable, if one can be found
    fn derive_icon(&self, executable: &Path) -> Option<PathBuf> {
        sibling_icon(executable)
    }

    fn file_manager_command(&self, path: &Path) -> LaunchCommand;

    fn terminal_command(&self, path: &Path) -> Result<LaunchCommand>;
}

/// Platform implementation for the running host
pub fn current() -> Arc<dyn Platform> {
    #[cfg(target_os = "macos")]
    {
        Arc::new(MacPlatform)
    }
    #[cfg(target_os = "windows")]
    {
        Arc::new(WindowsPlatform)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        Arc::new(LinuxPlatform::default())
    }
}

pub fn is_icon_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ICON_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image next to the executable named after it (`bin/idea.png`, `../idea.svg`, ...)
pub fn sibling_icon(executable: &Path) -> Option<PathBuf> {
    let stem = executable.file_stem()?.to_string_lossy().to_string();
    let trimmed = stem.strip_suffix("64").unwrap_or(&stem).to_string();
    let dir = executable.parent()?;

    let mut dirs = vec![dir.to_path_buf(), dir.join("resources")];
    if let Some(parent) = dir.parent() {
        dirs.push(parent.to_path_buf());
    }

    for dir in dirs {
        for name in [&stem, &trimmed] {
            for ext in ICON_EXTENSIONS {
                let candidate = dir.join(format!("{}.{}", name, ext));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
    }
    None
}
