// Path resolution utilities
// GUI launches don't always inherit the shell PATH, so tools are searched manually

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::error::{DevNestError, Result};

/// Cache for resolved tool paths
static TOOL_PATH_CACHE: Lazy<RwLock<HashMap<String, PathBuf>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Extensions tried for bare command names on Windows
#[cfg(target_os = "windows")]
const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "cmd", "bat", "com"];

/// Get the home directory, preferring $HOME
pub fn get_home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    dirs::home_dir()
}

/// Directories searched for tools: PATH first, then well-known install dirs
fn get_search_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).collect())
        .unwrap_or_default();

    let home = get_home_dir().unwrap_or_default();
    let extra = [
        home.join(".local/bin"),
        home.join(".cargo/bin"),
        home.join(".volta/bin"),
        PathBuf::from("/opt/homebrew/bin"),
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/usr/bin"),
        PathBuf::from("/bin"),
        PathBuf::from("/snap/bin"),
    ];
    for dir in extra {
        if !paths.contains(&dir) {
            paths.push(dir);
        }
    }
    paths
}

/// Find a tool by name on PATH and common install dirs
pub fn find_tool(tool_name: &str) -> Option<PathBuf> {
    if let Ok(cache) = TOOL_PATH_CACHE.read() {
        if let Some(cached) = cache.get(tool_name) {
            return Some(cached.clone());
        }
    }

    let result = find_tool_uncached(tool_name);

    // Only hits are cached
    if let Some(path) = &result {
        if let Ok(mut cache) = TOOL_PATH_CACHE.write() {
            cache.insert(tool_name.to_string(), path.clone());
        }
    }

    result
}

fn find_tool_uncached(tool_name: &str) -> Option<PathBuf> {
    for dir in get_search_paths() {
        for candidate in candidate_file_names(tool_name) {
            let path = dir.join(&candidate);
            if is_executable(&path) {
                return Some(path);
            }
        }
    }
    None
}

#[cfg(target_os = "windows")]
fn candidate_file_names(tool_name: &str) -> Vec<String> {
    let mut names = vec![tool_name.to_string()];
    if Path::new(tool_name).extension().is_none() {
        names.extend(
            EXECUTABLE_EXTENSIONS
                .iter()
                .map(|ext| format!("{}.{}", tool_name, ext)),
        );
    }
    names
}

#[cfg(not(target_os = "windows"))]
fn candidate_file_names(tool_name: &str) -> Vec<String> {
    vec![tool_name.to_string()]
}

/// Check that `path` is a regular file the current user may execute
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// True when the value names a path rather than a bare command
pub fn looks_like_path(value: &str) -> bool {
    value.contains('/') || value.contains('\\') || Path::new(value).is_absolute()
}

/// Resolve a configured executable (absolute path or command name) to a runnable path
pub fn resolve_executable(executable: &str) -> Result<PathBuf> {
    let trimmed = executable.trim();
    if trimmed.is_empty() {
        return Err(DevNestError::launch_failed(
            executable,
            "executable is empty",
        ));
    }

    if looks_like_path(trimmed) {
        let path = PathBuf::from(trimmed);
        if !path.exists() {
            return Err(DevNestError::launch_failed(
                trimmed,
                std::io::Error::from(std::io::ErrorKind::NotFound).to_string(),
            ));
        }
        if !is_executable(&path) {
            return Err(DevNestError::launch_failed(
                trimmed,
                "file is not executable",
            ));
        }
        return Ok(path);
    }

    find_tool(trimmed).ok_or_else(|| {
        DevNestError::launch_failed(trimmed, "command not found on PATH")
    })
}

/// Clear the tool path cache (after installs or environment changes)
pub fn clear_cache() {
    if let Ok(mut cache) = TOOL_PATH_CACHE.write() {
        cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_looks_like_path() {
        assert!(looks_like_path("/usr/bin/code"));
        assert!(looks_like_path("C:\\Tools\\nvim.exe"));
        assert!(!looks_like_path("code"));
    }

    #[test]
    fn test_resolve_missing_path_is_launch_failure() {
        let err = resolve_executable("/definitely/not/here/editor").unwrap_err();
        assert!(matches!(err, DevNestError::LaunchFailed { .. }));
    }

    #[test]
    fn test_resolve_unknown_command_is_launch_failure() {
        let err = resolve_executable("devnest-no-such-tool-xyz").unwrap_err();
        assert!(matches!(err, DevNestError::LaunchFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_installed_after_failed_lookup_is_found() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let mut paths = vec![dir.path().to_path_buf()];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        std::env::set_var("PATH", std::env::join_paths(paths).unwrap());

        let name = "devnest-late-installed-editor";
        assert!(resolve_executable(name).is_err());

        let tool = dir.path().join(name);
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(resolve_executable(name).unwrap(), tool);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let file = dir.path().join("editor");
        std::fs::write(&file, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(resolve_executable(file.to_str().unwrap()).is_err());

        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(resolve_executable(file.to_str().unwrap()).unwrap(), file);
    }
}
