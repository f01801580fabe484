// Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use devnest_lib::commands::AppState;
use devnest_lib::services::platform::{DiscoveredTool, LaunchCommand, Platform};
use devnest_lib::{AppConfig, Result};
use tempfile::TempDir;

/// Platform whose install locations point into a scratch directory
pub struct FakePlatform {
    pub root: PathBuf,
    pub extras: Vec<DiscoveredTool>,
}

impl Platform for FakePlatform {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn install_locations(&self, family_id: &str) -> Vec<String> {
        vec![self
            .root
            .join(family_id)
            .join("bin/*")
            .to_string_lossy()
            .to_string()]
    }

    fn discover_extra_tools(&self) -> Vec<DiscoveredTool> {
        self.extras.clone()
    }

    fn find_command(&self, _name: &str) -> Option<PathBuf> {
        None
    }

    fn file_manager_command(&self, path: &Path) -> LaunchCommand {
        LaunchCommand::new("true").arg(path.to_string_lossy())
    }

    fn terminal_command(&self, path: &Path) -> Result<LaunchCommand> {
        Ok(LaunchCommand::new("true").current_dir(path))
    }
}

pub struct TestEnv {
    pub data: TempDir,
    pub work: TempDir,
    pub tools: TempDir,
    pub state: AppState,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_extras(Vec::new())
    }

    pub fn with_extras(extras: Vec<DiscoveredTool>) -> Self {
        let data = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let tools = tempfile::tempdir().unwrap();
        let platform = Arc::new(FakePlatform {
            root: tools.path().to_path_buf(),
            extras,
        });
        let config = AppConfig::with_data_dir(data.path());
        let state = AppState::open_with_platform(config, platform).unwrap();
        Self {
            data,
            work,
            tools,
            state,
        }
    }

    /// Create `work/<rel>` with the given marker files
    pub fn project_dir(&self, rel: &str, markers: &[&str]) -> PathBuf {
        let dir = self.work.path().join(rel);
        fs::create_dir_all(&dir).unwrap();
        for marker in markers {
            fs::write(dir.join(marker), "").unwrap();
        }
        dir
    }

    /// Install an executable where the fake platform looks for `family`
    pub fn install_tool(&self, family: &str, exe: &str) -> PathBuf {
        let dir = self.tools.path().join(family).join("bin");
        fs::create_dir_all(&dir).unwrap();
        write_script(&dir.join(exe), "exit 0")
    }
}

/// Write an executable shell script
pub fn write_script(path: &Path, body: &str) -> PathBuf {
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
    path.to_path_buf()
}
