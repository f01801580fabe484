// System integration commands
// Reveal a path in the file manager or open a terminal there

use std::path::{Path, PathBuf};

use super::AppState;
use crate::services::launcher::spawn_detached;
use crate::utils::error::{DevNestError, Result};

pub async fn open_in_file_manager(state: &AppState, path: &str) -> Result<()> {
    let target = existing_path(path)?;
    let command = state.platform.file_manager_command(&target);
    log::info!("[System] Revealing {}", target.display());
    spawn_detached(&command).await
}

/// Open a terminal in `path`, or in its parent when `path` is a file
pub async fn open_in_terminal(state: &AppState, path: &str) -> Result<()> {
    let target = existing_path(path)?;
    let dir = if target.is_dir() {
        target
    } else {
        target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(target)
    };
    let command = state.platform.terminal_command(&dir)?;
    log::info!("[System] Opening terminal in {}", dir.display());
    spawn_detached(&command).await
}

fn existing_path(path: &str) -> Result<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(DevNestError::InvalidInput("path must not be empty".to_string()));
    }
    let target = PathBuf::from(trimmed);
    std::fs::metadata(&target).map_err(|e| DevNestError::io(&target, e))?;
    Ok(target)
}
