// Application configuration
// App identifier, data directory layout and engine limits

use std::path::{Path, PathBuf};

use super::error::{DevNestError, Result};

/// App identifier used for the data directory name
#[cfg(target_os = "macos")]
pub const APP_IDENTIFIER: &str = "com.devnest.DevNest-macOS";

#[cfg(not(target_os = "macos"))]
pub const APP_IDENTIFIER: &str = "com.devnest.DevNest";

/// Database file name
#[cfg(debug_assertions)]
pub const DATABASE_FILE: &str = "devnest-dev.db";

#[cfg(not(debug_assertions))]
pub const DATABASE_FILE: &str = "devnest.db";

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "DEVNEST_DATA_DIR";

/// Directory (inside the data dir) holding cached IDE icons
pub const ICON_CACHE_DIR: &str = "ide-icons";

pub const DEFAULT_SCAN_DEPTH: u8 = 3;
pub const MAX_SCAN_DEPTH: u8 = 8;
pub const MAX_ICON_BYTES: u64 = 2 * 1024 * 1024; // 2 MB
pub const MAX_STATS_FILE_BYTES: u64 = 5 * 1024 * 1024; // 5 MB

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
    pub default_scan_depth: u8,
    pub max_scan_depth: u8,
    pub max_icon_bytes: u64,
    pub max_stats_file_bytes: u64,
}

impl AppConfig {
    /// Build a config rooted at `data_dir` with default limits
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            database_file: DATABASE_FILE.to_string(),
            default_scan_depth: DEFAULT_SCAN_DEPTH,
            max_scan_depth: MAX_SCAN_DEPTH,
            max_icon_bytes: MAX_ICON_BYTES,
            max_stats_file_bytes: MAX_STATS_FILE_BYTES,
        }
    }

    /// Load config from the environment, falling back to the platform data dir
    pub fn from_env() -> Result<Self> {
        let data_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => get_app_data_dir()?,
        };
        Ok(Self::with_data_dir(data_dir))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn icon_cache_dir(&self) -> PathBuf {
        self.data_dir.join(ICON_CACHE_DIR)
    }

    /// Validate a requested scan depth, clamping values above the cap
    pub fn effective_scan_depth(&self, requested: Option<u8>) -> Result<u8> {
        let depth = requested.unwrap_or(self.default_scan_depth);
        if depth == 0 {
            return Err(DevNestError::InvalidInput(
                "maxDepth must be at least 1".to_string(),
            ));
        }
        if depth > self.max_scan_depth {
            log::warn!(
                "[Config] Scan depth {} exceeds cap, clamping to {}",
                depth,
                self.max_scan_depth
            );
            return Ok(self.max_scan_depth);
        }
        Ok(depth)
    }
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|p| p.join(APP_IDENTIFIER))
        .ok_or_else(|| {
            DevNestError::InvalidInput(
                "Could not determine application data directory".to_string(),
            )
        })
}

/// Strip the Windows verbatim prefix so stored paths stay readable
#[cfg(target_os = "windows")]
pub fn normalize_path_for_display(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if let Some(rest) = raw.strip_prefix(r"\\?\UNC\") {
        return format!(r"\\{}", rest);
    }
    if let Some(rest) = raw.strip_prefix(r"\\?\") {
        return rest.to_string();
    }
    raw.to_string()
}

#[cfg(not(target_os = "windows"))]
pub fn normalize_path_for_display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_rooted_in_data_dir() {
        let config = AppConfig::with_data_dir("/tmp/devnest-test");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/devnest-test").join(DATABASE_FILE)
        );
        assert!(config.icon_cache_dir().ends_with(ICON_CACHE_DIR));
    }

    #[test]
    fn test_scan_depth_validation() {
        let config = AppConfig::with_data_dir("/tmp/devnest-test");
        assert_eq!(config.effective_scan_depth(None).unwrap(), DEFAULT_SCAN_DEPTH);
        assert_eq!(config.effective_scan_depth(Some(2)).unwrap(), 2);
        assert_eq!(config.effective_scan_depth(Some(200)).unwrap(), MAX_SCAN_DEPTH);
        assert!(matches!(
            config.effective_scan_depth(Some(0)),
            Err(DevNestError::InvalidInput(_))
        ));
    }
}
