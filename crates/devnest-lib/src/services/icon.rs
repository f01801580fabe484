// IDE icons
// Image files become base64 data URLs; detected icons are cached per IDE id

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::platform::{is_icon_file, Platform, ICON_EXTENSIONS};
use crate::utils::error::{DevNestError, Result};

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "svg" => Some("image/svg+xml"),
        "ico" => Some("image/x-icon"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "icns" => Some("image/icns"),
        _ => None,
    }
}

/// Read an image file into a `data:` URL
pub fn icon_data_url_from_file(path: &Path, max_bytes: u64) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mime = mime_for_extension(ext).ok_or_else(|| {
        DevNestError::InvalidInput(format!(
            "Unsupported icon format: {} (expected one of {})",
            path.display(),
            ICON_EXTENSIONS.join(", ")
        ))
    })?;

    let size = fs::metadata(path).map_err(|e| DevNestError::io(path, e))?.len();
    if size == 0 {
        return Err(DevNestError::InvalidInput(format!(
            "Icon file is empty: {}",
            path.display()
        )));
    }
    if size > max_bytes {
        return Err(DevNestError::InvalidInput(format!(
            "Icon file exceeds {} bytes: {}",
            max_bytes,
            path.display()
        )));
    }

    let bytes = fs::read(path).map_err(|e| DevNestError::io(path, e))?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Icon for `path`, which is either an image or an executable
pub fn icon_from_source(platform: &dyn Platform, path: &Path, max_bytes: u64) -> Result<String> {
    if !path.exists() {
        return Err(DevNestError::io(
            path,
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }
    if is_icon_file(path) {
        return icon_data_url_from_file(path, max_bytes);
    }

    let icon = platform.derive_icon(path).ok_or_else(|| {
        DevNestError::InvalidInput(format!("No icon found for {}", path.display()))
    })?;
    log::debug!(
        "[Detector] Derived icon {} for {}",
        icon.display(),
        path.display()
    );
    icon_data_url_from_file(&icon, max_bytes)
}

/// Copy an icon image into the cache as `<id>.<ext>`
pub fn cache_icon_file(cache_dir: &Path, ide_id: &str, source: &Path) -> Result<PathBuf> {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| mime_for_extension(e).is_some())
        .ok_or_else(|| {
            DevNestError::InvalidInput(format!("Unsupported icon format: {}", source.display()))
        })?
        .to_ascii_lowercase();

    fs::create_dir_all(cache_dir).map_err(|e| DevNestError::io(cache_dir, e))?;
    // Only one cached icon per id
    for old in cached_icon_candidates(cache_dir, ide_id) {
        let _ = fs::remove_file(old);
    }
    let target = cache_dir.join(format!("{}.{}", ide_id, ext));
    fs::copy(source, &target).map_err(|e| DevNestError::io(source, e))?;
    Ok(target)
}

fn cached_icon_candidates(cache_dir: &Path, ide_id: &str) -> Vec<PathBuf> {
    ICON_EXTENSIONS
        .iter()
        .map(|ext| cache_dir.join(format!("{}.{}", ide_id, ext)))
        .filter(|p| p.is_file())
        .collect()
}

/// Drop any cached icon for an IDE
pub fn remove_cached_icon(cache_dir: &Path, ide_id: &str) {
    for path in cached_icon_candidates(cache_dir, ide_id) {
        if let Err(e) = fs::remove_file(&path) {
            log::debug!("[Detector] Failed to remove {}: {}", path.display(), e);
        }
    }
}

/// Cached icon for an IDE as a data URL
pub fn load_cached_icon(cache_dir: &Path, ide_id: &str, max_bytes: u64) -> Option<String> {
    let path = cached_icon_candidates(cache_dir, ide_id).into_iter().next()?;
    match icon_data_url_from_file(&path, max_bytes) {
        Ok(url) => Some(url),
        Err(e) => {
            log::debug!("[Detector] Ignoring cached icon {}: {}", path.display(), e);
            None
        }
    }
}
