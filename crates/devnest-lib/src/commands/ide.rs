// IDE catalog commands
// Manual entries, host detection and icons

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::AppState;
use crate::models::{IdeConfig, IdeForm};
use crate::repositories::{IdeRepository, ProjectRepository};
use crate::services::detector::{self, DetectedIde};
use crate::services::icon;
use crate::services::ide_catalog::{ide_from_form, normalize_executable};
use crate::services::platform::Platform;
use crate::utils::error::{DevNestError, Result};

/// Catalog ordered by priority; missing icons are filled from the icon cache
pub async fn get_ides(state: &AppState) -> Result<Vec<IdeConfig>> {
    let cache_dir = state.config.icon_cache_dir();
    let mut ides = state.ides().list()?;
    for ide in ides.iter_mut().filter(|ide| ide.icon.is_none()) {
        ide.icon = icon::load_cached_icon(&cache_dir, &ide.id, state.config.max_icon_bytes);
    }
    Ok(ides)
}

/// Add a user-defined catalog entry
pub async fn add_ide(state: &AppState, form: IdeForm) -> Result<IdeConfig> {
    let ide = ide_from_form(form)?;
    state.db.with_transaction(|conn| {
        if IdeRepository::get_in(conn, &ide.id)?.is_some() {
            return Err(DevNestError::InvalidInput(format!(
                "IDE id already exists: {}",
                ide.id
            )));
        }
        IdeRepository::save_in(conn, &ide)
    })?;
    log::info!("[Detector] Added IDE {} ({})", ide.name, ide.executable);
    Ok(ide)
}

/// Remove a catalog entry and forget it in every project's preferences
pub async fn remove_ide(state: &AppState, ide_id: &str) -> Result<()> {
    let stripped = state.db.with_transaction(|conn| {
        if !IdeRepository::delete_in(conn, ide_id)? {
            return Err(DevNestError::ide_not_found(ide_id));
        }
        ProjectRepository::strip_ide_preference_in(conn, ide_id)
    })?;
    icon::remove_cached_icon(&state.config.icon_cache_dir(), ide_id);
    log::info!(
        "[Detector] Removed IDE {} (preferences updated on {} projects)",
        ide_id,
        stripped
    );
    Ok(())
}

/// Propose entries for installed tools that are not cataloged yet
pub async fn scan_ides(state: &AppState) -> Result<Vec<IdeConfig>> {
    let detected = run_detection(state).await?;
    let platform = state.platform.clone();
    let max_icon_bytes = state.config.max_icon_bytes;
    Ok(detected
        .into_iter()
        .map(|found| {
            let mut ide = found.ide.clone();
            ide.icon = icon_source(platform.as_ref(), &found)
                .and_then(|source| icon_data_url(&source, max_icon_bytes));
            ide
        })
        .collect())
}

/// Detect and catalog new tools; returns only what was added
pub async fn add_detected_ides(state: &AppState) -> Result<Vec<IdeConfig>> {
    let detected = run_detection(state).await?;

    // Re-check against the catalog as it is now, another caller may have won
    let added: Vec<DetectedIde> = state.db.with_transaction(|conn| {
        let catalog = IdeRepository::list_in(conn)?;
        let mut ids: HashSet<String> = catalog.iter().map(|i| i.id.clone()).collect();
        let mut executables: HashSet<String> = catalog
            .iter()
            .map(|i| normalize_executable(&i.executable))
            .collect();

        let mut added = Vec::new();
        for found in detected {
            let executable = normalize_executable(&found.ide.executable);
            if ids.contains(&found.ide.id) || executables.contains(&executable) {
                continue;
            }
            IdeRepository::save_in(conn, &found.ide)?;
            ids.insert(found.ide.id.clone());
            executables.insert(executable);
            added.push(found);
        }
        Ok(added)
    })?;

    let cache_dir = state.config.icon_cache_dir();
    let mut result = Vec::with_capacity(added.len());
    for found in added {
        let mut ide = found.ide.clone();
        if let Some(source) = icon_source(state.platform.as_ref(), &found) {
            match icon::cache_icon_file(&cache_dir, &ide.id, &source) {
                Ok(_) => {
                    ide.icon =
                        icon::load_cached_icon(&cache_dir, &ide.id, state.config.max_icon_bytes)
                }
                Err(e) => log::warn!("[Detector] Icon for {} not cached: {}", ide.id, e),
            }
        }
        result.push(ide);
    }

    log::info!("[Detector] Added {} detected IDEs", result.len());
    Ok(result)
}

/// Replace an entry's icon with an image file or the icon of an executable
pub async fn set_ide_icon_from_file(
    state: &AppState,
    ide_id: &str,
    file_path: &str,
) -> Result<IdeConfig> {
    if state.ides().get(ide_id)?.is_none() {
        return Err(DevNestError::ide_not_found(ide_id));
    }

    let source = PathBuf::from(file_path.trim());
    let data_url = icon::icon_from_source(
        state.platform.as_ref(),
        &source,
        state.config.max_icon_bytes,
    )?;

    state.db.with_transaction(|conn| {
        let mut ide =
            IdeRepository::get_in(conn, ide_id)?.ok_or_else(|| DevNestError::ide_not_found(ide_id))?;
        ide.icon = Some(data_url);
        IdeRepository::save_in(conn, &ide)?;
        Ok(ide)
    })
}

async fn run_detection(state: &AppState) -> Result<Vec<DetectedIde>> {
    let catalog = state.ides().list()?;
    let platform = state.platform.clone();
    let detected =
        tokio::task::spawn_blocking(move || detector::detect(platform.as_ref(), &catalog))
            .await?;
    Ok(detected)
}

/// Advertised icon first, then whatever the platform derives from the executable
fn icon_source(platform: &dyn Platform, found: &DetectedIde) -> Option<PathBuf> {
    found
        .icon_source
        .clone()
        .or_else(|| platform.derive_icon(Path::new(&found.ide.executable)))
}

fn icon_data_url(source: &Path, max_bytes: u64) -> Option<String> {
    match icon::icon_data_url_from_file(source, max_bytes) {
        Ok(url) => Some(url),
        Err(e) => {
            log::debug!("[Detector] Ignoring icon {}: {}", source.display(), e);
            None
        }
    }
}
