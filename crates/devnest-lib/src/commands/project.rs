// Project management commands
// Registry reads, scans, per-project edits and language statistics

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppState;
use crate::models::{LanguageStats, NewProjectInput, Project, ScanProjectsResponse};
use crate::repositories::{IdeRepository, ProjectRepository};
use crate::services::language_stats;
use crate::services::preferences::PreferenceList;
use crate::services::scanner::{self, CancelFlag};
use crate::utils::error::{DevNestError, Result};

/// Get all registered projects: favorites first, then display order, then name
pub async fn get_projects(state: &AppState) -> Result<Vec<Project>> {
    state.projects().list()
}

/// Scan a directory tree and register every project found
pub async fn scan_projects(
    state: &AppState,
    root_path: &str,
    max_depth: Option<u8>,
) -> Result<ScanProjectsResponse> {
    scan_projects_with_cancel(state, root_path, max_depth, CancelFlag::new()).await
}

/// Same as [`scan_projects`], abandonable through `cancel`
pub async fn scan_projects_with_cancel(
    state: &AppState,
    root_path: &str,
    max_depth: Option<u8>,
    cancel: CancelFlag,
) -> Result<ScanProjectsResponse> {
    let root_path = root_path.trim();
    if root_path.is_empty() {
        return Err(DevNestError::InvalidInput(
            "rootPath must not be empty".to_string(),
        ));
    }
    let depth = state.config.effective_scan_depth(max_depth)?;

    let db = state.db.clone();
    let root = PathBuf::from(root_path);
    let outcome =
        tokio::task::spawn_blocking(move || scanner::scan(&db, &root, depth, &cancel)).await??;

    let repo = state.projects();
    let mut projects = Vec::with_capacity(outcome.project_ids.len());
    for id in &outcome.project_ids {
        if let Some(project) = repo.get(id)? {
            projects.push(project);
        }
    }

    Ok(ScanProjectsResponse {
        projects,
        skipped_directories: outcome.skipped_directories,
        cancelled: outcome.cancelled,
    })
}

/// Register a single directory by hand
pub async fn add_project(state: &AppState, input: NewProjectInput) -> Result<Project> {
    let raw_path = input.path.trim();
    if raw_path.is_empty() {
        return Err(DevNestError::InvalidInput("path must not be empty".to_string()));
    }
    let dir = PathBuf::from(raw_path);
    let metadata = fs::metadata(&dir).map_err(|e| DevNestError::io(&dir, e))?;
    if !metadata.is_dir() {
        return Err(DevNestError::io(
            &dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let path = scanner::canonical_path_string(&dir)?;
    let project_type = match input.project_type {
        Some(project_type) => project_type,
        None => scanner::classify_dir(&dir)?,
    };
    let name = input
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| scanner::default_project_name(Path::new(&path)));

    let mut project = Project::new(path, name, project_type);
    project.tags = normalize_tags(input.tags);
    project.last_modified = scanner::modified_time(&dir);
    project.metadata.description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    state.db.with_transaction(|conn| {
        if ProjectRepository::find_by_path_in(conn, &project.path)?.is_some() {
            return Err(DevNestError::InvalidInput(format!(
                "Project already registered: {}",
                project.path
            )));
        }
        project.display_order = ProjectRepository::next_display_order_in(conn)?;
        ProjectRepository::save_in(conn, &project)
    })?;

    log::info!("[Project] Added {} ({})", project.name, project.path);
    Ok(project)
}

/// Remove a project from the registry (the directory itself is untouched)
pub async fn remove_project(state: &AppState, project_id: &str) -> Result<()> {
    let _guard = state.locks.acquire(project_id).await;
    if !state.projects().delete(project_id)? {
        return Err(DevNestError::project_not_found(project_id));
    }
    log::info!("[Project] Removed {}", project_id);
    Ok(())
}

pub async fn toggle_project_favorite(state: &AppState, project_id: &str) -> Result<Project> {
    update_project(state, project_id, |project| {
        project.favorite = !project.favorite;
        Ok(())
    })
    .await
}

/// Replace the preference list; ids missing from the catalog are dropped
pub async fn set_project_ide_preferences(
    state: &AppState,
    project_id: &str,
    ide_ids: Vec<String>,
) -> Result<Project> {
    let _guard = state.locks.acquire(project_id).await;
    state.db.with_transaction(|conn| {
        let mut project = ProjectRepository::get_in(conn, project_id)?
            .ok_or_else(|| DevNestError::project_not_found(project_id))?;
        let known: HashSet<String> = IdeRepository::list_in(conn)?
            .into_iter()
            .map(|ide| ide.id)
            .collect();

        let list = PreferenceList::from_ranked(
            ide_ids
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| known.contains(id)),
        );
        project.metadata.ide_preferences = list.into_vec();
        ProjectRepository::save_in(conn, &project)?;
        Ok(project)
    })
}

pub async fn set_project_tags(
    state: &AppState,
    project_id: &str,
    tags: Vec<String>,
) -> Result<Project> {
    update_project(state, project_id, move |project| {
        project.tags = normalize_tags(tags);
        Ok(())
    })
    .await
}

/// Assign display order by position; unlisted projects keep their relative order after
pub async fn reorder_projects(state: &AppState, project_ids: Vec<String>) -> Result<Vec<Project>> {
    state.db.with_transaction(|conn| {
        let mut current = ProjectRepository::list_in(conn)?;
        current.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        let mut ordered: Vec<Project> = Vec::with_capacity(current.len());
        for id in &project_ids {
            if ordered.iter().any(|p| &p.id == id) {
                continue;
            }
            let index = current
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| DevNestError::project_not_found(id))?;
            ordered.push(current.remove(index));
        }
        ordered.extend(current);

        for (position, project) in ordered.iter_mut().enumerate() {
            project.display_order = position as i64;
            ProjectRepository::save_in(conn, project)?;
        }
        Ok(())
    })?;
    state.projects().list()
}

/// Recompute and store language statistics for a project
pub async fn scan_project_language_stats(
    state: &AppState,
    project_id: &str,
) -> Result<LanguageStats> {
    let _guard = state.locks.acquire(project_id).await;
    let project = state
        .projects()
        .get(project_id)?
        .ok_or_else(|| DevNestError::project_not_found(project_id))?;

    let root = PathBuf::from(&project.path);
    let max_file_bytes = state.config.max_stats_file_bytes;
    let stats =
        tokio::task::spawn_blocking(move || language_stats::analyze(&root, max_file_bytes))
            .await??;

    state.db.with_transaction(|conn| {
        let mut current = ProjectRepository::get_in(conn, project_id)?
            .ok_or_else(|| DevNestError::project_not_found(project_id))?;
        current.metadata.language_stats = Some(stats.clone());
        ProjectRepository::save_in(conn, &current)
    })?;

    Ok(stats)
}

/// Last stored statistics, `None` when never computed
pub async fn get_project_language_stats(
    state: &AppState,
    project_id: &str,
) -> Result<Option<LanguageStats>> {
    let project = state
        .projects()
        .get(project_id)?
        .ok_or_else(|| DevNestError::project_not_found(project_id))?;
    Ok(project.metadata.language_stats)
}

/// Read-modify-write of one project under its lock
async fn update_project<F>(state: &AppState, project_id: &str, mutate: F) -> Result<Project>
where
    F: FnOnce(&mut Project) -> Result<()>,
{
    let _guard = state.locks.acquire(project_id).await;
    state.db.with_transaction(|conn| {
        let mut project = ProjectRepository::get_in(conn, project_id)?
            .ok_or_else(|| DevNestError::project_not_found(project_id))?;
        mutate(&mut project)?;
        ProjectRepository::save_in(conn, &project)?;
        Ok(project)
    })
}

/// Trim, drop empties and duplicates, keep first-seen order
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}
