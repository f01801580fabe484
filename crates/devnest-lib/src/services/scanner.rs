// Directory Scanner
// Bounded-depth discovery of project directories under a root

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::classifier;
use crate::models::project::{Project, ProjectType};
use crate::repositories::ProjectRepository;
use crate::utils::config::normalize_path_for_display;
use crate::utils::database::Database;
use crate::utils::error::{DevNestError, Result};

/// Directories never descended into by the scanner or the statistics engine
pub const NOISE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "target",
    "dist",
    "build",
    "out",
    "bin",
    "obj",
    ".venv",
    "venv",
    "__pycache__",
    ".idea",
    ".vscode",
    ".next",
    ".nuxt",
    ".cache",
    ".gradle",
    ".turbo",
    ".pytest_cache",
    "vendor",
];

pub fn is_noise_dir(name: &str) -> bool {
    NOISE_DIRS.contains(&name)
}

/// Cancellation handle shared between a running scan and its caller
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Ids of projects created or updated, in traversal order
    pub project_ids: Vec<String>,
    /// Subdirectories that could not be read
    pub skipped_directories: usize,
    pub cancelled: bool,
}

/// A directory selected for registration
#[derive(Debug, Clone)]
struct Candidate {
    path: PathBuf,
    project_type: ProjectType,
}

/// Scan `root` down to `max_depth` levels and upsert every candidate project.
///
/// The root sits at depth 0 and may itself be a project. Each candidate is
/// committed in its own transaction, so a cancelled scan leaves every project
/// either fully written or untouched.
pub fn scan(db: &Database, root: &Path, max_depth: u8, cancel: &CancelFlag) -> Result<ScanOutcome> {
    if root.as_os_str().is_empty() || root.to_string_lossy().trim().is_empty() {
        return Err(DevNestError::InvalidInput("rootPath must not be empty".to_string()));
    }
    if max_depth == 0 {
        return Err(DevNestError::InvalidInput(
            "maxDepth must be at least 1".to_string(),
        ));
    }

    let metadata = fs::metadata(root).map_err(|e| DevNestError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(DevNestError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    log::info!(
        "[Scanner] Scanning {} (max depth {})",
        root.display(),
        max_depth
    );

    let mut outcome = ScanOutcome::default();
    let candidates = collect_candidates(root, max_depth, cancel, &mut outcome)?;

    if outcome.cancelled {
        log::info!("[Scanner] Cancelled during traversal, nothing committed");
        return Ok(outcome);
    }

    for candidate in candidates {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            log::info!(
                "[Scanner] Cancelled after committing {} projects",
                outcome.project_ids.len()
            );
            return Ok(outcome);
        }

        match upsert_candidate(db, &candidate) {
            Ok(id) => outcome.project_ids.push(id),
            Err(DevNestError::Io { path, source }) => {
                // Vanished between traversal and commit
                log::warn!("[Scanner] Skipping {}: {}", path.display(), source);
                outcome.skipped_directories += 1;
            }
            Err(e) => return Err(e),
        }
    }

    log::info!(
        "[Scanner] Scan of {} finished: {} projects, {} skipped directories",
        root.display(),
        outcome.project_ids.len(),
        outcome.skipped_directories
    );
    Ok(outcome)
}

/// Depth-first traversal; children are visited in name order
fn collect_candidates(
    root: &Path,
    max_depth: u8,
    cancel: &CancelFlag,
    outcome: &mut ScanOutcome,
) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();
    let mut stack: Vec<(PathBuf, u8)> = vec![(root.to_path_buf(), 0)];

    while let Some((dir, depth)) = stack.pop() {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }

        let entries = match read_entries(&dir) {
            Ok(entries) => entries,
            Err(e) if depth == 0 => return Err(DevNestError::io(&dir, e)),
            Err(e) => {
                log::warn!("[Scanner] Cannot read {}: {}", dir.display(), e);
                outcome.skipped_directories += 1;
                continue;
            }
        };

        let markers: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        let project_type = classifier::classify(&markers);
        if classifier::is_candidate(project_type, &markers) {
            log::debug!(
                "[Scanner] Candidate {} ({})",
                dir.display(),
                project_type
            );
            candidates.push(Candidate {
                path: dir,
                project_type,
            });
            continue;
        }

        if depth >= max_depth {
            continue;
        }

        // Reverse so the stack pops in ascending name order
        for entry in entries.iter().rev() {
            if entry.is_dir && !is_noise_dir(&entry.name) {
                stack.push((dir.join(&entry.name), depth + 1));
            }
        }
    }

    Ok(candidates)
}

struct DirEntryInfo {
    name: String,
    /// Real directory; symlinks are reported as false
    is_dir: bool,
}

fn read_entries(dir: &Path) -> std::io::Result<Vec<DirEntryInfo>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("[Scanner] Bad entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Classify a single directory by its immediate entries
pub fn classify_dir(dir: &Path) -> Result<ProjectType> {
    let entries = read_entries(dir).map_err(|e| DevNestError::io(dir, e))?;
    let markers: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    Ok(classifier::classify(&markers))
}

/// Canonical, display-friendly form of a directory path
pub fn canonical_path_string(path: &Path) -> Result<String> {
    let canonical = path.canonicalize().map_err(|e| DevNestError::io(path, e))?;
    Ok(normalize_path_for_display(&canonical))
}

/// Directory mtime as RFC 3339, if the platform reports one
pub fn modified_time(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(chrono::DateTime::<chrono::Utc>::from(modified).to_rfc3339())
}

/// Final path segment used as the default project name
pub fn default_project_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "untitled".to_string())
}

fn upsert_candidate(db: &Database, candidate: &Candidate) -> Result<String> {
    let path = canonical_path_string(&candidate.path)?;
    let last_modified = modified_time(&candidate.path);

    db.with_transaction(|conn| {
        let project = match ProjectRepository::find_by_path_in(conn, &path)? {
            Some(mut existing) => {
                existing.project_type = candidate.project_type;
                existing.last_modified = last_modified.clone();
                existing
            }
            None => {
                let mut project = Project::new(
                    path.clone(),
                    default_project_name(&candidate.path),
                    candidate.project_type,
                );
                project.last_modified = last_modified.clone();
                project.display_order = ProjectRepository::next_display_order_in(conn)?;
                log::info!("[Scanner] Registered {} as {}", path, project.project_type);
                project
            }
        };
        ProjectRepository::save_in(conn, &project)?;
        Ok(project.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_noise_dirs_are_not_descended() {
        let (_db_dir, db) = setup();
        let root = tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("node_modules/lib")).unwrap();
        std::fs::write(root.path().join("node_modules/lib/package.json"), "{}").unwrap();

        let outcome = scan(&db, root.path(), 3, &CancelFlag::new()).unwrap();
        assert!(outcome.project_ids.is_empty());
    }

    #[test]
    fn test_projects_are_not_searched_for_subprojects() {
        let (_db_dir, db) = setup();
        let root = tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("mono/packages/web")).unwrap();
        std::fs::write(root.path().join("mono/package.json"), "{}").unwrap();
        std::fs::write(root.path().join("mono/packages/web/package.json"), "{}").unwrap();

        let outcome = scan(&db, root.path(), 4, &CancelFlag::new()).unwrap();
        assert_eq!(outcome.project_ids.len(), 1);
    }

    #[test]
    fn test_depth_bound() {
        let (_db_dir, db) = setup();
        let root = tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("a/b/deep")).unwrap();
        std::fs::write(root.path().join("a/b/deep/go.mod"), "module x").unwrap();

        assert!(scan(&db, root.path(), 2, &CancelFlag::new())
            .unwrap()
            .project_ids
            .is_empty());
        assert_eq!(
            scan(&db, root.path(), 3, &CancelFlag::new())
                .unwrap()
                .project_ids
                .len(),
            1
        );
    }

    #[test]
    fn test_root_can_be_a_project() {
        let (_db_dir, db) = setup();
        let root = tempdir().unwrap();
        std::fs::write(root.path().join("Cargo.toml"), "[package]").unwrap();

        let outcome = scan(&db, root.path(), 1, &CancelFlag::new()).unwrap();
        assert_eq!(outcome.project_ids.len(), 1);
    }

    #[test]
    fn test_vcs_root_registered_as_generic() {
        let (_db_dir, db) = setup();
        let root = tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("notes/.git")).unwrap();
        std::fs::create_dir_all(root.path().join("empty")).unwrap();

        let outcome = scan(&db, root.path(), 2, &CancelFlag::new()).unwrap();
        assert_eq!(outcome.project_ids.len(), 1);
        let project = ProjectRepository::new(db)
            .get(&outcome.project_ids[0])
            .unwrap()
            .unwrap();
        assert_eq!(project.project_type, ProjectType::Generic);
        assert_eq!(project.name, "notes");
    }

    #[test]
    fn test_invalid_input() {
        let (_db_dir, db) = setup();
        let root = tempdir().unwrap();

        assert!(matches!(
            scan(&db, root.path(), 0, &CancelFlag::new()),
            Err(DevNestError::InvalidInput(_))
        ));
        assert!(matches!(
            scan(&db, Path::new(""), 2, &CancelFlag::new()),
            Err(DevNestError::InvalidInput(_))
        ));
        assert!(matches!(
            scan(&db, &root.path().join("missing"), 2, &CancelFlag::new()),
            Err(DevNestError::Io { .. })
        ));
    }

    #[test]
    fn test_cancelled_scan_commits_nothing() {
        let (_db_dir, db) = setup();
        let root = tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("p")).unwrap();
        std::fs::write(root.path().join("p/go.mod"), "module p").unwrap();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let outcome = scan(&db, root.path(), 2, &cancel).unwrap();

        assert!(outcome.cancelled);
        assert!(outcome.project_ids.is_empty());
        assert!(ProjectRepository::new(db).list().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dirs_are_not_followed() {
        let (_db_dir, db) = setup();
        let root = tempdir().unwrap();
        let outside = tempdir().unwrap();
        std::fs::write(outside.path().join("Cargo.toml"), "[package]").unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("link")).unwrap();

        let outcome = scan(&db, root.path(), 3, &CancelFlag::new()).unwrap();
        assert!(outcome.project_ids.is_empty());
    }
}
