// Project Repository
// Handles all database operations for registered projects

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::language_stats::LanguageStats;
use crate::models::project::{Project, ProjectMetadata, ProjectType};
use crate::utils::database::Database;
use crate::utils::error::Result;

const PROJECT_COLUMNS: &str = r#"
    id, name, path, project_type, favorite, tags, last_opened, last_modified,
    created_at, display_order, ide_preferences, description, git_url, language_stats
"#;

/// Repository for project data access
///
/// The `*_in` associated functions take a bare connection so callers can
/// compose several reads and writes inside one `Database::with_transaction`.
#[derive(Clone)]
pub struct ProjectRepository {
    db: Database,
}

impl ProjectRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List projects: favorites first, then display order, then name
    pub fn list(&self) -> Result<Vec<Project>> {
        self.db.with_connection(Self::list_in)
    }

    pub fn get(&self, id: &str) -> Result<Option<Project>> {
        self.db.with_connection(|conn| Self::get_in(conn, id))
    }

    /// Insert or update by id
    pub fn save(&self, project: &Project) -> Result<()> {
        self.db.with_connection(|conn| Self::save_in(conn, project))
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.db.with_connection(|conn| {
            let rows_affected = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
            Ok(rows_affected > 0)
        })
    }

    pub fn list_in(conn: &Connection) -> Result<Vec<Project>> {
        let sql = format!(
            "SELECT {} FROM projects ORDER BY favorite DESC, display_order ASC, name COLLATE NOCASE ASC",
            PROJECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], ProjectRow::from_row)?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?.into_project()?);
        }
        Ok(projects)
    }

    pub fn get_in(conn: &Connection, id: &str) -> Result<Option<Project>> {
        let sql = format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS);
        conn.query_row(&sql, params![id], ProjectRow::from_row)
            .optional()?
            .map(ProjectRow::into_project)
            .transpose()
    }

    pub fn find_by_path_in(conn: &Connection, path: &str) -> Result<Option<Project>> {
        let sql = format!("SELECT {} FROM projects WHERE path = ?1", PROJECT_COLUMNS);
        conn.query_row(&sql, params![path], ProjectRow::from_row)
            .optional()?
            .map(ProjectRow::into_project)
            .transpose()
    }

    pub fn save_in(conn: &Connection, project: &Project) -> Result<()> {
        let tags = serde_json::to_string(&project.tags)?;
        let preferences = serde_json::to_string(&project.metadata.ide_preferences)?;
        let language_stats = project
            .metadata
            .language_stats
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        conn.execute(
            r#"
            INSERT INTO projects
            (id, name, path, project_type, favorite, tags, last_opened, last_modified,
             created_at, display_order, ide_preferences, description, git_url, language_stats)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                path = excluded.path,
                project_type = excluded.project_type,
                favorite = excluded.favorite,
                tags = excluded.tags,
                last_opened = excluded.last_opened,
                last_modified = excluded.last_modified,
                display_order = excluded.display_order,
                ide_preferences = excluded.ide_preferences,
                description = excluded.description,
                git_url = excluded.git_url,
                language_stats = excluded.language_stats
            "#,
            params![
                project.id,
                project.name,
                project.path,
                project.project_type.as_str(),
                project.favorite as i32,
                tags,
                project.last_opened,
                project.last_modified,
                project.created_at,
                project.display_order,
                preferences,
                project.metadata.description,
                project.metadata.git_url,
                language_stats,
            ],
        )?;
        Ok(())
    }

    pub fn next_display_order_in(conn: &Connection) -> Result<i64> {
        Ok(conn.query_row(
            "SELECT COALESCE(MAX(display_order) + 1, 0) FROM projects",
            [],
            |row| row.get(0),
        )?)
    }

    /// Remove an IDE id from every project's preference list
    pub fn strip_ide_preference_in(conn: &Connection, ide_id: &str) -> Result<usize> {
        let mut updated = 0;
        for mut project in Self::list_in(conn)? {
            let before = project.metadata.ide_preferences.len();
            project.metadata.ide_preferences.retain(|id| id != ide_id);
            if project.metadata.ide_preferences.len() != before {
                let preferences = serde_json::to_string(&project.metadata.ide_preferences)?;
                conn.execute(
                    "UPDATE projects SET ide_preferences = ?1 WHERE id = ?2",
                    params![preferences, project.id],
                )?;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

/// Internal row structure for mapping database rows
struct ProjectRow {
    id: String,
    name: String,
    path: String,
    project_type: String,
    favorite: i32,
    tags: String,
    last_opened: Option<String>,
    last_modified: Option<String>,
    created_at: String,
    display_order: i64,
    ide_preferences: String,
    description: Option<String>,
    git_url: Option<String>,
    language_stats: Option<String>,
}

impl ProjectRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            path: row.get(2)?,
            project_type: row.get(3)?,
            favorite: row.get(4)?,
            tags: row.get(5)?,
            last_opened: row.get(6)?,
            last_modified: row.get(7)?,
            created_at: row.get(8)?,
            display_order: row.get(9)?,
            ide_preferences: row.get(10)?,
            description: row.get(11)?,
            git_url: row.get(12)?,
            language_stats: row.get(13)?,
        })
    }

    fn into_project(self) -> Result<Project> {
        let language_stats: Option<LanguageStats> = self
            .language_stats
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Project {
            id: self.id,
            name: self.name,
            path: self.path,
            project_type: ProjectType::from_db(&self.project_type),
            favorite: self.favorite != 0,
            tags: serde_json::from_str(&self.tags)?,
            last_opened: self.last_opened,
            last_modified: self.last_modified,
            created_at: self.created_at,
            display_order: self.display_order,
            metadata: ProjectMetadata {
                ide_preferences: serde_json::from_str(&self.ide_preferences)?,
                description: self.description,
                git_url: self.git_url,
                language_stats,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn repo() -> (tempfile::TempDir, ProjectRepository) {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        (dir, ProjectRepository::new(db))
    }

    #[test]
    fn test_save_and_get_round_trips_json_columns() {
        let (_dir, repo) = repo();
        let mut project = Project::new("/work/api".into(), "api".into(), ProjectType::Go);
        project.tags = vec!["backend".into(), "go".into()];
        project.metadata.ide_preferences = vec!["vscode".into()];
        repo.save(&project).unwrap();

        let loaded = repo.get(&project.id).unwrap().unwrap();
        assert_eq!(loaded, project);
        let by_path = repo
            .db
            .with_connection(|conn| ProjectRepository::find_by_path_in(conn, "/work/api"))
            .unwrap();
        assert_eq!(by_path.unwrap().id, project.id);
    }

    #[test]
    fn test_save_is_upsert_by_id() {
        let (_dir, repo) = repo();
        let mut project = Project::new("/work/web".into(), "web".into(), ProjectType::Generic);
        repo.save(&project).unwrap();

        project.project_type = ProjectType::Nodejs;
        project.favorite = true;
        repo.save(&project).unwrap();

        let all = repo.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].project_type, ProjectType::Nodejs);
        assert!(all[0].favorite);
    }

    #[test]
    fn test_list_orders_favorites_then_display_order() {
        let (_dir, repo) = repo();
        let mut a = Project::new("/a".into(), "a".into(), ProjectType::Rust);
        a.display_order = 0;
        let mut b = Project::new("/b".into(), "b".into(), ProjectType::Rust);
        b.display_order = 1;
        let mut c = Project::new("/c".into(), "c".into(), ProjectType::Rust);
        c.display_order = 2;
        c.favorite = true;
        for p in [&a, &b, &c] {
            repo.save(p).unwrap();
        }

        let names: Vec<_> = repo.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        let next = repo
            .db
            .with_connection(ProjectRepository::next_display_order_in)
            .unwrap();
        assert_eq!(next, 3);
    }

    #[test]
    fn test_delete() {
        let (_dir, repo) = repo();
        let project = Project::new("/gone".into(), "gone".into(), ProjectType::Python);
        repo.save(&project).unwrap();

        assert!(repo.delete(&project.id).unwrap());
        assert!(!repo.delete(&project.id).unwrap());
        assert!(repo.get(&project.id).unwrap().is_none());
    }
}
