// IDE Repository
// Handles all database operations for the IDE catalog

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::ide::{IdeCategory, IdeConfig};
use crate::utils::database::Database;
use crate::utils::error::Result;

const IDE_COLUMNS: &str =
    "id, name, executable, args_template, icon, category, priority, auto_detected";

/// Repository for IDE catalog access
#[derive(Clone)]
pub struct IdeRepository {
    db: Database,
}

impl IdeRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List all IDEs, most preferred first
    pub fn list(&self) -> Result<Vec<IdeConfig>> {
        self.db.with_connection(Self::list_in)
    }

    pub fn get(&self, id: &str) -> Result<Option<IdeConfig>> {
        self.db.with_connection(|conn| Self::get_in(conn, id))
    }

    /// Insert or replace by id
    pub fn save(&self, ide: &IdeConfig) -> Result<()> {
        self.db.with_connection(|conn| Self::save_in(conn, ide))
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.db.with_connection(|conn| Self::delete_in(conn, id))
    }

    pub fn list_in(conn: &Connection) -> Result<Vec<IdeConfig>> {
        let sql = format!(
            "SELECT {} FROM ides ORDER BY priority ASC, name COLLATE NOCASE ASC",
            IDE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], IdeRow::from_row)?;

        let mut ides = Vec::new();
        for row in rows {
            ides.push(row?.into_ide());
        }
        Ok(ides)
    }

    pub fn get_in(conn: &Connection, id: &str) -> Result<Option<IdeConfig>> {
        let sql = format!("SELECT {} FROM ides WHERE id = ?1", IDE_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id], IdeRow::from_row)
            .optional()?
            .map(IdeRow::into_ide))
    }

    pub fn save_in(conn: &Connection, ide: &IdeConfig) -> Result<()> {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO ides
            (id, name, executable, args_template, icon, category, priority, auto_detected)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                ide.id,
                ide.name,
                ide.executable,
                ide.args_template,
                ide.icon,
                ide.category.as_str(),
                ide.priority,
                ide.auto_detected as i32,
            ],
        )?;
        Ok(())
    }

    pub fn delete_in(conn: &Connection, id: &str) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM ides WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }
}

/// Internal row structure for mapping database rows
struct IdeRow {
    id: String,
    name: String,
    executable: String,
    args_template: String,
    icon: Option<String>,
    category: String,
    priority: i32,
    auto_detected: i32,
}

impl IdeRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            executable: row.get(2)?,
            args_template: row.get(3)?,
            icon: row.get(4)?,
            category: row.get(5)?,
            priority: row.get(6)?,
            auto_detected: row.get(7)?,
        })
    }

    fn into_ide(self) -> IdeConfig {
        IdeConfig {
            id: self.id,
            name: self.name,
            executable: self.executable,
            args_template: self.args_template,
            icon: self.icon,
            category: IdeCategory::from_db(&self.category),
            priority: self.priority,
            auto_detected: self.auto_detected != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_seeded_defaults_listed_by_priority() {
        let dir = tempdir().unwrap();
        let repo = IdeRepository::new(Database::new(dir.path().join("test.db")).unwrap());

        let ids: Vec<_> = repo.list().unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["vscode", "cursor"]);
        assert_eq!(repo.get("cursor").unwrap().unwrap().executable, "cursor");
    }

    #[test]
    fn test_save_and_delete() {
        let dir = tempdir().unwrap();
        let repo = IdeRepository::new(Database::new(dir.path().join("test.db")).unwrap());
        let ide = IdeConfig {
            id: "helix".into(),
            name: "Helix".into(),
            executable: "/usr/bin/hx".into(),
            args_template: "{projectPath}".into(),
            icon: None,
            category: IdeCategory::Terminal,
            priority: 50,
            auto_detected: true,
        };
        repo.save(&ide).unwrap();

        assert_eq!(repo.get("helix").unwrap().unwrap(), ide);
        assert_eq!(repo.list().unwrap()[0].id, "helix");
        assert!(repo.delete("helix").unwrap());
        assert!(repo.get("helix").unwrap().is_none());
    }
}
