// Catalog store
// One shared SQLite connection behind a mutex; every mutation goes through a transaction

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use super::config::AppConfig;
use super::error::{DevNestError, Result};
use super::schema;

/// Handle to the catalog database, cheap to clone across commands and blocking tasks
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open (or create) the catalog at `path` and bring its schema up to date
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DevNestError::io(parent, e))?;
        }

        let conn = Connection::open(&path)?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA busy_timeout=5000;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
            "#,
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        db.run_migrations()?;

        Ok(db)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Exclusive access to the connection; a poisoned lock is an internal failure
    pub fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DevNestError::Internal(format!("catalog connection poisoned: {}", e)))
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::run_migrations(&conn)
    }

    /// Run `f` while holding the connection
    pub fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Run `f` atomically: committed when it returns Ok, rolled back otherwise
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        match f(&tx) {
            Ok(result) => {
                tx.commit()?;
                Ok(result)
            }
            // Dropping `tx` rolls back
            Err(e) => Err(e),
        }
    }

    pub fn schema_version(&self) -> Result<i32> {
        self.with_connection(schema::get_version)
    }
}

/// Open the database described by `config`
pub fn open_database(config: &AppConfig) -> Result<Database> {
    let db = Database::new(config.database_path())?;
    log::info!("[Database] Opened {}", db.path().display());
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_creation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("test.db");
        let db = Database::new(path.clone()).unwrap();

        assert!(path.exists());
        assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
    }

    #[test]
    fn test_wal_mode() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();

        let mode: String = db
            .with_connection(|conn| Ok(conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?))
            .unwrap();

        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();

        let result: Result<()> = db.with_transaction(|conn| {
            conn.execute("CREATE TABLE scratch (id INTEGER PRIMARY KEY)", [])?;
            Err(DevNestError::InvalidInput("abort".to_string()))
        });
        assert!(result.is_err());

        let exists = db
            .with_connection(|conn| schema::table_exists(conn, "scratch"))
            .unwrap();
        assert!(!exists);
    }

    #[test]
    fn test_poisoned_lock_is_internal_error() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();

        let conn = db.conn.clone();
        let _ = std::thread::spawn(move || {
            let _guard = conn.lock().unwrap();
            panic!("poison the connection");
        })
        .join();

        assert!(matches!(db.lock(), Err(DevNestError::Internal(_))));
    }
}
