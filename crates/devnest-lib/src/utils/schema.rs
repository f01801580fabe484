// SQLite Schema Definitions and Migrations
// Contains all table definitions and migration logic

use rusqlite::{params, Connection};

use super::error::Result;

/// Current schema version
pub const CURRENT_VERSION: i32 = 3;

/// Migration struct containing version and SQL statements
struct Migration {
    version: i32,
    description: &'static str,
    up: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        up: r#"
            -- Projects table (path is the natural key)
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                path TEXT NOT NULL UNIQUE,
                project_type TEXT NOT NULL DEFAULT 'Generic'
                    CHECK(project_type IN ('Rust', 'Nodejs', 'Python', 'Java', 'Go', 'Dotnet', 'Generic')),
                favorite INTEGER NOT NULL DEFAULT 0,
                tags TEXT NOT NULL DEFAULT '[]',
                last_opened TEXT,
                last_modified TEXT,
                created_at TEXT NOT NULL,
                display_order INTEGER NOT NULL DEFAULT 0,
                ide_preferences TEXT NOT NULL DEFAULT '[]',
                description TEXT,
                git_url TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_projects_path ON projects(path);
            CREATE INDEX IF NOT EXISTS idx_projects_order ON projects(display_order);

            -- IDE catalog
            CREATE TABLE IF NOT EXISTS ides (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                executable TEXT NOT NULL,
                args_template TEXT NOT NULL DEFAULT '{projectPath}',
                icon TEXT,
                category TEXT NOT NULL DEFAULT 'Gui'
                    CHECK(category IN ('Gui', 'Cli', 'Terminal', 'Browser')),
                priority INTEGER NOT NULL DEFAULT 200,
                auto_detected INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_ides_priority ON ides(priority);
        "#,
    },
    Migration {
        version: 2,
        description: "Add cached language statistics",
        up: r#"
            ALTER TABLE projects ADD COLUMN language_stats TEXT;
        "#,
    },
    Migration {
        version: 3,
        description: "Seed default IDE catalog",
        up: r#"
            INSERT OR IGNORE INTO ides (id, name, executable, args_template, category, priority, auto_detected)
            VALUES ('vscode', 'VSCode', 'code', '{projectPath}', 'Gui', 100, 0);
            INSERT OR IGNORE INTO ides (id, name, executable, args_template, category, priority, auto_detected)
            VALUES ('cursor', 'Cursor', 'cursor', '{projectPath}', 'Gui', 110, 0);
        "#,
    },
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Ensure schema_version table exists first
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now')),
            description TEXT
        )
        "#,
        [],
    )?;

    let current_version = get_version(conn)?;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            log::info!(
                "[Database] Running migration v{}: {}",
                migration.version,
                migration.description
            );

            conn.execute_batch(migration.up)?;

            conn.execute(
                "INSERT INTO schema_version (version, description) VALUES (?1, ?2)",
                params![migration.version, migration.description],
            )?;
        }
    }

    Ok(())
}

/// Get the current schema version
pub fn get_version(conn: &Connection) -> Result<i32> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?)
}

/// Check if a table exists
pub fn table_exists(conn: &Connection, table_name: &str) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        params![table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
