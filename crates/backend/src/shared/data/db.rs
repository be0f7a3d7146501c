use once_cell::sync::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use std::path::Path;

use crate::shared::config::{get_database_path, Config};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const SCHEMA: &[(&str, &str)] = &[
    (
        "a001_material",
        r#"
        CREATE TABLE IF NOT EXISTS a001_material (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            owner_id TEXT NOT NULL,
            stock INTEGER NOT NULL DEFAULT 0,
            quantity INTEGER NOT NULL DEFAULT 0,
            price REAL NOT NULL DEFAULT 0,
            unit_price REAL NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a002_tool",
        r#"
        CREATE TABLE IF NOT EXISTS a002_tool (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            owner_id TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0,
            unit_price REAL NOT NULL DEFAULT 0,
            total_price REAL NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a003_budget",
        r#"
        CREATE TABLE IF NOT EXISTS a003_budget (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            owner_id TEXT NOT NULL,
            status_id INTEGER NOT NULL DEFAULT 1,
            sales_price REAL NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a003_budget_line",
        r#"
        CREATE TABLE IF NOT EXISTS a003_budget_line (
            id TEXT PRIMARY KEY NOT NULL,
            budget_id TEXT NOT NULL,
            line_no INTEGER NOT NULL,
            material_id TEXT NOT NULL,
            material_name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            unit_price REAL NOT NULL,
            assigned_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "sys_users",
        r#"
        CREATE TABLE IF NOT EXISTS sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_login_at TEXT,
            created_by TEXT
        );
        "#,
    ),
    (
        "sys_sessions",
        r#"
        CREATE TABLE IF NOT EXISTS sys_sessions (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            token_hash TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            revoked_at TEXT
        );
        "#,
    ),
    (
        "sys_settings",
        r#"
        CREATE TABLE IF NOT EXISTS sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_a001_material_owner ON a001_material (owner_id, is_deleted);",
    "CREATE INDEX IF NOT EXISTS idx_a002_tool_owner ON a002_tool (owner_id, is_deleted);",
    "CREATE INDEX IF NOT EXISTS idx_a003_budget_owner ON a003_budget (owner_id, is_deleted, status_id);",
    "CREATE INDEX IF NOT EXISTS idx_a003_budget_line_budget ON a003_budget_line (budget_id);",
    "CREATE INDEX IF NOT EXISTS idx_sys_sessions_user ON sys_sessions (user_id);",
];

async fn table_exists<C: ConnectionTrait>(db: &C, table_name: &str) -> anyhow::Result<bool> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(1) AS cnt FROM sqlite_master WHERE type='table' AND name = ?",
            [table_name.into()],
        ))
        .await?;
    let count: i64 = match row {
        Some(r) => r.try_get("", "cnt")?,
        None => 0,
    };
    Ok(count > 0)
}

/// Create every missing table and index
pub async fn bootstrap_schema<C: ConnectionTrait>(db: &C) -> anyhow::Result<()> {
    for (table, sql) in SCHEMA {
        if !table_exists(db, table).await? {
            tracing::info!("Creating {} table", table);
        }
        db.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    for sql in INDEXES {
        db.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    Ok(())
}

fn build_sqlite_url(path: &Path) -> String {
    // Windows paths need a leading slash in the URL
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

pub async fn initialize_database(config: &Config) -> anyhow::Result<()> {
    let db_path = get_database_path(config);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = build_sqlite_url(&db_path);
    tracing::info!("Opening database {}", db_path.display());

    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;

    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database connection already initialized"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Fresh in-memory database with the full schema
///
/// A single pooled connection keeps every query on the same memory database.
#[cfg(test)]
pub async fn connect_in_memory() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await.unwrap();
    bootstrap_schema(&conn).await.unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_url_forms() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/app/app.db")),
            "sqlite:///var/app/app.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new(r"C:\app\app.db")),
            "sqlite:///C:/app/app.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let db = connect_in_memory().await;
        bootstrap_schema(&db).await.unwrap();
        for (table, _) in SCHEMA {
            assert!(table_exists(&db, table).await.unwrap(), "{}", table);
        }
    }
}
