use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::time::Duration;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn create_pool(
    database_url: &str,
    max_size: u32,
    timeout_secs: u64,
) -> Result<DbPool, r2d2::Error> {
    let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
    // Remove query parameters (e.g., ?mode=rwc)
    let path = path.split('?').next().unwrap_or(path);

    let manager = if path == ":memory:" {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(Path::new(path))
    };

    Pool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_secs(timeout_secs))
        .build(with_pragmas(manager, timeout_secs))
}

pub fn create_memory_pool() -> Result<DbPool, r2d2::Error> {
    // A single connection, since every in-memory connection is its own database.
    let manager = with_pragmas(SqliteConnectionManager::memory(), 5);
    Pool::builder().max_size(1).build(manager)
}

fn with_pragmas(manager: SqliteConnectionManager, timeout_secs: u64) -> SqliteConnectionManager {
    manager.with_init(move |conn| {
        conn.busy_timeout(Duration::from_secs(timeout_secs))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
    })
}
