use crate::core::config::{DatabaseConfig, StorageConfig};
use crate::modules::storage::LocalStorage;
use sqlx::SqlitePool;

/// Fresh migrated SQLite database inside its own temp directory
pub async fn test_pool() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("test.db").display()),
        max_connections: 5,
        min_connections: 1,
        acquire_timeout_secs: 5,
        idle_timeout_secs: 600,
        max_lifetime_secs: 1800,
    };

    let pool = crate::core::database::create_pool(&config)
        .await
        .expect("create pool");
    crate::core::database::run_migrations(&pool)
        .await
        .expect("run migrations");

    (dir, pool)
}

/// Upload directory storage rooted under `dir`
pub async fn test_storage(dir: &tempfile::TempDir) -> LocalStorage {
    LocalStorage::new(StorageConfig {
        upload_dir: dir.path().join("uploads"),
    })
    .await
    .expect("create storage")
}
