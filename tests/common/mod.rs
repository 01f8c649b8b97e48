#![allow(dead_code)]

use axum::Router;
use sqlx::SqlitePool;
use tempfile::TempDir;

use gmail_file_upload::core::app::{self, ApiServices};
use gmail_file_upload::core::config::{AppConfig, DatabaseConfig, StorageConfig, SwaggerConfig};
use gmail_file_upload::core::database;

/// A fully wired API backed by a throwaway database and upload directory
pub struct TestApi {
    pub router: Router,
    pub pool: SqlitePool,
    pub upload_dir: std::path::PathBuf,
    _dir: TempDir,
}

pub async fn spawn_api(file_deletion_enabled: bool) -> TestApi {
    let dir = tempfile::tempdir().expect("create temp dir");
    let database = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("api.db").display()),
        max_connections: 5,
        min_connections: 1,
        acquire_timeout_secs: 5,
        idle_timeout_secs: 600,
        max_lifetime_secs: 1800,
    };
    let storage = StorageConfig {
        upload_dir: dir.path().join("uploads"),
    };
    let app_config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["*".to_string()],
        file_deletion_enabled,
    };
    let swagger = SwaggerConfig {
        title: "Gmail File Upload API".to_string(),
        version: "1.0.0".to_string(),
        description: "test".to_string(),
    };

    let pool = database::create_pool(&database).await.expect("create pool");
    database::run_migrations(&pool)
        .await
        .expect("run migrations");

    let services = ApiServices::init(pool.clone(), storage.clone())
        .await
        .expect("init services");

    TestApi {
        router: app::router(services, &app_config, &swagger),
        pool,
        upload_dir: storage.upload_dir,
        _dir: dir,
    }
}

/// Number of payloads currently in the upload directory
pub fn stored_payloads(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
