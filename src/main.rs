use gmail_file_upload::core::app::{self, ApiServices};
use gmail_file_upload::core::config::Config;
use gmail_file_upload::core::{database, server};

fn main() -> anyhow::Result<()> {
    let (runtime, worker_threads) = server::build_runtime()?;
    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    server::init_tracing();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    let services = ApiServices::init(pool.clone(), config.storage.clone()).await?;

    let app = app::router(services, &config.app, &config.swagger);

    // Start server
    let addr = config.app.server_address();
    let listener = server::bind_listener(&addr)?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/docs", addr);
    tracing::info!("ReDoc available at http://{}/redoc", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}
