use gmail_file_upload::core::config::FrontendConfig;
use gmail_file_upload::core::server;
use gmail_file_upload::frontend::{self, FrontendState};

fn main() -> anyhow::Result<()> {
    let (runtime, _) = server::build_runtime()?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    server::init_tracing();

    let config = FrontendConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let state = FrontendState::from_config(&config)?;

    if !state.client.is_healthy().await {
        tracing::warn!(
            "Backend at {} is not reachable yet; pages will show a notice until it is",
            state.client.base_url()
        );
    }

    let app = frontend::routes(state);

    let addr = config.server_address();
    let listener = server::bind_listener(&addr)?;

    tracing::info!("Frontend listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("Frontend stopped");

    Ok(())
}
