use tokio::net::TcpListener;
use tracing::info;
use workout_api::{api::create_routes, build_state, config::Settings, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    logging::init_tracing(&settings.app.log_level);

    let settings = settings.resolve_secret_key().await?;
    info!("Loaded configuration: {:?}", settings.app);

    let state = build_state(&settings).await?;
    let app = create_routes(state);

    let address = settings.app.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Workout API listening on http://{}", address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
