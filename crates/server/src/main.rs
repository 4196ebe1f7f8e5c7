use anyhow::Context;
use db::DBService;
use server::{Deployment, config::Config, routes};
use services::services::database_validator::DatabaseValidator;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::logging::init_tracing();

    let config = Config::from_env().context("invalid configuration")?;
    let db = DBService::new(&config.database)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.display()))?;

    let report = DatabaseValidator::new(db.pool.clone()).ensure_valid().await?;
    info!("{}", report.summary());

    let addr = config.addr();
    let app = routes::router(Deployment::new(db));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
