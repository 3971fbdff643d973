use std::sync::Arc;

use anyhow::Context;

use stockbook_api::app::{build_app, services::build_services};
use stockbook_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    stockbook_observability::init(config.log_format);

    let services = build_services(&config.store)
        .await
        .context("failed to open inventory store")?;
    let app = build_app(Arc::new(services));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
