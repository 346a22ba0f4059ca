use std::sync::Arc;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    freshtrack_observability::init();

    let service_key = std::env::var("SERVICE_KEY").unwrap_or_else(|_| {
        tracing::warn!("SERVICE_KEY not set; using insecure dev default");
        "dev-service-key".to_string()
    });
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    let services = Arc::new(freshtrack_api::app::services::build_services().await?);
    let app = freshtrack_api::app::build_app(services, service_key);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
