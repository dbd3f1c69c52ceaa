use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dashgate_observability::init();

    let config = dashgate_api::config::ServerConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "starting dashgate-api");

    let app = dashgate_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
