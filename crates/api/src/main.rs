use std::sync::Arc;

use anyhow::Context;

use labregister_api::config::ApiConfig;
use labregister_items::ItemStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    labregister_observability::init();

    let config = ApiConfig::from_env()?;
    let store = Arc::new(ItemStore::new());
    let app = labregister_api::app::build_app(store);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
