use std::sync::Arc;

use docflow_rust::errors::CoreError;
use docflow_rust::{build_router, build_state, AppConfig};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docflow=debug,docflow_rust=debug,doc_core=debug,tower_http=debug".into());
    tracing_subscriber::registry().with(filter)
                                  .with(tracing_subscriber::fmt::layer())
                                  .init();

    let config = AppConfig::from_env()?;
    let state = Arc::new(build_state(&config).await?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "docflow listening");
    axum::serve(listener, app).await?;
    Ok(())
}
