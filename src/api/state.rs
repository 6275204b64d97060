//! Estado compartido por los handlers y su construcción desde `AppConfig`.
use std::sync::Arc;

use doc_core::{Catalog, GenerationEngine};
use doc_persistence::{build_pool, PgArtifactStore, PgChangeLogStore, PgSchemaSource};
use doc_renderers::DefaultRenderers;
use tracing::{info, warn};

use super::auth::{IdentityResolver, TokenIdentityResolver};
use crate::config::AppConfig;
use crate::errors::CoreError;

pub struct AppState {
    pub engine: GenerationEngine,
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    pub fn new(engine: GenerationEngine, identity: Arc<dyn IdentityResolver>) -> Self {
        Self { engine, identity }
    }
}

/// Catálogo, stores (Postgres o memoria) y resolver de identidad.
pub async fn build_state(config: &AppConfig) -> Result<AppState, CoreError> {
    let catalog = match &config.catalog_path {
        Some(path) => {
            info!(path = %path.display(), "loading catalog override");
            Catalog::from_path(path)?
        }
        None => Catalog::load_default()?,
    };
    let builder = GenerationEngine::builder().catalog(Arc::new(catalog))
                                             .renderers(Arc::new(DefaultRenderers));

    let engine = match &config.database {
        Some(db) => {
            let db = db.clone();
            let pool = tokio::task::spawn_blocking(move || build_pool(&db.url, db.min_connections, db.max_connections))
                .await
                .map_err(|e| CoreError::Internal(format!("pool task: {e}")))??;
            info!("using postgres stores");
            builder.artifacts(Arc::new(PgArtifactStore::new(pool.clone())))
                   .change_log(Arc::new(PgChangeLogStore::new(pool.clone())))
                   .schema_source(Arc::new(PgSchemaSource::new(pool)))
                   .build()?
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory stores");
            builder.with_in_memory_stores().build()?
        }
    };

    let identity = TokenIdentityResolver::new(config.api_tokens.clone());
    if identity.is_empty() {
        warn!("DOCFLOW_API_TOKENS is empty, every authenticated request will be rejected");
    }
    Ok(AppState::new(engine, Arc::new(identity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &'static [(&'static str, &'static str)]) -> AppConfig {
        AppConfig::from_lookup(|k| pairs.iter().find(|(key, _)| *key == k).map(|(_, v)| v.to_string())).unwrap()
    }

    #[tokio::test]
    async fn without_database_falls_back_to_memory() {
        let state = build_state(&config(&[])).await.unwrap();
        assert!(state.engine.list().await.unwrap().is_empty());
        assert_eq!(state.engine.catalog().schema_entities().len(), 19);
    }

    #[tokio::test]
    async fn missing_catalog_override_fails() {
        let err = build_state(&config(&[("DOCFLOW_CATALOG_PATH", "/nonexistent/catalog.json")])).await;
        assert!(matches!(err, Err(CoreError::Engine(_))));
    }
}
