//! Builder para `GenerationEngine`.
//!
//! Stores y renderers son obligatorios; el catálogo por defecto es el
//! embebido.
//!
//! ```ignore
//! let engine = GenerationEngine::builder()
//!     .with_in_memory_stores()
//!     .renderers(Arc::new(DefaultRenderers))
//!     .build()?;
//! ```
use std::sync::Arc;

use super::core::GenerationEngine;
use super::locks::TypeLocks;
use crate::catalog::Catalog;
use crate::errors::EngineError;
use crate::render::RendererSet;
use crate::repo::{ArtifactStore, ChangeLogStore, InMemoryArtifactStore, InMemoryChangeLogStore, InMemorySchemaSource,
                  SchemaSource};

#[derive(Default)]
pub struct EngineBuilder {
    artifacts: Option<Arc<dyn ArtifactStore>>,
    change_log: Option<Arc<dyn ChangeLogStore>>,
    schema_source: Option<Arc<dyn SchemaSource>>,
    renderers: Option<Arc<dyn RendererSet>>,
    catalog: Option<Arc<Catalog>>,
}

impl EngineBuilder {
    pub fn artifacts(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.artifacts = Some(store);
        self
    }

    pub fn change_log(mut self, store: Arc<dyn ChangeLogStore>) -> Self {
        self.change_log = Some(store);
        self
    }

    pub fn schema_source(mut self, source: Arc<dyn SchemaSource>) -> Self {
        self.schema_source = Some(source);
        self
    }

    pub fn renderers(mut self, renderers: Arc<dyn RendererSet>) -> Self {
        self.renderers = Some(renderers);
        self
    }

    pub fn catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Stores en memoria vacíos; la fuente de schemas expone un schema
    /// mínimo por entidad del catálogo. Se aplica después de `catalog`.
    pub fn with_in_memory_stores(mut self) -> Self {
        self.artifacts = Some(Arc::new(InMemoryArtifactStore::new()));
        self.change_log = Some(Arc::new(InMemoryChangeLogStore::new()));
        let entities = self.catalog
                           .as_ref()
                           .map(|c| c.schema_entities().to_vec())
                           .or_else(|| Catalog::load_default().ok().map(|c| c.schema_entities().to_vec()))
                           .unwrap_or_default();
        self.schema_source = Some(Arc::new(InMemorySchemaSource::new().with_placeholder_schemas(&entities)));
        self
    }

    pub fn build(self) -> Result<GenerationEngine, EngineError> {
        let missing = |what: &str| EngineError::Configuration(format!("{what} not configured"));
        let catalog = match self.catalog {
            Some(c) => c,
            None => Arc::new(Catalog::load_default()?),
        };
        Ok(GenerationEngine { artifacts: self.artifacts.ok_or_else(|| missing("artifact store"))?,
                              change_log: self.change_log.ok_or_else(|| missing("change log store"))?,
                              schema_source: self.schema_source.ok_or_else(|| missing("schema source"))?,
                              renderers: self.renderers.ok_or_else(|| missing("renderers"))?,
                              catalog,
                              locks: TypeLocks::new() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_renderers_is_a_configuration_error() {
        let err = EngineBuilder::default().with_in_memory_stores().build().err().unwrap();
        assert!(matches!(err, EngineError::Configuration(ref m) if m == "renderers not configured"));
    }

    #[test]
    fn build_without_stores_is_a_configuration_error() {
        let err = EngineBuilder::default().build().err().unwrap();
        assert!(matches!(err, EngineError::Configuration(_)));
    }
}
