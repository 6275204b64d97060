//! `GenerationEngine`: flujo completo de una generación.
//!
//! Orden: lock del tipo -> versión -> cambios pendientes -> `generating` ->
//! (schemas) -> render -> escritura final -> marcar cambios aplicados.
//! Un fallo después de `generating` deja el artifact en `error` con el
//! mensaje del fallo.
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::changes::{aggregate_changes, PendingChanges};
use super::locks::TypeLocks;
use super::schema::introspect;
use super::version::{begin_generation, resolve_version, ResolvedVersion};
use super::EngineBuilder;
use crate::catalog::{Catalog, TypeEntry};
use crate::errors::EngineError;
use crate::model::{ArtifactCompletion, DocumentationArtifact, DocumentationType, DocumentationVersion};
use crate::render::{RenderContext, RendererSet};
use crate::repo::{ArtifactStore, ChangeLogStore, SchemaSource};

/// Resultado de una generación exitosa.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub documentation_id: Uuid,
    pub version_number: i32,
    pub file_size_bytes: i64,
    pub generation_duration_seconds: f64,
    /// Entradas del change-log que pasaron a aplicadas.
    pub changes_applied: usize,
}

pub struct GenerationEngine {
    pub(crate) artifacts: Arc<dyn ArtifactStore>,
    pub(crate) change_log: Arc<dyn ChangeLogStore>,
    pub(crate) schema_source: Arc<dyn SchemaSource>,
    pub(crate) renderers: Arc<dyn RendererSet>,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) locks: TypeLocks,
}

impl GenerationEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Genera (o regenera) la documentación del tipo.
    pub async fn generate(&self, doc_type: DocumentationType, requested_by: Option<&str>) -> Result<GenerationOutcome, EngineError> {
        let started = Instant::now();
        let _guard = self.locks.acquire(doc_type).await;

        let entry = self.catalog.entry(doc_type)?;
        let resolved = resolve_version(self.artifacts.as_ref(), doc_type).await?;
        let pending = aggregate_changes(self.change_log.as_ref(), entry).await?;
        debug!(%doc_type, version = resolved.version_number, pending = pending.entries.len(), "generation resolved");

        let artifact = begin_generation(self.artifacts.as_ref(), doc_type, entry, &resolved, requested_by).await?;

        let completed = match self.render_and_complete(doc_type, entry, &resolved, &pending, artifact.id, started).await {
            Ok(done) => done,
            Err(err) => {
                warn!(%doc_type, error = %err, "generation failed");
                if let Err(store_err) = self.artifacts.mark_error(artifact.id, &err.to_string()).await {
                    error!(%doc_type, error = %store_err, "could not record generation failure");
                }
                return Err(err);
            }
        };

        let changes_applied = match pending.category {
            Some(_) if !pending.is_empty() => self.change_log.mark_applied(&pending.ids()).await?,
            _ => 0,
        };

        let outcome = GenerationOutcome { documentation_id: completed.id,
                                          version_number: resolved.version_number,
                                          file_size_bytes: completed.file_size_bytes.unwrap_or_default(),
                                          generation_duration_seconds: completed.generation_duration_seconds.unwrap_or_default(),
                                          changes_applied };
        info!(%doc_type,
              version = outcome.version_number,
              bytes = outcome.file_size_bytes,
              changes = outcome.changes_applied,
              "documentation generated");
        Ok(outcome)
    }

    async fn render_and_complete(&self,
                                 doc_type: DocumentationType,
                                 entry: &TypeEntry,
                                 resolved: &ResolvedVersion,
                                 pending: &PendingChanges,
                                 artifact_id: Uuid,
                                 started: Instant)
                                 -> Result<DocumentationArtifact, EngineError> {
        let renderer = self.renderers.renderer(doc_type);
        if renderer.doc_type() != doc_type {
            return Err(EngineError::Configuration(format!("renderer for '{}' registered under '{doc_type}'",
                                                          renderer.doc_type())));
        }

        let snapshot = if renderer.needs_schema() {
            Some(introspect(self.schema_source.as_ref(), self.catalog.schema_entities()).await)
        } else {
            None
        };

        let generated_at = Utc::now();
        let ctx = RenderContext { doc_type,
                                  entry,
                                  catalog: &self.catalog,
                                  schema: snapshot.as_ref(),
                                  changes: &pending.entries,
                                  version_number: resolved.version_number,
                                  generated_at };
        let rendered = renderer.render(&ctx)?;

        let completion = ArtifactCompletion { file_size_bytes: rendered.content_markdown.len() as i64,
                                              content_markdown: rendered.content_markdown,
                                              content_json: rendered.content_json,
                                              generation_duration_seconds: started.elapsed().as_secs_f64(),
                                              last_generated_at: generated_at,
                                              version_number: resolved.version_number,
                                              previous_version_id: resolved.previous_version_id,
                                              changes_summary: pending.summary() };
        Ok(self.artifacts.complete(artifact_id, completion).await?)
    }

    pub async fn artifact(&self, doc_type: DocumentationType) -> Result<Option<DocumentationArtifact>, EngineError> {
        Ok(self.artifacts.find_by_type(doc_type).await?)
    }

    pub async fn list(&self) -> Result<Vec<DocumentationArtifact>, EngineError> {
        Ok(self.artifacts.list().await?)
    }

    pub async fn versions(&self, doc_type: DocumentationType) -> Result<Vec<DocumentationVersion>, EngineError> {
        Ok(self.artifacts.list_versions(doc_type).await?)
    }
}
