//! Backends en memoria. Se usan en tests y cuando el servicio arranca sin
//! `DATABASE_URL`.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ArtifactStore, ChangeLogStore, SchemaSource};
use crate::catalog::SchemaEntity;
use crate::errors::StoreError;
use crate::model::{ArtifactCompletion, ArtifactStatus, ChangeLogEntry, DocumentationArtifact, DocumentationType,
                   DocumentationVersion, NewArtifact, NewChangeLogEntry};

#[derive(Default)]
struct ArtifactTables {
    artifacts: HashMap<DocumentationType, DocumentationArtifact>,
    versions: Vec<DocumentationVersion>,
}

impl ArtifactTables {
    fn by_id_mut(&mut self, id: Uuid) -> Result<&mut DocumentationArtifact, StoreError> {
        self.artifacts
            .values_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("documentation artifact {id}")))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryArtifactStore {
    inner: Arc<RwLock<ArtifactTables>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta una fila tal cual (útil para simular datos heredados).
    pub async fn insert(&self, artifact: DocumentationArtifact) {
        let mut guard = self.inner.write().await;
        guard.artifacts.insert(artifact.documentation_type, artifact);
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn find_by_type(&self, doc_type: DocumentationType) -> Result<Option<DocumentationArtifact>, StoreError> {
        Ok(self.inner.read().await.artifacts.get(&doc_type).cloned())
    }

    async fn create(&self, new: NewArtifact) -> Result<DocumentationArtifact, StoreError> {
        let mut guard = self.inner.write().await;
        if guard.artifacts.contains_key(&new.documentation_type) {
            return Err(StoreError::Conflict(format!("artifact for '{}' already exists", new.documentation_type)));
        }
        let now = Utc::now();
        let artifact = DocumentationArtifact { id: Uuid::new_v4(),
                                               documentation_type: new.documentation_type,
                                               title: new.title,
                                               description: new.description,
                                               status: ArtifactStatus::Generating,
                                               content_markdown: None,
                                               content_json: None,
                                               file_size_bytes: None,
                                               generation_duration_seconds: None,
                                               last_generated_at: None,
                                               version_number: Some(new.version_number),
                                               previous_version_id: None,
                                               changes_summary: None,
                                               error_message: None,
                                               generated_by: new.generated_by,
                                               created_at: now,
                                               updated_at: now };
        guard.artifacts.insert(artifact.documentation_type, artifact.clone());
        Ok(artifact)
    }

    async fn mark_generating(&self, id: Uuid, generated_by: Option<&str>) -> Result<DocumentationArtifact, StoreError> {
        let mut guard = self.inner.write().await;
        let row = guard.by_id_mut(id)?;
        row.status = ArtifactStatus::Generating;
        row.error_message = None;
        if let Some(caller) = generated_by {
            row.generated_by = Some(caller.to_string());
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn complete(&self, id: Uuid, completion: ArtifactCompletion) -> Result<DocumentationArtifact, StoreError> {
        let mut guard = self.inner.write().await;
        let row = guard.by_id_mut(id)?;
        let version = DocumentationVersion::from_completion(row.id, row.documentation_type, &completion);
        row.status = ArtifactStatus::Completed;
        row.error_message = None;
        row.content_markdown = Some(completion.content_markdown);
        row.content_json = Some(completion.content_json);
        row.file_size_bytes = Some(completion.file_size_bytes);
        row.generation_duration_seconds = Some(completion.generation_duration_seconds);
        row.last_generated_at = Some(completion.last_generated_at);
        row.version_number = Some(completion.version_number);
        row.previous_version_id = completion.previous_version_id;
        row.changes_summary = completion.changes_summary;
        row.updated_at = Utc::now();
        let updated = row.clone();
        guard.versions.push(version);
        Ok(updated)
    }

    async fn mark_error(&self, id: Uuid, message: &str) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        let row = guard.by_id_mut(id)?;
        row.status = ArtifactStatus::Error;
        row.error_message = Some(message.to_string());
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DocumentationArtifact>, StoreError> {
        let guard = self.inner.read().await;
        let mut all: Vec<_> = guard.artifacts.values().cloned().collect();
        all.sort_by_key(|a| a.documentation_type);
        Ok(all)
    }

    async fn list_versions(&self, doc_type: DocumentationType) -> Result<Vec<DocumentationVersion>, StoreError> {
        let guard = self.inner.read().await;
        let mut versions: Vec<_> = guard.versions
                                        .iter()
                                        .filter(|v| v.documentation_type == doc_type)
                                        .cloned()
                                        .collect();
        versions.sort_by_key(|v| v.version_number);
        Ok(versions)
    }
}

/// Change-log en memoria; conserva el orden de inserción.
#[derive(Clone, Default)]
pub struct InMemoryChangeLogStore {
    inner: Arc<RwLock<Vec<ChangeLogEntry>>>,
}

impl InMemoryChangeLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, new: NewChangeLogEntry) -> ChangeLogEntry {
        let entry = ChangeLogEntry { id: Uuid::new_v4(),
                                     category: new.category,
                                     applied: false,
                                     description: new.description,
                                     affected_entity: new.affected_entity,
                                     created_at: Utc::now() };
        self.inner.write().await.push(entry.clone());
        entry
    }

    pub async fn all(&self) -> Vec<ChangeLogEntry> {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl ChangeLogStore for InMemoryChangeLogStore {
    async fn pending_for_category(&self, category: &str) -> Result<Vec<ChangeLogEntry>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard.iter()
                .filter(|e| e.category == category && !e.applied)
                .cloned()
                .collect())
    }

    async fn mark_applied(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let mut guard = self.inner.write().await;
        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        let known: HashSet<Uuid> = guard.iter().map(|e| e.id).collect();
        if let Some(missing) = wanted.iter().find(|id| !known.contains(id)) {
            return Err(StoreError::NotFound(format!("change log entry {missing}")));
        }
        let mut changed = 0;
        for entry in guard.iter_mut().filter(|e| wanted.contains(&e.id)) {
            if !entry.applied {
                entry.applied = true;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

/// Fuente de schemas en memoria. Las entidades sin schema registrado
/// devuelven `NotFound`; `failing_on` fuerza un error de backend.
#[derive(Clone, Default)]
pub struct InMemorySchemaSource {
    schemas: HashMap<String, Value>,
    failing: HashSet<String>,
}

impl InMemorySchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, entity: impl Into<String>, schema: Value) -> Self {
        self.schemas.insert(entity.into(), schema);
        self
    }

    pub fn failing_on(mut self, entity: impl Into<String>) -> Self {
        self.failing.insert(entity.into());
        self
    }

    /// Schema mínimo para cada entidad dada (`id` y `name`).
    pub fn with_placeholder_schemas(mut self, entities: &[SchemaEntity]) -> Self {
        for e in entities {
            self.schemas.insert(e.name.clone(),
                                serde_json::json!({
                                    "name": e.name,
                                    "table": e.table,
                                    "type": "object",
                                    "properties": {
                                        "id": {"type": "uuid", "nullable": false},
                                        "name": {"type": "text", "nullable": true}
                                    },
                                    "required": ["id"]
                                }));
        }
        self
    }
}

#[async_trait]
impl SchemaSource for InMemorySchemaSource {
    async fn entity_schema(&self, entity: &SchemaEntity) -> Result<Value, StoreError> {
        if self.failing.contains(&entity.name) {
            return Err(StoreError::Backend(format!("schema fetch failed for {}", entity.name)));
        }
        self.schemas
            .get(&entity.name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("schema for {}", entity.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_artifact(t: DocumentationType) -> NewArtifact {
        NewArtifact { documentation_type: t,
                      title: "T".into(),
                      description: "D".into(),
                      version_number: 1,
                      generated_by: Some("alice".into()) }
    }

    #[tokio::test]
    async fn one_live_row_per_type() {
        let store = InMemoryArtifactStore::new();
        store.create(new_artifact(DocumentationType::MasterData)).await.unwrap();
        let err = store.create(new_artifact(DocumentationType::MasterData)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mark_generating_clears_previous_error() {
        let store = InMemoryArtifactStore::new();
        let row = store.create(new_artifact(DocumentationType::BusinessLogic)).await.unwrap();
        store.mark_error(row.id, "boom").await.unwrap();
        let row = store.mark_generating(row.id, Some("bob")).await.unwrap();
        assert_eq!(row.status, ArtifactStatus::Generating);
        assert_eq!(row.error_message, None);
        assert_eq!(row.generated_by.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = InMemoryArtifactStore::new();
        let err = store.mark_error(Uuid::new_v4(), "x").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_applied_is_all_or_nothing() {
        let store = InMemoryChangeLogStore::new();
        let a = store.record(NewChangeLogEntry::new("database", "a")).await;
        let err = store.mark_applied(&[a.id, Uuid::new_v4()]).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(!store.all().await[0].applied);

        assert_eq!(store.mark_applied(&[a.id]).await.unwrap(), 1);
        assert_eq!(store.mark_applied(&[a.id]).await.unwrap(), 0);
        assert!(store.pending_for_category("database").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pending_filters_category_and_applied_flag() {
        let store = InMemoryChangeLogStore::new();
        store.record(NewChangeLogEntry::new("database", "one")).await;
        store.record(NewChangeLogEntry::new("modules", "two")).await;
        let three = store.record(NewChangeLogEntry::new("database", "three")).await;
        store.mark_applied(&[three.id]).await.unwrap();
        let pending = store.pending_for_category("database").await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].description, "one");
    }
}
