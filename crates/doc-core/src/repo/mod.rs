//! Colaboradores externos del motor: almacenamiento de artifacts, change-log
//! y fuente de schemas. El motor sólo conoce estos traits; los backends
//! concretos viven en `memory` (tests / modo sin base de datos) y en el
//! crate de persistencia (Postgres).
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::SchemaEntity;
use crate::errors::StoreError;
use crate::model::{ArtifactCompletion, ChangeLogEntry, DocumentationArtifact, DocumentationType, DocumentationVersion,
                   NewArtifact};

pub mod memory;

pub use memory::{InMemoryArtifactStore, InMemoryChangeLogStore, InMemorySchemaSource};

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Fila viva del tipo, si existe.
    async fn find_by_type(&self, doc_type: DocumentationType) -> Result<Option<DocumentationArtifact>, StoreError>;

    /// Crea la fila en estado `generating`. `Conflict` si el tipo ya tiene
    /// fila.
    async fn create(&self, new: NewArtifact) -> Result<DocumentationArtifact, StoreError>;

    /// Pasa una fila existente a `generating` y limpia `error_message`.
    async fn mark_generating(&self, id: Uuid, generated_by: Option<&str>) -> Result<DocumentationArtifact, StoreError>;

    /// Escritura final de una generación exitosa: contenido, versión y
    /// `status = completed`. Agrega la entrada de historial en la misma
    /// unidad de trabajo.
    async fn complete(&self, id: Uuid, completion: ArtifactCompletion) -> Result<DocumentationArtifact, StoreError>;

    async fn mark_error(&self, id: Uuid, message: &str) -> Result<(), StoreError>;

    /// Todas las filas vivas, ordenadas por tipo.
    async fn list(&self) -> Result<Vec<DocumentationArtifact>, StoreError>;

    /// Historial del tipo, por `version_number` ascendente.
    async fn list_versions(&self, doc_type: DocumentationType) -> Result<Vec<DocumentationVersion>, StoreError>;
}

#[async_trait]
pub trait ChangeLogStore: Send + Sync {
    /// Entradas con `bereich = category` y `doku_aktualisiert = false`, en el
    /// orden del backend.
    async fn pending_for_category(&self, category: &str) -> Result<Vec<ChangeLogEntry>, StoreError>;

    /// Marca todas las entradas como aplicadas en una sola operación.
    /// Todo-o-nada: si algún id no existe no se modifica ninguna
    /// (`NotFound`). Repetir la llamada no cambia nada. Devuelve cuántas
    /// entradas pasaron de pendiente a aplicada.
    async fn mark_applied(&self, ids: &[Uuid]) -> Result<usize, StoreError>;
}

/// Lectura de schemas de entidades con acceso de servicio.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn entity_schema(&self, entity: &SchemaEntity) -> Result<Value, StoreError>;
}
