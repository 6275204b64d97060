//! Resolución de versión y transición a `generating`.
use uuid::Uuid;

use crate::catalog::TypeEntry;
use crate::constants::INITIAL_VERSION;
use crate::errors::StoreError;
use crate::model::{DocumentationArtifact, DocumentationType, NewArtifact};
use crate::repo::ArtifactStore;

/// Resultado de resolver la versión de la próxima generación.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Fila viva actual, si existe.
    pub existing_id: Option<Uuid>,
    pub version_number: i32,
    /// Id de la fila previa (la misma fila viva) o `None` en la primera
    /// generación.
    pub previous_version_id: Option<Uuid>,
}

/// Siguiente número de versión. Filas heredadas sin versión (o con 0)
/// cuentan como versión 1.
pub fn next_version(existing: Option<&DocumentationArtifact>) -> i32 {
    match existing {
        None => INITIAL_VERSION,
        Some(a) => {
            let current = a.version_number.filter(|v| *v > 0).unwrap_or(INITIAL_VERSION);
            current + 1
        }
    }
}

pub async fn resolve_version(store: &dyn ArtifactStore, doc_type: DocumentationType) -> Result<ResolvedVersion, StoreError> {
    let existing = store.find_by_type(doc_type).await?;
    Ok(ResolvedVersion { existing_id: existing.as_ref().map(|a| a.id),
                         version_number: next_version(existing.as_ref()),
                         previous_version_id: existing.as_ref().map(|a| a.id) })
}

/// Crea la fila (primera generación) o marca la existente como
/// `generating`.
pub async fn begin_generation(store: &dyn ArtifactStore,
                              doc_type: DocumentationType,
                              entry: &TypeEntry,
                              resolved: &ResolvedVersion,
                              requested_by: Option<&str>)
                              -> Result<DocumentationArtifact, StoreError> {
    match resolved.existing_id {
        Some(id) => store.mark_generating(id, requested_by).await,
        None => {
            store.create(NewArtifact { documentation_type: doc_type,
                                       title: entry.title.clone(),
                                       description: entry.description.clone(),
                                       version_number: resolved.version_number,
                                       generated_by: requested_by.map(str::to_string) })
                 .await
        }
    }
}
