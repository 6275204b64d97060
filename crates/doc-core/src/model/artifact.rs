//! Artifact de documentación persistido (una fila viva por tipo) y su
//! historial inmutable de versiones.
//!
//! Ciclo de vida de `status`:
//! - (ausente) -> `Generating` al crear la fila.
//! - `Completed | Error` -> `Generating` al regenerar.
//! - `Generating` -> `Completed` (render ok) o `Error` (render falló).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::DocumentationType;

/// Estado del artifact. No existen estados intermedios ni cancelación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    Generating,
    Completed,
    Error,
}

impl ArtifactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactStatus::Generating => "generating",
            ArtifactStatus::Completed => "completed",
            ArtifactStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "generating" => Some(ArtifactStatus::Generating),
            "completed" => Some(ArtifactStatus::Completed),
            "error" => Some(ArtifactStatus::Error),
            _ => None,
        }
    }
}

/// Fila viva del artifact para un `documentation_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationArtifact {
    pub id: Uuid,
    pub documentation_type: DocumentationType,
    /// Título y descripción salen del catálogo; inmutables por tipo.
    pub title: String,
    pub description: String,
    pub status: ArtifactStatus,
    pub content_markdown: Option<String>,
    /// Payload estructurado definido por cada renderer (opaco para el motor).
    pub content_json: Option<Value>,
    /// Longitud en bytes (UTF-8) de `content_markdown` al completar.
    pub file_size_bytes: Option<i64>,
    pub generation_duration_seconds: Option<f64>,
    pub last_generated_at: Option<DateTime<Utc>>,
    /// `None` sólo en filas heredadas; el motor lo trata como 1.
    pub version_number: Option<i32>,
    pub previous_version_id: Option<Uuid>,
    pub changes_summary: Option<String>,
    /// Sólo presente con `status = error`.
    pub error_message: Option<String>,
    /// Identidad del último llamador que disparó una generación.
    pub generated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para crear la fila de un tipo que aún no tiene artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtifact {
    pub documentation_type: DocumentationType,
    pub title: String,
    pub description: String,
    pub version_number: i32,
    pub generated_by: Option<String>,
}

/// Estado final que se persiste en una única escritura tras un render
/// exitoso. El store también agrega la entrada de historial correspondiente.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactCompletion {
    pub content_markdown: String,
    pub content_json: Value,
    pub file_size_bytes: i64,
    pub generation_duration_seconds: f64,
    pub last_generated_at: DateTime<Utc>,
    pub version_number: i32,
    pub previous_version_id: Option<Uuid>,
    pub changes_summary: Option<String>,
}

/// Snapshot inmutable de una versión completada (append-only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationVersion {
    pub id: Uuid,
    pub artifact_id: Uuid,
    pub documentation_type: DocumentationType,
    pub version_number: i32,
    pub content_markdown: String,
    pub content_json: Value,
    pub file_size_bytes: i64,
    pub changes_summary: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl DocumentationVersion {
    /// Construye el snapshot de historial a partir de la escritura final.
    pub fn from_completion(artifact_id: Uuid, documentation_type: DocumentationType, completion: &ArtifactCompletion) -> Self {
        Self { id: Uuid::new_v4(),
               artifact_id,
               documentation_type,
               version_number: completion.version_number,
               content_markdown: completion.content_markdown.clone(),
               content_json: completion.content_json.clone(),
               file_size_bytes: completion.file_size_bytes,
               changes_summary: completion.changes_summary.clone(),
               generated_at: completion.last_generated_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_column_value() {
        for s in [ArtifactStatus::Generating, ArtifactStatus::Completed, ArtifactStatus::Error] {
            assert_eq!(ArtifactStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ArtifactStatus::parse("cancelled"), None);
    }

    #[test]
    fn version_snapshot_copies_completion() {
        let completion = ArtifactCompletion { content_markdown: "# Doc".into(),
                                              content_json: serde_json::json!({"k": 1}),
                                              file_size_bytes: 5,
                                              generation_duration_seconds: 0.2,
                                              last_generated_at: Utc::now(),
                                              version_number: 3,
                                              previous_version_id: None,
                                              changes_summary: Some("a; b".into()) };
        let artifact_id = Uuid::new_v4();
        let v = DocumentationVersion::from_completion(artifact_id, DocumentationType::MasterData, &completion);
        assert_eq!(v.artifact_id, artifact_id);
        assert_eq!(v.version_number, 3);
        assert_eq!(v.file_size_bytes, 5);
        assert_eq!(v.changes_summary.as_deref(), Some("a; b"));
        assert_eq!(v.generated_at, completion.last_generated_at);
    }
}
