//! Endpoints de documentación: generación y lectura.
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use doc_core::{ArtifactStatus, DocumentationArtifact, DocumentationType, DocumentationVersion};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::auth::Caller;
use crate::api::state::AppState;
use crate::errors::ApiError;

const NOT_FOUND: &str = "Documentation not found";

#[derive(Deserialize, Default)]
pub struct GenerateRequest {
    #[serde(default)]
    pub documentation_type: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct GenerateResponse {
    pub success: bool,
    pub documentation_id: Uuid,
    pub file_size_bytes: i64,
    pub generation_duration_seconds: f64,
}

/// Metadatos de un artifact sin los cuerpos de contenido.
#[derive(Serialize, Debug)]
pub struct ArtifactSummary {
    pub id: Uuid,
    pub documentation_type: DocumentationType,
    pub title: String,
    pub description: String,
    pub status: ArtifactStatus,
    pub version_number: Option<i32>,
    pub file_size_bytes: Option<i64>,
    pub last_generated_at: Option<DateTime<Utc>>,
    pub changes_summary: Option<String>,
    pub error_message: Option<String>,
}

impl From<DocumentationArtifact> for ArtifactSummary {
    fn from(a: DocumentationArtifact) -> Self {
        Self { id: a.id,
               documentation_type: a.documentation_type,
               title: a.title,
               description: a.description,
               status: a.status,
               version_number: a.version_number,
               file_size_bytes: a.file_size_bytes,
               last_generated_at: a.last_generated_at,
               changes_summary: a.changes_summary,
               error_message: a.error_message }
    }
}

/// Cuerpo vacío o `documentation_type` ausente/en blanco => 400. JSON inválido => 400.
fn requested_type(body: &Bytes) -> Result<String, ApiError> {
    let request: GenerateRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateRequest::default()
    } else {
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?
    };
    request.documentation_type
           .filter(|t| !t.trim().is_empty())
           .ok_or_else(|| ApiError::BadRequest("documentation_type required".into()))
}

pub async fn generate(State(state): State<Arc<AppState>>, caller: Caller, body: Bytes) -> Result<Json<GenerateResponse>, ApiError> {
    let raw_type = requested_type(&body)?;
    let doc_type: DocumentationType = raw_type.parse().map_err(|e: doc_core::EngineError| {
                                                          error!(caller = %caller.id, error = %e, "generation rejected");
                                                          ApiError::from(e)
                                                      })?;

    info!(caller = %caller.id, %doc_type, "generation requested");
    let outcome = state.engine
                       .generate(doc_type, Some(&caller.id))
                       .await
                       .map_err(|e| {
                           error!(caller = %caller.id, %doc_type, error = %e, "generation failed");
                           ApiError::from(e)
                       })?;

    Ok(Json(GenerateResponse { success: true,
                               documentation_id: outcome.documentation_id,
                               file_size_bytes: outcome.file_size_bytes,
                               generation_duration_seconds: outcome.generation_duration_seconds }))
}

/// Tipos desconocidos en rutas de lectura se tratan como "no encontrado".
fn path_type(raw: &str) -> Result<DocumentationType, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(NOT_FOUND.into()))
}

pub async fn list(State(state): State<Arc<AppState>>, _caller: Caller) -> Result<Json<Vec<ArtifactSummary>>, ApiError> {
    let artifacts = state.engine.list().await?;
    Ok(Json(artifacts.into_iter().map(ArtifactSummary::from).collect()))
}

pub async fn get_one(State(state): State<Arc<AppState>>,
                     _caller: Caller,
                     Path(documentation_type): Path<String>)
                     -> Result<Json<DocumentationArtifact>, ApiError> {
    let doc_type = path_type(&documentation_type)?;
    state.engine
         .artifact(doc_type)
         .await?
         .map(Json)
         .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))
}

pub async fn versions(State(state): State<Arc<AppState>>,
                      _caller: Caller,
                      Path(documentation_type): Path<String>)
                      -> Result<Json<Vec<DocumentationVersion>>, ApiError> {
    let doc_type = path_type(&documentation_type)?;
    Ok(Json(state.engine.versions(doc_type).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_missing_type_is_a_bad_request() {
        let required = ApiError::BadRequest("documentation_type required".into());
        assert_eq!(requested_type(&Bytes::from_static(b"")).unwrap_err(), required);
        assert_eq!(requested_type(&Bytes::from_static(b"  \n")).unwrap_err(), required);
        assert_eq!(requested_type(&Bytes::from_static(b"{}")).unwrap_err(), required);
        assert_eq!(requested_type(&Bytes::from_static(br#"{"documentation_type":""}"#)).unwrap_err(), required);
        assert_eq!(requested_type(&Bytes::from_static(br#"{"documentation_type":"  "}"#)).unwrap_err(), required);
        assert_eq!(requested_type(&Bytes::from_static(br#"{"documentation_type":null}"#)).unwrap_err(), required);
    }

    #[test]
    fn invalid_json_is_a_bad_request() {
        assert!(matches!(requested_type(&Bytes::from_static(b"{nope")), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn passes_through_unvalidated_type() {
        assert_eq!(requested_type(&Bytes::from_static(br#"{"documentation_type":"foo"}"#)).unwrap(), "foo");
    }
}
