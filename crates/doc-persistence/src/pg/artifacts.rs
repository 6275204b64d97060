//! `ArtifactStore` sobre `documentation_artifacts` + `documentation_versions`.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use doc_core::{ArtifactCompletion, ArtifactStatus, ArtifactStore, DocumentationArtifact, DocumentationType,
               DocumentationVersion, NewArtifact, StoreError};
use serde_json::Value;
use uuid::Uuid;

use super::{run_blocking, PgPool};
use crate::error::PersistenceError;
use crate::schema::{documentation_artifacts, documentation_versions};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = documentation_artifacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct ArtifactRow {
    id: Uuid,
    documentation_type: String,
    title: String,
    description: String,
    status: String,
    content_markdown: Option<String>,
    content_json: Option<Value>,
    file_size_bytes: Option<i64>,
    generation_duration_seconds: Option<f64>,
    last_generated_at: Option<DateTime<Utc>>,
    version_number: Option<i32>,
    previous_version_id: Option<Uuid>,
    changes_summary: Option<String>,
    error_message: Option<String>,
    generated_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_type(raw: &str) -> Result<DocumentationType, PersistenceError> {
    raw.parse().map_err(|_| PersistenceError::InvalidRow(format!("documentation_type '{raw}'")))
}

impl TryFrom<ArtifactRow> for DocumentationArtifact {
    type Error = PersistenceError;

    fn try_from(row: ArtifactRow) -> Result<Self, Self::Error> {
        let status = ArtifactStatus::parse(&row.status).ok_or_else(|| PersistenceError::InvalidRow(format!("status '{}'", row.status)))?;
        Ok(DocumentationArtifact { id: row.id,
                                   documentation_type: parse_type(&row.documentation_type)?,
                                   title: row.title,
                                   description: row.description,
                                   status,
                                   content_markdown: row.content_markdown,
                                   content_json: row.content_json,
                                   file_size_bytes: row.file_size_bytes,
                                   generation_duration_seconds: row.generation_duration_seconds,
                                   last_generated_at: row.last_generated_at,
                                   version_number: row.version_number,
                                   previous_version_id: row.previous_version_id,
                                   changes_summary: row.changes_summary,
                                   error_message: row.error_message,
                                   generated_by: row.generated_by,
                                   created_at: row.created_at,
                                   updated_at: row.updated_at })
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = documentation_versions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct VersionRow {
    id: Uuid,
    artifact_id: Uuid,
    documentation_type: String,
    version_number: i32,
    content_markdown: String,
    content_json: Value,
    file_size_bytes: i64,
    changes_summary: Option<String>,
    generated_at: DateTime<Utc>,
}

impl TryFrom<VersionRow> for DocumentationVersion {
    type Error = PersistenceError;

    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        Ok(DocumentationVersion { id: row.id,
                                  artifact_id: row.artifact_id,
                                  documentation_type: parse_type(&row.documentation_type)?,
                                  version_number: row.version_number,
                                  content_markdown: row.content_markdown,
                                  content_json: row.content_json,
                                  file_size_bytes: row.file_size_bytes,
                                  changes_summary: row.changes_summary,
                                  generated_at: row.generated_at })
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = documentation_artifacts)]
struct NewArtifactRow<'a> {
    documentation_type: &'a str,
    title: &'a str,
    description: &'a str,
    status: &'a str,
    version_number: i32,
    generated_by: Option<&'a str>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = documentation_versions)]
struct NewVersionRow<'a> {
    id: Uuid,
    artifact_id: Uuid,
    documentation_type: &'a str,
    version_number: i32,
    content_markdown: &'a str,
    content_json: &'a Value,
    file_size_bytes: i64,
    changes_summary: Option<&'a str>,
    generated_at: DateTime<Utc>,
}

/// `None` en un campo simple no modifica la columna; `Some(None)` la pone en
/// NULL.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = documentation_artifacts)]
struct GeneratingChangeset<'a> {
    status: &'a str,
    error_message: Option<Option<&'a str>>,
    generated_by: Option<&'a str>,
    updated_at: DateTime<Utc>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = documentation_artifacts)]
struct CompletionChangeset<'a> {
    status: &'a str,
    content_markdown: &'a str,
    content_json: &'a Value,
    file_size_bytes: i64,
    generation_duration_seconds: f64,
    last_generated_at: DateTime<Utc>,
    version_number: i32,
    previous_version_id: Option<Option<Uuid>>,
    changes_summary: Option<Option<&'a str>>,
    error_message: Option<Option<&'a str>>,
    updated_at: DateTime<Utc>,
}

fn artifact_not_found(id: Uuid) -> impl Fn(PersistenceError) -> StoreError {
    move |e| match e {
        PersistenceError::NotFound => StoreError::NotFound(format!("documentation artifact {id}")),
        other => other.into(),
    }
}

#[derive(Clone)]
pub struct PgArtifactStore {
    pool: PgPool,
}

impl PgArtifactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtifactStore for PgArtifactStore {
    async fn find_by_type(&self, doc_type: DocumentationType) -> Result<Option<DocumentationArtifact>, StoreError> {
        let row = run_blocking(&self.pool, "artifacts.find_by_type", move |conn| {
                      documentation_artifacts::table.filter(documentation_artifacts::documentation_type.eq(doc_type.as_str()))
                                                    .select(ArtifactRow::as_select())
                                                    .first(conn)
                                                    .optional()
                                                    .map_err(PersistenceError::from)
                  }).await?;
        Ok(row.map(DocumentationArtifact::try_from).transpose()?)
    }

    async fn create(&self, new: NewArtifact) -> Result<DocumentationArtifact, StoreError> {
        let row = run_blocking(&self.pool, "artifacts.create", move |conn| {
                      diesel::insert_into(documentation_artifacts::table).values(NewArtifactRow { documentation_type: new.documentation_type.as_str(),
                                                                                                  title: &new.title,
                                                                                                  description: &new.description,
                                                                                                  status: ArtifactStatus::Generating.as_str(),
                                                                                                  version_number: new.version_number,
                                                                                                  generated_by: new.generated_by.as_deref() })
                                                                         .returning(ArtifactRow::as_returning())
                                                                         .get_result(conn)
                                                                         .map_err(PersistenceError::from)
                  }).await?;
        Ok(DocumentationArtifact::try_from(row)?)
    }

    async fn mark_generating(&self, id: Uuid, generated_by: Option<&str>) -> Result<DocumentationArtifact, StoreError> {
        let generated_by = generated_by.map(str::to_string);
        let row = run_blocking(&self.pool, "artifacts.mark_generating", move |conn| {
                      let changes = GeneratingChangeset { status: ArtifactStatus::Generating.as_str(),
                                                          error_message: Some(None),
                                                          generated_by: generated_by.as_deref(),
                                                          updated_at: Utc::now() };
                      diesel::update(documentation_artifacts::table.find(id)).set(&changes)
                                                                             .returning(ArtifactRow::as_returning())
                                                                             .get_result(conn)
                                                                             .map_err(PersistenceError::from)
                  }).await
                    .map_err(artifact_not_found(id))?;
        Ok(DocumentationArtifact::try_from(row)?)
    }

    async fn complete(&self, id: Uuid, completion: ArtifactCompletion) -> Result<DocumentationArtifact, StoreError> {
        let row = run_blocking(&self.pool, "artifacts.complete", move |conn| {
                      conn.transaction::<_, PersistenceError, _>(|tx| {
                              let changes = CompletionChangeset { status: ArtifactStatus::Completed.as_str(),
                                                                  content_markdown: &completion.content_markdown,
                                                                  content_json: &completion.content_json,
                                                                  file_size_bytes: completion.file_size_bytes,
                                                                  generation_duration_seconds: completion.generation_duration_seconds,
                                                                  last_generated_at: completion.last_generated_at,
                                                                  version_number: completion.version_number,
                                                                  previous_version_id: Some(completion.previous_version_id),
                                                                  changes_summary: Some(completion.changes_summary.as_deref()),
                                                                  error_message: Some(None),
                                                                  updated_at: Utc::now() };
                              let row: ArtifactRow = diesel::update(documentation_artifacts::table.find(id)).set(&changes)
                                                                                                            .returning(ArtifactRow::as_returning())
                                                                                                            .get_result(tx)?;
                              diesel::insert_into(documentation_versions::table).values(NewVersionRow { id: Uuid::new_v4(),
                                                                                                        artifact_id: row.id,
                                                                                                        documentation_type: &row.documentation_type,
                                                                                                        version_number: completion.version_number,
                                                                                                        content_markdown: &completion.content_markdown,
                                                                                                        content_json: &completion.content_json,
                                                                                                        file_size_bytes: completion.file_size_bytes,
                                                                                                        changes_summary: completion.changes_summary.as_deref(),
                                                                                                        generated_at: completion.last_generated_at })
                                                                                .execute(tx)?;
                              Ok(row)
                          })
                  }).await
                    .map_err(artifact_not_found(id))?;
        Ok(DocumentationArtifact::try_from(row)?)
    }

    async fn mark_error(&self, id: Uuid, message: &str) -> Result<(), StoreError> {
        let message = message.to_string();
        let updated = run_blocking(&self.pool, "artifacts.mark_error", move |conn| {
                          diesel::update(documentation_artifacts::table.find(id)).set((documentation_artifacts::status.eq(ArtifactStatus::Error.as_str()),
                                                                                       documentation_artifacts::error_message.eq(message.as_str()),
                                                                                       documentation_artifacts::updated_at.eq(Utc::now())))
                                                                                 .execute(conn)
                                                                                 .map_err(PersistenceError::from)
                      }).await?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("documentation artifact {id}")));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DocumentationArtifact>, StoreError> {
        let rows = run_blocking(&self.pool, "artifacts.list", |conn| {
                       documentation_artifacts::table.select(ArtifactRow::as_select())
                                                     .load(conn)
                                                     .map_err(PersistenceError::from)
                   }).await?;
        let mut artifacts = rows.into_iter()
                                .map(DocumentationArtifact::try_from)
                                .collect::<Result<Vec<_>, _>>()?;
        artifacts.sort_by_key(|a| a.documentation_type);
        Ok(artifacts)
    }

    async fn list_versions(&self, doc_type: DocumentationType) -> Result<Vec<DocumentationVersion>, StoreError> {
        let rows = run_blocking(&self.pool, "artifacts.list_versions", move |conn| {
                       documentation_versions::table.filter(documentation_versions::documentation_type.eq(doc_type.as_str()))
                                                    .order(documentation_versions::version_number.asc())
                                                    .select(VersionRow::as_select())
                                                    .load(conn)
                                                    .map_err(PersistenceError::from)
                   }).await?;
        Ok(rows.into_iter()
               .map(DocumentationVersion::try_from)
               .collect::<Result<Vec<_>, _>>()?)
    }
}
