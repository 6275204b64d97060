use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use doc_core::{ArtifactStatus, ArtifactStore, ChangeLogEntry, ChangeLogStore, DocumentationRenderer, DocumentationType,
               EngineError, GenerationEngine, InMemoryArtifactStore, InMemoryChangeLogStore, InMemorySchemaSource,
               NewChangeLogEntry, RenderContext, RenderError, RenderedDocument, RendererSet, StoreError};
use serde_json::json;
use uuid::Uuid;

/// Renderer de prueba: lista cambios y entidades; puede fallar a pedido.
struct StubRenderer {
    doc_type: DocumentationType,
    needs_schema: bool,
    fail: Arc<AtomicBool>,
}

impl DocumentationRenderer for StubRenderer {
    fn doc_type(&self) -> DocumentationType {
        self.doc_type
    }

    fn needs_schema(&self) -> bool {
        self.needs_schema
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RenderError::Failed("template exploded".into()));
        }
        let mut md = format!("# {} (v{})\n", ctx.entry.title, ctx.version_number);
        for c in ctx.changes {
            md.push_str(&format!("- {}\n", c.description));
        }
        let entities = match ctx.schema {
            Some(s) => s.entity_names().into_iter().map(str::to_string).collect::<Vec<_>>(),
            None => vec![],
        };
        for e in &entities {
            md.push_str(&format!("## {e}\n"));
        }
        Ok(RenderedDocument { content_markdown: md,
                              content_json: json!({ "entities": entities }) })
    }
}

struct StubRenderers {
    renderers: Vec<StubRenderer>,
}

impl StubRenderers {
    fn new(fail: Arc<AtomicBool>) -> Self {
        let renderers = DocumentationType::ALL.iter()
                                              .map(|t| StubRenderer { doc_type: *t,
                                                                      needs_schema: *t == DocumentationType::DatabaseStructure,
                                                                      fail: fail.clone() })
                                              .collect();
        Self { renderers }
    }
}

impl RendererSet for StubRenderers {
    fn renderer(&self, doc_type: DocumentationType) -> &dyn DocumentationRenderer {
        self.renderers.iter().find(|r| r.doc_type == doc_type).expect("renderer for every type")
    }
}

struct Harness {
    engine: Arc<GenerationEngine>,
    artifacts: InMemoryArtifactStore,
    changes: InMemoryChangeLogStore,
    fail: Arc<AtomicBool>,
}

fn harness_with(schema: InMemorySchemaSource, change_log: Option<Arc<dyn ChangeLogStore>>) -> Harness {
    let artifacts = InMemoryArtifactStore::new();
    let changes = InMemoryChangeLogStore::new();
    let fail = Arc::new(AtomicBool::new(false));
    let change_log: Arc<dyn ChangeLogStore> = change_log.unwrap_or_else(|| Arc::new(changes.clone()));
    let engine = GenerationEngine::builder().artifacts(Arc::new(artifacts.clone()))
                                            .change_log(change_log)
                                            .schema_source(Arc::new(schema))
                                            .renderers(Arc::new(StubRenderers::new(fail.clone())))
                                            .build()
                                            .expect("engine");
    Harness { engine: Arc::new(engine),
              artifacts,
              changes,
              fail }
}

fn harness() -> Harness {
    harness_with(InMemorySchemaSource::new().with_schema("Building", json!({"properties": {"name": {"type": "text"}}})),
                 None)
}

#[tokio::test]
async fn first_generation_creates_version_one() {
    let h = harness();
    let outcome = h.engine.generate(DocumentationType::ModuleArchitecture, Some("alice")).await.unwrap();
    assert_eq!(outcome.version_number, 1);

    let row = h.artifacts.find_by_type(DocumentationType::ModuleArchitecture).await.unwrap().unwrap();
    assert_eq!(row.id, outcome.documentation_id);
    assert_eq!(row.status, ArtifactStatus::Completed);
    assert_eq!(row.version_number, Some(1));
    assert_eq!(row.previous_version_id, None);
    assert_eq!(row.title, "Module Architecture");
    assert_eq!(row.generated_by.as_deref(), Some("alice"));
    assert!(row.last_generated_at.is_some());
    assert_eq!(row.error_message, None);
}

#[tokio::test]
async fn regeneration_increments_version_and_keeps_single_row() {
    let h = harness();
    let first = h.engine.generate(DocumentationType::BusinessLogic, None).await.unwrap();
    let second = h.engine.generate(DocumentationType::BusinessLogic, None).await.unwrap();
    assert_eq!(second.version_number, 2);
    assert_eq!(second.documentation_id, first.documentation_id);

    let row = h.artifacts.find_by_type(DocumentationType::BusinessLogic).await.unwrap().unwrap();
    assert_eq!(row.previous_version_id, Some(first.documentation_id));
    assert_eq!(h.artifacts.list().await.unwrap().len(), 1);

    let history = h.engine.versions(DocumentationType::BusinessLogic).await.unwrap();
    let numbers: Vec<i32> = history.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn file_size_is_utf8_byte_length() {
    let h = harness();
    h.changes.record(NewChangeLogEntry::new("modules", "Größe geändert")).await;
    let outcome = h.engine.generate(DocumentationType::ModuleArchitecture, None).await.unwrap();
    let row = h.artifacts.find_by_type(DocumentationType::ModuleArchitecture).await.unwrap().unwrap();
    let md = row.content_markdown.unwrap();
    assert_eq!(outcome.file_size_bytes, md.len() as i64);
    assert!(md.len() > md.chars().count());
    assert!(outcome.generation_duration_seconds >= 0.0);
}

#[tokio::test]
async fn pending_changes_are_summarized_and_marked_applied() {
    let h = harness();
    h.changes.record(NewChangeLogEntry::new("database", "Added zip_code field").affecting("Building")).await;
    h.changes.record(NewChangeLogEntry::new("database", "Renamed owner to company_name")).await;
    h.changes.record(NewChangeLogEntry::new("modules", "Split finance module")).await;

    let outcome = h.engine.generate(DocumentationType::DatabaseStructure, Some("alice")).await.unwrap();
    assert_eq!(outcome.changes_applied, 2);

    let row = h.artifacts.find_by_type(DocumentationType::DatabaseStructure).await.unwrap().unwrap();
    assert_eq!(row.changes_summary.as_deref(), Some("Added zip_code field; Renamed owner to company_name"));

    let all = h.changes.all().await;
    let applied: Vec<bool> = all.iter().map(|e| e.applied).collect();
    assert_eq!(applied, vec![true, true, false]);

    // segunda corrida: sin cambios pendientes en "database"
    let again = h.engine.generate(DocumentationType::DatabaseStructure, None).await.unwrap();
    assert_eq!(again.changes_applied, 0);
    let row = h.artifacts.find_by_type(DocumentationType::DatabaseStructure).await.unwrap().unwrap();
    assert_eq!(row.changes_summary, None);
}

#[tokio::test]
async fn unmapped_type_leaves_change_log_untouched() {
    let h = harness();
    h.changes.record(NewChangeLogEntry::new("database", "Added zip_code field")).await;
    let outcome = h.engine.generate(DocumentationType::ErrorHandling, None).await.unwrap();
    assert_eq!(outcome.changes_applied, 0);
    assert!(h.changes.all().await.iter().all(|e| !e.applied));
    let row = h.artifacts.find_by_type(DocumentationType::ErrorHandling).await.unwrap().unwrap();
    assert_eq!(row.changes_summary, None);
}

#[tokio::test]
async fn render_failure_marks_artifact_error_and_keeps_changes_pending() {
    let h = harness();
    h.changes.record(NewChangeLogEntry::new("modules", "Split finance module")).await;
    h.fail.store(true, Ordering::SeqCst);

    let err = h.engine.generate(DocumentationType::ModuleArchitecture, None).await.unwrap_err();
    assert_eq!(err.to_string(), "template exploded");

    let row = h.artifacts.find_by_type(DocumentationType::ModuleArchitecture).await.unwrap().unwrap();
    assert_eq!(row.status, ArtifactStatus::Error);
    assert_eq!(row.error_message.as_deref(), Some("template exploded"));
    assert!(h.changes.all().await.iter().all(|e| !e.applied));
    assert!(h.engine.versions(DocumentationType::ModuleArchitecture).await.unwrap().is_empty());

    // recuperación: la siguiente corrida completa y limpia el error
    h.fail.store(false, Ordering::SeqCst);
    let outcome = h.engine.generate(DocumentationType::ModuleArchitecture, None).await.unwrap();
    assert_eq!(outcome.version_number, 2);
    assert_eq!(outcome.changes_applied, 1);
    let row = h.artifacts.find_by_type(DocumentationType::ModuleArchitecture).await.unwrap().unwrap();
    assert_eq!(row.status, ArtifactStatus::Completed);
    assert_eq!(row.error_message, None);
}

#[tokio::test]
async fn schema_failures_are_isolated() {
    let schema = InMemorySchemaSource::new().with_schema("Building", json!({"properties": {}}))
                                            .with_schema("Unit", json!({"properties": {}}))
                                            .failing_on("Unit");
    let h = harness_with(schema, None);
    h.engine.generate(DocumentationType::DatabaseStructure, None).await.unwrap();
    let row = h.artifacts.find_by_type(DocumentationType::DatabaseStructure).await.unwrap().unwrap();
    assert_eq!(row.content_json.unwrap()["entities"], json!(["Building"]));
}

#[tokio::test]
async fn renderers_without_schema_skip_introspection() {
    let h = harness();
    h.engine.generate(DocumentationType::UserWorkflows, None).await.unwrap();
    let row = h.artifacts.find_by_type(DocumentationType::UserWorkflows).await.unwrap().unwrap();
    assert_eq!(row.content_json.unwrap()["entities"], json!([]));
}

struct BrokenChangeLog;

#[async_trait]
impl ChangeLogStore for BrokenChangeLog {
    async fn pending_for_category(&self, _category: &str) -> Result<Vec<ChangeLogEntry>, StoreError> {
        Err(StoreError::Backend("change log unavailable".into()))
    }

    async fn mark_applied(&self, _ids: &[Uuid]) -> Result<usize, StoreError> {
        Err(StoreError::Backend("change log unavailable".into()))
    }
}

#[tokio::test]
async fn failure_before_generating_touches_no_artifact() {
    let h = harness_with(InMemorySchemaSource::new(), Some(Arc::new(BrokenChangeLog)));
    let err = h.engine.generate(DocumentationType::MasterData, None).await.unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::Backend(_))));
    assert!(h.artifacts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_generations_of_one_type_are_serialized() {
    let h = harness();
    let a = {
        let engine = h.engine.clone();
        tokio::spawn(async move { engine.generate(DocumentationType::PermissionsRoles, None).await })
    };
    let b = {
        let engine = h.engine.clone();
        tokio::spawn(async move { engine.generate(DocumentationType::PermissionsRoles, None).await })
    };
    let mut versions = vec![a.await.unwrap().unwrap().version_number,
                            b.await.unwrap().unwrap().version_number];
    versions.sort();
    assert_eq!(versions, vec![1, 2]);
    assert_eq!(h.artifacts.list().await.unwrap().len(), 1);
}
