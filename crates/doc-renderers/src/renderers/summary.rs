//! Resumen ejecutivo: cifras agregadas del schema y del catálogo.
use doc_core::{DocumentationRenderer, DocumentationType, RenderContext, RenderError, RenderedDocument};
use serde_json::json;

use crate::markdown::{finish, MarkdownDoc};

#[derive(Debug, Default, Clone, Copy)]
pub struct ExecutiveSummaryRenderer;

impl DocumentationRenderer for ExecutiveSummaryRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::ExecutiveSummary
    }

    fn needs_schema(&self) -> bool {
        true
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        let snapshot = ctx.require_schema()?;
        let configured = ctx.catalog.schema_entities().len();
        let documented_types = DocumentationType::ALL.len();

        let mut doc = MarkdownDoc::new();
        doc.document_header(ctx);
        doc.heading(2, "Key Figures");
        doc.table(&["Metric", "Value"],
                  &[vec!["Entities".into(), format!("{} of {configured}", snapshot.len())],
                    vec!["Fields".into(), snapshot.total_fields().to_string()],
                    vec!["Documentation types".into(), documented_types.to_string()],
                    vec!["Changes in this version".into(), ctx.changes.len().to_string()]]);
        doc.catalog_sections(&ctx.entry.sections);
        doc.recent_changes(ctx);

        Ok(finish(ctx,
                  doc,
                  json!({ "metrics": { "entities": snapshot.len(),
                                       "entities_configured": configured,
                                       "fields": snapshot.total_fields(),
                                       "documentation_types": documented_types,
                                       "changes": ctx.changes.len() } })))
    }
}
