//! Documentos de arquitectura: módulos, integraciones y plantillas.
use doc_core::{CatalogItem, DocumentationRenderer, DocumentationType, RenderContext, RenderError, RenderedDocument,
               TypeEntry};
use serde_json::{json, Value};

use crate::markdown::{finish, MarkdownDoc};

/// Valores de los detalles con forma `"<key>: <value>"`.
fn detail_values<'a>(item: &'a CatalogItem, key: &str) -> Vec<&'a str> {
    item.details
        .iter()
        .filter_map(|d| d.split_once(':'))
        .filter(|(k, _)| k.trim().eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim())
        .collect()
}

fn items<'a>(ctx: &RenderContext<'a>) -> impl Iterator<Item = &'a CatalogItem> {
    let entry: &'a TypeEntry = ctx.entry;
    entry.sections.iter().flat_map(|s| s.items.iter())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ModuleArchitectureRenderer;

impl DocumentationRenderer for ModuleArchitectureRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::ModuleArchitecture
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        let modules: Vec<Value> = items(ctx).map(|m| json!({ "name": m.name,
                                                            "responsibility": m.summary,
                                                            "depends_on": detail_values(m, "Depends on") }))
                                            .collect();
        if modules.is_empty() {
            return Err(RenderError::Failed("module catalog is empty".into()));
        }

        let mut doc = MarkdownDoc::new();
        doc.document_header(ctx);
        doc.catalog_sections(&ctx.entry.sections);

        doc.heading(2, "Dependency Overview");
        let rows: Vec<Vec<String>> = items(ctx).map(|m| {
                                                   let deps = detail_values(m, "Depends on");
                                                   let deps = if deps.is_empty() { "-".to_string() } else { deps.join(", ") };
                                                   vec![m.name.clone(), deps]
                                               })
                                               .collect();
        doc.table(&["Module", "Depends on"], &rows);
        doc.recent_changes(ctx);

        Ok(finish(ctx, doc, json!({ "modules": modules })))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExternalIntegrationsRenderer;

impl DocumentationRenderer for ExternalIntegrationsRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::ExternalIntegrations
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        let mut doc = MarkdownDoc::new();
        doc.document_header(ctx);

        doc.heading(2, "Overview");
        let rows: Vec<Vec<String>> = items(ctx).map(|i| {
                                                   let direction = detail_values(i, "Direction").first().copied().unwrap_or("-");
                                                   let schedule = detail_values(i, "Schedule").first().copied().unwrap_or("on demand");
                                                   vec![i.name.clone(), direction.to_string(), schedule.to_string()]
                                               })
                                               .collect();
        doc.table(&["Integration", "Direction", "Schedule"], &rows);
        doc.catalog_sections(&ctx.entry.sections);
        doc.recent_changes(ctx);

        let integrations: Vec<Value> = items(ctx).map(|i| json!({ "name": i.name,
                                                                 "summary": i.summary,
                                                                 "direction": detail_values(i, "Direction").first() }))
                                                 .collect();
        Ok(finish(ctx, doc, json!({ "integrations": integrations })))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentGenerationRenderer;

impl DocumentationRenderer for DocumentGenerationRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::DocumentGeneration
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        let mut doc = MarkdownDoc::new();
        doc.document_header(ctx);
        doc.catalog_sections(&ctx.entry.sections);

        // plantillas cuyo origen no es una entidad conocida
        let known: Vec<&str> = ctx.catalog.schema_entities().iter().map(|e| e.name.as_str()).collect();
        let mut templates = Vec::new();
        let mut orphans = Vec::new();
        for t in items(ctx) {
            let sources = detail_values(t, "Source");
            for s in &sources {
                if !known.contains(s) {
                    orphans.push(format!("{} -> {s}", t.name));
                }
            }
            templates.push(json!({ "name": t.name, "summary": t.summary, "sources": sources }));
        }
        if !orphans.is_empty() {
            doc.heading(2, "Templates With Unknown Sources");
            for o in &orphans {
                doc.bullet(o);
            }
            doc.blank();
        }
        doc.recent_changes(ctx);

        Ok(finish(ctx, doc, json!({ "templates": templates, "unknown_sources": orphans })))
    }
}
