//! Documentos de procesos: reglas, flujos de usuario, roles y errores.
use doc_core::{DocumentationRenderer, DocumentationType, RenderContext, RenderError, RenderedDocument};
use serde_json::{json, Value};

use crate::markdown::{finish, MarkdownDoc};

/// Secciones del catálogo como JSON (`heading` + ítems).
fn sections_json(ctx: &RenderContext<'_>) -> Vec<Value> {
    ctx.entry
       .sections
       .iter()
       .map(|s| {
           let items: Vec<Value> = s.items.iter().map(|i| json!({ "name": i.name, "summary": i.summary })).collect();
           json!({ "heading": s.heading, "items": items })
       })
       .collect()
}

/// Render común a los documentos que sólo exponen su catálogo.
fn render_catalog_document(ctx: &RenderContext<'_>, key: &str) -> RenderedDocument {
    let mut doc = MarkdownDoc::new();
    doc.document_header(ctx);
    doc.catalog_sections(&ctx.entry.sections);
    doc.recent_changes(ctx);
    finish(ctx, doc, json!({ key: sections_json(ctx) }))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BusinessLogicRenderer;

impl DocumentationRenderer for BusinessLogicRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::BusinessLogic
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        Ok(render_catalog_document(ctx, "rules"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UserWorkflowsRenderer;

impl DocumentationRenderer for UserWorkflowsRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::UserWorkflows
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        let mut doc = MarkdownDoc::new();
        doc.document_header(ctx);
        let mut workflows = Vec::new();
        for section in &ctx.entry.sections {
            doc.heading(2, &section.heading);
            if let Some(intro) = &section.intro {
                doc.paragraph(intro);
            }
            // los flujos son secuencias: pasos numerados
            for (n, step) in section.items.iter().enumerate() {
                doc.paragraph(&format!("{}. **{}**: {}", n + 1, step.name, step.summary));
            }
            let steps: Vec<&str> = section.items.iter().map(|i| i.name.as_str()).collect();
            workflows.push(json!({ "name": section.heading, "steps": steps }));
        }
        doc.recent_changes(ctx);
        Ok(finish(ctx, doc, json!({ "workflows": workflows })))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PermissionsRolesRenderer;

impl DocumentationRenderer for PermissionsRolesRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::PermissionsRoles
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        let roles: Vec<(&str, &str)> = ctx.entry
                                          .sections
                                          .iter()
                                          .flat_map(|s| s.items.iter())
                                          .map(|i| (i.name.as_str(), i.summary.as_str()))
                                          .collect();
        let mut doc = MarkdownDoc::new();
        doc.document_header(ctx);
        doc.heading(2, "Roles");
        let rows: Vec<Vec<String>> = roles.iter().map(|(r, s)| vec![r.to_string(), s.to_string()]).collect();
        doc.table(&["Role", "Access"], &rows);
        doc.recent_changes(ctx);

        let roles: Vec<Value> = roles.iter().map(|(r, s)| json!({ "role": r, "access": s })).collect();
        Ok(finish(ctx, doc, json!({ "roles": roles })))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorHandlingRenderer;

impl DocumentationRenderer for ErrorHandlingRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::ErrorHandling
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        Ok(render_catalog_document(ctx, "error_classes"))
    }
}
