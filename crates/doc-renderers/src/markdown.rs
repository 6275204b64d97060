//! Helpers compartidos para armar Markdown y el JSON de salida.
use doc_core::constants::GENERATOR_VERSION;
use doc_core::{CatalogSection, RenderContext, RenderedDocument};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

/// Acumulador de Markdown.
#[derive(Debug, Default)]
pub struct MarkdownDoc {
    out: String,
}

impl MarkdownDoc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega `text` y un salto de línea.
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.out.push_str(text);
        self.out.push('\n');
        self
    }

    pub fn heading(&mut self, level: usize, text: &str) -> &mut Self {
        self.line(&format!("{} {text}\n", "#".repeat(level.clamp(1, 6))));
        self
    }

    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        self.line(&format!("{text}\n"));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.line(&format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> &mut Self {
        self.line(&format!("| {} |", headers.join(" | ")));
        self.line(&format!("|{}|", vec!["---"; headers.len()].join("|")));
        for row in rows {
            let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
            self.line(&format!("| {} |", cells.join(" | ")));
        }
        self.out.push('\n');
        self
    }

    /// Título, descripción y metadatos de la generación.
    pub fn document_header(&mut self, ctx: &RenderContext<'_>) -> &mut Self {
        self.heading(1, &ctx.entry.title);
        self.paragraph(&ctx.entry.description);
        self.line(&format!("_Version {} generated {}_\n",
                           ctx.version_number,
                           ctx.generated_at.format("%Y-%m-%d %H:%M UTC")));
        self
    }

    /// Secciones del catálogo tal cual (encabezado, intro e ítems).
    pub fn catalog_sections(&mut self, sections: &[CatalogSection]) -> &mut Self {
        for section in sections {
            self.heading(2, &section.heading);
            if let Some(intro) = &section.intro {
                self.paragraph(intro);
            }
            for item in &section.items {
                self.bullet(&format!("**{}**: {}", item.name, item.summary));
                for detail in &item.details {
                    self.line(&format!("  - {detail}"));
                }
            }
            self.blank();
        }
        self
    }

    /// Sección "Recent Changes" con los cambios pendientes incorporados.
    pub fn recent_changes(&mut self, ctx: &RenderContext<'_>) -> &mut Self {
        if ctx.changes.is_empty() {
            return self;
        }
        self.heading(2, "Recent Changes");
        for change in ctx.changes {
            match &change.affected_entity {
                Some(entity) => self.bullet(&format!("{} ({entity})", change.description)),
                None => self.bullet(&change.description),
            };
        }
        self.blank()
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

/// Envuelve Markdown y cuerpo JSON en el documento final. El JSON siempre
/// lleva los metadatos comunes; `body` agrega los campos del renderer.
pub fn finish(ctx: &RenderContext<'_>, doc: MarkdownDoc, body: Value) -> RenderedDocument {
    let content_markdown = doc.into_string();
    let digest = Sha256::digest(content_markdown.as_bytes());
    let changes: Vec<Value> = ctx.changes
                                 .iter()
                                 .map(|c| json!({ "id": c.id, "description": c.description, "entity": c.affected_entity }))
                                 .collect();

    let mut json = Map::new();
    json.insert("documentation_type".into(), json!(ctx.doc_type));
    json.insert("title".into(), json!(ctx.entry.title));
    json.insert("version".into(), json!(ctx.version_number));
    json.insert("generated_at".into(), json!(ctx.generated_at));
    json.insert("generator".into(), json!(GENERATOR_VERSION));
    json.insert("content_sha256".into(), json!(hex::encode(digest)));
    json.insert("changes".into(), Value::Array(changes));
    if let Value::Object(extra) = body {
        json.extend(extra);
    }
    RenderedDocument { content_markdown,
                       content_json: Value::Object(json) }
}

/// Tipo de columna y nulabilidad a partir de la entrada `properties`.
pub fn field_type(spec: &Value) -> (String, bool) {
    let ty = spec.get("type").and_then(Value::as_str).unwrap_or("unknown").to_string();
    let nullable = spec.get("nullable").and_then(Value::as_bool).unwrap_or(true);
    (ty, nullable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_escapes_pipes() {
        let mut doc = MarkdownDoc::new();
        doc.table(&["a", "b"], &[vec!["x|y".into(), "z".into()]]);
        let out = doc.into_string();
        assert!(out.contains("| a | b |"));
        assert!(out.contains("|---|---|"));
        assert!(out.contains("| x\\|y | z |"));
    }

    #[test]
    fn blocks_are_newline_terminated() {
        let mut doc = MarkdownDoc::new();
        doc.heading(9, "Title").paragraph("Body").bullet("one").line("  - nested");
        assert_eq!(doc.into_string(), "###### Title\n\nBody\n\n- one\n  - nested\n");
    }

    #[test]
    fn field_type_defaults() {
        assert_eq!(field_type(&json!({"type": "text", "nullable": false})), ("text".to_string(), false));
        assert_eq!(field_type(&json!({})), ("unknown".to_string(), true));
    }
}
