//! Contrato de los renderers de contenido.
//!
//! Un renderer es puro: recibe todo lo que necesita en `RenderContext` y
//! produce Markdown + JSON. El motor elige el renderer a través de
//! `RendererSet`; la implementación por defecto vive en `doc-renderers`.
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::catalog::{Catalog, TypeEntry};
use crate::errors::RenderError;
use crate::model::{ChangeLogEntry, DocumentationType, EntitySchemaSnapshot};

pub struct RenderContext<'a> {
    pub doc_type: DocumentationType,
    pub entry: &'a TypeEntry,
    pub catalog: &'a Catalog,
    /// Presente sólo si el renderer declaró `needs_schema`.
    pub schema: Option<&'a EntitySchemaSnapshot>,
    /// Cambios pendientes que esta generación incorpora.
    pub changes: &'a [ChangeLogEntry],
    pub version_number: i32,
    pub generated_at: DateTime<Utc>,
}

impl<'a> RenderContext<'a> {
    pub fn require_schema(&self) -> Result<&'a EntitySchemaSnapshot, RenderError> {
        self.schema.ok_or_else(|| RenderError::MissingSchema(self.doc_type.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub content_markdown: String,
    pub content_json: Value,
}

pub trait DocumentationRenderer: Send + Sync {
    fn doc_type(&self) -> DocumentationType;

    fn needs_schema(&self) -> bool {
        false
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError>;
}

/// Selección de renderer por tipo. Debe cubrir todos los tipos.
pub trait RendererSet: Send + Sync {
    fn renderer(&self, doc_type: DocumentationType) -> &dyn DocumentationRenderer;
}
