//! Documentos derivados del schema de entidades.
use doc_core::{DocumentationRenderer, DocumentationType, EntitySchemaSnapshot, RenderContext, RenderError,
               RenderedDocument};
use serde_json::{json, Value};

use crate::markdown::{field_type, finish, MarkdownDoc};

fn entity_json(snapshot: &EntitySchemaSnapshot, name: &str) -> Value {
    let fields: Vec<Value> = snapshot.fields(name)
                                     .into_iter()
                                     .map(|(field, spec)| {
                                         let (ty, nullable) = field_type(spec);
                                         json!({ "name": field, "type": ty, "nullable": nullable })
                                     })
                                     .collect();
    json!({ "name": name, "fields": fields, "required": snapshot.required_fields(name) })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DatabaseStructureRenderer;

impl DocumentationRenderer for DatabaseStructureRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::DatabaseStructure
    }

    fn needs_schema(&self) -> bool {
        true
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        let snapshot = ctx.require_schema()?;
        let mut doc = MarkdownDoc::new();
        doc.document_header(ctx);
        doc.paragraph(&format!("{} entities, {} fields in total.", snapshot.len(), snapshot.total_fields()));

        doc.heading(2, "Entities");
        for (name, _) in snapshot.iter() {
            doc.heading(3, name);
            let required = snapshot.required_fields(name);
            let rows: Vec<Vec<String>> = snapshot.fields(name)
                                                 .into_iter()
                                                 .map(|(field, spec)| {
                                                     let (ty, nullable) = field_type(spec);
                                                     let req = if required.contains(&field) { "yes" } else { "no" };
                                                     vec![field.to_string(), ty, nullable.to_string(), req.to_string()]
                                                 })
                                                 .collect();
            if rows.is_empty() {
                doc.paragraph("_No fields reported._");
            } else {
                doc.table(&["Field", "Type", "Nullable", "Required"], &rows);
            }
        }

        let missing: Vec<&str> = ctx.catalog
                                    .schema_entities()
                                    .iter()
                                    .map(|e| e.name.as_str())
                                    .filter(|n| !snapshot.contains(n))
                                    .collect();
        if !missing.is_empty() {
            doc.heading(2, "Unavailable Entities");
            for name in &missing {
                doc.bullet(name);
            }
            doc.blank();
        }

        doc.catalog_sections(&ctx.entry.sections);

        if !ctx.catalog.enum_meanings().is_empty() {
            doc.heading(2, "Enum Values");
            for (field, values) in ctx.catalog.enum_meanings() {
                let rows: Vec<Vec<String>> = values.iter().map(|(v, m)| vec![v.clone(), m.clone()]).collect();
                doc.heading(3, field);
                doc.table(&["Value", "Meaning"], &rows);
            }
        }
        doc.recent_changes(ctx);

        let entities: Vec<Value> = snapshot.entity_names().into_iter().map(|n| entity_json(snapshot, n)).collect();
        Ok(finish(ctx,
                  doc,
                  json!({ "entities": entities, "unavailable_entities": missing, "enum_meanings": ctx.catalog.enum_meanings() })))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MasterDataRenderer;

impl DocumentationRenderer for MasterDataRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::MasterData
    }

    fn needs_schema(&self) -> bool {
        true
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        let snapshot = ctx.require_schema()?;
        let mut doc = MarkdownDoc::new();
        doc.document_header(ctx);
        doc.catalog_sections(&ctx.entry.sections);

        // campos de tipo enum/lookup que remiten a datos maestros
        doc.heading(2, "Fields Using Master Data");
        let mut references = Vec::new();
        for (entity, _) in snapshot.iter() {
            for (field, _) in snapshot.fields(entity) {
                if ctx.catalog.enum_meanings().contains_key(field) {
                    references.push(json!({ "entity": entity, "field": field }));
                    doc.bullet(&format!("`{entity}.{field}`"));
                }
            }
        }
        if references.is_empty() {
            doc.paragraph("_No entity field references a master data list._");
        } else {
            doc.blank();
        }
        doc.recent_changes(ctx);

        let groups: Vec<&str> = ctx.entry
                                   .sections
                                   .iter()
                                   .flat_map(|s| s.items.iter().map(|i| i.name.as_str()))
                                   .collect();
        Ok(finish(ctx, doc, json!({ "groups": groups, "references": references })))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DataMigrationRenderer;

impl DocumentationRenderer for DataMigrationRenderer {
    fn doc_type(&self) -> DocumentationType {
        DocumentationType::DataMigration
    }

    fn needs_schema(&self) -> bool {
        true
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderedDocument, RenderError> {
        let snapshot = ctx.require_schema()?;
        let mut doc = MarkdownDoc::new();
        doc.document_header(ctx);
        doc.catalog_sections(&ctx.entry.sections);

        doc.heading(2, "Import Checklist");
        let mut checklist = Vec::new();
        for entity in ctx.catalog.schema_entities() {
            let required = snapshot.required_fields(&entity.name);
            let available = snapshot.contains(&entity.name);
            let row = if available {
                format!("{} (`{}`): {} required field(s)", entity.name, entity.table, required.len())
            } else {
                format!("{} (`{}`): schema unavailable", entity.name, entity.table)
            };
            doc.bullet(&row);
            checklist.push(json!({ "entity": entity.name,
                                   "table": entity.table,
                                   "schema_available": available,
                                   "required": required }));
        }
        doc.blank();
        doc.recent_changes(ctx);

        Ok(finish(ctx, doc, json!({ "checklist": checklist })))
    }
}
