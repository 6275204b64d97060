//! Catálogo de documentación: títulos, descripciones, `bereich` y tablas de
//! contenido por tipo, más la lista fija de entidades para introspección.
//!
//! El catálogo por defecto viene embebido en el crate
//! (`catalog/catalog.json`); un despliegue puede reemplazarlo con un archivo
//! propio (ver `Catalog::from_path`).
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::model::DocumentationType;

const DEFAULT_CATALOG: &str = include_str!("../../catalog/catalog.json");

/// Entidad de negocio cuyo schema se introspecciona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntity {
    pub name: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub summary: String,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    pub heading: String,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

/// Entrada por tipo de documentación.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub title: String,
    pub description: String,
    /// Categoría del change-log; `None` => el tipo no consume cambios.
    #[serde(default)]
    pub bereich: Option<String>,
    #[serde(default)]
    pub sections: Vec<CatalogSection>,
}

#[derive(Deserialize)]
struct CatalogFile {
    schema_entities: Vec<SchemaEntity>,
    #[serde(default)]
    enum_meanings: BTreeMap<String, BTreeMap<String, String>>,
    types: BTreeMap<String, TypeEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    schema_entities: Vec<SchemaEntity>,
    enum_meanings: BTreeMap<String, BTreeMap<String, String>>,
    types: BTreeMap<DocumentationType, TypeEntry>,
}

impl Catalog {
    /// Catálogo embebido.
    pub fn load_default() -> Result<Self, EngineError> {
        Self::from_json_str(DEFAULT_CATALOG)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| EngineError::Catalog(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// Parsea y valida: todo `DocumentationType` debe tener entrada y no se
    /// aceptan claves desconocidas.
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        let file: CatalogFile = serde_json::from_str(raw).map_err(|e| EngineError::Catalog(e.to_string()))?;
        let mut types = BTreeMap::new();
        for (key, entry) in file.types {
            let t: DocumentationType = key.parse()
                                          .map_err(|_| EngineError::Catalog(format!("unknown documentation type '{key}'")))?;
            types.insert(t, entry);
        }
        if let Some(missing) = DocumentationType::ALL.iter().find(|t| !types.contains_key(t)) {
            return Err(EngineError::Catalog(format!("missing entry for '{missing}'")));
        }
        if file.schema_entities.is_empty() {
            return Err(EngineError::Catalog("schema_entities must not be empty".into()));
        }
        Ok(Self { schema_entities: file.schema_entities,
                  enum_meanings: file.enum_meanings,
                  types })
    }

    pub fn entry(&self, doc_type: DocumentationType) -> Result<&TypeEntry, EngineError> {
        self.types
            .get(&doc_type)
            .ok_or_else(|| EngineError::Catalog(format!("missing entry for '{doc_type}'")))
    }

    pub fn schema_entities(&self) -> &[SchemaEntity] {
        &self.schema_entities
    }

    pub fn enum_meanings(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.enum_meanings
    }

    /// Significado legible de un valor de enum (ej. `status` / `active`).
    pub fn enum_meaning(&self, field: &str, value: &str) -> Option<&str> {
        self.enum_meanings.get(field).and_then(|m| m.get(value)).map(String::as_str)
    }
}
