//! Entradas del change-log externo. Otros procesos las crean; el motor sólo
//! las lee por `bereich` y las marca como aplicadas tras una generación.
//!
//! Los nombres serializados son las columnas alemanas del backend
//! (`bereich`, `doku_aktualisiert`, ...).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub id: Uuid,
    /// Área temática que agrupa cambios (ej. "database", "modules").
    #[serde(rename = "bereich")]
    pub category: String,
    /// `false` mientras el cambio no fue incorporado a una documentación.
    #[serde(rename = "doku_aktualisiert")]
    pub applied: bool,
    #[serde(rename = "aenderung_beschreibung")]
    pub description: String,
    #[serde(rename = "betroffene_entitaet")]
    pub affected_entity: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChangeLogEntry {
    #[serde(rename = "bereich")]
    pub category: String,
    #[serde(rename = "aenderung_beschreibung")]
    pub description: String,
    #[serde(rename = "betroffene_entitaet", default)]
    pub affected_entity: Option<String>,
}

impl NewChangeLogEntry {
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self { category: category.into(),
               description: description.into(),
               affected_entity: None }
    }

    pub fn affecting(mut self, entity: impl Into<String>) -> Self {
        self.affected_entity = Some(entity.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_backend_field_names() {
        let entry = ChangeLogEntry { id: Uuid::nil(),
                                     category: "database".into(),
                                     applied: false,
                                     description: "Added zip_code field".into(),
                                     affected_entity: Some("Building".into()),
                                     created_at: Utc::now() };
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["bereich"], "database");
        assert_eq!(v["doku_aktualisiert"], false);
        assert_eq!(v["aenderung_beschreibung"], "Added zip_code field");
        assert_eq!(v["betroffene_entitaet"], "Building");
    }
}
