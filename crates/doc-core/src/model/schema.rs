//! Snapshot efímero de schemas de entidades (no se persiste).
//!
//! Conserva el orden de inserción, que es el orden de la lista de entidades
//! del catálogo. Entidades cuyo fetch falló simplemente no aparecen.
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntitySchemaSnapshot {
    entities: IndexMap<String, Value>,
}

impl EntitySchemaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: impl Into<String>, schema: Value) {
        self.entities.insert(entity.into(), schema);
    }

    pub fn get(&self, entity: &str) -> Option<&Value> {
        self.entities.get(entity)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entities.iter()
    }

    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }

    /// Campos declarados (`properties`) de una entidad, en orden.
    pub fn fields(&self, entity: &str) -> Vec<(&str, &Value)> {
        self.get(entity)
            .and_then(|s| s.get("properties"))
            .and_then(Value::as_object)
            .map(|props| props.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default()
    }

    /// Campos obligatorios (`required`) de una entidad.
    pub fn required_fields(&self, entity: &str) -> Vec<&str> {
        self.get(entity)
            .and_then(|s| s.get("required"))
            .and_then(Value::as_array)
            .map(|req| req.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Total de campos sumando todas las entidades del snapshot.
    pub fn total_fields(&self) -> usize {
        self.entities.keys().map(|name| self.fields(name).len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_insertion_order_and_reads_fields() {
        let mut snap = EntitySchemaSnapshot::new();
        snap.insert("Unit", json!({"properties": {"number": {"type": "string"}}, "required": ["number"]}));
        snap.insert("Building", json!({"properties": {"name": {"type": "string"}, "zip_code": {"type": "string"}}}));
        assert_eq!(snap.entity_names(), vec!["Unit", "Building"]);
        assert_eq!(snap.fields("Building").len(), 2);
        assert_eq!(snap.required_fields("Unit"), vec!["number"]);
        assert!(snap.required_fields("Building").is_empty());
        assert_eq!(snap.total_fields(), 3);
        assert!(snap.fields("Tenant").is_empty());
    }
}
