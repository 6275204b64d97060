//! `SchemaSource` sobre `information_schema.columns` con el pool de
//! servicio.
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use doc_core::{SchemaEntity, SchemaSource, StoreError};
use serde_json::{json, Map, Value};

use super::{run_blocking, PgPool};
use crate::error::PersistenceError;

#[derive(QueryableByName, Debug)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    data_type: String,
    #[diesel(sql_type = Bool)]
    is_nullable: bool,
}

const COLUMNS_QUERY: &str = "SELECT column_name::text AS column_name, data_type::text AS data_type, \
                             (is_nullable = 'YES') AS is_nullable \
                             FROM information_schema.columns \
                             WHERE table_schema = current_schema() AND table_name = $1 \
                             ORDER BY ordinal_position";

fn schema_json(entity: &SchemaEntity, columns: &[ColumnRow]) -> Value {
    let mut properties = Map::new();
    for c in columns {
        properties.insert(c.column_name.clone(), json!({ "type": c.data_type, "nullable": c.is_nullable }));
    }
    let required: Vec<&str> = columns.iter().filter(|c| !c.is_nullable).map(|c| c.column_name.as_str()).collect();
    json!({
        "name": entity.name,
        "table": entity.table,
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

#[derive(Clone)]
pub struct PgSchemaSource {
    pool: PgPool,
}

impl PgSchemaSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaSource for PgSchemaSource {
    async fn entity_schema(&self, entity: &SchemaEntity) -> Result<Value, StoreError> {
        let table = entity.table.clone();
        let columns = run_blocking(&self.pool, "schema.entity", move |conn| {
                          diesel::sql_query(COLUMNS_QUERY).bind::<Text, _>(table.as_str())
                                                          .load::<ColumnRow>(conn)
                                                          .map_err(PersistenceError::from)
                      }).await?;
        if columns.is_empty() {
            return Err(StoreError::NotFound(format!("table '{}' for entity {}", entity.table, entity.name)));
        }
        Ok(schema_json(entity, &columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_are_non_nullable_columns() {
        let entity = SchemaEntity { name: "Building".into(),
                                    table: "buildings".into() };
        let cols = vec![ColumnRow { column_name: "id".into(),
                                    data_type: "uuid".into(),
                                    is_nullable: false },
                        ColumnRow { column_name: "zip_code".into(),
                                    data_type: "text".into(),
                                    is_nullable: true }];
        let v = schema_json(&entity, &cols);
        assert_eq!(v["required"], json!(["id"]));
        assert_eq!(v["properties"]["zip_code"], json!({"type": "text", "nullable": true}));
        assert_eq!(v["table"], "buildings");
    }
}
