//! Introspección de schemas de entidades.
use futures::future::join_all;
use tracing::warn;

use crate::catalog::SchemaEntity;
use crate::model::EntitySchemaSnapshot;
use crate::repo::SchemaSource;

/// Obtiene el schema de cada entidad en paralelo. Un fallo individual se
/// registra y la entidad se omite; el snapshot conserva el orden de
/// `entities`. Nunca falla.
pub async fn introspect(source: &dyn SchemaSource, entities: &[SchemaEntity]) -> EntitySchemaSnapshot {
    let fetches = entities.iter().map(|entity| async move { (entity, source.entity_schema(entity).await) });
    let results = join_all(fetches).await;

    let mut snapshot = EntitySchemaSnapshot::new();
    for (entity, result) in results {
        match result {
            Ok(schema) => snapshot.insert(entity.name.clone(), schema),
            Err(err) => warn!(entity = %entity.name, error = %err, "schema fetch failed, entity omitted"),
        }
    }
    snapshot
}
