//! `ChangeLogStore` sobre `change_log_entries`.
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use doc_core::{ChangeLogEntry, ChangeLogStore, NewChangeLogEntry, StoreError};
use log::debug;
use uuid::Uuid;

use super::{run_blocking, PgPool};
use crate::error::PersistenceError;
use crate::schema::change_log_entries;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = change_log_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct ChangeLogRow {
    id: Uuid,
    bereich: String,
    doku_aktualisiert: bool,
    aenderung_beschreibung: String,
    betroffene_entitaet: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ChangeLogRow> for ChangeLogEntry {
    fn from(row: ChangeLogRow) -> Self {
        ChangeLogEntry { id: row.id,
                         category: row.bereich,
                         applied: row.doku_aktualisiert,
                         description: row.aenderung_beschreibung,
                         affected_entity: row.betroffene_entitaet,
                         created_at: row.created_at }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = change_log_entries)]
struct NewChangeLogRow<'a> {
    bereich: &'a str,
    aenderung_beschreibung: &'a str,
    betroffene_entitaet: Option<&'a str>,
}

#[derive(Clone)]
pub struct PgChangeLogStore {
    pool: PgPool,
}

impl PgChangeLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registra una entrada pendiente. En producción las escriben otros
    /// procesos; se usa desde la CLI y los tests.
    pub async fn record(&self, new: NewChangeLogEntry) -> Result<ChangeLogEntry, StoreError> {
        let row = run_blocking(&self.pool, "change_log.record", move |conn| {
                      diesel::insert_into(change_log_entries::table).values(NewChangeLogRow { bereich: &new.category,
                                                                                              aenderung_beschreibung: &new.description,
                                                                                              betroffene_entitaet: new.affected_entity.as_deref() })
                                                                    .returning(ChangeLogRow::as_returning())
                                                                    .get_result(conn)
                                                                    .map_err(PersistenceError::from)
                  }).await?;
        Ok(row.into())
    }
}

#[async_trait]
impl ChangeLogStore for PgChangeLogStore {
    async fn pending_for_category(&self, category: &str) -> Result<Vec<ChangeLogEntry>, StoreError> {
        let category = category.to_string();
        let rows = run_blocking(&self.pool, "change_log.pending", move |conn| {
                       change_log_entries::table.filter(change_log_entries::bereich.eq(category.as_str()))
                                                .filter(change_log_entries::doku_aktualisiert.eq(false))
                                                .order((change_log_entries::created_at.asc(), change_log_entries::id.asc()))
                                                .select(ChangeLogRow::as_select())
                                                .load(conn)
                                                .map_err(PersistenceError::from)
                   }).await?;
        Ok(rows.into_iter().map(ChangeLogEntry::from).collect())
    }

    async fn mark_applied(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let ids: Vec<Uuid> = ids.iter().copied().collect::<HashSet<_>>().into_iter().collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let wanted = ids.len();
        let outcome = run_blocking(&self.pool, "change_log.mark_applied", move |conn| {
                          conn.transaction::<_, PersistenceError, _>(|tx| {
                                  let found: i64 = change_log_entries::table.filter(change_log_entries::id.eq_any(&ids))
                                                                            .count()
                                                                            .get_result(tx)?;
                                  if found as usize != wanted {
                                      // rollback: ninguna entrada se modifica
                                      return Err(PersistenceError::NotFound);
                                  }
                                  let changed = diesel::update(change_log_entries::table.filter(change_log_entries::id.eq_any(&ids))
                                                                                        .filter(change_log_entries::doku_aktualisiert.eq(false)))
                                                .set(change_log_entries::doku_aktualisiert.eq(true))
                                                .execute(tx)?;
                                  Ok(changed)
                              })
                      }).await;
        match outcome {
            Ok(changed) => {
                debug!("change_log.mark_applied wanted={wanted} changed={changed}");
                Ok(changed)
            }
            Err(PersistenceError::NotFound) => Err(StoreError::NotFound("one or more change log entries".into())),
            Err(e) => Err(e.into()),
        }
    }
}
