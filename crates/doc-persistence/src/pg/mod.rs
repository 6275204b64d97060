//! Implementaciones Postgres (Diesel) de los stores del core.
//!
//! Diesel es síncrono: cada operación toma una conexión del pool r2d2 dentro
//! de `tokio::task::spawn_blocking`. Los errores transitorios (pool,
//! serialización, desconexiones) se reintentan con un backoff corto.

use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, warn};

use crate::config::DbConfig;
use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;

mod artifacts;
mod change_log;
mod schema_source;

pub use artifacts::PgArtifactStore;
pub use change_log::PgChangeLogStore;
pub use schema_source::PgSchemaSource;

/// Pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Determina si un error es transitorio (recomendado reintentar con backoff).
pub(crate) fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        // Algunos mensajes del driver llegan como Unknown con texto.
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("could not serialize access due to concurrent update")
            || m.contains("terminating connection due to administrator command")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Reintento simple: hasta 3 reintentos con backoff de 15ms, 30ms, 45ms.
pub(crate) fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms", attempts + 1, e, delay_ms);
                std::thread::sleep(Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Ejecuta `f` con una conexión del pool en el pool de hilos bloqueantes de
/// tokio, con reintentos.
pub(crate) async fn run_blocking<F, T>(pool: &PgPool, op: &'static str, mut f: F) -> Result<T, PersistenceError>
    where F: FnMut(&mut PgConnection) -> Result<T, PersistenceError> + Send + 'static,
          T: Send + 'static
{
    let pool = pool.clone();
    debug!("{op}:start");
    let result = tokio::task::spawn_blocking(move || {
                     with_retry(|| {
                         let mut conn = pool.get()
                                            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))?;
                         f(&mut *conn)
                     })
                 }).await
                   .map_err(|e| PersistenceError::Unknown(format!("blocking task failed: {e}")))?;
    match &result {
        Ok(_) => debug!("{op}:done"),
        Err(e) => warn!("{op}:error {e}"),
    }
    result
}

/// Construye un pool Postgres r2d2 a partir de URL y corre las migraciones
/// pendientes con la primera conexión.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = if min_size == 0 { 1 } else { min_size };
    let validated_max = if max_size == 0 { 1 } else { max_size };
    if validated_min > validated_max {
        warn!("min_size > max_size ({} > {}), ajustando min=max", validated_min, validated_max);
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Carga `.env`, lee la configuración y construye un pool ya migrado.
/// `Ok(None)` si no hay `DATABASE_URL`.
pub fn build_pool_from_env() -> Result<Option<PgPool>, PersistenceError> {
    match DbConfig::from_env()? {
        Some(cfg) => build_pool(&cfg.url, cfg.min_connections, cfg.max_connections).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn retries_transient_errors_then_succeeds() {
        let calls = Cell::new(0);
        let out = with_retry(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(PersistenceError::TransientIo("pool".into()))
            } else {
                Ok(42)
            }
        });
        assert_eq!(out.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn does_not_retry_permanent_errors() {
        let calls = Cell::new(0);
        let out: Result<(), _> = with_retry(|| {
            calls.set(calls.get() + 1);
            Err(PersistenceError::UniqueViolation("dup".into()))
        });
        assert!(out.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn retryable_classification() {
        assert!(is_retryable(&PersistenceError::SerializationConflict));
        assert!(is_retryable(&PersistenceError::Unknown("Deadlock detected".into())));
        assert!(!is_retryable(&PersistenceError::NotFound));
        assert!(!is_retryable(&PersistenceError::Config("x".into())));
    }
}
