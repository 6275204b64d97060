use doc_persistence::config::DbConfig;
use doc_persistence::pg::{build_pool, PgPool};
use once_cell::sync::Lazy;

pub static TEST_POOL: Lazy<Option<PgPool>> = Lazy::new(|| {
    let cfg = match DbConfig::from_env() {
        Ok(Some(cfg)) => cfg,
        _ => return None,
    };
    match build_pool(&cfg.url, 1, 2) {
        Ok(p) => Some(p),
        Err(e) => {
            eprintln!("No se pudo construir pool de test: {e}");
            None
        }
    }
});

pub fn pool() -> Option<PgPool> {
    let pool = TEST_POOL.clone();
    if pool.is_none() {
        eprintln!("skip (no DATABASE_URL)");
    }
    pool
}
