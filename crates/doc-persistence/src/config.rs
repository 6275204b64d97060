//! Carga de configuración de conexión desde variables de entorno.
//! Usa convención `DATABASE_URL` y parámetros opcionales de pool.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_MIN_CONNECTIONS: u32 = 2;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl DbConfig {
    /// `Ok(None)` si `DATABASE_URL` no está definido.
    pub fn from_env() -> Result<Option<Self>, PersistenceError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero leyendo de una función (tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, PersistenceError>
        where F: Fn(&str) -> Option<String>
    {
        let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) else {
            return Ok(None);
        };
        let parse = |key: &str, default: u32| -> Result<u32, PersistenceError> {
            match lookup(key) {
                None => Ok(default),
                Some(v) => v.trim()
                            .parse()
                            .map_err(|_| PersistenceError::Config(format!("{key} inválido: '{v}'"))),
            }
        };
        Ok(Some(Self { url,
                       min_connections: parse("DATABASE_MIN_CONNECTIONS", DEFAULT_MIN_CONNECTIONS)?,
                       max_connections: parse("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)? }))
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn missing_url_means_no_database() {
        assert_eq!(DbConfig::from_lookup(lookup(&[])).unwrap(), None);
        assert_eq!(DbConfig::from_lookup(lookup(&[("DATABASE_URL", " ")])).unwrap(), None);
    }

    #[test]
    fn defaults_and_overrides() {
        let cfg = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x/db")])).unwrap().unwrap();
        assert_eq!((cfg.min_connections, cfg.max_connections), (2, 16));

        let cfg = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x/db"), ("DATABASE_MAX_CONNECTIONS", "4")])).unwrap()
                                                                                                                          .unwrap();
        assert_eq!(cfg.max_connections, 4);
    }

    #[test]
    fn invalid_pool_size_is_rejected() {
        let err = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x/db"), ("DATABASE_MIN_CONNECTIONS", "many")])).unwrap_err();
        assert!(matches!(err, PersistenceError::Config(_)));
    }

    #[test]
    fn dotenv_loads_once() {
        init_dotenv();
        init_dotenv();
        assert!(Lazy::get(&DOTENV_LOADED).is_some());
    }
}
