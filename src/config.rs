//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) una sola vez y expone `AppConfig`.
//!
//! Variables:
//! - `DOCFLOW_BIND_ADDR` (por defecto `0.0.0.0:3000`)
//! - `DATABASE_URL`, `DATABASE_MIN_CONNECTIONS`, `DATABASE_MAX_CONNECTIONS`
//!   (sin `DATABASE_URL` el servicio usa stores en memoria)
//! - `DOCFLOW_API_TOKENS`: pares `caller_id:sha256hex` separados por coma
//! - `DOCFLOW_CATALOG_PATH`: catálogo alternativo al embebido
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use doc_persistence::DbConfig;

use crate::errors::CoreError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Token de API registrado: sólo se guarda el SHA-256 del token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken {
    pub caller_id: String,
    pub sha256: [u8; 32],
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database: Option<DbConfig>,
    pub api_tokens: Vec<ApiToken>,
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        doc_persistence::init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let raw_addr = lookup("DOCFLOW_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse()
                                .map_err(|_| CoreError::Config(format!("DOCFLOW_BIND_ADDR inválido: '{raw_addr}'")))?;
        let database = DbConfig::from_lookup(&lookup).map_err(|e| CoreError::Config(e.to_string()))?;
        let api_tokens = match lookup("DOCFLOW_API_TOKENS") {
            Some(raw) => parse_api_tokens(&raw)?,
            None => Vec::new(),
        };
        let catalog_path = lookup("DOCFLOW_CATALOG_PATH").filter(|p| !p.trim().is_empty()).map(PathBuf::from);
        Ok(Self { bind_addr,
                  database,
                  api_tokens,
                  catalog_path })
    }
}

/// Parsea `caller_id:sha256hex[,caller_id:sha256hex...]`.
pub fn parse_api_tokens(raw: &str) -> Result<Vec<ApiToken>, CoreError> {
    raw.split(',')
       .map(str::trim)
       .filter(|s| !s.is_empty())
       .map(|pair| {
           let (caller, digest) = pair.split_once(':')
                                      .ok_or_else(|| CoreError::Config(format!("token sin ':' en DOCFLOW_API_TOKENS: '{pair}'")))?;
           let caller = caller.trim();
           if caller.is_empty() {
               return Err(CoreError::Config("token sin caller_id en DOCFLOW_API_TOKENS".into()));
           }
           let sha256 = decode_sha256(digest.trim()).map_err(|e| CoreError::Config(format!("digest inválido para '{caller}': {e}")))?;
           Ok(ApiToken { caller_id: caller.to_string(),
                         sha256 })
       })
       .collect()
}

fn decode_sha256(digest: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(digest).map_err(|e| e.to_string())?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| format!("se esperaban 32 bytes, hay {}", bytes.len()))
}
