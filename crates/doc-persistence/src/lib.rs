//! doc-persistence
//!
//! Implementaciones Postgres (Diesel + r2d2) de los stores del core:
//! artifacts de documentación con su historial, change-log y lectura de
//! schemas desde `information_schema`.
//!
//! Módulos:
//! - `pg`: stores sobre Postgres y utilidades de pool/reintentos.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: configuración de conexión desde .env / entorno.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_pool, build_pool_from_env, PgArtifactStore, PgChangeLogStore, PgPool, PgSchemaSource};
