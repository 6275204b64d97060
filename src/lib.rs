//! docflow: servicio HTTP de generación de documentación.
//!
//! - `api`: router axum, autenticación y handlers.
//! - `config`: configuración desde entorno / `.env`.
//! - `errors`: errores de arranque (`CoreError`) y de API (`ApiError`).
//!
//! El motor, los renderers y la persistencia viven en los crates
//! `doc-core`, `doc-renderers` y `doc-persistence`.

pub mod api;
pub mod config;
pub mod errors;

pub use api::{build_router, build_state, AppState};
pub use config::AppConfig;
