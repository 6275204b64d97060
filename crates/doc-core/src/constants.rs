//! Constantes del motor de generación.
//!
//! Valores estáticos que terminan estampados en los artifacts persistidos.
//! Cambiar `GENERATOR_VERSION` no invalida artifacts previos, sólo deja
//! constancia en `content_json` de qué motor produjo cada contenido.

/// Versión lógica del generador. Se incluye en el `content_json` de cada
/// documento renderizado.
pub const GENERATOR_VERSION: &str = "docflow/1.0";

/// Separador usado al concatenar descripciones de cambios en
/// `changes_summary`.
pub const CHANGES_SUMMARY_SEPARATOR: &str = "; ";

/// Versión inicial de cada tipo de documentación.
pub const INITIAL_VERSION: i32 = 1;
