//! doc-renderers: un renderer por tipo de documentación.
//!
//! Cada renderer es puro: arma Markdown y JSON a partir del
//! `RenderContext` (entrada del catálogo, snapshot de schemas y cambios
//! pendientes). `renderer_for` es la única tabla de despacho y cubre todos
//! los tipos por construcción.

pub mod dispatch;
pub mod markdown;
pub mod renderers;

pub use dispatch::{renderer_for, DefaultRenderers};
