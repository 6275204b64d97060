//! Orquestación de una generación de documentación.
//!
//! `core` contiene el flujo completo; `version`, `changes` y `schema` son
//! las etapas individuales, expuestas para poder probarlas por separado.

pub mod builder;
pub mod changes;
pub mod core;
pub mod locks;
pub mod schema;
pub mod version;

pub use builder::EngineBuilder;
pub use changes::{aggregate_changes, PendingChanges};
pub use core::{GenerationEngine, GenerationOutcome};
pub use locks::TypeLocks;
pub use schema::introspect;
pub use version::{begin_generation, next_version, resolve_version, ResolvedVersion};
