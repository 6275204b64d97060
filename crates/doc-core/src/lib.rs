//! doc-core: modelo, catálogo, contratos de stores/renderers y motor de
//! generación de documentación.
pub mod catalog;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod model;
pub mod render;
pub mod repo;

pub use catalog::{Catalog, CatalogItem, CatalogSection, SchemaEntity, TypeEntry};
pub use engine::{EngineBuilder, GenerationEngine, GenerationOutcome};
pub use errors::{EngineError, RenderError, StoreError};
pub use model::{ArtifactCompletion, ArtifactStatus, ChangeLogEntry, DocumentationArtifact, DocumentationType,
                DocumentationVersion, EntitySchemaSnapshot, NewArtifact, NewChangeLogEntry};
pub use render::{DocumentationRenderer, RenderContext, RenderedDocument, RendererSet};
pub use repo::{ArtifactStore, ChangeLogStore, InMemoryArtifactStore, InMemoryChangeLogStore, InMemorySchemaSource,
               SchemaSource};
