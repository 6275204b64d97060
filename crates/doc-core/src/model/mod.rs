//! Modelos del dominio de documentación (tipo, artifact, change-log, schema).

pub mod artifact;
pub mod change_log;
pub mod doc_type;
pub mod schema;

pub use artifact::{ArtifactCompletion, ArtifactStatus, DocumentationArtifact, DocumentationVersion, NewArtifact};
pub use change_log::{ChangeLogEntry, NewChangeLogEntry};
pub use doc_type::DocumentationType;
pub use schema::EntitySchemaSnapshot;
