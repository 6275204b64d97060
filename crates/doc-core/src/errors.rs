//! Errores del core: stores externos, renderers y orquestación.

use thiserror::Error;

/// Errores reportados por cualquier backend de `ArtifactStore`,
/// `ChangeLogStore` o `SchemaSource`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    #[error("record not found: {0}")] NotFound(String),
    #[error("conflict: {0}")] Conflict(String),
    #[error("serialization: {0}")] Serialization(String),
    #[error("store backend: {0}")] Backend(String),
}

/// Errores de un renderer. El mensaje de `Failed` es el que termina en
/// `error_message` del artifact y en la respuesta HTTP.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RenderError {
    #[error("{0}")] Failed(String),
    #[error("schema snapshot required to render {0}")] MissingSchema(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)] Store(#[from] StoreError),
    #[error(transparent)] Render(#[from] RenderError),
    #[error("catalog: {0}")] Catalog(String),
    #[error("engine configuration: {0}")] Configuration(String),
    #[error("Unknown documentation type: {0}")] UnknownType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failure_message_is_passed_through() {
        let err: EngineError = RenderError::Failed("boom".into()).into();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn store_error_is_transparent_inside_engine_error() {
        let err: EngineError = StoreError::Backend("connection reset".into()).into();
        assert_eq!(err.to_string(), "store backend: connection reset");
    }

    #[test]
    fn unknown_type_message() {
        let err = EngineError::UnknownType("foo".into());
        assert_eq!(err.to_string(), "Unknown documentation type: foo");
    }
}
