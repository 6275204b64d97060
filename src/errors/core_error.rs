use doc_core::EngineError;
use doc_persistence::PersistenceError;
use thiserror::Error;

/// Errores de arranque y configuración del servicio.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error interno: {0}")]
    Internal(String),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error del motor: {0}")]
    Engine(#[from] EngineError),
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] PersistenceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_variant_format() {
        let err = CoreError::Internal("algo malo".into());
        assert_eq!(err.to_string(), "Error interno: algo malo");
    }

    #[test]
    fn test_io_variant_from() {
        let io_err = std::io::Error::other("falló IO");
        let err: CoreError = io_err.into();
        assert_eq!(err.to_string(), "Error en IO: falló IO");
    }

    #[test]
    fn test_config_variant_format() {
        let err = CoreError::Config("mala configuración".into());
        assert_eq!(err.to_string(), "Error de configuración: mala configuración");
    }

    #[test]
    fn test_engine_variant_from() {
        let err: CoreError = EngineError::Catalog("missing entry for 'master_data'".into()).into();
        assert_eq!(err.to_string(), "Error del motor: catalog: missing entry for 'master_data'");
    }
}
