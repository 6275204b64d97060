//! Tipo de documentación: conjunto cerrado de reportes que el motor sabe
//! generar. La forma serializada (wire y columna) es el string snake_case.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentationType {
    DatabaseStructure,
    ModuleArchitecture,
    MasterData,
    BusinessLogic,
    ExternalIntegrations,
    DocumentGeneration,
    UserWorkflows,
    PermissionsRoles,
    ErrorHandling,
    DataMigration,
    ExecutiveSummary,
}

impl DocumentationType {
    /// Todas las variantes, en el orden en que se listan en el catálogo.
    pub const ALL: [DocumentationType; 11] = [DocumentationType::DatabaseStructure,
                                               DocumentationType::ModuleArchitecture,
                                               DocumentationType::MasterData,
                                               DocumentationType::BusinessLogic,
                                               DocumentationType::ExternalIntegrations,
                                               DocumentationType::DocumentGeneration,
                                               DocumentationType::UserWorkflows,
                                               DocumentationType::PermissionsRoles,
                                               DocumentationType::ErrorHandling,
                                               DocumentationType::DataMigration,
                                               DocumentationType::ExecutiveSummary];

    /// Identificador estable (snake_case) usado en HTTP, base de datos y
    /// catálogo.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentationType::DatabaseStructure => "database_structure",
            DocumentationType::ModuleArchitecture => "module_architecture",
            DocumentationType::MasterData => "master_data",
            DocumentationType::BusinessLogic => "business_logic",
            DocumentationType::ExternalIntegrations => "external_integrations",
            DocumentationType::DocumentGeneration => "document_generation",
            DocumentationType::UserWorkflows => "user_workflows",
            DocumentationType::PermissionsRoles => "permissions_roles",
            DocumentationType::ErrorHandling => "error_handling",
            DocumentationType::DataMigration => "data_migration",
            DocumentationType::ExecutiveSummary => "executive_summary",
        }
    }
}

impl fmt::Display for DocumentationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DocumentationType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentationType::ALL.iter()
                              .copied()
                              .find(|t| t.as_str() == s)
                              .ok_or_else(|| EngineError::UnknownType(s.to_string()))
    }
}
