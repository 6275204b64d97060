//! Tabla de despacho tipo -> renderer.
use doc_core::{DocumentationRenderer, DocumentationType, RendererSet};

use crate::renderers::{BusinessLogicRenderer, DataMigrationRenderer, DatabaseStructureRenderer, DocumentGenerationRenderer,
                       ErrorHandlingRenderer, ExecutiveSummaryRenderer, ExternalIntegrationsRenderer, MasterDataRenderer,
                       ModuleArchitectureRenderer, PermissionsRolesRenderer, UserWorkflowsRenderer};

/// Renderer para el tipo. El `match` es exhaustivo: un tipo nuevo sin
/// renderer no compila.
pub fn renderer_for(doc_type: DocumentationType) -> &'static dyn DocumentationRenderer {
    match doc_type {
        DocumentationType::DatabaseStructure => &DatabaseStructureRenderer,
        DocumentationType::ModuleArchitecture => &ModuleArchitectureRenderer,
        DocumentationType::MasterData => &MasterDataRenderer,
        DocumentationType::BusinessLogic => &BusinessLogicRenderer,
        DocumentationType::ExternalIntegrations => &ExternalIntegrationsRenderer,
        DocumentationType::DocumentGeneration => &DocumentGenerationRenderer,
        DocumentationType::UserWorkflows => &UserWorkflowsRenderer,
        DocumentationType::PermissionsRoles => &PermissionsRolesRenderer,
        DocumentationType::ErrorHandling => &ErrorHandlingRenderer,
        DocumentationType::DataMigration => &DataMigrationRenderer,
        DocumentationType::ExecutiveSummary => &ExecutiveSummaryRenderer,
    }
}

/// `RendererSet` del motor respaldado por `renderer_for`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRenderers;

impl RendererSet for DefaultRenderers {
    fn renderer(&self, doc_type: DocumentationType) -> &dyn DocumentationRenderer {
        renderer_for(doc_type)
    }
}
