//! Renderers agrupados por familia de documentos.

pub mod architecture;
pub mod database;
pub mod process;
pub mod summary;

pub use architecture::{DocumentGenerationRenderer, ExternalIntegrationsRenderer, ModuleArchitectureRenderer};
pub use database::{DataMigrationRenderer, DatabaseStructureRenderer, MasterDataRenderer};
pub use process::{BusinessLogicRenderer, ErrorHandlingRenderer, PermissionsRolesRenderer, UserWorkflowsRenderer};
pub use summary::ExecutiveSummaryRenderer;
