pub mod api_error;
pub mod core_error;

pub use api_error::ApiError;
pub use core_error::CoreError;
