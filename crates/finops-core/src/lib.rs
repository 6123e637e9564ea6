//! Shared error and CLI output types for the finops workspace.

pub mod error;
pub mod types;

pub use error::AppError;
pub use types::OutputFormat;
