//! Error types for the inventory intake service.

pub mod types;

pub use types::{AppError, SheetError};

/// Convenience result alias used throughout the application
pub type AppResult<T> = Result<T, AppError>;
