//! Error type definitions for the inventory intake service
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that makes debugging and error
//! handling more straightforward.

use thiserror::Error;

/// Top-level application error type
///
/// This enum represents all possible errors that can occur in the application.
/// It uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Destination sheet errors
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Destination sheet specific errors
///
/// Failures from the spreadsheet collaborator are propagated unmodified;
/// the service performs no retries.
#[derive(Error, Debug)]
pub enum SheetError {
    /// Non-success responses from the sheets API
    #[error("Sheets API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The destination worksheet has no header row to project against
    #[error("Missing header row: {worksheet}")]
    MissingHeader { worksheet: String },

    /// Responses that could not be decoded
    #[error("Invalid response from sheets API: {message}")]
    InvalidResponse { message: String },

    /// Transport-level failures
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl SheetError {
    /// Create an API error from a response status and body
    pub fn api<M: Into<String>>(status: u16, message: M) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a missing header error for a worksheet
    pub fn missing_header<W: Into<String>>(worksheet: W) -> Self {
        Self::MissingHeader {
            worksheet: worksheet.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response<M: Into<String>>(message: M) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}
