//! Error types for audit log core operations.
//!
//! This module defines the error types used throughout the `auditlog-core` crate.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in audit log core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A string could not be parsed as a CRN.
    #[error("Invalid CRN '{crn}': {reason}")]
    InvalidCrn {
        /// The offending string.
        crn: String,
        /// Reason the string is not a CRN.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
