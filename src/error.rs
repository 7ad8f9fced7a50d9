//! Unified error types for tgstat.
//!
//! This module provides a single [`TgstatError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Structural failures** (a broken archive, a missing top-level section)
//!   abort the whole run; there is no partial-success mode for a corrupt
//!   export.
//! - **Row-level failures** (a malformed sender token, a value that cannot be
//!   coerced) are skippable: the table builder drops the row, counts it, and
//!   continues.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for tgstat operations.
pub type Result<T> = std::result::Result<T, TgstatError>;

/// The error type for all tgstat operations.
///
/// Each variant contains context about what went wrong and, where applicable,
/// the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TgstatError {
    /// An I/O error occurred.
    ///
    /// This typically happens when the archive file doesn't exist, permission
    /// is denied, or the disk is full when writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The archive is structurally invalid JSON or doesn't match the
    /// takeout schema.
    #[error("Failed to parse takeout archive{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// A required top-level field is absent from the archive.
    ///
    /// Telegram Desktop only writes `personal_information` for full takeouts;
    /// single-chat exports lack it and cannot be split into sent/received.
    #[error("Missing required archive field: {field}")]
    MissingField {
        /// Dotted path of the absent field
        field: &'static str,
    },

    /// A sender token doesn't match the expected `user<digits>` form.
    #[error("Malformed sender token '{token}': expected 'user' followed by digits")]
    MalformedSender {
        /// The raw token as found in the archive
        token: String,
    },

    /// A field value cannot be cast to its declared semantic type.
    #[error("Cannot coerce {field} value for message {message_id}: {reason}")]
    TypeCoercion {
        /// Column the value was destined for
        field: &'static str,
        /// Id of the offending message
        message_id: i64,
        /// What went wrong
        reason: String,
    },

    /// Invalid date in a filter argument. Expects YYYY-MM-DD.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl TgstatError {
    /// Creates a parse error for the takeout archive.
    pub fn parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        TgstatError::Parse { source, path }
    }

    /// Creates a missing-field error.
    pub fn missing_field(field: &'static str) -> Self {
        TgstatError::MissingField { field }
    }

    /// Creates a malformed-sender error.
    pub fn malformed_sender(token: impl Into<String>) -> Self {
        TgstatError::MalformedSender {
            token: token.into(),
        }
    }

    /// Creates a type-coercion error.
    pub fn type_coercion(
        field: &'static str,
        message_id: i64,
        reason: impl Into<String>,
    ) -> Self {
        TgstatError::TypeCoercion {
            field,
            message_id,
            reason: reason.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        TgstatError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, TgstatError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, TgstatError::Parse { .. })
    }

    /// Returns `true` if this is a missing-field error.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, TgstatError::MissingField { .. })
    }

    /// Returns `true` if this error is skippable at row level.
    ///
    /// Skippable errors drop a single table row; everything else aborts
    /// the run.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            TgstatError::MalformedSender { .. } | TgstatError::TypeCoercion { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
