//! Unified error types for mattergram.
//!
//! This module provides a single [`MigrateError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Per-record defects** (unknown message kind, unmapped author, broken
//!   span) are diagnostics, not errors: they go through the
//!   [`Reporter`](crate::report::Reporter) sink and the record or span is
//!   skipped.
//! - **Integrity defects** (a message without a timestamp) and structural
//!   misuse (invalid config, malformed export) are real errors that abort
//!   the run with one of the variants below.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for mattergram operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

/// The error type for all mattergram operations.
///
/// Each variant contains context about what went wrong and, where applicable,
/// the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MigrateError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input directory or export file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing the output archive)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be parsed as TOML.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration is syntactically valid but violates a rule,
    /// such as a missing `users` table or a channel import without
    /// `import_into`.
    #[error("Invalid config: {message}")]
    InvalidConfig {
        /// Description of the violated rule
        message: String,
    },

    /// The configured timezone is not a known IANA name.
    #[error("Invalid timezone '{name}'. Please use a valid IANA timezone name.")]
    InvalidTimezone {
        /// The rejected timezone string
        name: String,
    },

    /// The export file doesn't match the expected Telegram structure.
    ///
    /// This occurs when `result.json` is missing its top-level `type` or
    /// `messages` fields, or is not valid JSON at all.
    #[error("Invalid Telegram export{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    InvalidExport {
        /// Description of what's wrong
        message: String,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The input directory is missing a required file.
    #[error("Invalid input directory: {message}")]
    InvalidInputDir {
        /// Description of what's missing
        message: String,
    },

    /// A message record lacks its `date` field.
    ///
    /// Timestamps are assumed always present in a well-formed archive, so
    /// this is treated as a data-integrity defect that aborts the run
    /// rather than a skippable edge case.
    #[error("Message{} has no date field; the export is corrupt", id.map(|i| format!(" {i}")).unwrap_or_default())]
    MissingTimestamp {
        /// The offending message id, if it had one
        id: Option<i64>,
    },

    /// A local timestamp could not be interpreted.
    #[error("Cannot interpret timestamp '{raw}' in zone {zone}")]
    InvalidTimestamp {
        /// The raw timestamp string from the export
        raw: String,
        /// The configured zone name
        zone: String,
    },

    /// ZIP archive writing error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl MigrateError {
    /// Creates an invalid-config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        MigrateError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates an invalid-timezone error.
    pub fn invalid_timezone(name: impl Into<String>) -> Self {
        MigrateError::InvalidTimezone { name: name.into() }
    }

    /// Creates an invalid-export error.
    pub fn invalid_export(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        MigrateError::InvalidExport {
            message: message.into(),
            path,
        }
    }

    /// Creates an invalid-input-directory error.
    pub fn invalid_input_dir(message: impl Into<String>) -> Self {
        MigrateError::InvalidInputDir {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, MigrateError::Io(_))
    }

    /// Returns `true` if this is a config-related error.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            MigrateError::ConfigParse(_)
                | MigrateError::InvalidConfig { .. }
                | MigrateError::InvalidTimezone { .. }
        )
    }

    /// Returns `true` if this is an export-format error.
    pub fn is_export(&self) -> bool {
        matches!(self, MigrateError::InvalidExport { .. })
    }

    /// Returns `true` if this is a per-record integrity defect.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            MigrateError::MissingTimestamp { .. } | MigrateError::InvalidTimestamp { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
