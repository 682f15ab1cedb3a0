//! Error types for the AFD interpretation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while interpreting an AFD file.
//!
//! Per-line parse failures are recovered by the interpreter and accumulated
//! into the document's diagnostics list; only total non-interpretability
//! (or undecodable input) terminates a call.

use thiserror::Error;

/// The main error type for the AFD interpretation engine.
///
/// # Example
///
/// ```
/// use afd_engine::error::AfdError;
///
/// let error = AfdError::LengthMismatch {
///     record_type: "3 (oficial)".to_string(),
///     expected: 50,
///     actual: 42,
/// };
/// assert_eq!(
///     error.to_string(),
///     "record type 3 (oficial) is 42 characters long, expected at least 50"
/// );
/// ```
#[derive(Debug, Error)]
pub enum AfdError {
    /// A line failed the structural gate: shorter than 10 characters or
    /// its first 9 characters are not all digits.
    #[error("line without a valid NSR prefix: {line:?}")]
    Structural {
        /// The offending line.
        line: String,
    },

    /// A record was shorter than its layout's minimum length.
    #[error("record type {record_type} is {actual} characters long, expected at least {expected}")]
    LengthMismatch {
        /// The record type and layout that was being parsed.
        record_type: String,
        /// The layout's minimum length.
        expected: usize,
        /// The observed line length.
        actual: usize,
    },

    /// A pattern-validated field did not match its expected shape.
    #[error("field '{field}' has an invalid value: {value:?}")]
    FormatMismatch {
        /// The name of the field that failed validation.
        field: String,
        /// The offending field text.
        value: String,
    },

    /// A line carried a type digit outside the known set (1-7, 9).
    #[error("unknown record type: {type_digit}")]
    UnknownType {
        /// The unrecognized type digit.
        type_digit: char,
    },

    /// Both the official and the compact layout failed for a dual-layout
    /// record type. Carries both underlying messages for diagnosability.
    #[error("type {record_type} failed: {official} | fallback: {compact}")]
    LayoutFallbackFailed {
        /// The record type ("1" or "3").
        record_type: String,
        /// The official layout's failure message.
        official: String,
        /// The compact layout's failure message.
        compact: String,
    },

    /// The input bytes could not be decoded as ISO-8859-1 text.
    #[error("input could not be decoded as ISO-8859-1 text: {message}")]
    Unreadable {
        /// A description of the decode failure.
        message: String,
    },

    /// Nothing in the file was interpretable: no header, no trailer and
    /// every per-type bucket is empty after the full pass.
    #[error("no record could be interpreted; first errors: {sample}")]
    NonInterpretable {
        /// A sample of the first line-scoped errors encountered.
        sample: String,
    },

    /// An output artifact could not be rendered or written.
    #[error("failed to write artifact: {message}")]
    Export {
        /// A description of the export failure.
        message: String,
    },
}

/// A type alias for Results that return [`AfdError`].
pub type AfdResult<T> = Result<T, AfdError>;

impl From<csv::Error> for AfdError {
    fn from(err: csv::Error) -> Self {
        AfdError::Export {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AfdError {
    fn from(err: std::io::Error) -> Self {
        AfdError::Export {
            message: err.to_string(),
        }
    }
}
