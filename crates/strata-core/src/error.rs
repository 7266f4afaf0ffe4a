//! Error types for the Strata core crate.
//!
//! Construction and configuration problems are surfaced immediately and are
//! never recovered; the variants here let callers distinguish a malformed
//! input string from a missing resource file.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by date, tenor, calendar and day count primitives.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// A date could not be constructed or parsed.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A string token could not be parsed into a domain value
    /// (tenor, day count basis, adjustment convention).
    #[error("Format error: cannot parse {token:?} as {expected}")]
    Format {
        /// The offending token.
        token: String,
        /// What the token was expected to be.
        expected: &'static str,
    },

    /// An operation is undefined for the given input
    /// (e.g. subtracting an overnight tenor).
    #[error("Unsupported operation: {reason}")]
    Unsupported {
        /// Description of the unsupported operation.
        reason: String,
    },

    /// A holiday calendar file could not be located or read.
    #[error("Calendar {code:?} could not be loaded: {reason}")]
    CalendarLoad {
        /// The holiday center code.
        code: String,
        /// Why loading failed.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a format error.
    #[must_use]
    pub fn format(token: impl Into<String>, expected: &'static str) -> Self {
        Self::Format {
            token: token.into(),
            expected,
        }
    }

    /// Creates an unsupported operation error.
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Creates a calendar load error.
    #[must_use]
    pub fn calendar_load(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CalendarLoad {
            code: code.into(),
            reason: reason.into(),
        }
    }
}
