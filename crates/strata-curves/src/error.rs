//! Error types for curve construction.
//!
//! Configuration problems (bad tenors, missing fixings, mismatched stub
//! dates) are surfaced at construction time and are always fatal. Numerical
//! problems (a solver that fails to converge, an interpolant queried out of
//! range) surface during `build` and carry the instrument they occurred on.

use strata_core::error::CoreError;
use strata_core::types::Date;
use strata_math::error::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur during curve construction.
#[derive(Error, Debug)]
pub enum CurveError {
    /// Invalid construction-time configuration.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Description of the invalid configuration.
        reason: String,
    },

    /// A compounding window reaches before the curve date and no realized
    /// fixing was supplied for one of its days.
    #[error("Missing historical fixing for {date}")]
    MissingFixing {
        /// The date with no fixing.
        date: Date,
    },

    /// Root-finding or minimization failed while bootstrapping an
    /// instrument.
    #[error("Solver failed for {instrument}: {source}")]
    Solver {
        /// Name of the instrument being solved.
        instrument: String,
        /// The underlying numerical failure.
        source: MathError,
    },

    /// The requested operation is not supported by this entity.
    #[error("Operation not supported: {reason}")]
    NotSupported {
        /// Why the operation is unavailable.
        reason: String,
    },

    /// Numerical error outside of a per-instrument solve.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Date or calendar error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates a missing fixing error.
    #[must_use]
    pub fn missing_fixing(date: Date) -> Self {
        Self::MissingFixing { date }
    }

    /// Creates a solver failure error.
    #[must_use]
    pub fn solver(instrument: impl Into<String>, source: MathError) -> Self {
        Self::Solver {
            instrument: instrument.into(),
            source,
        }
    }

    /// Creates a not supported error.
    #[must_use]
    pub fn not_supported(reason: impl Into<String>) -> Self {
        Self::NotSupported {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_error_names_instrument() {
        let err = CurveError::solver("SWAP-OIS-10Y", MathError::convergence_failed(100, 1e-3));
        let msg = err.to_string();
        assert!(msg.contains("SWAP-OIS-10Y"));
        assert!(msg.contains("100 iterations"));
    }

    #[test]
    fn test_missing_fixing_display() {
        let err = CurveError::missing_fixing(Date::from_ymd(2020, 3, 16).unwrap());
        assert!(err.to_string().contains("2020-03-16"));
    }
}
