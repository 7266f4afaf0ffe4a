//! # Strata Math
//!
//! Numerical routines for the Strata curve bootstrapping library.
//!
//! This crate provides:
//!
//! - **Solvers**: Newton-Raphson root-finding with analytical or
//!   finite-difference derivatives
//! - **Interpolation**: Monotone cubic (PCHIP) interpolation
//! - **Optimization**: Bounded Nelder-Mead minimization for the
//!   simultaneous two-curve strip
//!
//! All objective functions are fallible (`FnMut(..) -> MathResult<f64>`):
//! curve valuation inside a solver iteration can itself fail, and those
//! failures propagate out of the solver rather than being masked.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod optimization;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::Pchip;
    pub use crate::optimization::{
        nelder_mead_bounded, OptimizationConfig, OptimizationResult,
    };
    pub use crate::solvers::{
        newton_raphson, newton_raphson_numerical, SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
