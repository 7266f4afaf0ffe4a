//! # Strata Curves
//!
//! Discount curve bootstrapping from market instruments.
//!
//! A [`curve::Curve`] is built by solving a strip of instruments in
//! maturity order, each one pinning down a single `(date, log discount
//! factor)` node; values between nodes come from a monotone cubic (PCHIP)
//! interpolant. Supported instruments are cash deposits, FRAs, simple and
//! compound futures, OIS and LIBOR-style swaps and, within a joint
//! two-curve strip, float/float basis swaps.
//!
//! ## Example
//!
//! ```rust
//! use strata_core::calendars::Calendar;
//! use strata_core::daycounts::DayCount;
//! use strata_core::types::{Date, Tenor};
//! use strata_curves::curve::Curve;
//! use strata_curves::instruments::CashInstrument;
//!
//! let effective = Date::from_ymd(2020, 3, 16)?;
//! let calendar = Calendar::weekends();
//!
//! let mut curve = Curve::new(effective);
//! curve.add_instrument(CashInstrument::new(
//!     effective,
//!     0.0155,
//!     Tenor::overnight(),
//!     &calendar,
//!     DayCount::Act360,
//! )?)?;
//! curve.add_instrument(CashInstrument::new(
//!     effective,
//!     0.0162,
//!     "3M".parse()?,
//!     &calendar,
//!     DayCount::Act360,
//! )?)?;
//!
//! curve.build()?;
//! let df = curve.discount_factor(Date::from_ymd(2020, 5, 16)?)?;
//! assert!(df < 1.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

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
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]

pub mod compounding;
pub mod curve;
pub mod error;
pub mod fixings;
pub mod instruments;
pub mod schedule;
pub mod simultaneous;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curve::{shared, Curve, CurveNode, CurveState, SharedCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::fixings::FixingTable;
    pub use crate::instruments::{
        imm_date, BasisKind, BasisSwapConventions, BasisSwapInstrument, CashInstrument,
        FraInstrument, FutureInstrument, Instrument, Leg, LegMode, SwapConventions,
        SwapInstrument,
    };
    pub use crate::schedule::{Period, Schedule, ScheduleConfig};
    pub use crate::simultaneous::{
        JointOutcome, JointStatus, SimultaneousInstrument, SimultaneousStrippedCurve,
    };
}

pub use error::{CurveError, CurveResult};
