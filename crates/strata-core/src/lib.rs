//! # Strata Core
//!
//! Core date and convention primitives for the Strata curve bootstrapping
//! library.
//!
//! This crate provides the foundational building blocks used by the curve
//! engine:
//!
//! - **Types**: [`types::Date`] and the [`types::Tenor`] period descriptor
//! - **Calendars**: holiday calendars loaded from per-center holiday lists,
//!   with business day adjustment and tenor arithmetic
//! - **Day Counts**: accrual basis conventions (ACT/360, ACT/365, 30/360,
//!   30E/360)
//!
//! ## Example
//!
//! ```rust
//! use strata_core::prelude::*;
//!
//! let cal = Calendar::weekends();
//! let spot = Date::from_ymd(2020, 3, 18).unwrap();
//! let tenor: Tenor = "3M".parse().unwrap();
//! let maturity = cal.advance(spot, tenor, BusinessDayConvention::ModifiedFollowing).unwrap();
//! assert!(maturity > spot);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::{Date, Tenor, TenorUnit};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar};
    pub use crate::daycounts::DayCount;
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, Tenor, TenorUnit};
}
