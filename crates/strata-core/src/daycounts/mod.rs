//! Day count (accrual basis) conventions.
//!
//! A day count convention converts a date range into a year fraction.
//! The four conventions used by the curve instruments are supported:
//! ACT/360, ACT/365, 30/360 and 30E/360.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Day count conventions.
///
/// Selected at construction time from a configuration token via
/// [`FromStr`]; an unrecognized basis string is a fatal format error.
///
/// # Example
///
/// ```rust
/// use strata_core::daycounts::DayCount;
/// use strata_core::types::Date;
///
/// let basis: DayCount = "act360".parse().unwrap();
/// let start = Date::from_ymd(2020, 1, 1).unwrap();
/// let end = Date::from_ymd(2020, 4, 1).unwrap();
/// assert!((basis.year_fraction(start, end) - 91.0 / 360.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCount {
    /// Actual days over a 360-day year. Money market standard.
    Act360,
    /// Actual days over a 365-day year.
    Act365,
    /// 30/360 bond basis.
    Thirty360,
    /// 30E/360 Eurobond basis.
    ThirtyE360,
}

impl DayCount {
    /// Calculates the accrual fraction between two dates.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCount::Act360 => start.days_between(&end) as f64 / 360.0,
            DayCount::Act365 => start.days_between(&end) as f64 / 365.0,
            DayCount::Thirty360 => {
                let d1 = start.day().min(30) as f64;
                let d2 = end.day().min(30) as f64;
                let months = 30.0 * (end.month() as f64 - start.month() as f64)
                    + 360.0 * (end.year() as f64 - start.year() as f64);
                (d2 - d1 + months) / 360.0
            }
            DayCount::ThirtyE360 => {
                let d1 = (30.0 - start.day() as f64).max(0.0);
                let d2 = (end.day() as f64).min(30.0);
                let months = 30.0 * (end.month() as f64 - start.month() as f64 - 1.0);
                let years = 360.0 * (end.year() as f64 - start.year() as f64);
                (years + months + d1 + d2) / 360.0
            }
        }
    }
}

impl FromStr for DayCount {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "act360" | "act/360" => Ok(DayCount::Act360),
            "act365" | "act/365" => Ok(DayCount::Act365),
            "30360" | "30/360" => Ok(DayCount::Thirty360),
            "30e360" | "30e/360" => Ok(DayCount::ThirtyE360),
            _ => Err(CoreError::format(s, "day count basis")),
        }
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayCount::Act360 => "ACT/360",
            DayCount::Act365 => "ACT/365",
            DayCount::Thirty360 => "30/360",
            DayCount::ThirtyE360 => "30E/360",
        };
        write!(f, "{name}")
    }
}
