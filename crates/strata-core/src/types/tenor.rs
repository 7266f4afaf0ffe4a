//! Tenor: a relative time period such as `3M`, `10Y`, `ON` or `2BD`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Unit of a [`Tenor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenorUnit {
    /// Overnight (one calendar day, no defined subtraction).
    Overnight,
    /// Calendar days.
    Days,
    /// Business days (require a calendar to apply).
    BusinessDays,
    /// Weeks.
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

/// An immutable period descriptor: a signed count and a unit.
///
/// Parsed from strings like `"3M"`, `"10Y"`, `"-2BD"` or the literal `"ON"`.
///
/// # Example
///
/// ```rust
/// use strata_core::types::{Date, Tenor};
///
/// let tenor: Tenor = "3M".parse().unwrap();
/// let d = Date::from_ymd(2020, 1, 15).unwrap();
/// assert_eq!(tenor.add_to(d).unwrap(), Date::from_ymd(2020, 4, 15).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tenor {
    /// Signed period count.
    pub count: i32,
    /// Period unit.
    pub unit: TenorUnit,
}

impl Tenor {
    /// Creates a tenor from a count and unit.
    #[must_use]
    pub fn new(count: i32, unit: TenorUnit) -> Self {
        Self { count, unit }
    }

    /// The overnight tenor.
    #[must_use]
    pub fn overnight() -> Self {
        Self::new(1, TenorUnit::Overnight)
    }

    /// Returns a tenor with the count multiplied by `k`.
    ///
    /// Used by the schedule generator to step backward from maturity.
    #[must_use]
    pub fn scaled(&self, k: i32) -> Self {
        Self::new(self.count * k, self.unit)
    }

    /// Returns true for a zero-length tenor (`0D` etc.).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.count == 0 && self.unit != TenorUnit::Overnight
    }

    /// Adds the tenor to a date using plain date arithmetic (no calendar).
    ///
    /// Business-day tenors need a calendar; use
    /// [`Calendar::advance`](crate::calendars::Calendar::advance) for those.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unsupported` for business-day tenors and
    /// `CoreError::InvalidDate` if the result is out of range.
    pub fn add_to(&self, date: Date) -> CoreResult<Date> {
        match self.unit {
            TenorUnit::Overnight => Ok(date.add_days(1)),
            TenorUnit::Days => Ok(date.add_days(i64::from(self.count))),
            TenorUnit::Weeks => Ok(date.add_weeks(i64::from(self.count))),
            TenorUnit::Months => date.add_months(self.count),
            TenorUnit::Years => date.add_years(self.count),
            TenorUnit::BusinessDays => Err(CoreError::unsupported(
                "business-day tenors require a calendar",
            )),
        }
    }

    /// Subtracts the tenor from a date using plain date arithmetic.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unsupported` for overnight and business-day
    /// tenors; overnight has no defined subtraction.
    pub fn subtract_from(&self, date: Date) -> CoreResult<Date> {
        match self.unit {
            TenorUnit::Overnight => Err(CoreError::unsupported(
                "overnight tenor has no defined subtraction",
            )),
            _ => self.scaled(-1).add_to(date),
        }
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    /// Parses a tenor token.
    ///
    /// Accepts an optional sign, a digit run, and a trailing unit out of
    /// `D`, `BD`, `W`, `M`, `Y` (case-insensitive), or the literal `ON`.
    fn from_str(s: &str) -> CoreResult<Self> {
        let token = s.trim();
        let upper = token.to_ascii_uppercase();

        if upper == "ON" {
            return Ok(Tenor::overnight());
        }

        let digits_end = upper
            .char_indices()
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map(|(i, _)| i)
            .unwrap_or(upper.len());

        let (number, unit) = upper.split_at(digits_end);
        let count: i32 = number
            .parse()
            .map_err(|_| CoreError::format(token, "tenor"))?;

        let unit = match unit {
            "D" => TenorUnit::Days,
            "BD" => TenorUnit::BusinessDays,
            "W" => TenorUnit::Weeks,
            "M" => TenorUnit::Months,
            "Y" => TenorUnit::Years,
            _ => return Err(CoreError::format(token, "tenor")),
        };

        Ok(Tenor::new(count, unit))
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            TenorUnit::Overnight => write!(f, "ON"),
            TenorUnit::Days => write!(f, "{}D", self.count),
            TenorUnit::BusinessDays => write!(f, "{}BD", self.count),
            TenorUnit::Weeks => write!(f, "{}W", self.count),
            TenorUnit::Months => write!(f, "{}M", self.count),
            TenorUnit::Years => write!(f, "{}Y", self.count),
        }
    }
}
