//! Holiday calendars and business day arithmetic.
//!
//! A [`Calendar`] is an immutable holiday set (one or more named holiday
//! centers, each persisted as a plain ISO-date-per-line text file) plus a
//! weekend mask. It provides the three date operations the schedule
//! generator and instruments rely on: `adjust`, `advance` and `reverse`.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

mod conventions;

pub use conventions::BusinessDayConvention;

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Tenor, TenorUnit};

/// Default weekend mask: Saturday and Sunday.
pub const WEEKEND_SAT_SUN: u8 = (1 << 5) | (1 << 6);

/// Directory holding the bundled holiday lists, one `<code>.txt` per center.
fn default_data_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data/calendars"))
}

/// An immutable holiday calendar.
///
/// # Example
///
/// ```rust
/// use strata_core::calendars::{BusinessDayConvention, Calendar};
/// use strata_core::types::Date;
///
/// let cal = Calendar::weekends();
/// let saturday = Date::from_ymd(2020, 3, 21).unwrap();
/// let adjusted = cal.adjust(saturday, BusinessDayConvention::Following);
/// assert_eq!(adjusted, Date::from_ymd(2020, 3, 23).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Calendar {
    name: String,
    /// Bitmask over weekdays, bit 0 = Monday .. bit 6 = Sunday.
    weekend: u8,
    holidays: BTreeSet<Date>,
}

impl Calendar {
    /// A weekend-only calendar (no holiday centers).
    #[must_use]
    pub fn weekends() -> Self {
        Self {
            name: "weekends".to_string(),
            weekend: WEEKEND_SAT_SUN,
            holidays: BTreeSet::new(),
        }
    }

    /// Loads a calendar for the given holiday center codes from the
    /// bundled data directory.
    ///
    /// The holiday sets of all centers are unioned.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CalendarLoad` if a center's file is missing or
    /// contains an unparseable line.
    pub fn load(centers: &[&str]) -> CoreResult<Self> {
        Self::load_from(&default_data_dir(), centers)
    }

    /// Loads a calendar from an explicit resource directory.
    ///
    /// Each center code `c` resolves to `<dir>/<c>.txt`, one ISO date per
    /// line; blank lines and lines starting with `#` are ignored.
    pub fn load_from(dir: &Path, centers: &[&str]) -> CoreResult<Self> {
        let mut holidays = BTreeSet::new();
        for code in centers {
            let path = dir.join(format!("{code}.txt"));
            let text = std::fs::read_to_string(&path)
                .map_err(|e| CoreError::calendar_load(*code, e.to_string()))?;
            for line in text.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let date = Date::parse(line)
                    .map_err(|e| CoreError::calendar_load(*code, e.to_string()))?;
                holidays.insert(date);
            }
        }
        Ok(Self {
            name: centers.join("+"),
            weekend: WEEKEND_SAT_SUN,
            holidays,
        })
    }

    /// Replaces the weekend mask (bit 0 = Monday .. bit 6 = Sunday).
    #[must_use]
    pub fn with_weekend_mask(mut self, mask: u8) -> Self {
        self.weekend = mask;
        self
    }

    /// Returns the calendar name (joined center codes).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the date is neither a weekend day nor a holiday.
    #[must_use]
    pub fn is_business_day(&self, date: Date) -> bool {
        let weekday_bit = 1 << date.weekday().num_days_from_monday();
        (self.weekend & weekday_bit) == 0 && !self.holidays.contains(&date)
    }

    /// Returns true if the date is a weekend day or holiday.
    #[must_use]
    pub fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Returns the next business day strictly after `date`.
    #[must_use]
    pub fn next_business_day(&self, date: Date) -> Date {
        let mut d = date.add_days(1);
        while !self.is_business_day(d) {
            d = d.add_days(1);
        }
        d
    }

    /// Returns the previous business day on or before `date`.
    #[must_use]
    pub fn previous_business_day(&self, date: Date) -> Date {
        let mut d = date;
        while !self.is_business_day(d) {
            d = d.add_days(-1);
        }
        d
    }

    /// Adjusts a date according to the business day convention.
    ///
    /// `Unadjusted` is a no-op. `Following`/`Preceding` step one day at a
    /// time in the adjustment direction until a business day is reached.
    /// `ModifiedFollowing` falls back to `Preceding` when following would
    /// cross a month boundary.
    #[must_use]
    pub fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        match convention {
            BusinessDayConvention::Unadjusted => date,
            BusinessDayConvention::Following => {
                let mut d = date;
                while !self.is_business_day(d) {
                    d = d.add_days(1);
                }
                d
            }
            BusinessDayConvention::Preceding => {
                let mut d = date;
                while !self.is_business_day(d) {
                    d = d.add_days(-1);
                }
                d
            }
            BusinessDayConvention::ModifiedFollowing => {
                let following = self.adjust(date, BusinessDayConvention::Following);
                if following.month() == date.month() {
                    following
                } else {
                    self.adjust(date, BusinessDayConvention::Preceding)
                }
            }
        }
    }

    /// Advances a date by a tenor, then adjusts the result.
    ///
    /// Business-day tenors walk one day at a time, skipping non-business
    /// days; all other units apply plain date arithmetic before the
    /// adjustment.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date arithmetic overflows.
    pub fn advance(
        &self,
        date: Date,
        tenor: Tenor,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        match tenor.unit {
            TenorUnit::BusinessDays => Ok(self.walk_business_days(date, tenor.count)),
            _ => {
                let moved = tenor.add_to(date)?;
                Ok(self.adjust(moved, convention))
            }
        }
    }

    /// Moves a date backward by a tenor, then adjusts the result.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unsupported` for overnight tenors (no defined
    /// subtraction).
    pub fn reverse(
        &self,
        date: Date,
        tenor: Tenor,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        match tenor.unit {
            TenorUnit::Overnight => Err(CoreError::unsupported(
                "overnight tenor has no defined subtraction",
            )),
            TenorUnit::BusinessDays => Ok(self.walk_business_days(date, -tenor.count)),
            _ => {
                let moved = tenor.subtract_from(date)?;
                Ok(self.adjust(moved, convention))
            }
        }
    }

    /// Walks `count` business days from `date` (sign gives the direction).
    fn walk_business_days(&self, date: Date, count: i32) -> Date {
        let step: i64 = if count >= 0 { 1 } else { -1 };
        let mut remaining = count.abs();
        let mut d = date;
        while remaining > 0 {
            d = d.add_days(step);
            while !self.is_business_day(d) {
                d = d.add_days(step);
            }
            remaining -= 1;
        }
        d
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
