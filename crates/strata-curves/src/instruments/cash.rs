//! Cash deposit instruments.

use strata_core::calendars::{BusinessDayConvention, Calendar};
use strata_core::daycounts::DayCount;
use strata_core::types::{Date, Tenor};

use crate::error::CurveResult;

/// A money-market cash deposit.
///
/// The shortest instruments on a curve. The discount factor at maturity is
/// known in closed form from the deposit rate, so no root-finding is
/// involved.
#[derive(Debug, Clone)]
pub struct CashInstrument {
    effective: Date,
    maturity: Date,
    rate: f64,
    basis: DayCount,
    name: String,
}

impl CashInstrument {
    /// Creates a deposit maturing one tenor after the effective date.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenor cannot be applied to the date.
    pub fn new(
        effective: Date,
        rate: f64,
        tenor: Tenor,
        calendar: &Calendar,
        basis: DayCount,
    ) -> CurveResult<Self> {
        let maturity = calendar.advance(effective, tenor, BusinessDayConvention::Unadjusted)?;
        Ok(Self {
            effective,
            maturity,
            rate,
            basis,
            name: format!("CASH-{tenor}"),
        })
    }

    /// Creates a deposit between two explicit dates.
    #[must_use]
    pub fn by_dates(effective: Date, maturity: Date, rate: f64, basis: DayCount) -> Self {
        Self {
            effective,
            maturity,
            rate,
            basis,
            name: format!("CASH-{maturity}"),
        }
    }

    /// Overrides the instrument name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The deposit rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The deposit maturity.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// The instrument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Closed-form log discount factor at maturity:
    /// `ln(1 / (1 + r·α))`.
    #[must_use]
    pub fn log_discount_factor(&self) -> f64 {
        let accrual = self.basis.year_fraction(self.effective, self.maturity);
        (1.0 / (1.0 + self.rate * accrual)).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_day_deposit_closed_form() {
        let effective = Date::from_ymd(2020, 3, 16).unwrap();
        let cash = CashInstrument::new(
            effective,
            0.0155,
            Tenor::overnight(),
            &Calendar::weekends(),
            DayCount::Act360,
        )
        .unwrap();
        assert_eq!(cash.maturity(), Date::from_ymd(2020, 3, 17).unwrap());
        let expected = (1.0_f64 / (1.0 + 0.0155 / 360.0)).ln();
        assert_relative_eq!(cash.log_discount_factor(), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_name_carries_tenor() {
        let effective = Date::from_ymd(2020, 3, 16).unwrap();
        let cash = CashInstrument::new(
            effective,
            0.016,
            "3M".parse().unwrap(),
            &Calendar::weekends(),
            DayCount::Act360,
        )
        .unwrap();
        assert_eq!(cash.name(), "CASH-3M");
    }
}
