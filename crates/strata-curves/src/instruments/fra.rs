//! Forward rate agreements.

use strata_core::calendars::{BusinessDayConvention, Calendar};
use strata_core::daycounts::DayCount;
use strata_core::types::{Date, Tenor};

use crate::curve::Curve;
use crate::error::CurveResult;

/// A forward rate agreement.
///
/// A single forward accrual period. The start-date discount factor must
/// already be covered by the curve's built nodes, making the maturity
/// discount factor closed-form:
/// `ln(DF(start) / (1 + r·α))`.
#[derive(Debug, Clone)]
pub struct FraInstrument {
    start: Date,
    maturity: Date,
    rate: f64,
    basis: DayCount,
    name: String,
}

impl FraInstrument {
    /// Creates a FRA between two explicit dates.
    #[must_use]
    pub fn new(start: Date, maturity: Date, rate: f64, basis: DayCount) -> Self {
        Self {
            start,
            maturity,
            rate,
            basis,
            name: format!("FRA-{maturity}"),
        }
    }

    /// Creates a FRA running one tenor from its start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenor cannot be applied to the date.
    pub fn by_tenor(
        start: Date,
        tenor: Tenor,
        rate: f64,
        calendar: &Calendar,
        basis: DayCount,
    ) -> CurveResult<Self> {
        let maturity = calendar.advance(start, tenor, BusinessDayConvention::Unadjusted)?;
        Ok(Self {
            start,
            maturity,
            rate,
            basis,
            name: format!("FRA-{maturity}"),
        })
    }

    /// The forward rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The forward period start.
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// The forward period end.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// The instrument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn log_discount_factor(&self, curve: &Curve) -> CurveResult<f64> {
        let df_start = curve.committed_discount_factor(self.start)?;
        let accrual = self.basis.year_fraction(self.start, self.maturity);
        Ok((df_start / (1.0 + self.rate * accrual)).ln())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fra_from_curve_effective_date() {
        // Starting at the curve date, DF(start) is exactly one and the FRA
        // reduces to the cash closed form.
        let effective = Date::from_ymd(2020, 3, 16).unwrap();
        let curve = Curve::new(effective);
        let fra = FraInstrument::by_tenor(
            effective,
            "3M".parse().unwrap(),
            0.017,
            &Calendar::weekends(),
            DayCount::Act360,
        )
        .unwrap();
        let accrual = DayCount::Act360.year_fraction(effective, fra.maturity());
        let expected = (1.0 / (1.0 + 0.017 * accrual)).ln();
        assert_relative_eq!(
            fra.log_discount_factor(&curve).unwrap(),
            expected,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_fra_needs_built_nodes_for_forward_start() {
        let effective = Date::from_ymd(2020, 3, 16).unwrap();
        let curve = Curve::new(effective);
        let fra = FraInstrument::new(
            effective.add_days(90),
            effective.add_days(180),
            0.017,
            DayCount::Act360,
        );
        // A forward start with only the effective node committed cannot be
        // interpolated.
        assert!(fra.log_discount_factor(&curve).is_err());
    }
}
