//! Interest-rate futures.
//!
//! Simple futures imply a forward rate directly from their price and value
//! like a FRA. Compound (SOFR-style) futures settle on the realized daily
//! compounded rate across the accrual window, so their maturity discount
//! factor is found by root-finding; any part of the window before the
//! curve date is priced off realized historical fixings.

use chrono::Weekday;
use log::trace;

use strata_core::calendars::{BusinessDayConvention, Calendar};
use strata_core::daycounts::DayCount;
use strata_core::types::{Date, Tenor};
use strata_math::error::{MathError, MathResult};
use strata_math::interpolation::Pchip;
use strata_math::solvers::{newton_raphson_numerical, SolverConfig};

use crate::compounding::{compound_growth, historical_growth, rate_days};
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::fixings::FixingTable;
use crate::simultaneous::JointContext;

/// Resolves an IMM futures code to its contract date.
///
/// The code is a month letter followed by a two-digit year, e.g. `H20` for
/// March 2020. The contract date is the third Wednesday of that month.
///
/// # Errors
///
/// Returns `CurveError::Configuration` for an unknown month letter or an
/// unparseable year.
pub fn imm_date(code: &str) -> CurveResult<Date> {
    let code = code.trim();
    let mut chars = code.chars();
    let letter = chars
        .next()
        .ok_or_else(|| CurveError::configuration("empty IMM code"))?;
    let month = match letter.to_ascii_uppercase() {
        'F' => 1,
        'G' => 2,
        'H' => 3,
        'J' => 4,
        'K' => 5,
        'M' => 6,
        'N' => 7,
        'Q' => 8,
        'U' => 9,
        'V' => 10,
        'X' => 11,
        'Z' => 12,
        other => {
            return Err(CurveError::configuration(format!(
                "unknown IMM month letter '{other}' in code {code}"
            )));
        }
    };
    let year: i32 = chars
        .as_str()
        .parse()
        .map_err(|_| CurveError::configuration(format!("unparseable IMM year in code {code}")))?;
    third_wednesday(2000 + year, month)
}

fn third_wednesday(year: i32, month: u32) -> CurveResult<Date> {
    let first = Date::from_ymd(year, month, 1)?;
    let to_wednesday = (Weekday::Wed.num_days_from_monday() + 7
        - first.weekday().num_days_from_monday())
        % 7;
    Ok(first.add_days(i64::from(to_wednesday) + 14))
}

/// An interest-rate futures contract.
#[derive(Debug, Clone)]
pub struct FutureInstrument {
    effective: Date,
    maturity: Date,
    price: f64,
    rate: f64,
    basis: DayCount,
    notional: f64,
    compounding: bool,
    fixings: Option<FixingTable>,
    name: String,
}

impl FutureInstrument {
    /// Creates a simple future with an explicit accrual window.
    ///
    /// The implied rate is `(100 − price) / 100`.
    #[must_use]
    pub fn by_dates(effective: Date, maturity: Date, price: f64, basis: DayCount) -> Self {
        Self {
            effective,
            maturity,
            price,
            rate: (100.0 - price) / 100.0,
            basis,
            notional: 100.0,
            compounding: false,
            fixings: None,
            name: format!("FUT-{maturity}"),
        }
    }

    /// Creates a simple future from an IMM code.
    ///
    /// The accrual window runs from the contract date for one tenor,
    /// adjusted following.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid IMM code.
    pub fn by_imm_code(
        code: &str,
        price: f64,
        tenor: Tenor,
        calendar: &Calendar,
        basis: DayCount,
    ) -> CurveResult<Self> {
        let effective = imm_date(code)?;
        let maturity = calendar.advance(effective, tenor, BusinessDayConvention::Following)?;
        Ok(Self {
            effective,
            maturity,
            price,
            rate: (100.0 - price) / 100.0,
            basis,
            notional: 100.0,
            compounding: false,
            fixings: None,
            name: format!("FUT-{}", code.trim().to_ascii_uppercase()),
        })
    }

    /// Creates a compound (SOFR-style) future from an IMM code.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid IMM code.
    pub fn compound_by_imm_code(
        code: &str,
        price: f64,
        tenor: Tenor,
        calendar: &Calendar,
        basis: DayCount,
    ) -> CurveResult<Self> {
        let mut future = Self::by_imm_code(code, price, tenor, calendar, basis)?;
        future.compounding = true;
        Ok(future)
    }

    /// Attaches realized fixings for the part of the accrual window that
    /// precedes the curve date.
    #[must_use]
    pub fn with_fixings(mut self, fixings: FixingTable) -> Self {
        self.fixings = Some(fixings);
        self
    }

    /// Sets the contract notional.
    #[must_use]
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// The implied futures rate, `(100 − price) / 100`.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The quoted price.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// First day of the accrual window.
    #[must_use]
    pub fn effective(&self) -> Date {
        self.effective
    }

    /// Last day of the accrual window.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// The instrument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this contract settles on a daily compounded rate.
    #[must_use]
    pub fn is_compounding(&self) -> bool {
        self.compounding
    }

    pub(crate) fn log_discount_factor(&self, curve: &Curve) -> CurveResult<f64> {
        if !self.compounding {
            let df_start = curve.committed_discount_factor(self.effective)?;
            let accrual = self.basis.year_fraction(self.effective, self.maturity);
            return Ok((df_start / (1.0 + self.rate * accrual)).ln());
        }

        let (fixed_growth, projected) = self.splice(curve.effective())?;
        let result = newton_raphson_numerical(
            |guess| {
                let trial = curve.trial_interpolator(self.maturity, guess)?;
                self.compound_value(&trial, fixed_growth, &projected)
            },
            0.0,
            &SolverConfig::default(),
        )
        .map_err(|e| CurveError::solver(&self.name, e))?;
        trace!(
            "{}: solved in {} iterations, residual {:.3e}",
            self.name,
            result.iterations,
            result.residual
        );
        Ok(result.root)
    }

    /// Splits the accrual window at `cutoff` into a realized growth factor
    /// (from fixings) and the remaining projected rate days.
    fn splice(&self, cutoff: Date) -> CurveResult<(f64, Vec<(Date, u32)>)> {
        let days = rate_days(self.effective, self.maturity);
        let (fixed, projected): (Vec<_>, Vec<_>) =
            days.into_iter().partition(|&(day, _)| day < cutoff);
        if fixed.is_empty() {
            return Ok((1.0, projected));
        }
        let table = self.fixings.as_ref().ok_or_else(|| {
            CurveError::configuration(format!(
                "{}: accrual window opens before the curve date and no fixings were supplied",
                self.name
            ))
        })?;
        Ok((historical_growth(table, &fixed)?, projected))
    }

    /// Net value of the contract under a trial interpolant: realized plus
    /// projected compounded leg versus the quoted rate leg, both discounted
    /// to the contract maturity.
    fn compound_value(
        &self,
        trial: &Pchip,
        fixed_growth: f64,
        projected: &[(Date, u32)],
    ) -> MathResult<f64> {
        let growth = fixed_growth * compound_growth(trial, projected)?;
        let forward_rate = growth - 1.0;
        let df = trial.value(self.maturity.timestamp())?.exp();
        let accrual = self.basis.year_fraction(self.effective, self.maturity);
        let forward_pv = forward_rate * self.notional * df;
        let futures_pv = self.rate * self.notional * accrual * df;
        Ok(forward_pv - futures_pv)
    }

    pub(crate) fn joint_value(
        &self,
        guesses: [f64; 2],
        own_index: usize,
        ctx: &JointContext<'_>,
    ) -> MathResult<f64> {
        if !self.compounding {
            return Err(MathError::invalid_input(format!(
                "{} cannot be valued in a joint solve",
                self.name
            )));
        }
        let curve = ctx.curve(own_index);
        let (fixed_growth, projected) = self
            .splice(curve.effective())
            .map_err(|e| MathError::invalid_input(e.to_string()))?;
        let trial = curve.trial_interpolator(self.maturity, guesses[own_index])?;
        self.compound_value(&trial, fixed_growth, &projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_imm_third_wednesday() {
        assert_eq!(imm_date("H20").unwrap(), Date::from_ymd(2020, 3, 18).unwrap());
        assert_eq!(imm_date("Z22").unwrap(), Date::from_ymd(2022, 12, 21).unwrap());
        assert_eq!(imm_date("M21").unwrap(), Date::from_ymd(2021, 6, 16).unwrap());
    }

    #[test]
    fn test_imm_rejects_bad_codes() {
        assert!(matches!(
            imm_date("A20"),
            Err(CurveError::Configuration { .. })
        ));
        assert!(matches!(
            imm_date("Hxx"),
            Err(CurveError::Configuration { .. })
        ));
        assert!(matches!(imm_date(""), Err(CurveError::Configuration { .. })));
    }

    #[test]
    fn test_simple_future_matches_fra_shape() {
        let effective = Date::from_ymd(2020, 3, 16).unwrap();
        let curve = Curve::new(effective);
        let future =
            FutureInstrument::by_dates(effective, effective.add_days(91), 98.25, DayCount::Act360);
        assert_relative_eq!(future.rate(), 0.0175, epsilon = 1e-15);
        let accrual = 91.0 / 360.0;
        let expected = (1.0_f64 / (1.0 + 0.0175 * accrual)).ln();
        assert_relative_eq!(
            future.log_discount_factor(&curve).unwrap(),
            expected,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_compound_future_splices_fixings_and_solves() {
        // Curve dated mid-window: the stretch from the contract date to the
        // curve date accrues off realized fixings, the rest off the trial
        // interpolant.
        let cutoff = Date::from_ymd(2020, 4, 15).unwrap();
        let mut curve = Curve::new(cutoff);
        curve
            .append_node(Date::from_ymd(2020, 5, 15).unwrap(), "CASH-1M", 0.004, -0.00033)
            .unwrap();

        let mut fixings = FixingTable::new();
        let mut day = Date::from_ymd(2020, 3, 18).unwrap();
        while day < cutoff {
            fixings.insert(day, 0.004);
            day = day.add_days(1);
        }

        let future = FutureInstrument::compound_by_imm_code(
            "H20",
            99.6,
            "3M".parse().unwrap(),
            &Calendar::weekends(),
            DayCount::Act360,
        )
        .unwrap()
        .with_fixings(fixings);

        let (fixed_growth, projected) = future.splice(curve.effective()).unwrap();
        assert!(fixed_growth > 1.0);
        assert!(!projected.is_empty());
        assert!(projected.iter().all(|&(d, _)| d >= cutoff));

        // The solved node zeroes the contract value under its own trial.
        let root = future.log_discount_factor(&curve).unwrap();
        let trial = curve.trial_interpolator(future.maturity(), root).unwrap();
        let residual = future
            .compound_value(&trial, fixed_growth, &projected)
            .unwrap();
        assert!(residual.abs() < 1e-8, "residual {residual:.3e}");
    }

    #[test]
    fn test_compound_future_without_fixings_fails_before_curve_date() {
        // Curve dated mid-window: fixings are required.
        let curve = Curve::new(Date::from_ymd(2020, 4, 15).unwrap());
        let future = FutureInstrument::compound_by_imm_code(
            "H20",
            98.0,
            "3M".parse().unwrap(),
            &Calendar::weekends(),
            DayCount::Act360,
        )
        .unwrap();
        assert!(matches!(
            future.log_discount_factor(&curve),
            Err(CurveError::Configuration { .. })
        ));
    }
}
