//! Accrual schedule generation for swap legs.
//!
//! A [`Schedule`] is built once per leg, walking backward from maturity in
//! tenor-sized steps, and is immutable afterwards. Each period carries the
//! four dates valuation needs: fixing, accrual start, accrual end and
//! payment. Cashflow amounts are not stored on the schedule; they are
//! recomputed on every solver iteration from a trial interpolant.

use strata_core::calendars::{BusinessDayConvention, Calendar};
use strata_core::types::{Date, Tenor, TenorUnit};

use crate::error::{CurveError, CurveResult};

/// A single accrual period of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// Date the floating rate is observed.
    pub fixing_date: Date,
    /// First day of the accrual window.
    pub accrual_start: Date,
    /// Day after the last day of the accrual window.
    pub accrual_end: Date,
    /// Date the period's cashflow settles.
    pub payment_date: Date,
}

/// Date-generation options for a schedule.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Adjustment applied to generated accrual end dates.
    pub period_adjustment: BusinessDayConvention,
    /// Adjustment applied to payment dates.
    pub payment_adjustment: BusinessDayConvention,
    /// Lag between an accrual start and its rate fixing (applied backward).
    pub fixing_lag: Tenor,
    /// Lag between an accrual end and its payment.
    pub payment_lag: Tenor,
    /// First regular roll date, for a front stub.
    pub second: Option<Date>,
    /// Last regular roll date, for a back stub.
    pub penultimate: Option<Date>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            period_adjustment: BusinessDayConvention::Unadjusted,
            payment_adjustment: BusinessDayConvention::Unadjusted,
            fixing_lag: Tenor::new(0, TenorUnit::Days),
            payment_lag: Tenor::new(0, TenorUnit::Days),
            second: None,
            penultimate: None,
        }
    }
}

/// An ordered sequence of accrual periods from effective date to maturity.
#[derive(Debug, Clone)]
pub struct Schedule {
    periods: Vec<Period>,
}

impl Schedule {
    /// Generates a schedule by walking backward from maturity.
    ///
    /// Unadjusted period ends are generated maturity-first in `tenor` steps
    /// until reaching (but not passing) the effective date, then adjusted
    /// for the period convention. The effective date becomes the first
    /// accrual start. Payment dates are the period ends advanced by the
    /// payment lag and adjusted for the payment convention; fixing dates
    /// are the accrual starts moved backward by the fixing lag and adjusted
    /// preceding.
    ///
    /// When `second` and `penultimate` roll dates are supplied, the regular
    /// periods run between those two anchors and the first and last periods
    /// become stubs.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` when maturity does not follow
    /// the effective date, when the tenor cannot generate periods
    /// (overnight, business-day or non-positive tenors), or when only one
    /// of `second`/`penultimate` is supplied.
    pub fn new(
        effective: Date,
        maturity: Date,
        tenor: Tenor,
        config: &ScheduleConfig,
        calendar: &Calendar,
    ) -> CurveResult<Self> {
        if maturity <= effective {
            return Err(CurveError::configuration(format!(
                "maturity {maturity} must follow effective date {effective}"
            )));
        }
        if matches!(tenor.unit, TenorUnit::Overnight | TenorUnit::BusinessDays)
            || tenor.count <= 0
        {
            return Err(CurveError::configuration(format!(
                "period tenor {tenor} cannot generate a schedule"
            )));
        }

        let raw_ends = match (config.second, config.penultimate) {
            (Some(second), Some(penultimate)) => {
                let mut ends = vec![penultimate];
                let mut k = 1;
                loop {
                    let date = tenor.scaled(k).subtract_from(penultimate)?;
                    if date <= second {
                        break;
                    }
                    ends.push(date);
                    k += 1;
                }
                ends.push(second);
                ends.reverse();
                ends.push(maturity);
                ends
            }
            (None, None) => {
                let mut ends = Vec::new();
                let mut k = 0;
                loop {
                    let date = tenor.scaled(k).subtract_from(maturity)?;
                    if date <= effective {
                        break;
                    }
                    ends.push(date);
                    k += 1;
                }
                ends.reverse();
                ends
            }
            _ => {
                return Err(CurveError::configuration(
                    "second and penultimate roll dates must be supplied together",
                ));
            }
        };

        let mut periods = Vec::with_capacity(raw_ends.len());
        let mut start = effective;
        for raw_end in raw_ends {
            let end = calendar.adjust(raw_end, config.period_adjustment);
            let payment_date =
                calendar.advance(end, config.payment_lag, config.payment_adjustment)?;
            let fixing_date =
                calendar.reverse(start, config.fixing_lag, BusinessDayConvention::Preceding)?;
            periods.push(Period {
                fixing_date,
                accrual_start: start,
                accrual_end: end,
                payment_date,
            });
            start = end;
        }

        Ok(Self { periods })
    }

    /// The periods in accrual order.
    #[must_use]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Payment date of the final period.
    ///
    /// Curve nodes bootstrapped from swaps are keyed by this date rather
    /// than the swap's nominal maturity.
    #[must_use]
    pub fn last_payment_date(&self) -> Date {
        self.periods[self.periods.len() - 1].payment_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn quarterly(effective: Date, maturity: Date) -> Schedule {
        Schedule::new(
            effective,
            maturity,
            "3M".parse().unwrap(),
            &ScheduleConfig::default(),
            &Calendar::weekends(),
        )
        .unwrap()
    }

    #[test]
    fn test_quarterly_periods_cover_the_year() {
        let schedule = quarterly(d(2020, 1, 15), d(2021, 1, 15));
        let periods = schedule.periods();
        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].accrual_start, d(2020, 1, 15));
        assert_eq!(periods[0].accrual_end, d(2020, 4, 15));
        assert_eq!(periods[3].accrual_end, d(2021, 1, 15));
        // Contiguity: each period starts where the previous one ends.
        for pair in periods.windows(2) {
            assert_eq!(pair[0].accrual_end, pair[1].accrual_start);
        }
    }

    #[test]
    fn test_front_stub_from_backward_generation() {
        // 14 months quarterly: the first period is the 2-month remainder.
        let schedule = quarterly(d(2020, 1, 15), d(2021, 3, 15));
        let periods = schedule.periods();
        assert_eq!(periods.len(), 5);
        assert_eq!(periods[0].accrual_start, d(2020, 1, 15));
        assert_eq!(periods[0].accrual_end, d(2020, 3, 15));
    }

    #[test]
    fn test_payment_lag_and_adjustment() {
        let config = ScheduleConfig {
            payment_adjustment: BusinessDayConvention::Following,
            payment_lag: "2D".parse().unwrap(),
            ..ScheduleConfig::default()
        };
        let schedule = Schedule::new(
            d(2020, 1, 15),
            d(2020, 7, 15),
            "3M".parse().unwrap(),
            &config,
            &Calendar::weekends(),
        )
        .unwrap();
        // Period end Wed 2020-04-15 + 2D = Fri 2020-04-17, already a
        // business day.
        assert_eq!(schedule.periods()[0].payment_date, d(2020, 4, 17));
        // Period end Wed 2020-07-15 + 2D = Fri 2020-07-17.
        assert_eq!(schedule.last_payment_date(), d(2020, 7, 17));
    }

    #[test]
    fn test_fixing_lag_adjusts_preceding() {
        let config = ScheduleConfig {
            fixing_lag: "2D".parse().unwrap(),
            ..ScheduleConfig::default()
        };
        let schedule = Schedule::new(
            d(2020, 1, 15),
            d(2020, 7, 15),
            "3M".parse().unwrap(),
            &config,
            &Calendar::weekends(),
        )
        .unwrap();
        // Wed 2020-01-15 minus 2 calendar days is Mon 2020-01-13.
        assert_eq!(schedule.periods()[0].fixing_date, d(2020, 1, 13));
        // Wed 2020-04-15 minus 2 days is Mon 2020-04-13.
        assert_eq!(schedule.periods()[1].fixing_date, d(2020, 4, 13));
    }

    #[test]
    fn test_stub_pair_must_be_complete() {
        let config = ScheduleConfig {
            second: Some(d(2020, 4, 1)),
            ..ScheduleConfig::default()
        };
        let result = Schedule::new(
            d(2020, 1, 15),
            d(2021, 1, 15),
            "3M".parse().unwrap(),
            &config,
            &Calendar::weekends(),
        );
        assert!(matches!(result, Err(CurveError::Configuration { .. })));
    }

    #[test]
    fn test_explicit_roll_dates_anchor_the_periods() {
        let config = ScheduleConfig {
            second: Some(d(2020, 4, 1)),
            penultimate: Some(d(2020, 10, 1)),
            ..ScheduleConfig::default()
        };
        let schedule = Schedule::new(
            d(2020, 1, 15),
            d(2020, 11, 15),
            "3M".parse().unwrap(),
            &config,
            &Calendar::weekends(),
        )
        .unwrap();
        let ends: Vec<Date> = schedule.periods().iter().map(|p| p.accrual_end).collect();
        assert_eq!(
            ends,
            vec![d(2020, 4, 1), d(2020, 7, 1), d(2020, 10, 1), d(2020, 11, 15)]
        );
    }

    #[test]
    fn test_rejects_overnight_period_tenor() {
        let result = Schedule::new(
            d(2020, 1, 15),
            d(2021, 1, 15),
            Tenor::overnight(),
            &ScheduleConfig::default(),
            &Calendar::weekends(),
        );
        assert!(matches!(result, Err(CurveError::Configuration { .. })));
    }

    #[test]
    fn test_rejects_inverted_dates() {
        let result = Schedule::new(
            d(2021, 1, 15),
            d(2020, 1, 15),
            "3M".parse().unwrap(),
            &ScheduleConfig::default(),
            &Calendar::weekends(),
        );
        assert!(matches!(result, Err(CurveError::Configuration { .. })));
    }
}
