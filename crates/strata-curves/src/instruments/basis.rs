//! Overnight-versus-term basis swaps.
//!
//! Basis swaps exchange two floating legs and therefore pin down two
//! unknowns at once: one node on each of a pair of curves. They only make
//! sense inside a joint strip, so they carry no solo `solve` path.

use strata_core::calendars::{BusinessDayConvention, Calendar};
use strata_core::daycounts::DayCount;
use strata_core::types::{Date, Tenor, TenorUnit};
use strata_math::error::MathResult;

use crate::error::CurveResult;
use crate::instruments::swap::Leg;
use crate::schedule::{Schedule, ScheduleConfig};
use crate::simultaneous::JointContext;

/// How the overnight leg's daily rates are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisKind {
    /// Daily rates averaged across each period (Fed-Funds style).
    AverageIndex,
    /// Daily rates compounded against the period accrual on both legs.
    CompoundIndex,
}

/// Market conventions for a basis swap.
#[derive(Debug, Clone)]
pub struct BasisSwapConventions {
    /// Holiday calendar for all date adjustments.
    pub calendar: Calendar,
    /// Lag from trade date to the first accrual start.
    pub spot_lag: Tenor,
    /// Overnight leg day-count basis.
    pub leg_one_basis: DayCount,
    /// Overnight leg period tenor.
    pub leg_one_tenor: Tenor,
    /// Basis for the overnight leg's per-period rate accrual.
    pub leg_one_rate_basis: DayCount,
    /// Term leg day-count basis.
    pub leg_two_basis: DayCount,
    /// Term leg period tenor.
    pub leg_two_tenor: Tenor,
    /// Tenor of the term leg's rate observation.
    pub leg_two_rate_tenor: Tenor,
    /// Basis of the term leg's rate observation.
    pub leg_two_rate_basis: DayCount,
    /// Spread paid on the term leg.
    pub leg_two_spread: f64,
    /// Adjustment for accrual ends on both legs.
    pub period_adjustment: BusinessDayConvention,
    /// Adjustment for payment dates on both legs.
    pub payment_adjustment: BusinessDayConvention,
    /// Lag from accrual start to rate fixing.
    pub fixing_lag: Tenor,
    /// Lag from accrual end to payment.
    pub payment_lag: Tenor,
    /// Notional for cashflow calculations.
    pub notional: f64,
    /// First regular roll date, for stub periods.
    pub second: Option<Date>,
    /// Last regular roll date, for stub periods.
    pub penultimate: Option<Date>,
}

impl Default for BasisSwapConventions {
    fn default() -> Self {
        Self {
            calendar: Calendar::weekends(),
            spot_lag: Tenor::new(0, TenorUnit::Days),
            leg_one_basis: DayCount::Act360,
            leg_one_tenor: Tenor::new(3, TenorUnit::Months),
            leg_one_rate_basis: DayCount::Act360,
            leg_two_basis: DayCount::Act360,
            leg_two_tenor: Tenor::new(3, TenorUnit::Months),
            leg_two_rate_tenor: Tenor::new(3, TenorUnit::Months),
            leg_two_rate_basis: DayCount::Act360,
            leg_two_spread: 0.0,
            period_adjustment: BusinessDayConvention::Unadjusted,
            payment_adjustment: BusinessDayConvention::Unadjusted,
            fixing_lag: Tenor::new(0, TenorUnit::Days),
            payment_lag: Tenor::new(0, TenorUnit::Days),
            notional: 100.0,
            second: None,
            penultimate: None,
        }
    }
}

/// A two-floating-leg basis swap quoted as a spread on the overnight leg.
#[derive(Debug, Clone)]
pub struct BasisSwapInstrument {
    effective: Date,
    maturity: Date,
    kind: BasisKind,
    notional: f64,
    leg_one: Leg,
    leg_two: Leg,
    leg_one_spread: f64,
    name: String,
}

impl BasisSwapInstrument {
    /// Creates an average-index basis swap: a daily-averaged overnight leg
    /// against a term-rate leg.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedules cannot be generated.
    pub fn average_index(
        effective: Date,
        tenor: Tenor,
        leg_one_spread: f64,
        conventions: &BasisSwapConventions,
    ) -> CurveResult<Self> {
        let (start, maturity, schedule_one, schedule_two) =
            Self::schedules(effective, tenor, conventions)?;
        let leg_one = Leg::averaged(schedule_one, conventions.leg_one_basis, leg_one_spread);
        let leg_two = Leg::term(
            schedule_two,
            conventions.leg_two_basis,
            conventions.leg_two_rate_tenor,
            conventions.leg_two_rate_basis,
            conventions.leg_two_spread,
        )?;
        Ok(Self {
            effective: start,
            maturity,
            kind: BasisKind::AverageIndex,
            notional: conventions.notional,
            leg_one,
            leg_two,
            leg_one_spread,
            name: format!("SWAP-AVERAGEINDEX-{tenor}"),
        })
    }

    /// Creates a compound-index basis swap: both legs compound their daily
    /// rates against the period accrual.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedules cannot be generated.
    pub fn compound_index(
        effective: Date,
        tenor: Tenor,
        leg_one_spread: f64,
        conventions: &BasisSwapConventions,
    ) -> CurveResult<Self> {
        let (start, maturity, schedule_one, schedule_two) =
            Self::schedules(effective, tenor, conventions)?;
        let leg_one = Leg::compounded_with_accrual(
            schedule_one,
            conventions.leg_one_basis,
            conventions.leg_one_rate_basis,
            leg_one_spread,
        );
        let leg_two = Leg::compounded_with_accrual(
            schedule_two,
            conventions.leg_two_basis,
            conventions.leg_two_rate_basis,
            conventions.leg_two_spread,
        );
        Ok(Self {
            effective: start,
            maturity,
            kind: BasisKind::CompoundIndex,
            notional: conventions.notional,
            leg_one,
            leg_two,
            leg_one_spread,
            name: format!("SWAP-COMPOUNDINDEX-{tenor}"),
        })
    }

    fn schedules(
        effective: Date,
        tenor: Tenor,
        conventions: &BasisSwapConventions,
    ) -> CurveResult<(Date, Date, Schedule, Schedule)> {
        let start = conventions.calendar.advance(
            effective,
            conventions.spot_lag,
            BusinessDayConvention::Unadjusted,
        )?;
        let maturity =
            conventions
                .calendar
                .advance(start, tenor, BusinessDayConvention::Unadjusted)?;
        let config = ScheduleConfig {
            period_adjustment: conventions.period_adjustment,
            payment_adjustment: conventions.payment_adjustment,
            fixing_lag: conventions.fixing_lag,
            payment_lag: conventions.payment_lag,
            second: conventions.second,
            penultimate: conventions.penultimate,
        };
        let schedule_one = Schedule::new(
            start,
            maturity,
            conventions.leg_one_tenor,
            &config,
            &conventions.calendar,
        )?;
        let schedule_two = Schedule::new(
            start,
            maturity,
            conventions.leg_two_tenor,
            &config,
            &conventions.calendar,
        )?;
        Ok((start, maturity, schedule_one, schedule_two))
    }

    /// The quoted spread on the overnight leg.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.leg_one_spread
    }

    /// First accrual start date.
    #[must_use]
    pub fn effective(&self) -> Date {
        self.effective
    }

    /// Nominal maturity (last accrual end).
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// The instrument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Which basis variant this swap is.
    #[must_use]
    pub fn kind(&self) -> BasisKind {
        self.kind
    }

    /// Latest payment date across both legs, used as the node key in a
    /// joint strip.
    #[must_use]
    pub fn last_payment_date(&self) -> Date {
        self.leg_one
            .schedule()
            .last_payment_date()
            .max(self.leg_two.schedule().last_payment_date())
    }

    /// Net value of the swap under trial nodes on both curves.
    ///
    /// Leg one projects off the first curve with a trial node keyed by its
    /// own last payment date and `guesses[0]`; leg two off the second curve
    /// with `guesses[1]`. Average-index swaps return the absolute leg
    /// difference so the joint objective cannot reward a sign flip between
    /// a pair of quotes; compound-index swaps keep the signed difference.
    pub(crate) fn joint_value(
        &self,
        guesses: [f64; 2],
        ctx: &JointContext<'_>,
    ) -> MathResult<f64> {
        let trial_one = ctx
            .curve(0)
            .trial_interpolator(self.leg_one.schedule().last_payment_date(), guesses[0])?;
        let trial_two = ctx
            .curve(1)
            .trial_interpolator(self.leg_two.schedule().last_payment_date(), guesses[1])?;
        let pv_one = self
            .leg_one
            .present_value(&trial_one, ctx.discount, self.notional)?;
        let pv_two = self
            .leg_two
            .present_value(&trial_two, ctx.discount, self.notional)?;
        let difference = pv_one - pv_two;
        Ok(match self.kind {
            BasisKind::AverageIndex => difference.abs(),
            BasisKind::CompoundIndex => difference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_average_index_naming_and_schedules() {
        let swap = BasisSwapInstrument::average_index(
            d(2020, 3, 16),
            "2Y".parse().unwrap(),
            0.0025,
            &BasisSwapConventions::default(),
        )
        .unwrap();
        assert_eq!(swap.name(), "SWAP-AVERAGEINDEX-2Y");
        assert_eq!(swap.kind(), BasisKind::AverageIndex);
        assert_eq!(swap.maturity(), d(2022, 3, 16));
        assert_eq!(swap.rate(), 0.0025);
        assert_eq!(swap.last_payment_date(), d(2022, 3, 16));
    }

    #[test]
    fn test_compound_index_uses_both_leg_payments() {
        let conventions = BasisSwapConventions {
            leg_one_tenor: "6M".parse().unwrap(),
            payment_lag: "2D".parse().unwrap(),
            payment_adjustment: BusinessDayConvention::Following,
            ..BasisSwapConventions::default()
        };
        let swap = BasisSwapInstrument::compound_index(
            d(2020, 3, 16),
            "1Y".parse().unwrap(),
            0.001,
            &conventions,
        )
        .unwrap();
        assert_eq!(swap.name(), "SWAP-COMPOUNDINDEX-1Y");
        // Both legs end 2021-03-16 (Tue); +2 business days = Thu.
        assert_eq!(swap.last_payment_date(), d(2021, 3, 18));
    }
}
