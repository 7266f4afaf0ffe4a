//! Fixed/float swaps and the leg value type they are composed from.
//!
//! Rather than a hierarchy of swap kinds, a swap is two [`Leg`]s and a leg
//! is a schedule plus a rate mode: fixed, term-rate (LIBOR-style), daily
//! compounded (OIS-style), daily averaged, or daily compounded against the
//! period accrual. OIS and LIBOR swaps differ only in the mode of their
//! floating leg; basis swaps pair two floating legs.

use log::trace;

use strata_core::calendars::{BusinessDayConvention, Calendar};
use strata_core::daycounts::DayCount;
use strata_core::types::{Date, Tenor, TenorUnit};
use strata_math::error::MathResult;
use strata_math::interpolation::Pchip;
use strata_math::solvers::{newton_raphson_numerical, SolverConfig};

use crate::compounding::{averaged_rate, compound_growth, compound_growth_with_accrual, rate_days};
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::schedule::{Schedule, ScheduleConfig};
use crate::simultaneous::JointContext;

/// How a leg's period rate is derived.
#[derive(Debug, Clone)]
pub enum LegMode {
    /// A constant coupon rate.
    Fixed {
        /// The coupon rate.
        rate: f64,
    },
    /// One term rate per period, observed on the fixing date.
    ///
    /// The per-period rate-observation end dates and accrual fractions are
    /// resolved when the leg is constructed so valuation needs only two
    /// discount-factor lookups per period.
    Term {
        /// End of each period's rate observation window.
        rate_ends: Vec<Date>,
        /// Accrual fraction of each rate observation window.
        rate_accruals: Vec<f64>,
        /// Spread over the index.
        spread: f64,
    },
    /// Overnight rate compounded daily across each period.
    Compounded {
        /// Spread over the index.
        spread: f64,
    },
    /// Overnight rate averaged daily across each period (Fed-Funds style).
    Averaged {
        /// Spread over the index.
        spread: f64,
    },
    /// Overnight rate compounded daily, each daily ratio scaled by the
    /// period accrual fraction under the rate basis.
    CompoundedWithAccrual {
        /// Basis for the per-period rate accrual fraction.
        rate_basis: DayCount,
        /// Spread over the index.
        spread: f64,
    },
}

/// One leg of a swap: an accrual schedule, a day-count basis and a rate
/// mode.
#[derive(Debug, Clone)]
pub struct Leg {
    schedule: Schedule,
    basis: DayCount,
    mode: LegMode,
}

impl Leg {
    /// A fixed-coupon leg.
    #[must_use]
    pub fn fixed(schedule: Schedule, basis: DayCount, rate: f64) -> Self {
        Self {
            schedule,
            basis,
            mode: LegMode::Fixed { rate },
        }
    }

    /// A term-rate floating leg.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate tenor cannot be applied to a fixing
    /// date.
    pub fn term(
        schedule: Schedule,
        basis: DayCount,
        rate_tenor: Tenor,
        rate_basis: DayCount,
        spread: f64,
    ) -> CurveResult<Self> {
        let mut rate_ends = Vec::with_capacity(schedule.periods().len());
        let mut rate_accruals = Vec::with_capacity(schedule.periods().len());
        for period in schedule.periods() {
            let end = rate_tenor.add_to(period.fixing_date)?;
            rate_accruals.push(rate_basis.year_fraction(period.fixing_date, end));
            rate_ends.push(end);
        }
        Ok(Self {
            schedule,
            basis,
            mode: LegMode::Term {
                rate_ends,
                rate_accruals,
                spread,
            },
        })
    }

    /// A daily-compounded floating leg.
    #[must_use]
    pub fn compounded(schedule: Schedule, basis: DayCount, spread: f64) -> Self {
        Self {
            schedule,
            basis,
            mode: LegMode::Compounded { spread },
        }
    }

    /// A daily-averaged floating leg.
    #[must_use]
    pub fn averaged(schedule: Schedule, basis: DayCount, spread: f64) -> Self {
        Self {
            schedule,
            basis,
            mode: LegMode::Averaged { spread },
        }
    }

    /// A daily-compounded floating leg scaled by the period accrual.
    #[must_use]
    pub fn compounded_with_accrual(
        schedule: Schedule,
        basis: DayCount,
        rate_basis: DayCount,
        spread: f64,
    ) -> Self {
        Self {
            schedule,
            basis,
            mode: LegMode::CompoundedWithAccrual { rate_basis, spread },
        }
    }

    /// The leg's accrual schedule.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Sum of the leg's period cashflows discounted to the curve date.
    ///
    /// Forward rates are read from `projection`; cashflows are discounted
    /// with `discounting`. The two coincide for a single-curve bootstrap.
    pub(crate) fn present_value(
        &self,
        projection: &Pchip,
        discounting: &Pchip,
        notional: f64,
    ) -> MathResult<f64> {
        let mut pv = 0.0;
        for (idx, period) in self.schedule.periods().iter().enumerate() {
            let accrual = self.basis.year_fraction(period.accrual_start, period.accrual_end);
            let cashflow = match &self.mode {
                LegMode::Fixed { rate } => rate * accrual * notional,
                LegMode::Term {
                    rate_ends,
                    rate_accruals,
                    spread,
                } => {
                    let df_fixing = projection.value(period.fixing_date.timestamp())?.exp();
                    let df_end = projection.value(rate_ends[idx].timestamp())?.exp();
                    let rate = (df_fixing / df_end - 1.0) / rate_accruals[idx];
                    (rate + spread) * accrual * notional
                }
                LegMode::Compounded { spread } => {
                    let days = rate_days(period.accrual_start, period.accrual_end);
                    let forward = compound_growth(projection, &days)? - 1.0;
                    (forward + spread) * notional
                }
                LegMode::Averaged { spread } => {
                    let days = rate_days(period.accrual_start, period.accrual_end);
                    let rate = averaged_rate(projection, &days)?;
                    (rate + spread) * accrual * notional
                }
                LegMode::CompoundedWithAccrual { rate_basis, spread } => {
                    let days = rate_days(period.accrual_start, period.accrual_end);
                    let rate_accrual =
                        rate_basis.year_fraction(period.accrual_start, period.accrual_end);
                    let forward =
                        compound_growth_with_accrual(projection, &days, rate_accrual)? - 1.0;
                    (forward + spread) * accrual * notional
                }
            };
            let df_payment = discounting.value(period.payment_date.timestamp())?.exp();
            pv += cashflow * df_payment;
        }
        Ok(pv)
    }
}

/// Market conventions for a fixed/float swap.
#[derive(Debug, Clone)]
pub struct SwapConventions {
    /// Holiday calendar for all date adjustments.
    pub calendar: Calendar,
    /// Lag from trade date to the first accrual start.
    pub spot_lag: Tenor,
    /// Fixed leg day-count basis.
    pub fixed_basis: DayCount,
    /// Fixed leg period tenor.
    pub fixed_tenor: Tenor,
    /// Adjustment for fixed leg accrual ends.
    pub fixed_period_adjustment: BusinessDayConvention,
    /// Adjustment for fixed leg payment dates.
    pub fixed_payment_adjustment: BusinessDayConvention,
    /// Floating leg day-count basis.
    pub float_basis: DayCount,
    /// Floating leg period tenor.
    pub float_tenor: Tenor,
    /// Adjustment for floating leg accrual ends.
    pub float_period_adjustment: BusinessDayConvention,
    /// Adjustment for floating leg payment dates.
    pub float_payment_adjustment: BusinessDayConvention,
    /// Lag from accrual start to rate fixing.
    pub fixing_lag: Tenor,
    /// Lag from accrual end to payment.
    pub payment_lag: Tenor,
    /// Tenor of the floating rate observation (term-rate legs).
    pub rate_tenor: Tenor,
    /// Basis of the floating rate observation (term-rate legs).
    pub rate_basis: DayCount,
    /// Notional for cashflow calculations.
    pub notional: f64,
    /// First regular roll date, for stub periods.
    pub second: Option<Date>,
    /// Last regular roll date, for stub periods.
    pub penultimate: Option<Date>,
}

impl Default for SwapConventions {
    fn default() -> Self {
        Self {
            calendar: Calendar::weekends(),
            spot_lag: Tenor::new(0, TenorUnit::Days),
            fixed_basis: DayCount::Thirty360,
            fixed_tenor: Tenor::new(6, TenorUnit::Months),
            fixed_period_adjustment: BusinessDayConvention::Unadjusted,
            fixed_payment_adjustment: BusinessDayConvention::Unadjusted,
            float_basis: DayCount::Act360,
            float_tenor: Tenor::new(6, TenorUnit::Months),
            float_period_adjustment: BusinessDayConvention::Unadjusted,
            float_payment_adjustment: BusinessDayConvention::Unadjusted,
            fixing_lag: Tenor::new(0, TenorUnit::Days),
            payment_lag: Tenor::new(0, TenorUnit::Days),
            rate_tenor: Tenor::overnight(),
            rate_basis: DayCount::Act360,
            notional: 100.0,
            second: None,
            penultimate: None,
        }
    }
}

/// The floating-leg flavor of a vanilla swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FloatKind {
    /// Daily compounded overnight rate.
    Ois,
    /// One term rate per period.
    Libor,
}

/// A fixed-versus-float interest rate swap.
///
/// The instrument's curve node is keyed by the fixed leg's last payment
/// date, and its log discount factor is the root of
/// `PV(float) − PV(fixed) = 0` under a trial interpolant.
#[derive(Debug, Clone)]
pub struct SwapInstrument {
    effective: Date,
    maturity: Date,
    rate: f64,
    notional: f64,
    fixed_leg: Leg,
    float_leg: Leg,
    name: String,
}

impl SwapInstrument {
    /// Creates an OIS swap maturing one tenor after its effective date.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedules cannot be generated.
    pub fn ois(
        effective: Date,
        tenor: Tenor,
        rate: f64,
        conventions: &SwapConventions,
    ) -> CurveResult<Self> {
        let start = conventions.calendar.advance(
            effective,
            conventions.spot_lag,
            BusinessDayConvention::Unadjusted,
        )?;
        let maturity =
            conventions
                .calendar
                .advance(start, tenor, BusinessDayConvention::Unadjusted)?;
        Self::assemble(
            start,
            maturity,
            rate,
            FloatKind::Ois,
            conventions,
            format!("SWAP-OIS-{tenor}"),
        )
    }

    /// Creates an OIS swap with an explicit maturity date.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedules cannot be generated.
    pub fn ois_by_dates(
        effective: Date,
        maturity: Date,
        rate: f64,
        conventions: &SwapConventions,
    ) -> CurveResult<Self> {
        Self::assemble(
            effective,
            maturity,
            rate,
            FloatKind::Ois,
            conventions,
            format!("SWAP-OIS-{maturity}"),
        )
    }

    /// Creates a LIBOR-style swap maturing one tenor after its effective
    /// date.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedules cannot be generated.
    pub fn libor(
        effective: Date,
        tenor: Tenor,
        rate: f64,
        conventions: &SwapConventions,
    ) -> CurveResult<Self> {
        let start = conventions.calendar.advance(
            effective,
            conventions.spot_lag,
            BusinessDayConvention::Unadjusted,
        )?;
        let maturity =
            conventions
                .calendar
                .advance(start, tenor, BusinessDayConvention::Unadjusted)?;
        Self::assemble(
            start,
            maturity,
            rate,
            FloatKind::Libor,
            conventions,
            format!("SWAP-LIBOR-{tenor}"),
        )
    }

    /// Creates a LIBOR-style swap with an explicit maturity date.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedules cannot be generated.
    pub fn libor_by_dates(
        effective: Date,
        maturity: Date,
        rate: f64,
        conventions: &SwapConventions,
    ) -> CurveResult<Self> {
        Self::assemble(
            effective,
            maturity,
            rate,
            FloatKind::Libor,
            conventions,
            format!("SWAP-LIBOR-{maturity}"),
        )
    }

    fn assemble(
        effective: Date,
        maturity: Date,
        rate: f64,
        float_kind: FloatKind,
        conventions: &SwapConventions,
        name: String,
    ) -> CurveResult<Self> {
        let fixed_schedule = Schedule::new(
            effective,
            maturity,
            conventions.fixed_tenor,
            &ScheduleConfig {
                period_adjustment: conventions.fixed_period_adjustment,
                payment_adjustment: conventions.fixed_payment_adjustment,
                fixing_lag: conventions.fixing_lag,
                payment_lag: conventions.payment_lag,
                second: conventions.second,
                penultimate: conventions.penultimate,
            },
            &conventions.calendar,
        )?;
        let float_schedule = Schedule::new(
            effective,
            maturity,
            conventions.float_tenor,
            &ScheduleConfig {
                period_adjustment: conventions.float_period_adjustment,
                payment_adjustment: conventions.float_payment_adjustment,
                fixing_lag: conventions.fixing_lag,
                payment_lag: conventions.payment_lag,
                second: conventions.second,
                penultimate: conventions.penultimate,
            },
            &conventions.calendar,
        )?;

        let fixed_leg = Leg::fixed(fixed_schedule, conventions.fixed_basis, rate);
        let float_leg = match float_kind {
            FloatKind::Ois => Leg::compounded(float_schedule, conventions.float_basis, 0.0),
            FloatKind::Libor => Leg::term(
                float_schedule,
                conventions.float_basis,
                conventions.rate_tenor,
                conventions.rate_basis,
                0.0,
            )?,
        };

        Ok(Self {
            effective,
            maturity,
            rate,
            notional: conventions.notional,
            fixed_leg,
            float_leg,
            name,
        })
    }

    /// The par swap rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
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

    /// The fixed leg.
    #[must_use]
    pub fn fixed_leg(&self) -> &Leg {
        &self.fixed_leg
    }

    /// The floating leg.
    #[must_use]
    pub fn float_leg(&self) -> &Leg {
        &self.float_leg
    }

    /// Date of the curve node this swap bootstraps: the fixed leg's last
    /// payment date.
    #[must_use]
    pub fn node_date(&self) -> Date {
        self.fixed_leg.schedule().last_payment_date()
    }

    /// Latest payment date across both legs, used as the node key in a
    /// joint strip.
    #[must_use]
    pub fn last_payment_date(&self) -> Date {
        self.fixed_leg
            .schedule()
            .last_payment_date()
            .max(self.float_leg.schedule().last_payment_date())
    }

    /// Net value `PV(float) − PV(fixed)` under the given interpolants.
    pub(crate) fn value_with(
        &self,
        projection: &Pchip,
        discounting: &Pchip,
    ) -> MathResult<f64> {
        let float_pv = self
            .float_leg
            .present_value(projection, discounting, self.notional)?;
        let fixed_pv = self
            .fixed_leg
            .present_value(projection, discounting, self.notional)?;
        Ok(float_pv - fixed_pv)
    }

    pub(crate) fn solve(&self, curve: &Curve, discount: Option<&Pchip>) -> CurveResult<f64> {
        let node_date = self.node_date();
        let result = newton_raphson_numerical(
            |guess| {
                let trial = curve.trial_interpolator(node_date, guess)?;
                let discounting = discount.unwrap_or(&trial);
                self.value_with(&trial, discounting)
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

    /// Net value under a trial node in a joint strip. The trial sits at
    /// [`Self::last_payment_date`], the same date the joint strip commits
    /// the solved node to, so the root is solved at the date it lands on.
    pub(crate) fn joint_value(
        &self,
        guesses: [f64; 2],
        own_index: usize,
        ctx: &JointContext<'_>,
    ) -> MathResult<f64> {
        let curve = ctx.curve(own_index);
        let trial = curve.trial_interpolator(self.last_payment_date(), guesses[own_index])?;
        self.value_with(&trial, ctx.discount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_ois_swap_schedules_and_name() {
        let swap = SwapInstrument::ois(
            d(2020, 3, 16),
            "1Y".parse().unwrap(),
            0.015,
            &SwapConventions::default(),
        )
        .unwrap();
        assert_eq!(swap.name(), "SWAP-OIS-1Y");
        assert_eq!(swap.maturity(), d(2021, 3, 16));
        assert_eq!(swap.fixed_leg().schedule().periods().len(), 2);
        assert_eq!(swap.node_date(), d(2021, 3, 16));
    }

    #[test]
    fn test_node_date_follows_payment_lag() {
        let conventions = SwapConventions {
            payment_lag: "2D".parse().unwrap(),
            fixed_payment_adjustment: BusinessDayConvention::Following,
            float_payment_adjustment: BusinessDayConvention::Following,
            ..SwapConventions::default()
        };
        let swap =
            SwapInstrument::ois(d(2020, 3, 16), "1Y".parse().unwrap(), 0.015, &conventions)
                .unwrap();
        // Maturity Tue 2021-03-16 + 2D lag = Thu 2021-03-18.
        assert_eq!(swap.node_date(), d(2021, 3, 18));
        assert!(swap.node_date() > swap.maturity());
    }

    #[test]
    fn test_joint_trial_sits_at_latest_payment_date() {
        // Saturday maturity with only the float leg adjusted: the legs'
        // last payments diverge, and the joint solve must place its trial
        // node on the date the strip will commit to.
        let conventions = SwapConventions {
            float_payment_adjustment: BusinessDayConvention::Following,
            ..SwapConventions::default()
        };
        let swap =
            SwapInstrument::ois(d(2020, 3, 20), "1Y".parse().unwrap(), 0.015, &conventions)
                .unwrap();
        assert_eq!(swap.node_date(), d(2021, 3, 20));
        assert_eq!(swap.last_payment_date(), d(2021, 3, 22));

        let mut curve = Curve::new(d(2020, 3, 20));
        curve
            .append_node(d(2020, 6, 22), "CASH-3M", 0.014, -0.0036)
            .unwrap();
        let other = Curve::new(d(2020, 3, 20));
        let discount = curve
            .trial_interpolator(swap.last_payment_date(), -0.015)
            .unwrap();

        let ctx = JointContext {
            curve_one: &other,
            curve_two: &curve,
            discount: &discount,
        };
        let guesses = [0.0, -0.0151];
        let value = swap.joint_value(guesses, 1, &ctx).unwrap();

        let trial = curve
            .trial_interpolator(swap.last_payment_date(), guesses[1])
            .unwrap();
        let expected = swap.value_with(&trial, &discount).unwrap();
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_term_leg_precomputes_rate_windows() {
        let schedule = Schedule::new(
            d(2020, 3, 16),
            d(2021, 3, 16),
            "3M".parse().unwrap(),
            &ScheduleConfig::default(),
            &Calendar::weekends(),
        )
        .unwrap();
        let leg = Leg::term(
            schedule,
            DayCount::Act360,
            "3M".parse().unwrap(),
            DayCount::Act360,
            0.0,
        )
        .unwrap();
        match &leg.mode {
            LegMode::Term { rate_ends, rate_accruals, .. } => {
                assert_eq!(rate_ends.len(), 4);
                assert_eq!(rate_ends[0], d(2020, 6, 16));
                assert!((rate_accruals[0] - 92.0 / 360.0).abs() < 1e-12);
            }
            other => panic!("unexpected mode: {other:?}"),
        }
    }
}
