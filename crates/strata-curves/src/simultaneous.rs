//! Joint stripping of two curves against a common discounting curve.
//!
//! Some instrument pairs, basis swap against vanilla swap being the usual
//! one, constrain one node on each of two curves at the same maturity. A
//! [`SimultaneousStrippedCurve`] builds both target curves from their own
//! solo strips first, then walks the pairs in order, minimizing the worse
//! of the two residuals over both trial log discount factors at once and
//! committing a node to each curve.

use log::{debug, warn};

use strata_math::error::MathResult;
use strata_math::interpolation::Pchip;
use strata_math::optimization::{nelder_mead_bounded, OptimizationConfig};

use crate::curve::{Curve, SharedCurve};
use crate::error::{CurveError, CurveResult};
use crate::instruments::Instrument;

/// Log discount factor bounds for a joint solve, corresponding to discount
/// factors between 0.001 and 2.
const JOINT_BOUNDS: (f64, f64) = (-6.907_755_278_982_137, 0.693_147_180_559_945_3);

/// Initial guesses for the pair of trial log discount factors.
const JOINT_GUESSES: [f64; 2] = [-1e-6, -1e-6];

/// The two target curves and the shared discounting interpolant a joint
/// valuation runs against.
pub(crate) struct JointContext<'a> {
    pub(crate) curve_one: &'a Curve,
    pub(crate) curve_two: &'a Curve,
    pub(crate) discount: &'a Pchip,
}

impl JointContext<'_> {
    /// The curve an instrument's own trial node sits on: index 0 for the
    /// first curve, 1 for the second.
    pub(crate) fn curve(&self, index: usize) -> &Curve {
        if index == 0 {
            self.curve_one
        } else {
            self.curve_two
        }
    }
}

/// A pair of instruments solved together for one node on each curve.
///
/// The first instrument's trial node lands on the first curve, the
/// second's on the second curve.
#[derive(Debug, Clone)]
pub struct SimultaneousInstrument {
    instrument_one: Instrument,
    instrument_two: Instrument,
    name: String,
}

impl SimultaneousInstrument {
    /// Pairs two instruments for a joint solve.
    #[must_use]
    pub fn new(instrument_one: impl Into<Instrument>, instrument_two: impl Into<Instrument>) -> Self {
        let instrument_one = instrument_one.into();
        let instrument_two = instrument_two.into();
        let name = format!("{}/{}", instrument_one.name(), instrument_two.name());
        Self {
            instrument_one,
            instrument_two,
            name,
        }
    }

    /// The pair's name, `"{one}/{two}"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The instrument whose node lands on the first curve.
    #[must_use]
    pub fn instrument_one(&self) -> &Instrument {
        &self.instrument_one
    }

    /// The instrument whose node lands on the second curve.
    #[must_use]
    pub fn instrument_two(&self) -> &Instrument {
        &self.instrument_two
    }

    fn objective(&self, params: &[f64], ctx: &JointContext<'_>) -> MathResult<f64> {
        let guesses = [params[0], params[1]];
        let value_one = self.instrument_one.joint_value(guesses, 0, ctx)?;
        let value_two = self.instrument_two.joint_value(guesses, 1, ctx)?;
        Ok(value_one.abs().max(value_two.abs()))
    }

    fn solve(&self, ctx: &JointContext<'_>, config: &OptimizationConfig) -> JointStatus {
        let result = nelder_mead_bounded(
            |params| self.objective(params, ctx),
            &JOINT_GUESSES,
            &[JOINT_BOUNDS, JOINT_BOUNDS],
            config,
        );
        match result {
            Ok(result) if result.converged => JointStatus::Solved {
                log_df_one: result.parameters[0],
                log_df_two: result.parameters[1],
                objective: result.objective_value,
            },
            Ok(result) => JointStatus::Failed {
                reason: format!(
                    "no convergence after {} iterations, residual {:.3e}",
                    result.iterations, result.objective_value
                ),
            },
            Err(e) => JointStatus::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// How one joint pair resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum JointStatus {
    /// Both nodes committed.
    Solved {
        /// Log discount factor committed to the first curve.
        log_df_one: f64,
        /// Log discount factor committed to the second curve.
        log_df_two: f64,
        /// Final residual, the worse of the two repricing errors.
        objective: f64,
    },
    /// The pair was skipped; neither curve received a node.
    Failed {
        /// Why the solve failed.
        reason: String,
    },
}

/// Per-pair result of a joint strip.
#[derive(Debug, Clone)]
pub struct JointOutcome {
    /// The pair's name.
    pub name: String,
    /// How the pair resolved.
    pub status: JointStatus,
}

/// Two curves stripped jointly off a shared discounting curve.
pub struct SimultaneousStrippedCurve {
    curve_one: Curve,
    curve_two: Curve,
    discount_curve: SharedCurve,
    instruments: Vec<SimultaneousInstrument>,
    config: OptimizationConfig,
}

impl SimultaneousStrippedCurve {
    /// Pairs two target curves with a shared discounting curve. Both
    /// targets are re-pointed to discount off `discount_curve`.
    #[must_use]
    pub fn new(mut curve_one: Curve, mut curve_two: Curve, discount_curve: SharedCurve) -> Self {
        curve_one.set_discount_curve(discount_curve.clone());
        curve_two.set_discount_curve(discount_curve.clone());
        Self {
            curve_one,
            curve_two,
            discount_curve,
            instruments: Vec::new(),
            config: OptimizationConfig::default(),
        }
    }

    /// Overrides the joint solver configuration.
    #[must_use]
    pub fn with_config(mut self, config: OptimizationConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a pair to the joint strip.
    pub fn add_instrument(&mut self, instrument: SimultaneousInstrument) {
        self.instruments.push(instrument);
    }

    /// The first target curve.
    #[must_use]
    pub fn curve_one(&self) -> &Curve {
        &self.curve_one
    }

    /// The second target curve.
    #[must_use]
    pub fn curve_two(&self) -> &Curve {
        &self.curve_two
    }

    /// The shared discounting curve.
    #[must_use]
    pub fn discount_curve(&self) -> &SharedCurve {
        &self.discount_curve
    }

    /// Builds both target curves from their solo strips, then solves each
    /// pair in order. A failed pair is reported and skipped; later pairs
    /// still run against the nodes committed so far.
    ///
    /// # Errors
    ///
    /// Returns an error when a solo build fails or a solved pair cannot be
    /// committed (non-increasing node dates).
    pub fn build(&mut self) -> CurveResult<Vec<JointOutcome>> {
        self.curve_one.build()?;
        self.curve_two.build()?;
        let discount = {
            let mut guard = self.discount_curve.write();
            guard.build()?;
            guard.interpolator()?
        };

        let mut instruments = std::mem::take(&mut self.instruments);
        instruments.sort_by_key(|pair| {
            pair.instrument_one
                .maturity()
                .max(pair.instrument_two.maturity())
        });

        let mut outcomes = Vec::with_capacity(instruments.len());
        for pair in &instruments {
            let status = {
                let ctx = JointContext {
                    curve_one: &self.curve_one,
                    curve_two: &self.curve_two,
                    discount: &discount,
                };
                debug!("jointly solving {}", pair.name());
                pair.solve(&ctx, &self.config)
            };
            match &status {
                JointStatus::Solved {
                    log_df_one,
                    log_df_two,
                    ..
                } => {
                    self.curve_one.append_node(
                        pair.instrument_one.joint_node_date(),
                        pair.instrument_one.name(),
                        pair.instrument_one.rate(),
                        *log_df_one,
                    )?;
                    self.curve_two.append_node(
                        pair.instrument_two.joint_node_date(),
                        pair.instrument_two.name(),
                        pair.instrument_two.rate(),
                        *log_df_two,
                    )?;
                }
                JointStatus::Failed { reason } => {
                    warn!("{}: {reason}", pair.name());
                }
            }
            outcomes.push(JointOutcome {
                name: pair.name().to_string(),
                status,
            });
        }

        self.instruments = instruments;
        Ok(outcomes)
    }

    /// Not available on the joint container; inspect [`Self::curve_one`]
    /// and [`Self::curve_two`] directly.
    ///
    /// # Errors
    ///
    /// Always returns `CurveError::NotSupported`.
    pub fn view(&self) -> CurveResult<Vec<(strata_core::types::Date, f64)>> {
        Err(CurveError::not_supported(
            "a joint strip has no single view; inspect curve_one and curve_two",
        ))
    }

    /// Not available on the joint container; inspect [`Self::curve_one`]
    /// and [`Self::curve_two`] directly.
    ///
    /// # Errors
    ///
    /// Always returns `CurveError::NotSupported`.
    pub fn zeros(&self) -> CurveResult<Vec<(strata_core::types::Date, f64)>> {
        Err(CurveError::not_supported(
            "a joint strip has no single zero curve; inspect curve_one and curve_two",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::types::Date;

    use crate::instruments::{
        BasisSwapConventions, BasisSwapInstrument, SwapConventions, SwapInstrument,
    };

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_pair_name_joins_constituents() {
        let effective = d(2020, 3, 16);
        let swap = SwapInstrument::libor(
            effective,
            "2Y".parse().unwrap(),
            0.018,
            &SwapConventions::default(),
        )
        .unwrap();
        let basis = BasisSwapInstrument::average_index(
            effective,
            "2Y".parse().unwrap(),
            0.0022,
            &BasisSwapConventions::default(),
        )
        .unwrap();
        let pair = SimultaneousInstrument::new(basis, swap);
        assert_eq!(pair.name(), "SWAP-AVERAGEINDEX-2Y/SWAP-LIBOR-2Y");
    }

    #[test]
    fn test_joint_bounds_cover_unit_discount() {
        // The initial guesses must sit inside the bounds or the simplex
        // clamp would distort the start.
        for guess in JOINT_GUESSES {
            assert!(guess > JOINT_BOUNDS.0 && guess < JOINT_BOUNDS.1);
        }
        assert!((JOINT_BOUNDS.0 - 0.001_f64.ln()).abs() < 1e-12);
        assert!((JOINT_BOUNDS.1 - 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_view_and_zeros_are_rejected() {
        let discount = crate::curve::shared(Curve::new(d(2020, 3, 16)));
        let stripped = SimultaneousStrippedCurve::new(
            Curve::new(d(2020, 3, 16)),
            Curve::new(d(2020, 3, 16)),
            discount,
        );
        assert!(matches!(
            stripped.view(),
            Err(CurveError::NotSupported { .. })
        ));
        assert!(matches!(
            stripped.zeros(),
            Err(CurveError::NotSupported { .. })
        ));
    }
}
