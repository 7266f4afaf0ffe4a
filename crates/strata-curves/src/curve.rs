//! Discount curve bootstrapping.
//!
//! A [`Curve`] is an append-only strip of `(date, log discount factor)`
//! nodes, built sequentially from its instruments in maturity order. Each
//! instrument pins down exactly one node; solved nodes are committed before
//! the next instrument is visited, so every solve sees the full committed
//! prefix through a PCHIP interpolant over `(timestamp, log-DF)`.
//!
//! A curve may discount off another curve (the dual-curve setup): the
//! discounting curve is built first and its interpolant snapshot is handed
//! to every solve.

use std::mem;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use serde::Serialize;

use strata_core::types::Date;
use strata_math::error::MathResult;
use strata_math::interpolation::Pchip;

use crate::error::{CurveError, CurveResult};
use crate::instruments::Instrument;

/// Upper bound on full re-solve passes after the sequential bootstrap.
const MAX_REFINEMENT_PASSES: usize = 10;

/// Refinement stops once no node moves by more than this between passes.
const REFINEMENT_TOLERANCE: f64 = 1e-12;

/// A committed point on a curve.
#[derive(Debug, Clone, Serialize)]
pub struct CurveNode {
    /// Node date.
    pub date: Date,
    /// Node date as epoch seconds, the interpolation abscissa.
    pub timestamp: f64,
    /// Name of the instrument that produced the node.
    pub source: String,
    /// The instrument's quoted rate.
    pub rate: f64,
    /// Natural log of the discount factor at the node date.
    pub log_discount_factor: f64,
}

/// Lifecycle of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveState {
    /// Only the effective-date node exists.
    Empty,
    /// Instruments added, not yet built.
    InstrumentsAdded,
    /// A build is in progress.
    Building,
    /// All instruments solved and committed.
    Built,
}

/// A curve shared between owners, e.g. as another curve's discounting
/// curve.
pub type SharedCurve = Arc<RwLock<Curve>>;

/// Wraps a curve for shared ownership.
#[must_use]
pub fn shared(curve: Curve) -> SharedCurve {
    Arc::new(RwLock::new(curve))
}

/// A bootstrapped discount curve.
#[derive(Debug)]
pub struct Curve {
    effective: Date,
    nodes: Vec<CurveNode>,
    instruments: Vec<Instrument>,
    discount_curve: Option<SharedCurve>,
    allow_extrapolation: bool,
    state: CurveState,
}

impl Curve {
    /// Creates an empty curve anchored at its effective date, where the
    /// discount factor is one by construction.
    #[must_use]
    pub fn new(effective: Date) -> Self {
        Self {
            effective,
            nodes: vec![CurveNode {
                date: effective,
                timestamp: effective.timestamp(),
                source: "EFFECTIVE".to_string(),
                rate: 0.0,
                log_discount_factor: 0.0,
            }],
            instruments: Vec::new(),
            discount_curve: None,
            allow_extrapolation: true,
            state: CurveState::Empty,
        }
    }

    /// Discounts this curve's cashflows off another curve.
    #[must_use]
    pub fn with_discount_curve(mut self, discount_curve: SharedCurve) -> Self {
        self.discount_curve = Some(discount_curve);
        self
    }

    /// Replaces the discounting curve.
    pub fn set_discount_curve(&mut self, discount_curve: SharedCurve) {
        self.discount_curve = Some(discount_curve);
    }

    /// Rejects evaluation beyond the last committed node instead of
    /// extrapolating.
    #[must_use]
    pub fn without_extrapolation(mut self) -> Self {
        self.allow_extrapolation = false;
        self
    }

    /// The curve's effective (anchor) date.
    #[must_use]
    pub fn effective(&self) -> Date {
        self.effective
    }

    /// The committed nodes, including the effective-date anchor.
    #[must_use]
    pub fn nodes(&self) -> &[CurveNode] {
        &self.nodes
    }

    /// Where the curve is in its build lifecycle.
    #[must_use]
    pub fn state(&self) -> CurveState {
        self.state
    }

    /// The instruments the curve will be (or was) built from.
    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Adds an instrument to the strip. Invalidates any previous build.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` for instruments that cannot pin
    /// down a single curve's node on their own (basis swaps).
    pub fn add_instrument(&mut self, instrument: impl Into<Instrument>) -> CurveResult<()> {
        let instrument = instrument.into();
        if !instrument.supports_solo_bootstrap() {
            return Err(CurveError::configuration(format!(
                "{} constrains two curves; use a joint strip",
                instrument.name()
            )));
        }
        self.instruments.push(instrument);
        self.state = CurveState::InstrumentsAdded;
        Ok(())
    }

    /// Bootstraps the curve: solves each instrument in maturity order and
    /// commits its node. A no-op when already built. Builds the discounting
    /// curve first when one is attached.
    ///
    /// # Errors
    ///
    /// Returns an error when an instrument fails to solve or two
    /// instruments land on the same node date.
    pub fn build(&mut self) -> CurveResult<()> {
        if self.state == CurveState::Built {
            return Ok(());
        }

        let discount = match &self.discount_curve {
            Some(curve) => {
                let mut guard = curve.write();
                guard.build()?;
                Some(guard.interpolator()?)
            }
            None => None,
        };

        self.state = CurveState::Building;
        self.nodes.truncate(1);

        let mut instruments = mem::take(&mut self.instruments);
        instruments.sort_by_key(Instrument::maturity);

        let result = self.bootstrap(&instruments, discount.as_ref());
        self.instruments = instruments;
        match result {
            Ok(()) => {
                self.state = CurveState::Built;
                Ok(())
            }
            Err(e) => {
                // Discard the partial strip; queries re-attempt the build
                // and surface this error instead of serving half a curve.
                self.nodes.truncate(1);
                self.state = CurveState::InstrumentsAdded;
                Err(e)
            }
        }
    }

    fn bootstrap(
        &mut self,
        instruments: &[Instrument],
        discount: Option<&Pchip>,
    ) -> CurveResult<()> {
        for instrument in instruments {
            debug!("solving {} for node {}", instrument.name(), instrument.node_date());
            let log_df = instrument.solve(self, discount)?;
            self.append_node(
                instrument.node_date(),
                instrument.name(),
                instrument.rate(),
                log_df,
            )?;
        }

        // The shape-preserving interpolant's derivative estimate at a node
        // shifts when later nodes arrive, pulling already-solved
        // instruments off par. Re-solve every instrument against the full
        // strip (its own node overlaid by the trial) until the node values
        // stop moving.
        for pass in 0..MAX_REFINEMENT_PASSES {
            let mut largest_shift = 0.0_f64;
            for instrument in instruments {
                let log_df = instrument.solve(self, discount)?;
                let index = self
                    .nodes
                    .iter()
                    .position(|n| n.date == instrument.node_date())
                    .ok_or_else(|| {
                        CurveError::configuration(format!(
                            "{} lost its node during refinement",
                            instrument.name()
                        ))
                    })?;
                let shift = (log_df - self.nodes[index].log_discount_factor).abs();
                largest_shift = largest_shift.max(shift);
                self.nodes[index].log_discount_factor = log_df;
            }
            debug!("refinement pass {pass}: largest shift {largest_shift:.3e}");
            if largest_shift < REFINEMENT_TOLERANCE {
                break;
            }
        }

        Ok(())
    }

    /// Commits a node. Node dates must be strictly increasing.
    pub(crate) fn append_node(
        &mut self,
        date: Date,
        source: &str,
        rate: f64,
        log_discount_factor: f64,
    ) -> CurveResult<()> {
        if let Some(last) = self.nodes.last() {
            if date <= last.date {
                return Err(CurveError::configuration(format!(
                    "{source} node date {date} does not follow {} node date {}",
                    last.source, last.date
                )));
            }
        }
        self.nodes.push(CurveNode {
            date,
            timestamp: date.timestamp(),
            source: source.to_string(),
            rate,
            log_discount_factor,
        });
        Ok(())
    }

    /// Interpolant over the committed nodes.
    ///
    /// # Errors
    ///
    /// Returns an error with fewer than two committed nodes.
    pub fn interpolator(&self) -> CurveResult<Pchip> {
        let xs: Vec<f64> = self.nodes.iter().map(|n| n.timestamp).collect();
        let ys: Vec<f64> = self.nodes.iter().map(|n| n.log_discount_factor).collect();
        let interp = Pchip::new(xs, ys)?;
        Ok(if self.allow_extrapolation {
            interp.with_extrapolation()
        } else {
            interp
        })
    }

    /// Interpolant over the committed nodes plus one trial node, used
    /// inside a solver iteration. The trial is never committed; the solver
    /// either converges and the caller accepts the root, or the guess is
    /// discarded. A trial at an existing node's date overlays that node's
    /// value, which is how refinement passes re-solve committed nodes.
    pub(crate) fn trial_interpolator(&self, date: Date, log_df: f64) -> MathResult<Pchip> {
        let mut xs: Vec<f64> = self.nodes.iter().map(|n| n.timestamp).collect();
        let mut ys: Vec<f64> = self.nodes.iter().map(|n| n.log_discount_factor).collect();
        match self.nodes.iter().position(|n| n.date == date) {
            Some(i) => ys[i] = log_df,
            None => {
                xs.push(date.timestamp());
                ys.push(log_df);
            }
        }
        Ok(Pchip::new(xs, ys)?.with_extrapolation())
    }

    /// Discount factor off the committed prefix only, for closed-form
    /// instruments evaluated mid-build.
    pub(crate) fn committed_discount_factor(&self, date: Date) -> CurveResult<f64> {
        if self.nodes.len() < 2 {
            if date == self.effective {
                return Ok(1.0);
            }
            return Err(CurveError::configuration(format!(
                "no committed node covers {date}"
            )));
        }
        Ok(self.interpolator()?.value(date.timestamp())?.exp())
    }

    fn ensure_built(&mut self) -> CurveResult<()> {
        if self.state != CurveState::Built && !self.instruments.is_empty() {
            self.build()?;
        }
        Ok(())
    }

    /// Log discount factor at a date, building the curve first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails or the date is outside the curve
    /// when extrapolation is disabled.
    pub fn log_discount_factor(&mut self, date: Date) -> CurveResult<f64> {
        self.ensure_built()?;
        if self.nodes.len() < 2 && date == self.effective {
            return Ok(0.0);
        }
        Ok(self.interpolator()?.value(date.timestamp())?)
    }

    /// Discount factor at a date, building the curve first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails or the date is outside the curve
    /// when extrapolation is disabled.
    pub fn discount_factor(&mut self, date: Date) -> CurveResult<f64> {
        Ok(self.log_discount_factor(date)?.exp())
    }

    /// The committed `(date, discount factor)` points, building the curve
    /// first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails.
    pub fn view(&mut self) -> CurveResult<Vec<(Date, f64)>> {
        self.ensure_built()?;
        Ok(self
            .nodes
            .iter()
            .map(|n| (n.date, n.log_discount_factor.exp()))
            .collect())
    }

    /// Continuously-compounded act/365 zero rates at the committed nodes,
    /// building the curve first if needed. The effective-date rate is
    /// reported as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails.
    pub fn zeros(&mut self) -> CurveResult<Vec<(Date, f64)>> {
        self.ensure_built()?;
        Ok(self
            .nodes
            .iter()
            .map(|n| {
                let days = self.effective.days_between(&n.date);
                let rate = if days == 0 {
                    0.0
                } else {
                    -n.log_discount_factor / (days as f64 / 365.0)
                };
                (n.date, rate)
            })
            .collect())
    }

    /// Net value of an instrument against the built curve, e.g. to verify
    /// that a bootstrap instrument reprices to par.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve has too few nodes or the instrument
    /// has no committed repricing value.
    pub fn present_value(&self, instrument: &Instrument) -> CurveResult<f64> {
        let projection = self.interpolator()?;
        let discount = match &self.discount_curve {
            Some(curve) => Some(curve.read().interpolator()?),
            None => None,
        };
        instrument.committed_value(&projection, discount.as_ref().unwrap_or(&projection))
    }
}
