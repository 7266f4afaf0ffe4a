//! Bootstrappable market instruments.
//!
//! Each instrument pins down one curve node: a log discount factor at its
//! node date. The simplest are closed-form (cash, FRAs, simple futures);
//! the rest are solved by root-finding against a trial node. Instruments
//! are collected into the [`Instrument`] enum so a curve can hold a mixed
//! strip:
//!
//! - [`CashInstrument`] — money-market deposits
//! - [`FraInstrument`] — forward rate agreements
//! - [`FutureInstrument`] — simple and compound interest-rate futures
//! - [`SwapInstrument`] — OIS and LIBOR-style fixed/float swaps
//! - [`BasisSwapInstrument`] — float/float basis swaps (joint strips only)

mod basis;
mod cash;
mod fra;
mod futures;
mod swap;

pub use basis::{BasisKind, BasisSwapConventions, BasisSwapInstrument};
pub use cash::CashInstrument;
pub use fra::FraInstrument;
pub use futures::{imm_date, FutureInstrument};
pub use swap::{Leg, LegMode, SwapConventions, SwapInstrument};

use strata_core::types::Date;
use strata_math::error::{MathError, MathResult};
use strata_math::interpolation::Pchip;

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::simultaneous::JointContext;

/// Any instrument a curve can be bootstrapped from.
#[derive(Debug, Clone)]
pub enum Instrument {
    /// A money-market cash deposit.
    Cash(CashInstrument),
    /// A forward rate agreement.
    Fra(FraInstrument),
    /// An interest-rate future.
    Future(FutureInstrument),
    /// A fixed/float swap.
    Swap(SwapInstrument),
    /// A float/float basis swap.
    Basis(BasisSwapInstrument),
}

impl Instrument {
    /// The instrument name, used to label its curve node.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Cash(i) => i.name(),
            Self::Fra(i) => i.name(),
            Self::Future(i) => i.name(),
            Self::Swap(i) => i.name(),
            Self::Basis(i) => i.name(),
        }
    }

    /// Nominal maturity, used to order a strip before bootstrapping.
    #[must_use]
    pub fn maturity(&self) -> Date {
        match self {
            Self::Cash(i) => i.maturity(),
            Self::Fra(i) => i.maturity(),
            Self::Future(i) => i.maturity(),
            Self::Swap(i) => i.maturity(),
            Self::Basis(i) => i.maturity(),
        }
    }

    /// The quoted rate (or spread, for basis swaps).
    #[must_use]
    pub fn rate(&self) -> f64 {
        match self {
            Self::Cash(i) => i.rate(),
            Self::Fra(i) => i.rate(),
            Self::Future(i) => i.rate(),
            Self::Swap(i) => i.rate(),
            Self::Basis(i) => i.rate(),
        }
    }

    /// Date of the curve node this instrument pins down in a sequential
    /// bootstrap. For swaps this is the fixed leg's last payment date,
    /// which can fall after the nominal maturity under a payment lag.
    #[must_use]
    pub fn node_date(&self) -> Date {
        match self {
            Self::Swap(i) => i.node_date(),
            _ => self.maturity(),
        }
    }

    /// Date of the curve node this instrument pins down in a joint strip:
    /// the latest payment date across all of its schedules.
    #[must_use]
    pub fn joint_node_date(&self) -> Date {
        match self {
            Self::Swap(i) => i.last_payment_date(),
            Self::Basis(i) => i.last_payment_date(),
            _ => self.maturity(),
        }
    }

    /// Whether the instrument determines a single curve's node on its own.
    /// Basis swaps constrain two curves and need a joint strip.
    #[must_use]
    pub fn supports_solo_bootstrap(&self) -> bool {
        !matches!(self, Self::Basis(_))
    }

    /// Log discount factor at the node date, given the curve's committed
    /// nodes (and an optional external discounting interpolant).
    pub(crate) fn solve(&self, curve: &Curve, discount: Option<&Pchip>) -> CurveResult<f64> {
        match self {
            Self::Cash(i) => Ok(i.log_discount_factor()),
            Self::Fra(i) => i.log_discount_factor(curve),
            Self::Future(i) => i.log_discount_factor(curve),
            Self::Swap(i) => i.solve(curve, discount),
            Self::Basis(i) => Err(CurveError::not_supported(format!(
                "{} constrains two curves and must be stripped jointly",
                i.name()
            ))),
        }
    }

    /// Residual value under a pair of trial guesses in a joint strip.
    ///
    /// `own_index` selects which of the two curves this instrument's trial
    /// node sits on; basis swaps use both guesses at once.
    pub(crate) fn joint_value(
        &self,
        guesses: [f64; 2],
        own_index: usize,
        ctx: &JointContext<'_>,
    ) -> MathResult<f64> {
        match self {
            Self::Future(i) => i.joint_value(guesses, own_index, ctx),
            Self::Swap(i) => i.joint_value(guesses, own_index, ctx),
            Self::Basis(i) => i.joint_value(guesses, ctx),
            Self::Cash(i) => Err(MathError::invalid_input(format!(
                "{} cannot be valued in a joint solve",
                i.name()
            ))),
            Self::Fra(i) => Err(MathError::invalid_input(format!(
                "{} cannot be valued in a joint solve",
                i.name()
            ))),
        }
    }

    /// Net value against already-built curves, without any trial node.
    /// Only swaps carry a two-sided value worth repricing this way.
    pub(crate) fn committed_value(
        &self,
        projection: &Pchip,
        discounting: &Pchip,
    ) -> CurveResult<f64> {
        match self {
            Self::Swap(i) => Ok(i.value_with(projection, discounting)?),
            other => Err(CurveError::not_supported(format!(
                "{} has no committed repricing value",
                other.name()
            ))),
        }
    }
}

impl From<CashInstrument> for Instrument {
    fn from(value: CashInstrument) -> Self {
        Self::Cash(value)
    }
}

impl From<FraInstrument> for Instrument {
    fn from(value: FraInstrument) -> Self {
        Self::Fra(value)
    }
}

impl From<FutureInstrument> for Instrument {
    fn from(value: FutureInstrument) -> Self {
        Self::Future(value)
    }
}

impl From<SwapInstrument> for Instrument {
    fn from(value: SwapInstrument) -> Self {
        Self::Swap(value)
    }
}

impl From<BasisSwapInstrument> for Instrument {
    fn from(value: BasisSwapInstrument) -> Self {
        Self::Basis(value)
    }
}
