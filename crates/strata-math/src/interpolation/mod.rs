//! Interpolation methods for curve construction.
//!
//! The bootstrap stores log discount factors at curve nodes and evaluates
//! between them with [`Pchip`], a shape-preserving monotone cubic. The
//! curve's valuation loop rebuilds a fresh interpolant over nodes plus one
//! trial point on every root-finder iteration, so construction is kept
//! cheap (a single O(n) pass for the derivative estimates).

mod pchip;

pub use pchip::Pchip;
