//! Daily-rate compounding and averaging over accrual windows.
//!
//! Overnight-indexed legs accrue one rate per business day. A rate fixed on
//! a Friday applies across the weekend, so every window is expressed as
//! `(business day, weight)` pairs where the weight is the number of
//! calendar days the day's rate covers (3 for a Friday before a weekend, 1
//! otherwise). The forward rate for a window is then a product or weighted
//! mean over those pairs.
//!
//! Discount factors come from an interpolant over `(timestamp, log-DF)`
//! nodes; the single-day growth factor for day `d` is `DF(d) / DF(d+1)`.

use chrono::Weekday;

use strata_core::types::Date;
use strata_math::error::MathResult;
use strata_math::interpolation::Pchip;

use crate::error::{CurveError, CurveResult};
use crate::fixings::FixingTable;

/// Expands `[start, end)` into `(business day, weight)` pairs.
///
/// Saturdays and Sundays roll onto the preceding Friday, raising its
/// weight. A weekend day at the very front of the window keeps weight on
/// itself, since its rate-setting day falls outside the window.
#[must_use]
pub fn rate_days(start: Date, end: Date) -> Vec<(Date, u32)> {
    let mut days: Vec<(Date, u32)> = Vec::new();
    let mut current = start;
    while current < end {
        let mut anchor = match current.weekday() {
            Weekday::Sat => current.add_days(-1),
            Weekday::Sun => current.add_days(-2),
            _ => current,
        };
        if anchor < start {
            anchor = current;
        }
        match days.last_mut() {
            Some(last) if last.0 == anchor => last.1 += 1,
            _ => days.push((anchor, 1)),
        }
        current = current.add_days(1);
    }
    days
}

fn discount_factor(interpolator: &Pchip, date: Date) -> MathResult<f64> {
    Ok(interpolator.value(date.timestamp())?.exp())
}

/// Growth factor `Π (DF(d) / DF(d+1))^w` across the rate days.
///
/// The compounded forward rate for the window is this value minus one.
pub fn compound_growth(interpolator: &Pchip, days: &[(Date, u32)]) -> MathResult<f64> {
    let mut factor = 1.0;
    for &(day, weight) in days {
        let ratio =
            discount_factor(interpolator, day)? / discount_factor(interpolator, day.add_days(1))?;
        factor *= ratio.powi(weight as i32);
    }
    Ok(factor)
}

/// Weighted mean of the annualized (act/360) daily simple rates.
pub fn averaged_rate(interpolator: &Pchip, days: &[(Date, u32)]) -> MathResult<f64> {
    if days.is_empty() {
        return Ok(0.0);
    }
    let mut sum = 0.0;
    let mut total_weight = 0u32;
    for &(day, weight) in days {
        let rate = discount_factor(interpolator, day)?
            / discount_factor(interpolator, day.add_days(1))?
            - 1.0;
        sum += rate * 360.0 * f64::from(weight);
        total_weight += weight;
    }
    Ok(sum / f64::from(total_weight))
}

/// Growth factor where each daily ratio is first converted to a rate over
/// the period accrual fraction: `Π (1 + ((DF(d)/DF(d+1)) − 1) / accrual)^w`.
pub fn compound_growth_with_accrual(
    interpolator: &Pchip,
    days: &[(Date, u32)],
    accrual: f64,
) -> MathResult<f64> {
    let mut factor = 1.0;
    for &(day, weight) in days {
        let rate = (discount_factor(interpolator, day)?
            / discount_factor(interpolator, day.add_days(1))?
            - 1.0)
            / accrual;
        factor *= (1.0 + rate).powi(weight as i32);
    }
    Ok(factor)
}

/// Growth factor over realized fixings: `Π (1 + r_d · w/360)`.
///
/// # Errors
///
/// Returns `CurveError::MissingFixing` for any rate day without a recorded
/// fixing.
pub fn historical_growth(table: &FixingTable, days: &[(Date, u32)]) -> CurveResult<f64> {
    let mut factor = 1.0;
    for &(day, weight) in days {
        let rate = table
            .get(day)
            .ok_or_else(|| CurveError::missing_fixing(day))?;
        factor *= 1.0 + rate * f64::from(weight) / 360.0;
    }
    Ok(factor)
}
