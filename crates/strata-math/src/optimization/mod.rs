//! Bounded derivative-free minimization.
//!
//! The simultaneous curve strip solves two log discount factors at once by
//! minimizing the larger of the two paired instruments' absolute present
//! values. The objective is cheap, smooth and two-dimensional, so a bounded
//! Nelder-Mead simplex is used: no gradients, and the box bounds keep every
//! trial discount factor in a plausible range before it reaches a
//! logarithm.

use log::trace;

use crate::error::{MathError, MathResult};

/// Configuration for optimization algorithms.
#[derive(Debug, Clone, Copy)]
pub struct OptimizationConfig {
    /// Tolerance for convergence (spread of objective values across the
    /// simplex).
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Relative size of the initial simplex.
    pub initial_step: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 2000,
            initial_step: 0.05,
        }
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final objective function value.
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the optimization converged.
    pub converged: bool,
}

/// Minimizes `f` over a box using the Nelder-Mead simplex method.
///
/// Every trial vertex is clamped into `bounds` before evaluation.
///
/// # Arguments
///
/// * `f` - Objective function (fallible, like the solvers)
/// * `initial` - Starting point, one entry per dimension
/// * `bounds` - Inclusive `(lo, hi)` box per dimension
/// * `config` - Optimizer configuration
///
/// # Errors
///
/// Returns an error when the inputs are inconsistent or the objective
/// fails; running out of iterations is reported via the `converged` flag,
/// not as an error, so callers can decide how to treat a partial result.
pub fn nelder_mead_bounded<F>(
    mut f: F,
    initial: &[f64],
    bounds: &[(f64, f64)],
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    F: FnMut(&[f64]) -> MathResult<f64>,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::invalid_input("empty initial point"));
    }
    if bounds.len() != n {
        return Err(MathError::invalid_input(format!(
            "bounds dimension {} does not match point dimension {}",
            bounds.len(),
            n
        )));
    }
    for (i, (lo, hi)) in bounds.iter().enumerate() {
        if lo >= hi {
            return Err(MathError::invalid_input(format!(
                "bound {i} is empty: [{lo}, {hi}]"
            )));
        }
    }

    let clamp = |p: &mut [f64]| {
        for (v, (lo, hi)) in p.iter_mut().zip(bounds.iter()) {
            *v = v.clamp(*lo, *hi);
        }
    };

    // Initial simplex: the start point plus one perturbed vertex per axis.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    let mut start = initial.to_vec();
    clamp(&mut start);
    simplex.push(start.clone());
    for i in 0..n {
        let mut vertex = start.clone();
        let span = bounds[i].1 - bounds[i].0;
        vertex[i] += config.initial_step * span;
        clamp(&mut vertex);
        simplex.push(vertex);
    }

    let mut values: Vec<f64> = Vec::with_capacity(n + 1);
    for vertex in &simplex {
        values.push(f(vertex)?);
    }

    // Standard coefficients: reflection, expansion, contraction, shrink.
    let (alpha, gamma, rho, sigma) = (1.0, 2.0, 0.5, 0.5);

    for iteration in 0..config.max_iterations {
        // Order the simplex best-to-worst.
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        if (values[worst] - values[best]).abs() < config.tolerance {
            return Ok(OptimizationResult {
                parameters: simplex[best].clone(),
                objective_value: values[best],
                iterations: iteration,
                converged: true,
            });
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; n];
        for (i, vertex) in simplex.iter().enumerate() {
            if i == worst {
                continue;
            }
            for (c, v) in centroid.iter_mut().zip(vertex.iter()) {
                *c += v / n as f64;
            }
        }

        let blend = |from: &[f64], towards: &[f64], t: f64| -> Vec<f64> {
            let mut p: Vec<f64> = from
                .iter()
                .zip(towards.iter())
                .map(|(a, b)| a + t * (b - a))
                .collect();
            clamp(&mut p);
            p
        };

        // Reflect the worst vertex through the centroid.
        let reflected = blend(&centroid, &simplex[worst], -alpha);
        let f_reflected = f(&reflected)?;
        trace!("nelder-mead iteration {iteration}: best = {:.3e}", values[best]);

        if f_reflected < values[best] {
            let expanded = blend(&centroid, &simplex[worst], -gamma);
            let f_expanded = f(&expanded)?;
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                values[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            }
        } else if f_reflected < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = f_reflected;
        } else {
            let contracted = blend(&centroid, &simplex[worst], rho);
            let f_contracted = f(&contracted)?;
            if f_contracted < values[worst] {
                simplex[worst] = contracted;
                values[worst] = f_contracted;
            } else {
                // Shrink everything towards the best vertex.
                let best_vertex = simplex[best].clone();
                for i in 0..=n {
                    if i == best {
                        continue;
                    }
                    simplex[i] = blend(&best_vertex, &simplex[i], sigma);
                    values[i] = f(&simplex[i])?;
                }
            }
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);
    Ok(OptimizationResult {
        parameters: simplex[best].clone(),
        objective_value: values[best],
        iterations: config.max_iterations,
        converged: false,
    })
}
