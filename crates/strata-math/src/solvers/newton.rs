//! Newton-Raphson root-finding.

use log::trace;

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Newton-Raphson iteration `x_{n+1} = x_n - f(x_n) / f'(x_n)`.
///
/// The objective is fallible: valuation functions evaluated during curve
/// bootstrap can themselves fail (for example when a trial point pushes the
/// interpolant out of range), and such failures abort the search.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use strata_math::solvers::{newton_raphson, SolverConfig};
///
/// let f = |x: f64| Ok(x * x - 2.0);
/// let df = |x: f64| Ok(2.0 * x);
///
/// let result = newton_raphson(f, df, 1.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    mut f: F,
    mut df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: FnMut(f64) -> MathResult<f64>,
    DF: FnMut(f64) -> MathResult<f64>,
{
    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        let fx = f(x)?;

        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = df(x)?;
        if dfx.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;
        trace!("newton iteration {iteration}: x = {x:.12e}, f = {fx:.3e}");

        if step.abs() < config.tolerance {
            let residual = f(x)?;
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual,
            });
        }
    }

    let residual = f(x)?.abs();
    Err(MathError::convergence_failed(
        config.max_iterations,
        residual,
    ))
}

/// Newton-Raphson with a central-difference derivative estimate.
///
/// Used when an analytical derivative is not available, which is the case
/// for every instrument valuation function in the bootstrap.
pub fn newton_raphson_numerical<F>(
    mut f: F,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: FnMut(f64) -> MathResult<f64>,
{
    // Step size for the finite difference.
    let h = 1e-8;

    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        let fx = f(x)?;

        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = (f(x + h)? - f(x - h)?) / (2.0 * h);
        if dfx.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;

        if step.abs() < config.tolerance {
            let residual = f(x)?;
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual,
            });
        }
    }

    let residual = f(x)?.abs();
    Err(MathError::convergence_failed(
        config.max_iterations,
        residual,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_newton_sqrt_two() {
        let result = newton_raphson(
            |x| Ok(x * x - 2.0),
            |x| Ok(2.0 * x),
            1.5,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_numerical_matches_analytic() {
        let f = |x: f64| Ok((x - 0.3).exp() - 1.0);
        let result = newton_raphson_numerical(f, 0.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 0.3, epsilon = 1e-8);
    }

    #[test]
    fn test_zero_derivative_fails() {
        let result = newton_raphson(|_| Ok(1.0), |_| Ok(0.0), 0.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::DivisionByZero { .. })));
    }

    #[test]
    fn test_objective_error_propagates() {
        let result = newton_raphson_numerical(
            |_| Err(MathError::invalid_input("bad point")),
            0.0,
            &SolverConfig::default(),
        );
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }
}
