//! Choosing lambda so the residual matches the estimated noise level.
use super::{Config, kernel::solve_with_lambda};
use crate::svd::SvdFactors;

/// Bisect over `λ ∈ [0, lambda_ceiling·S[0]]` until the residual RMS of
/// [`solve_with_lambda`] matches `target_sigma`.
///
/// Relies on the residual being non-decreasing in λ.
/// Never fails: after `max_bisections` steps the last midpoint is returned.
pub fn calibrate_lambda(
    svd: &SvdFactors,
    b: &[f64],
    usable_rank: usize,
    target_sigma: f64,
    config: &Config,
) -> f64 {
    let mut lo = 0.0;
    let mut hi = config.lambda_ceiling * svd.s.first().copied().unwrap_or(0.0);
    let mut lambda = 0.0;
    for iteration in 0..config.max_bisections {
        lambda = 0.5 * (lo + hi);
        let (_, residual) = solve_with_lambda(svd, b, usable_rank, lambda);
        log::trace!("bisection {iteration}: lambda={lambda:e} residual={residual:e}");
        if close_enough(residual, target_sigma, config.bisection_tolerance) {
            break;
        }
        if residual > target_sigma {
            hi = lambda;
        } else {
            lo = lambda;
        }
    }
    lambda
}

// Stopping early only saves iterations, the bracket converges on the same lambda either way.
#[mutants::skip]
fn close_enough(residual: f64, target: f64, tolerance: f64) -> bool {
    (residual - target).abs() < tolerance * target
}
