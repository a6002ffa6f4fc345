//! Automatically regularized linear least squares.
//!
//! Solves `Ax = b` for dense `A` of any shape. The singular value decomposition of `A`
//! is used to check the discrete Picard condition: as long as `|(Uᵀb)[i]| / S[i]` stays
//! flat, the data supports the `i`th singular direction. Once it starts rising, noise is
//! being amplified, and the solution is Tikhonov regularized with a lambda chosen so that
//! the residual matches the noise level estimated from the discarded directions.
//! Well-conditioned problems get the ordinary least-squares solution.
//!
//! On top of that are variants which keep the solution non-negative, satisfy linear
//! equalities exactly, or satisfy linear inequalities `Gx ≥ h`.
//!
//! ```
//! let a = autoreg::matrix::from_rows(&[[1.0, 1.0], [1.0, 1.01]])?;
//! let solution = autoreg::solve_auto(a.as_ref(), &[2.0, 3.0])?;
//! assert!(solution.is_regularized());
//! # Ok::<(), autoreg::Error>(())
//! ```
//!
//! Every function here is also available as a method of [`Solver`], which lets you
//! change the [`Config`] or plug in a different SVD backend.

use faer::MatRef;

pub use crate::error::Error;
pub use crate::solution::Solution;
pub use crate::solver::calibrate::calibrate_lambda;
pub use crate::solver::kernel::solve_with_lambda;
pub use crate::solver::{Config, Solver};
pub use crate::svd::{FaerSvd, Factorize, SvdFactors};

pub mod constraints;
mod error;
pub mod matrix;
mod nonneg;
pub mod rank;
mod solution;
/// The unconstrained auto-regularizing solver and its configuration.
mod solver;
mod svd;
/// Parser for textual representation of these problems.
pub mod textual;

/// Solve `Ax = b` in the least-squares sense, regularizing if the problem is ill-conditioned.
/// See [`Solver::solve_auto`].
pub fn solve_auto(a: MatRef<'_, f64>, b: &[f64]) -> Result<Solution, Error> {
    Solver::new(Config::default()).solve_auto(a, b)
}

/// Like [`solve_auto`], reusing an existing decomposition of `A`.
/// See [`Solver::solve_auto_from_svd`].
pub fn solve_auto_from_svd(svd: &SvdFactors, b: &[f64]) -> Result<Solution, Error> {
    Solver::new(Config::default()).solve_auto_from_svd(svd, b)
}

/// Like [`solve_auto`], with every component of the solution `≥ 0`.
/// See [`Solver::solve_non_negative`].
pub fn solve_non_negative(a: MatRef<'_, f64>, b: &[f64]) -> Result<Solution, Error> {
    Solver::new(Config::default()).solve_non_negative(a, b)
}

/// Like [`solve_auto`], subject to `Ex = f` exactly.
/// See [`Solver::solve_with_equality`].
pub fn solve_with_equality(
    a: MatRef<'_, f64>,
    b: &[f64],
    e: MatRef<'_, f64>,
    f: &[f64],
) -> Result<Solution, Error> {
    Solver::new(Config::default()).solve_with_equality(a, b, e, f)
}

/// Like [`solve_auto`], subject to `Ex = f` exactly and `Gx ≥ h`.
/// See [`Solver::solve_with_inequality`].
pub fn solve_with_inequality(
    a: MatRef<'_, f64>,
    b: &[f64],
    e: MatRef<'_, f64>,
    f: &[f64],
    g: MatRef<'_, f64>,
    h: &[f64],
) -> Result<Solution, Error> {
    Solver::new(Config::default()).solve_with_inequality(a, b, e, f, g, h)
}

/// Like [`solve_auto`], subject to `Gx ≥ h`.
/// See [`Solver::solve_general`].
pub fn solve_general(
    a: MatRef<'_, f64>,
    b: &[f64],
    g: MatRef<'_, f64>,
    h: &[f64],
) -> Result<Solution, Error> {
    Solver::new(Config::default()).solve_general(a, b, g, h)
}

/// Like [`solve_auto`], with a non-decreasing solution.
pub fn solve_rising(a: MatRef<'_, f64>, b: &[f64]) -> Result<Solution, Error> {
    Solver::new(Config::default()).solve_rising(a, b)
}

/// Like [`solve_auto`], with a non-increasing solution.
pub fn solve_falling(a: MatRef<'_, f64>, b: &[f64]) -> Result<Solution, Error> {
    Solver::new(Config::default()).solve_falling(a, b)
}
