//! Tikhonov-filtered pseudoinverse solve at a fixed rank and lambda.
use faer::{Col, ColRef};

use crate::svd::SvdFactors;

/// Solve `Ax = b` through the SVD of `A`, keeping only the first `usable_rank`
/// singular directions and damping them with `lambda`.
///
/// The filtered pseudo-singular values are `p[i] = 1 / (S[i] + λ²/S[i])` for
/// `i < usable_rank` (zero for vanishing `S[i]`, and zero past the usable rank no
/// matter what `λ` is), and `x = V·diag(p)·Uᵀ·b`.
///
/// Returns `x` and the residual RMS `‖b − U·diag(S)·Vᵀ·x‖₂ / √m`.
pub fn solve_with_lambda(
    svd: &SvdFactors,
    b: &[f64],
    usable_rank: usize,
    lambda: f64,
) -> (Vec<f64>, f64) {
    let lambda_sq = lambda * lambda;
    let coefficients: Vec<f64> = svd
        .utb(b)
        .into_iter()
        .zip(&svd.s)
        .enumerate()
        .map(|(i, (beta, &s))| {
            if i < usable_rank && s > 0.0 {
                beta / (s + lambda_sq / s)
            } else {
                0.0
            }
        })
        .collect();
    let x: Col<f64> = svd.v.as_ref() * ColRef::from_slice(&coefficients);
    let x: Vec<f64> = x.iter().copied().collect();
    let residual = residual_rms(svd, b, &x);
    (x, residual)
}

/// `‖b − U·diag(S)·Vᵀ·x‖₂ / √m`
pub(crate) fn residual_rms(svd: &SvdFactors, b: &[f64], x: &[f64]) -> f64 {
    let ax = svd.reconstruct(x);
    let r: Vec<f64> = b.iter().zip(&ax).map(|(bi, axi)| bi - axi).collect();
    crate::matrix::rms(&r)
}
