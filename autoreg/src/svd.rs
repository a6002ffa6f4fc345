//! The singular value decomposition, treated as an external capability.
//!
//! The solvers only ever see [`SvdFactors`], so tests (or callers with their own
//! linear algebra backend) can inject a decomposition through [`Factorize`].
use faer::{Col, ColRef, Mat, MatRef};

use crate::Error;

/// A thin SVD `A = U·diag(S)·Vᵀ` of an m×n matrix, with `k = min(m, n)`.
#[derive(Debug, Clone)]
pub struct SvdFactors {
    /// m×k, orthonormal columns.
    pub u: Mat<f64>,
    /// k singular values, non-negative, in descending order.
    pub s: Vec<f64>,
    /// n×k, orthonormal columns.
    pub v: Mat<f64>,
}

impl SvdFactors {
    /// Number of rows of the factored matrix.
    pub fn nrows(&self) -> usize {
        self.u.nrows()
    }

    /// Number of columns of the factored matrix.
    pub fn ncols(&self) -> usize {
        self.v.nrows()
    }

    /// `Uᵀ·b`: the right-hand side expressed in the left singular vectors.
    pub fn utb(&self, b: &[f64]) -> Vec<f64> {
        let utb: Col<f64> = self.u.transpose() * ColRef::from_slice(b);
        utb.iter().copied().collect()
    }

    /// `U·diag(S)·Vᵀ·x`, i.e. `A·x` without needing `A` itself.
    pub fn reconstruct(&self, x: &[f64]) -> Vec<f64> {
        let mut scaled: Col<f64> = self.v.transpose() * ColRef::from_slice(x);
        scaled
            .iter_mut()
            .zip(&self.s)
            .for_each(|(vtx, s)| *vtx *= s);
        let ax: Col<f64> = self.u.as_ref() * scaled.as_ref();
        ax.iter().copied().collect()
    }

    /// Count of leading singular values strictly above the relative floor
    /// `S[0]·max(m,n)·rank_epsilon` (or `rank_epsilon` itself if that product is zero).
    pub fn numerical_rank(&self, rank_epsilon: f64) -> usize {
        let Some(&largest) = self.s.first() else {
            return 0;
        };
        let size = self.nrows().max(self.ncols()) as f64;
        let mut eps = largest * size * rank_epsilon;
        if eps == 0.0 {
            eps = rank_epsilon;
        }
        self.s.iter().take_while(|&&s| s > eps).count()
    }
}

/// Something which can decompose a dense matrix into its thin SVD.
pub trait Factorize {
    /// Decompose `a`. Failure is fatal for the solve that asked for it.
    fn factorize(&self, a: MatRef<'_, f64>) -> Result<SvdFactors, Error>;
}

/// The default backend: faer's dense thin SVD.
#[derive(Debug, Default, Clone, Copy)]
pub struct FaerSvd;

impl Factorize for FaerSvd {
    fn factorize(&self, a: MatRef<'_, f64>) -> Result<SvdFactors, Error> {
        let svd = a.thin_svd().map_err(Error::FaerSvd)?;
        let s = svd.S().column_vector().iter().copied().collect();
        Ok(SvdFactors {
            u: svd.U().to_owned(),
            s,
            v: svd.V().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix;

    #[test]
    fn faer_backend_reconstructs_the_matrix() {
        let a = matrix::from_rows(&[[3.0, 1.0], [1.0, 3.0], [0.0, 2.0]]).unwrap();
        let svd = FaerSvd.factorize(a.as_ref()).unwrap();
        assert_eq!(svd.nrows(), 3);
        assert_eq!(svd.ncols(), 2);
        assert_eq!(svd.s.len(), 2);
        assert!(svd.s[0] >= svd.s[1]);
        assert!(svd.s[1] >= 0.0);

        let x = [0.5, -2.0];
        let expected = matrix::mul_vec(a.as_ref(), &x);
        let actual = svd.reconstruct(&x);
        for (e, a) in expected.iter().zip(&actual) {
            assert!((e - a).abs() < 1e-12, "{e} vs {a}");
        }
    }

    #[test]
    fn wide_matrices_are_thin() {
        let a = matrix::from_rows(&[[1.0, 0.0, 2.0, 0.0]]).unwrap();
        let svd = FaerSvd.factorize(a.as_ref()).unwrap();
        assert_eq!(svd.u.ncols(), 1);
        assert_eq!(svd.v.nrows(), 4);
        assert!((svd.s[0] - libm::sqrt(5.0)).abs() < 1e-12);
    }

    #[test]
    fn numerical_rank_ignores_round_off() {
        let svd = SvdFactors {
            u: Mat::zeros(3, 3),
            s: vec![2.0, 1.0, 1e-15],
            v: Mat::zeros(3, 3),
        };
        assert_eq!(svd.numerical_rank(1e-14), 2);

        let all_zero = SvdFactors {
            u: Mat::zeros(2, 2),
            s: vec![0.0, 0.0],
            v: Mat::zeros(2, 2),
        };
        assert_eq!(all_zero.numerical_rank(1e-14), 0);
    }
}
