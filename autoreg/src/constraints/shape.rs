//! Monotone solutions, expressed as inequality constraints on first differences.
use faer::{Mat, MatRef};

use crate::{Error, Factorize, Solution, Solver};

/// The direction a monotone solution is allowed to move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// `x[i] ≤ x[i+1]`
    Rising,
    /// `x[i] ≥ x[i+1]`
    Falling,
}

/// The `(n−1)×n` first-difference operator, signed so that `Dx ≥ 0` enforces `trend`.
pub fn difference_operator(n: usize, trend: Trend) -> Mat<f64> {
    let sign = match trend {
        Trend::Rising => 1.0,
        Trend::Falling => -1.0,
    };
    Mat::from_fn(n.saturating_sub(1), n, |i, j| {
        if j == i + 1 {
            sign
        } else if j == i {
            -sign
        } else {
            0.0
        }
    })
}

impl<F: Factorize> Solver<F> {
    /// Like [`Solver::solve_auto`], but the solution is non-decreasing: `x[0] ≤ x[1] ≤ …`.
    pub fn solve_rising(&self, a: MatRef<'_, f64>, b: &[f64]) -> Result<Solution, Error> {
        self.solve_monotone(a, b, Trend::Rising)
    }

    /// Like [`Solver::solve_auto`], but the solution is non-increasing: `x[0] ≥ x[1] ≥ …`.
    pub fn solve_falling(&self, a: MatRef<'_, f64>, b: &[f64]) -> Result<Solution, Error> {
        self.solve_monotone(a, b, Trend::Falling)
    }

    /// Solve with the solution constrained to follow `trend`.
    /// [`Solution::active`] lists the differences `i` (between `x[i]` and `x[i+1]`) forced to zero.
    pub fn solve_monotone(
        &self,
        a: MatRef<'_, f64>,
        b: &[f64],
        trend: Trend,
    ) -> Result<Solution, Error> {
        let g = difference_operator(a.ncols(), trend);
        let h = vec![0.0; g.nrows()];
        self.solve_general(a, b, g.as_ref(), &h)
    }
}
