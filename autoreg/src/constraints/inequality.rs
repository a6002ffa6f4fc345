//! Linear inequality constraints `Gx ≥ h`, handled with an active set.
use faer::MatRef;

use crate::{Error, Factorize, Solution, Solver, error::ensure_dim, matrix};

impl<F: Factorize> Solver<F> {
    /// Solve `Ax = b` in the least-squares sense, subject to `Ex = f` exactly and `Gx ≥ h`.
    ///
    /// Starts from the equality-constrained solution. While some inequality is violated,
    /// the most violated row of `G` is promoted to an exact equality and the system is
    /// re-solved. Each pass promotes a different row, so there are at most as many
    /// passes as `G` has rows. [`Solution::active`] lists the promoted rows of `G`,
    /// in the order they were promoted.
    ///
    /// Promoted rows are never released. Once enough of them pin `x` down, a row that
    /// is still violated contradicts them and gets dropped as an inconsistent equality,
    /// so the result can break an inequality even when a feasible `x` exists. Check
    /// `Gx ≥ h` on the result if that matters.
    pub fn solve_with_inequality(
        &self,
        a: MatRef<'_, f64>,
        b: &[f64],
        e: MatRef<'_, f64>,
        f: &[f64],
        g: MatRef<'_, f64>,
        h: &[f64],
    ) -> Result<Solution, Error> {
        ensure_dim("rows of G vs length of h", g.nrows(), h.len())?;
        ensure_dim("columns of G vs columns of A", a.ncols(), g.ncols())?;
        let mut solution = self.solve_with_equality(a, b, e, f)?;
        if matrix::is_zero(g) {
            return Ok(solution);
        }

        // Rows of G still treated as inequalities, and those promoted to equalities.
        let mut pending: Vec<usize> = (0..g.nrows()).collect();
        let mut promoted: Vec<usize> = Vec::new();
        // The equality system grows by one row of G per promotion.
        let mut e_active = e.to_owned();
        let mut f_active = f.to_vec();
        for _ in 0..g.nrows() {
            let Some(p) = most_violated(g, h, &pending, &solution.x) else {
                break;
            };
            let row = pending.remove(p);
            log::trace!("active set: promoting inequality {row}");
            promoted.push(row);

            let at = e_active.nrows();
            e_active = matrix::insert_row(e_active.as_ref(), at, &matrix::row(g, row));
            f_active.push(h[row]);
            solution = self.solve_with_equality(a, b, e_active.as_ref(), &f_active)?;
        }
        log::debug!(
            "active set: {} of {} inequalities active",
            promoted.len(),
            g.nrows()
        );
        solution.active = promoted;
        Ok(solution)
    }

    /// Solve `Ax = b` in the least-squares sense, subject to `Gx ≥ h`.
    pub fn solve_general(
        &self,
        a: MatRef<'_, f64>,
        b: &[f64],
        g: MatRef<'_, f64>,
        h: &[f64],
    ) -> Result<Solution, Error> {
        let e = matrix::empty(a.ncols());
        self.solve_with_inequality(a, b, e.as_ref(), &[], g, h)
    }
}

/// Position (within `pending`) of the row with the largest violation `h[r] − (Gx)[r] > 0`.
fn most_violated(g: MatRef<'_, f64>, h: &[f64], pending: &[usize], x: &[f64]) -> Option<usize> {
    let mut worst = None;
    let mut worst_violation = 0.0;
    for (position, &r) in pending.iter().enumerate() {
        let violation = h[r] - matrix::dot(&matrix::row(g, r), x);
        if violation > worst_violation {
            worst_violation = violation;
            worst = Some(position);
        }
    }
    worst
}
