//! Hard linear equality constraints `Ex = f`.
//!
//! The constraint rows are orthonormalized (discarding any that are redundant or
//! inconsistent), the objective rows are projected onto their orthogonal complement,
//! and the solution splits into two components which can't interfere:
//! `xe = E'ᵀf'` satisfies the constraints exactly, and `xt` solves the projected
//! objective while staying orthogonal to every constraint row.
use faer::{Mat, MatRef};

use crate::{Config, Error, Factorize, Solution, Solver, error::ensure_dim, matrix, rank};

/// Orthonormalize the rows of `E` (adjusting `f` to match) with classical Gram-Schmidt.
///
/// The first row picked is the best-determined equation, i.e. the one maximizing
/// `|f[i]| / ‖E[i]‖`. After that, whichever remaining row has the largest norm goes next.
/// Rows whose norm collapses to (relatively) nothing are zeroed.
/// With more than two rows, the usable-rank detector then runs on `|f'|` and the
/// system is trimmed to the rows it trusts: this is how contradictory or redundant
/// constraints get dropped instead of making the solve fail.
///
/// An all-zero `E` is returned unchanged.
pub fn orthogonalize_constraints(
    e: MatRef<'_, f64>,
    f: &[f64],
    config: &Config,
) -> (Mat<f64>, Vec<f64>) {
    let mut e = e.to_owned();
    let mut f = f.to_vec();
    if matrix::is_zero(e.as_ref()) {
        return (e, f);
    }
    let me = e.nrows();
    let negligible = config.assumed_error * matrix::max_row_norm(e.as_ref());

    for i in 0..me {
        let pick = if i == 0 {
            best_determined_row(e.as_ref(), &f, negligible)
        } else {
            largest_row(e.as_ref(), i)
        };
        matrix::swap_rows(&mut e, i, pick);
        f.swap(i, pick);

        let mut current = matrix::row(e.as_ref(), i);
        let norm = matrix::norm(&current);
        if norm > negligible {
            current.iter_mut().for_each(|v| *v /= norm);
            f[i] /= norm;
        } else {
            current.fill(0.0);
            f[i] = 0.0;
        }
        matrix::set_row(&mut e, i, &current);

        for k in i + 1..me {
            let mut later = matrix::row(e.as_ref(), k);
            let d = matrix::dot(&later, &current);
            later
                .iter_mut()
                .zip(&current)
                .for_each(|(l, c)| *l -= d * c);
            matrix::set_row(&mut e, k, &later);
            f[k] -= d * f[i];
        }
    }

    if me > 2 {
        let g: Vec<f64> = f.iter().map(|v| v.abs()).collect();
        let trusted = rank::usable_rank(&g);
        if trusted < me {
            log::debug!("dropping {} of {me} equality constraints", me - trusted);
            e = matrix::trim_rows(e.as_ref(), trusted);
            f.truncate(trusted);
        }
    }
    (e, f)
}

/// Remove from every row of `A` its components along the (orthonormal) rows of `E'`,
/// moving the matching amount of `b` along with it.
///
/// Rows left with a norm below `neglect` carry no information beyond the constraints
/// and are deleted; the others are normalized.
pub fn project_out(
    a: MatRef<'_, f64>,
    b: &[f64],
    e: MatRef<'_, f64>,
    f: &[f64],
    neglect: f64,
) -> (Mat<f64>, Vec<f64>) {
    debug_assert_eq!(a.nrows(), b.len());
    let constraint_rows: Vec<Vec<f64>> = (0..e.nrows()).map(|j| matrix::row(e, j)).collect();
    let mut projected = a.to_owned();
    let mut rhs = b.to_vec();
    // Rows are deleted in place, so `i` only advances past rows that are kept.
    let mut i = 0;
    while i < projected.nrows() {
        let mut current = matrix::row(projected.as_ref(), i);
        for (ej, &fj) in constraint_rows.iter().zip(f) {
            let d = matrix::dot(&current, ej);
            current.iter_mut().zip(ej).for_each(|(c, e)| *c -= d * e);
            rhs[i] -= d * fj;
        }
        let norm = matrix::norm(&current);
        if norm <= neglect {
            log::trace!("an equation is fully determined by the constraints");
            projected = matrix::delete_row(projected.as_ref(), i);
            rhs.remove(i);
            continue;
        }
        current.iter_mut().for_each(|v| *v /= norm);
        matrix::set_row(&mut projected, i, &current);
        rhs[i] /= norm;
        i += 1;
    }
    (projected, rhs)
}

/// Index of the row maximizing `|f[i]| / ‖E[i]‖`, ignoring negligible rows.
fn best_determined_row(e: MatRef<'_, f64>, f: &[f64], negligible: f64) -> usize {
    let mut best = 0;
    let mut best_sense = -1.0;
    for (i, &fi) in f.iter().enumerate() {
        let norm = matrix::norm(&matrix::row(e, i));
        if norm <= negligible {
            continue;
        }
        let sense = fi.abs() / norm;
        if sense > best_sense {
            best_sense = sense;
            best = i;
        }
    }
    best
}

/// Index of the row with the largest norm, among rows `from..`.
fn largest_row(e: MatRef<'_, f64>, from: usize) -> usize {
    let mut best = from;
    let mut best_norm = -1.0;
    for i in from..e.nrows() {
        let norm = matrix::norm(&matrix::row(e, i));
        if norm > best_norm {
            best_norm = norm;
            best = i;
        }
    }
    best
}

impl<F: Factorize> Solver<F> {
    /// Solve `Ax = b` in the least-squares sense, subject to `Ex = f` exactly.
    ///
    /// Redundant or contradictory constraint rows are dropped automatically.
    /// An all-zero (or empty) `E` makes this the same as [`Solver::solve_auto`].
    /// The diagnostics describe the projected objective system.
    pub fn solve_with_equality(
        &self,
        a: MatRef<'_, f64>,
        b: &[f64],
        e: MatRef<'_, f64>,
        f: &[f64],
    ) -> Result<Solution, Error> {
        ensure_dim("rows of A vs length of b", a.nrows(), b.len())?;
        ensure_dim("rows of E vs length of f", e.nrows(), f.len())?;
        ensure_dim("columns of E vs columns of A", a.ncols(), e.ncols())?;
        if matrix::is_zero(e) {
            return self.solve_auto(a, b);
        }

        let neglect = matrix::max_row_norm(a) * self.config.assumed_error;
        let (e, f) = orthogonalize_constraints(e, f, &self.config);
        let (a_proj, b_proj) = project_out(a, b, e.as_ref(), &f, neglect);
        log::debug!(
            "equality constrained: {} constraints kept, {} of {} equations remain",
            e.nrows(),
            a_proj.nrows(),
            a.nrows()
        );

        let xe = matrix::transpose_mul_vec(e.as_ref(), &f);
        let mut solution = self.solve_auto(a_proj.as_ref(), &b_proj)?;
        solution
            .x
            .iter_mut()
            .zip(&xe)
            .for_each(|(xt, xe)| *xt += xe);
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(e: MatRef<'_, f64>) {
        for i in 0..e.nrows() {
            for j in 0..e.nrows() {
                let d = matrix::dot(&matrix::row(e, i), &matrix::row(e, j));
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((d - expected).abs() < 1e-12, "rows {i},{j}: {d}");
            }
        }
    }

    #[test]
    fn zero_constraints_are_untouched() {
        let e = Mat::<f64>::zeros(2, 3);
        let (e2, f2) = orthogonalize_constraints(e.as_ref(), &[1.0, 2.0], &Config::default());
        assert_eq!(e2.nrows(), 2);
        assert_eq!(f2, vec![1.0, 2.0]);
    }

    #[test]
    fn rows_become_orthonormal() {
        let e = matrix::from_rows(&[[1.0, 1.0, 0.0], [1.0, 0.0, 1.0]]).unwrap();
        let (e2, f2) = orthogonalize_constraints(e.as_ref(), &[2.0, 6.0], &Config::default());
        assert_eq!(e2.nrows(), 2);
        assert_orthonormal(e2.as_ref());
        // The second row has the larger |f|/‖E‖ and so goes first.
        let first = matrix::row(e2.as_ref(), 0);
        let scale = libm::sqrt(0.5);
        assert!((first[0] - scale).abs() < 1e-12);
        assert!((first[2] - scale).abs() < 1e-12);
        assert!((f2[0] - 6.0 * scale).abs() < 1e-12);
    }

    #[test]
    fn duplicate_row_is_zeroed() {
        let e = matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
        let (e2, f2) = orthogonalize_constraints(e.as_ref(), &[1.0, 2.0], &Config::default());
        assert_eq!(matrix::row(e2.as_ref(), 1), vec![0.0, 0.0]);
        assert_eq!(f2[1], 0.0);
    }

    #[test]
    fn dependent_contradiction_is_zeroed() {
        // x = 1, y = 1 and x + y = 5 contradict each other. The best-determined row
        // (x + y = 5) goes first, and whichever unit row comes last is left empty.
        let e = matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
        let (e2, f2) = orthogonalize_constraints(e.as_ref(), &[1.0, 1.0, 5.0], &Config::default());
        assert_eq!(e2.nrows(), 3);
        assert_eq!(matrix::row(e2.as_ref(), 2), vec![0.0, 0.0]);
        assert_eq!(f2[2], 0.0);
        assert_orthonormal(matrix::trim_rows(e2.as_ref(), 2).as_ref());
    }

    #[test]
    fn nearly_dependent_contradiction_is_trimmed() {
        // The third row only barely escapes the span of the first two, so its
        // orthonormalized right-hand side explodes and the rank detector cuts it.
        let e = matrix::from_rows(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 1e-7]]).unwrap();
        let (e2, f2) = orthogonalize_constraints(e.as_ref(), &[1.0, 1.0, 5.0], &Config::default());
        assert_eq!(e2.nrows(), 2);
        assert_eq!(f2.len(), 2);
        assert_orthonormal(e2.as_ref());
    }

    #[test]
    fn projection_removes_constraint_directions() {
        let a = matrix::from_rows(&[[1.0, 2.0], [2.0, 3.0], [1.0, 1.0]]).unwrap();
        let e = matrix::from_rows(&[[libm::sqrt(0.5), libm::sqrt(0.5)]]).unwrap();
        let f = [3.0 * libm::sqrt(0.5)];
        let (a2, b2) = project_out(a.as_ref(), &[5.3, 7.8, 3.0], e.as_ref(), &f, 1e-9);
        // The last equation is the constraint itself, so it disappears.
        assert_eq!(a2.nrows(), 2);
        assert_eq!(b2.len(), 2);
        for i in 0..a2.nrows() {
            let r = matrix::row(a2.as_ref(), i);
            assert!(matrix::dot(&r, &matrix::row(e.as_ref(), 0)).abs() < 1e-12);
            assert!((matrix::norm(&r) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn constraint_is_met_exactly() {
        let a = matrix::from_rows(&[[1.0, 2.0], [2.0, 3.0]]).unwrap();
        let e = matrix::from_rows(&[[1.0, 1.0]]).unwrap();
        let s = Solver::new(Config::default())
            .solve_with_equality(a.as_ref(), &[5.3, 7.8], e.as_ref(), &[3.0])
            .unwrap();
        let x = s.x();
        assert!((x[0] + x[1] - 3.0).abs() < 1e-12);
        // Constrained least-squares optimum along x + y = 3.
        assert!((x[0] - 0.95).abs() < 1e-9, "{x:?}");
        assert!((x[1] - 2.05).abs() < 1e-9, "{x:?}");
    }

    #[test]
    fn empty_constraints_fall_back_to_unconstrained() {
        let a = matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();
        let solver = Solver::new(Config::default());
        let s = solver
            .solve_with_equality(a.as_ref(), &[1.0, 2.0], matrix::empty(2).as_ref(), &[])
            .unwrap();
        assert_eq!(s, solver.solve_auto(a.as_ref(), &[1.0, 2.0]).unwrap());
    }

    #[test]
    fn shapes_are_checked() {
        let a = matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();
        let e = matrix::from_rows(&[[1.0, 0.0, 0.0]]).unwrap();
        let err = Solver::new(Config::default())
            .solve_with_equality(a.as_ref(), &[1.0, 2.0], e.as_ref(), &[1.0])
            .unwrap_err();
        assert!(err.is_precondition());
        let e = matrix::from_rows(&[[1.0, 0.0]]).unwrap();
        let err = Solver::new(Config::default())
            .solve_with_equality(a.as_ref(), &[1.0, 2.0], e.as_ref(), &[1.0, 2.0])
            .unwrap_err();
        assert!(err.is_precondition());
    }
}
