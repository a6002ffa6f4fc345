//! Non-negative least squares by column elimination.
use faer::MatRef;

use crate::{Error, Factorize, Solution, Solver, matrix, solver::kernel::solve_with_lambda};

impl<F: Factorize> Solver<F> {
    /// Like [`Solver::solve_auto`], but every component of the solution is `≥ 0`.
    ///
    /// Starting from the unconstrained solution, the column with the most negative
    /// value is dropped from the problem and the reduced problem is re-solved with the
    /// lambda calibrated for the full problem. This repeats until nothing is negative.
    /// It favours deleting as few columns as possible over the minimum residual.
    ///
    /// The diagnostics are those of the initial, unconstrained solve.
    /// [`Solution::active`] lists the columns that were forced to zero.
    pub fn solve_non_negative(&self, a: MatRef<'_, f64>, b: &[f64]) -> Result<Solution, Error> {
        let mut solution = self.solve_auto(a, b)?;
        if solution.x.iter().all(|&v| v >= 0.0) {
            return Ok(solution);
        }

        let lambda = solution.lambda;
        // Original indices of the columns still in the reduced problem.
        let mut kept: Vec<usize> = (0..a.ncols()).collect();
        let mut removed = Vec::new();
        let mut x = solution.x.clone();
        // Working copy of A, shrinking in step with `kept`.
        let mut reduced = a.to_owned();

        while let Some(p) = most_negative(&x) {
            if kept.len() == 1 {
                // Nothing left to trade against, so clamp.
                x[0] = 0.0;
                removed.push(kept[0]);
                break;
            }
            removed.push(kept.remove(p));
            log::trace!("non-negative: removed column {}", removed[removed.len() - 1]);

            reduced = matrix::delete_column(reduced.as_ref(), p);
            let svd = self.factorizer.factorize(reduced.as_ref())?;
            let rank = svd.numerical_rank(self.config.rank_epsilon);
            (x, _) = solve_with_lambda(&svd, b, rank, lambda);
        }
        log::debug!("non-negative: {} of {} columns forced to zero", removed.len(), a.ncols());

        let mut full = vec![0.0; a.ncols()];
        for (&column, &value) in kept.iter().zip(&x) {
            full[column] = value;
        }
        // The clamped single column has to stay at zero.
        for &column in &removed {
            full[column] = 0.0;
        }
        solution.x = full;
        solution.active = removed;
        Ok(solution)
    }
}

/// Index of the smallest strictly negative entry, if there is one.
fn most_negative(x: &[f64]) -> Option<usize> {
    x.iter()
        .enumerate()
        .filter(|(_, v)| **v < 0.0)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn finds_most_negative() {
        assert_eq!(most_negative(&[1.0, -2.0, -3.0, 0.0]), Some(2));
        assert_eq!(most_negative(&[1.0, 0.0]), None);
        assert_eq!(most_negative(&[]), None);
    }

    #[test]
    fn already_non_negative_is_untouched() {
        let a = matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();
        let solver = Solver::new(Config::default());
        let s = solver.solve_non_negative(a.as_ref(), &[1.0, 2.0]).unwrap();
        let unconstrained = solver.solve_auto(a.as_ref(), &[1.0, 2.0]).unwrap();
        assert_eq!(s, unconstrained);
        assert!(s.active().is_empty());
    }

    #[test]
    fn single_column_is_clamped() {
        let a = matrix::from_rows(&[[1.0], [2.0]]).unwrap();
        let s = Solver::new(Config::default())
            .solve_non_negative(a.as_ref(), &[-1.0, -2.0])
            .unwrap();
        assert_eq!(s.x(), &[0.0]);
        assert_eq!(s.active(), &[0]);
    }

    #[test]
    fn eliminates_negative_column() {
        let a = matrix::from_rows(&[[2.0, 2.0, 1.0], [2.0, 1.0, 0.0], [1.0, 1.0, 0.0]]).unwrap();
        let s = Solver::new(Config::default())
            .solve_non_negative(a.as_ref(), &[3.9, 3.0, 2.0])
            .unwrap();
        let expected = [1.04, 0.92, 0.0];
        for (x, e) in s.x().iter().zip(expected) {
            assert!((x - e).abs() < 1e-8, "{:?}", s.x());
        }
        assert_eq!(s.active(), &[2]);
    }
}
