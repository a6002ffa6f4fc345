mod parser;

use std::str::FromStr;

use faer::Mat;
use winnow::Parser;

use crate::{
    Config, Error, Solution, Solver,
    constraints::{Trend, difference_operator},
    error::ensure_dim,
    matrix,
    textual::parser::parse_problem,
};

/// Which solver a textual problem should be handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Only the constraints written in the problem.
    #[default]
    Plain,
    /// Also require `x ≥ 0`.
    NonNegative,
    /// Also require `x[0] ≤ x[1] ≤ …`.
    Rising,
    /// Also require `x[0] ≥ x[1] ≥ …`.
    Falling,
}

/// One line of a problem: coefficients, then the right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// One per unknown.
    pub coefficients: Vec<f64>,
    /// Right-hand side.
    pub rhs: f64,
}

/// A least-squares problem written out as text, e.g.
///
/// ```text
/// # objective
/// 1, 1 = 2
/// 1, 1.01 = 3
///
/// # equalities
/// 1, 1 = 3
///
/// # inequalities
/// 1, 0 >= 0
/// ```
///
/// The objective rows are the equations of `Ax = b`. The equality and inequality
/// sections are optional. A leading `# mode nonnegative` (or `rising`, or `falling`)
/// line adds that constraint on the solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Extra conditions on the whole solution.
    pub mode: Mode,
    /// Rows of `Ax = b`, solved in the least-squares sense.
    pub objective: Vec<Row>,
    /// Rows of `Ex = f`, satisfied exactly.
    pub equalities: Vec<Row>,
    /// Rows of `Gx ≥ h`.
    pub inequalities: Vec<Row>,
}

impl FromStr for Problem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_problem.parse(s).map_err(|e| e.to_string())
    }
}

impl Problem {
    /// Number of unknowns, taken from the first objective row.
    pub fn num_vars(&self) -> usize {
        self.objective
            .first()
            .map(|row| row.coefficients.len())
            .unwrap_or(0)
    }

    /// Solve the problem with the given configuration, using whichever solver fits it.
    ///
    /// Row widths are checked against the first objective row. A non-negative problem
    /// with no other constraints uses [`Solver::solve_non_negative`]. Otherwise, the
    /// mode's extra conditions join the written inequalities and the problem goes to
    /// [`Solver::solve_with_inequality`].
    pub fn solve(&self, config: Config) -> Result<Solution, Error> {
        let n = self.num_vars();
        let (a, b) = system(&self.objective, n)?;
        let (e, f) = system(&self.equalities, n)?;
        let (mut g, mut h) = system(&self.inequalities, n)?;
        let solver = Solver::new(config);

        let extra = match self.mode {
            Mode::Plain => None,
            Mode::NonNegative if self.equalities.is_empty() && self.inequalities.is_empty() => {
                return solver.solve_non_negative(a.as_ref(), &b);
            }
            Mode::NonNegative => Some(Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })),
            Mode::Rising => Some(difference_operator(n, Trend::Rising)),
            Mode::Falling => Some(difference_operator(n, Trend::Falling)),
        };
        if let Some(extra) = extra {
            g = matrix::stack_rows(g.as_ref(), extra.as_ref());
            h.resize(g.nrows(), 0.0);
        }
        solver.solve_with_inequality(a.as_ref(), &b, e.as_ref(), &f, g.as_ref(), &h)
    }
}

/// Split rows into a coefficient matrix with `n` columns and a right-hand side.
fn system(rows: &[Row], n: usize) -> Result<(Mat<f64>, Vec<f64>), Error> {
    for row in rows {
        ensure_dim("coefficients per row vs number of unknowns", n, row.coefficients.len())?;
    }
    let a = if rows.is_empty() {
        matrix::empty(n)
    } else {
        let coefficients: Vec<&[f64]> = rows.iter().map(|r| r.coefficients.as_slice()).collect();
        matrix::from_rows(&coefficients)?
    };
    let b = rows.iter().map(|r| r.rhs).collect();
    Ok((a, b))
}
