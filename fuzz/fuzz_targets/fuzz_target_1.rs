#![no_main]

use arbitrary::Arbitrary;
use faer::Mat;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|setup: Setup| {
    let n = usize::from(setup.num_vars % 6) + 1;
    let Some((a, b)) = setup.objective.system(n) else {
        return;
    };
    let (e, f) = setup
        .equalities
        .system(n)
        .unwrap_or_else(|| (autoreg::matrix::empty(n), Vec::new()));
    let (g, h) = setup
        .inequalities
        .system(n)
        .unwrap_or_else(|| (autoreg::matrix::empty(n), Vec::new()));

    // None of these may panic, whatever the input.
    let _ = autoreg::solve_auto(a.as_ref(), &b);
    let _ = autoreg::solve_non_negative(a.as_ref(), &b);
    let _ = autoreg::solve_with_equality(a.as_ref(), &b, e.as_ref(), &f);
    let _ = autoreg::solve_with_inequality(a.as_ref(), &b, e.as_ref(), &f, g.as_ref(), &h);
    let _ = autoreg::solve_rising(a.as_ref(), &b);
    let _ = autoreg::solve_falling(a.as_ref(), &b);
    if let Ok(text) = std::str::from_utf8(&setup.text) {
        if let Ok(problem) = text.parse::<autoreg::textual::Problem>() {
            let _ = problem.solve(autoreg::Config::default());
        }
    }
});

#[derive(Debug, Arbitrary)]
struct Setup {
    num_vars: u8,
    objective: Rows,
    equalities: Rows,
    inequalities: Rows,
    text: Vec<u8>,
}

/// Rows of a linear system, each a list of coefficients followed by the right-hand side.
#[derive(Debug, Arbitrary)]
struct Rows(Vec<Vec<f64>>);

impl Rows {
    /// Keeps the well-formed rows (`n` finite coefficients then a finite rhs), capped at 8.
    fn usable(&self, n: usize) -> Vec<&[f64]> {
        self.0
            .iter()
            .filter(|row| row.len() == n + 1 && row.iter().all(|v| v.is_finite() && v.abs() < 1e6))
            .take(8)
            .map(Vec::as_slice)
            .collect()
    }

    fn system(&self, n: usize) -> Option<(Mat<f64>, Vec<f64>)> {
        let rows = self.usable(n);
        if rows.is_empty() {
            return None;
        }
        let a = Mat::from_fn(rows.len(), n, |i, j| rows[i][j]);
        let b = rows.iter().map(|row| row[n]).collect();
        Some((a, b))
    }
}
