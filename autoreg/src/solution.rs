/// A solved least-squares system and the diagnostics the solver derived from it.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Solution {
    /// The solution vector, one entry per column of `A`.
    pub(crate) x: Vec<f64>,
    /// Singular values above the relative round-off floor.
    pub(crate) numerical_rank: usize,
    /// Singular directions judged to carry signal rather than noise.
    pub(crate) usable_rank: usize,
    /// Estimated RMS noise in `b`.
    pub(crate) sigma: f64,
    /// Tikhonov regularization parameter that was applied.
    pub(crate) lambda: f64,
    /// Indices the constrained solvers had to act on, in the order they acted.
    pub(crate) active: Vec<usize>,
}

impl Solution {
    /// The all-zero solution for `n` variables, with all diagnostics zero.
    pub(crate) fn zero(n: usize) -> Self {
        Self {
            x: vec![0.0; n],
            numerical_rank: 0,
            usable_rank: 0,
            sigma: 0.0,
            lambda: 0.0,
            active: Vec::new(),
        }
    }

    /// The solution vector, one entry per column of `A`.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Consume the solution, keeping only the solution vector.
    pub fn into_x(self) -> Vec<f64> {
        self.x
    }

    /// How many singular values were above the relative round-off floor.
    pub fn numerical_rank(&self) -> usize {
        self.numerical_rank
    }

    /// How many singular directions were judged to carry signal.
    /// If this is less than [`Solution::numerical_rank`], the problem was
    /// ill-conditioned and the solution was regularized.
    pub fn usable_rank(&self) -> usize {
        self.usable_rank
    }

    /// Estimated RMS noise in the right-hand side.
    /// Zero when no ill-conditioning was detected.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// The Tikhonov parameter that was applied. Zero when no ill-conditioning was detected.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Was the solution regularized?
    pub fn is_regularized(&self) -> bool {
        self.usable_rank < self.numerical_rank
    }

    /// For [`crate::solve_non_negative`]: the columns that were forced to zero.
    /// For the inequality solvers: the rows of `G` that were promoted to equalities.
    /// Empty for everything else.
    pub fn active(&self) -> &[usize] {
        &self.active
    }
}
