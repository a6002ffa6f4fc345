use faer::MatRef;

use crate::{
    Error, FaerSvd, Factorize, Solution,
    error::ensure_dim,
    matrix, rank,
    svd::SvdFactors,
};

pub(crate) mod calibrate;
pub(crate) mod kernel;

/// Knobs for the solver. The defaults are what the heuristics were tuned with;
/// there is normally no reason to change them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Relative error assumed in the input data. Rows whose norm drops below
    /// this fraction of the largest row norm are treated as empty.
    pub assumed_error: f64,
    /// Singular values below `S[0]·max(m,n)·rank_epsilon` are treated as zero.
    pub rank_epsilon: f64,
    /// Upper limit on the number of bisection steps used to pick lambda.
    pub max_bisections: usize,
    /// Lambda is searched for in `[0, lambda_ceiling·S[0]]`.
    pub lambda_ceiling: f64,
    /// Bisection stops once the residual is within this relative distance of sigma.
    pub bisection_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assumed_error: 1e-9,
            rank_epsilon: 1e-14,
            max_bisections: 50,
            lambda_ceiling: 0.33,
            bisection_tolerance: 1e-9,
        }
    }
}

impl Config {
    /// Set [`Config::assumed_error`].
    pub fn with_assumed_error(mut self, assumed_error: f64) -> Self {
        self.assumed_error = assumed_error;
        self
    }

    /// Set [`Config::rank_epsilon`].
    pub fn with_rank_epsilon(mut self, rank_epsilon: f64) -> Self {
        self.rank_epsilon = rank_epsilon;
        self
    }

    /// Set [`Config::max_bisections`].
    pub fn with_max_bisections(mut self, max_bisections: usize) -> Self {
        self.max_bisections = max_bisections;
        self
    }

    /// Set [`Config::lambda_ceiling`].
    pub fn with_lambda_ceiling(mut self, lambda_ceiling: f64) -> Self {
        self.lambda_ceiling = lambda_ceiling;
        self
    }

    /// Set [`Config::bisection_tolerance`].
    pub fn with_bisection_tolerance(mut self, bisection_tolerance: f64) -> Self {
        self.bisection_tolerance = bisection_tolerance;
        self
    }
}

/// Owns the configuration and the SVD backend used by every solve.
/// The free functions at the crate root use a default-configured one.
#[derive(Debug, Clone)]
pub struct Solver<F = FaerSvd> {
    pub(crate) config: Config,
    pub(crate) factorizer: F,
}

impl Solver<FaerSvd> {
    /// A solver using faer's SVD.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            factorizer: FaerSvd,
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<F: Factorize> Solver<F> {
    /// A solver using a custom SVD backend.
    pub fn with_factorizer(config: Config, factorizer: F) -> Self {
        Self { config, factorizer }
    }

    /// The configuration this solver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decompose `a` with this solver's backend, e.g. to reuse it with
    /// [`Solver::solve_auto_from_svd`] for several right-hand sides.
    pub fn factorize(&self, a: MatRef<'_, f64>) -> Result<SvdFactors, Error> {
        self.factorizer.factorize(a)
    }

    /// Solve `Ax = b` in the least-squares sense, regularizing automatically
    /// if the problem turns out to be ill-conditioned.
    pub fn solve_auto(&self, a: MatRef<'_, f64>, b: &[f64]) -> Result<Solution, Error> {
        ensure_dim("rows of A vs length of b", a.nrows(), b.len())?;
        if matrix::is_zero(a) || matrix::is_zero_vec(b) {
            return Ok(Solution::zero(a.ncols()));
        }
        let svd = self.factorizer.factorize(a)?;
        Ok(self.solve_factored(&svd, b))
    }

    /// Like [`Solver::solve_auto`], but with `A` already decomposed.
    pub fn solve_auto_from_svd(&self, svd: &SvdFactors, b: &[f64]) -> Result<Solution, Error> {
        ensure_dim("rows of U vs length of b", svd.nrows(), b.len())?;
        ensure_dim("columns of U vs number of singular values", svd.u.ncols(), svd.s.len())?;
        ensure_dim("columns of V vs number of singular values", svd.v.ncols(), svd.s.len())?;
        if matrix::is_zero_vec(b) {
            return Ok(Solution::zero(svd.ncols()));
        }
        Ok(self.solve_factored(svd, b))
    }

    fn solve_factored(&self, svd: &SvdFactors, b: &[f64]) -> Solution {
        let nr = svd.numerical_rank(self.config.rank_epsilon);
        if nr < 1 {
            return Solution::zero(svd.ncols());
        }
        let utb = svd.utb(b);
        let g = rank::picard_vector(&utb, &svd.s, nr);
        let ur = rank::usable_rank(&g);
        log::debug!("numerical rank {nr}, usable rank {ur}");

        if ur >= nr {
            let (x, _) = kernel::solve_with_lambda(svd, b, nr, 0.0);
            return Solution {
                x,
                numerical_rank: nr,
                usable_rank: ur,
                sigma: 0.0,
                lambda: 0.0,
                active: Vec::new(),
            };
        }

        let sigma = matrix::rms(&utb[ur..nr]);
        let lambda = calibrate::calibrate_lambda(svd, b, ur, sigma, &self.config);
        log::debug!("ill-conditioned: sigma={sigma:e}, lambda={lambda:e}");
        let (x, _) = kernel::solve_with_lambda(svd, b, ur, lambda);
        Solution {
            x,
            numerical_rank: nr,
            usable_rank: ur,
            sigma,
            lambda,
            active: Vec::new(),
        }
    }
}
