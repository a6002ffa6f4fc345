use faer::linalg::svd::SvdError;

/// Errors that could occur when solving a least-squares system.
///
/// Every numerically valid call (consistent shapes, successful SVD) returns
/// a solution, even for degenerate inputs. These are the only ways a solve
/// can fail.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Two operands of the problem have incompatible shapes.
    #[error("Dimension mismatch in {what}: expected {expected}, but got {actual}")]
    DimensionMismatch {
        /// Which operand (or pair of operands) disagreed.
        what: &'static str,
        /// The size implied by the other operands.
        expected: usize,
        /// The size that was actually given.
        actual: usize,
    },
    /// Rows given to [`crate::matrix::from_rows`] had different lengths.
    #[error("Row {row} has {actual} entries, but the first row has {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
    /// Faer: could not compute the singular value decomposition.
    #[error("Something went wrong doing SVD in faer")]
    FaerSvd(SvdError),
    /// A custom [`crate::Factorize`] backend could not decompose the matrix.
    #[error("SVD backend failed: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Was this error caused by the caller passing inconsistent shapes?
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::DimensionMismatch { .. } | Error::RaggedRows { .. }
        )
    }

    /// Did the singular value decomposition fail?
    pub fn is_factorization(&self) -> bool {
        matches!(self, Error::FaerSvd(_) | Error::Backend(_))
    }
}

/// Returns an error unless `actual == expected`.
pub(crate) fn ensure_dim(what: &'static str, expected: usize, actual: usize) -> Result<(), Error> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            what,
            expected,
            actual,
        })
    }
}
