//! Dense matrix and vector helpers.
//!
//! Matrices are faer [`Mat`]s, vectors are plain `f64` slices.
//! Nothing here mutates a borrowed input: functions either return a fresh value
//! or take an owned matrix by `&mut`.
use faer::{Col, ColRef, Mat, MatRef};

use crate::Error;

/// Build a matrix from a list of rows.
/// All rows must have the same length. An empty list gives a 0×0 matrix.
pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Mat<f64>, Error> {
    let ncols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    for (row, r) in rows.iter().enumerate() {
        let actual = r.as_ref().len();
        if actual != ncols {
            return Err(Error::RaggedRows {
                row,
                expected: ncols,
                actual,
            });
        }
    }
    Ok(Mat::from_fn(rows.len(), ncols, |i, j| rows[i].as_ref()[j]))
}

/// An empty constraint system for `ncols` variables: zero rows, `ncols` columns.
pub fn empty(ncols: usize) -> Mat<f64> {
    Mat::zeros(0, ncols)
}

/// Is every entry of the matrix exactly zero? (True for a matrix with no entries.)
pub fn is_zero(a: MatRef<'_, f64>) -> bool {
    (0..a.nrows()).all(|i| (0..a.ncols()).all(|j| a[(i, j)] == 0.0))
}

/// Is every entry of the vector exactly zero?
pub fn is_zero_vec(v: &[f64]) -> bool {
    v.iter().all(|&x| x == 0.0)
}

/// Dot product.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "dot product of vectors with different lengths");
    ColRef::from_slice(a).transpose() * ColRef::from_slice(b)
}

/// Euclidean norm.
pub fn norm(v: &[f64]) -> f64 {
    ColRef::from_slice(v).norm_l2()
}

/// Root mean square, or 0 for an empty vector.
pub fn rms(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    norm(v) / libm::sqrt(v.len() as f64)
}

/// Copy out row `i`.
pub fn row(a: MatRef<'_, f64>, i: usize) -> Vec<f64> {
    a.row(i).iter().copied().collect()
}

/// Overwrite row `i`.
pub fn set_row(a: &mut Mat<f64>, i: usize, values: &[f64]) {
    debug_assert_eq!(a.ncols(), values.len());
    a.row_mut(i).copy_from(ColRef::from_slice(values).transpose());
}

/// Swap rows `i` and `k` in place.
pub fn swap_rows(a: &mut Mat<f64>, i: usize, k: usize) {
    if i == k {
        return;
    }
    for j in 0..a.ncols() {
        let tmp = a[(i, j)];
        a[(i, j)] = a[(k, j)];
        a[(k, j)] = tmp;
    }
}

/// A copy of `a` without row `i`.
pub fn delete_row(a: MatRef<'_, f64>, i: usize) -> Mat<f64> {
    Mat::from_fn(a.nrows() - 1, a.ncols(), |r, c| {
        let src = if r < i { r } else { r + 1 };
        a[(src, c)]
    })
}

/// A copy of `a` without column `j`.
pub fn delete_column(a: MatRef<'_, f64>, j: usize) -> Mat<f64> {
    Mat::from_fn(a.nrows(), a.ncols() - 1, |r, c| {
        let src = if c < j { c } else { c + 1 };
        a[(r, src)]
    })
}

/// A copy of `a` with `values` inserted as the new row `i`.
/// `i == a.nrows()` appends.
pub fn insert_row(a: MatRef<'_, f64>, i: usize, values: &[f64]) -> Mat<f64> {
    debug_assert_eq!(a.ncols(), values.len());
    Mat::from_fn(a.nrows() + 1, a.ncols(), |r, c| match r.cmp(&i) {
        std::cmp::Ordering::Less => a[(r, c)],
        std::cmp::Ordering::Equal => values[c],
        std::cmp::Ordering::Greater => a[(r - 1, c)],
    })
}

/// A copy of the first `nrows` rows of `a`.
pub fn trim_rows(a: MatRef<'_, f64>, nrows: usize) -> Mat<f64> {
    let nrows = nrows.min(a.nrows());
    a.subrows(0, nrows).to_owned()
}

/// Stack `bottom` underneath `top`. Both must have the same number of columns.
pub fn stack_rows(top: MatRef<'_, f64>, bottom: MatRef<'_, f64>) -> Mat<f64> {
    debug_assert_eq!(top.ncols(), bottom.ncols());
    let split = top.nrows();
    Mat::from_fn(split + bottom.nrows(), top.ncols(), |r, c| {
        if r < split {
            top[(r, c)]
        } else {
            bottom[(r - split, c)]
        }
    })
}

/// `A·x`
pub fn mul_vec(a: MatRef<'_, f64>, x: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.ncols(), x.len());
    let ax: Col<f64> = a * ColRef::from_slice(x);
    ax.iter().copied().collect()
}

/// `Aᵀ·y`
pub fn transpose_mul_vec(a: MatRef<'_, f64>, y: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.nrows(), y.len());
    let aty: Col<f64> = a.transpose() * ColRef::from_slice(y);
    aty.iter().copied().collect()
}

/// Largest Euclidean norm of any row, or 0 if there are no rows.
pub fn max_row_norm(a: MatRef<'_, f64>) -> f64 {
    (0..a.nrows())
        .map(|i| a.row(i).norm_l2())
        .fold(0.0, libm::fmax)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Mat<f64> {
        from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows: [&[f64]; 2] = [&[1.0, 2.0], &[3.0]];
        let err = from_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedRows {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn zero_checks() {
        assert!(is_zero(Mat::<f64>::zeros(2, 3).as_ref()));
        assert!(is_zero(empty(3).as_ref()));
        assert!(!is_zero(sample().as_ref()));
        assert!(is_zero_vec(&[0.0, -0.0]));
        assert!(!is_zero_vec(&[0.0, 1e-300]));
    }

    #[test]
    fn row_and_column_surgery() {
        let a = sample();
        let no_row = delete_row(a.as_ref(), 0);
        assert_eq!(row(no_row.as_ref(), 0), vec![4.0, 5.0, 6.0]);

        let no_col = delete_column(a.as_ref(), 1);
        assert_eq!(row(no_col.as_ref(), 0), vec![1.0, 3.0]);
        assert_eq!(row(no_col.as_ref(), 1), vec![4.0, 6.0]);

        let inserted = insert_row(a.as_ref(), 1, &[7.0, 8.0, 9.0]);
        assert_eq!(inserted.nrows(), 3);
        assert_eq!(row(inserted.as_ref(), 1), vec![7.0, 8.0, 9.0]);
        assert_eq!(row(inserted.as_ref(), 2), vec![4.0, 5.0, 6.0]);

        let mut swapped = a.clone();
        swap_rows(&mut swapped, 0, 1);
        assert_eq!(row(swapped.as_ref(), 0), vec![4.0, 5.0, 6.0]);

        let trimmed = trim_rows(a.as_ref(), 1);
        assert_eq!(trimmed.nrows(), 1);
        assert_eq!(trim_rows(a.as_ref(), 10).nrows(), 2);

        let appended = insert_row(a.as_ref(), 2, &[7.0, 8.0, 9.0]);
        assert_eq!(row(appended.as_ref(), 2), vec![7.0, 8.0, 9.0]);

        let stacked = stack_rows(a.as_ref(), trimmed.as_ref());
        assert_eq!(stacked.nrows(), 3);
        assert_eq!(row(stacked.as_ref(), 2), vec![1.0, 2.0, 3.0]);

        let mut overwritten = a.clone();
        set_row(&mut overwritten, 1, &[0.0, -1.0, 2.0]);
        assert_eq!(row(overwritten.as_ref(), 1), vec![0.0, -1.0, 2.0]);
    }

    #[test]
    fn products_and_norms() {
        let a = sample();
        assert_eq!(mul_vec(a.as_ref(), &[1.0, 0.0, -1.0]), vec![-2.0, -2.0]);
        assert_eq!(transpose_mul_vec(a.as_ref(), &[1.0, 1.0]), vec![5.0, 7.0, 9.0]);
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]), 12.0);
        assert!((norm(&[3.0, 4.0]) - 5.0).abs() < 1e-15);
        assert_eq!(mul_vec(empty(3).as_ref(), &[1.0, 2.0, 3.0]), Vec::<f64>::new());
        assert!((rms(&[3.0, 4.0]) - libm::sqrt(12.5)).abs() < 1e-15);
        assert_eq!(rms(&[]), 0.0);
        assert!((max_row_norm(a.as_ref()) - libm::sqrt(77.0)).abs() < 1e-12);
        assert_eq!(max_row_norm(empty(2).as_ref()), 0.0);
    }
}
