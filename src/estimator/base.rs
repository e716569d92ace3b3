//! Shared fitting and prediction machinery for the TSVM estimators
//!
//! Both estimators partition the training set by class, build bias-augmented
//! design matrices (kernel-transformed for RBF) and end up with two
//! hyperplanes. Everything that is identical between them lives here.

use crate::core::{EstimatorConfig, Result, TsvmError};
use crate::kernel::{self, Kernel};
use nalgebra::{DMatrix, DVector, RowDVector};

/// Regularization constant added to normal-equation matrices before
/// inversion (2^-7). Protects against singularity when a class has fewer
/// samples than features.
pub(crate) const REG_TERM: f64 = 0.007_812_5;

/// Split the training set into class +1 and class -1 matrices
///
/// Row order within each class follows first occurrence in the training
/// sequence. Labels other than +1.0 / -1.0 are rejected, as is an empty
/// class: a hyperplane cannot be fitted to zero points.
pub fn partition_classes(x: &DMatrix<f64>, y: &[f64]) -> Result<(DMatrix<f64>, DMatrix<f64>)> {
    if x.nrows() == 0 {
        return Err(TsvmError::EmptyDataset);
    }
    if x.nrows() != y.len() {
        return Err(TsvmError::DimensionMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }

    let mut rows_a = Vec::new();
    let mut rows_b = Vec::new();
    for (i, &label) in y.iter().enumerate() {
        if label == 1.0 {
            rows_a.push(x.row(i));
        } else if label == -1.0 {
            rows_b.push(x.row(i));
        } else {
            return Err(TsvmError::InvalidLabel(label));
        }
    }

    if rows_a.is_empty() {
        return Err(TsvmError::EmptyClass(1.0));
    }
    if rows_b.is_empty() {
        return Err(TsvmError::EmptyClass(-1.0));
    }

    Ok((DMatrix::from_rows(&rows_a), DMatrix::from_rows(&rows_b)))
}

/// Append a column of ones (the bias term) to a matrix
pub(crate) fn append_ones_column(m: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(m.nrows(), m.ncols() + 1);
    out.view_mut((0, 0), (m.nrows(), m.ncols())).copy_from(m);
    out.column_mut(m.ncols()).fill(1.0);
    out
}

/// Build the bias-augmented design matrices H (class +1) and G (class -1)
///
/// For the linear kernel these are `[A | 1]` and `[B | 1]`. For RBF the
/// classes are first projected onto the kernel basis: the transpose of
/// `[A; B]` truncated to the first `floor((|A| + |B|) * rect_kernel)`
/// columns. The basis is returned so the fitted model can reuse the exact
/// same transform at prediction time.
pub fn build_design_matrices(
    config: &EstimatorConfig,
    mat_a: &DMatrix<f64>,
    mat_b: &DMatrix<f64>,
) -> Result<(DMatrix<f64>, DMatrix<f64>, Option<DMatrix<f64>>)> {
    match config.kernel {
        Kernel::Linear => Ok((append_ones_column(mat_a), append_ones_column(mat_b), None)),
        Kernel::Rbf { gamma } => {
            let n_total = mat_a.nrows() + mat_b.nrows();
            let n_basis = (n_total as f64 * config.rect_kernel) as usize;
            if n_basis == 0 {
                return Err(TsvmError::InvalidParameter(format!(
                    "rect_kernel = {} leaves an empty kernel basis for {} samples",
                    config.rect_kernel, n_total
                )));
            }

            let mut stacked = DMatrix::zeros(n_total, mat_a.ncols());
            stacked
                .view_mut((0, 0), (mat_a.nrows(), mat_a.ncols()))
                .copy_from(mat_a);
            stacked
                .view_mut((mat_a.nrows(), 0), (mat_b.nrows(), mat_b.ncols()))
                .copy_from(mat_b);
            let basis_t = stacked.transpose().columns(0, n_basis).into_owned();

            let h = append_ones_column(&kernel::projection(mat_a, &basis_t, gamma));
            let g = append_ones_column(&kernel::projection(mat_b, &basis_t, gamma));
            Ok((h, g, Some(basis_t)))
        }
    }
}

/// Invert `m + REG_TERM * I`
///
/// Singularity surviving the regularization is fatal: numerical garbage in
/// the hyperplanes is worse than a fast failure.
pub(crate) fn regularized_inverse(m: DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = m.nrows();
    let regularized = m + DMatrix::identity(n, n) * REG_TERM;
    regularized.try_inverse().ok_or_else(|| {
        TsvmError::NumericalInstability(
            "matrix inversion failed despite regularization".to_string(),
        )
    })
}

/// Plain inversion with the same failure contract as [`regularized_inverse`]
pub(crate) fn checked_inverse(m: DMatrix<f64>) -> Result<DMatrix<f64>> {
    m.try_inverse()
        .ok_or_else(|| TsvmError::NumericalInstability("singular matrix inversion".to_string()))
}

/// Split an augmented hyperplane vector into weights and bias
///
/// The design matrices carry the bias as a trailing ones column, so the
/// solved vector is `[w; b]`.
pub(crate) fn split_hyperplane(u: DVector<f64>) -> (DVector<f64>, f64) {
    let n = u.len();
    let b = u[n - 1];
    (u.rows(0, n - 1).into_owned(), b)
}

/// Fitted state shared by both estimators: the two hyperplanes plus the
/// kernel basis they were fitted with
#[derive(Debug, Clone)]
pub struct FittedPlanes {
    /// Weight vector of class +1's hyperplane
    pub w1: DVector<f64>,
    /// Bias of class +1's hyperplane
    pub b1: f64,
    /// Weight vector of class -1's hyperplane
    pub w2: DVector<f64>,
    /// Bias of class -1's hyperplane
    pub b2: f64,
    /// Kernel basis (d x m), present exactly when fitted with RBF
    pub basis_t: Option<DMatrix<f64>>,
    /// Raw feature dimensionality seen at fit time
    pub n_features: usize,
}

impl FittedPlanes {
    /// Unsigned distances of every row of `x` from both hyperplanes
    ///
    /// Column 0 holds the distance from the class -1 plane (w2, b2),
    /// column 1 from the class +1 plane (w1, b1). This column order is what
    /// makes `2 * argmin - 1` produce the right label; do not swap it.
    pub fn decision_function(&self, x: &DMatrix<f64>, kernel: &Kernel) -> Result<DMatrix<f64>> {
        if x.ncols() != self.n_features {
            return Err(TsvmError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }

        let mut dist = DMatrix::zeros(x.nrows(), 2);
        for i in 0..x.nrows() {
            let row: RowDVector<f64> = x.row(i).into_owned();
            let projected = match (kernel, &self.basis_t) {
                (Kernel::Linear, _) => row,
                (Kernel::Rbf { gamma }, Some(basis_t)) => {
                    kernel::project_row(&row, basis_t, *gamma)
                }
                (Kernel::Rbf { .. }, None) => return Err(TsvmError::ModelNotTrained),
            };

            dist[(i, 1)] = (projected.transpose().dot(&self.w1) + self.b1).abs();
            dist[(i, 0)] = (projected.transpose().dot(&self.w2) + self.b2).abs();
        }
        Ok(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_partition_preserves_order() {
        let x = DMatrix::from_row_slice(4, 1, &[10.0, 20.0, 30.0, 40.0]);
        let y = [-1.0, 1.0, -1.0, 1.0];

        let (a, b) = partition_classes(&x, &y).unwrap();
        assert_eq!(a.nrows(), 2);
        assert_eq!(b.nrows(), 2);
        // First occurrence order within each class
        assert_eq!(a[(0, 0)], 20.0);
        assert_eq!(a[(1, 0)], 40.0);
        assert_eq!(b[(0, 0)], 10.0);
        assert_eq!(b[(1, 0)], 30.0);
    }

    #[test]
    fn test_partition_rejects_foreign_labels() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        assert!(matches!(
            partition_classes(&x, &[1.0, 0.0]),
            Err(TsvmError::InvalidLabel(l)) if l == 0.0
        ));
    }

    #[test]
    fn test_partition_rejects_empty_class() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        assert!(matches!(
            partition_classes(&x, &[1.0, 1.0]),
            Err(TsvmError::EmptyClass(l)) if l == -1.0
        ));
        assert!(matches!(
            partition_classes(&x, &[-1.0, -1.0]),
            Err(TsvmError::EmptyClass(l)) if l == 1.0
        ));
    }

    #[test]
    fn test_partition_rejects_length_mismatch() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        assert!(matches!(
            partition_classes(&x, &[1.0]),
            Err(TsvmError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_append_ones_column() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let out = append_ones_column(&m);

        assert_eq!(out.nrows(), 2);
        assert_eq!(out.ncols(), 3);
        assert_eq!(out[(0, 2)], 1.0);
        assert_eq!(out[(1, 2)], 1.0);
        assert_eq!(out[(1, 1)], 4.0);
    }

    #[test]
    fn test_linear_design_matrices() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 2.0, 2.0, 3.0]);
        let b = DMatrix::from_row_slice(1, 2, &[-2.0, -2.0]);
        let config = EstimatorConfig::default();

        let (h, g, basis) = build_design_matrices(&config, &a, &b).unwrap();
        assert!(basis.is_none());
        assert_eq!(h.ncols(), 3);
        assert_eq!(g.ncols(), 3);
        assert_eq!(h.nrows(), 2);
        assert_eq!(g.nrows(), 1);
    }

    #[test]
    fn test_rbf_basis_truncation() {
        let a = DMatrix::from_row_slice(2, 2, &[0.1, 0.2, 0.3, 0.4]);
        let b = DMatrix::from_row_slice(2, 2, &[-0.1, -0.2, -0.3, -0.4]);

        let full = EstimatorConfig {
            kernel: Kernel::rbf(1.0),
            ..Default::default()
        };
        let (h, _, basis) = build_design_matrices(&full, &a, &b).unwrap();
        let basis = basis.unwrap();
        assert_eq!(basis.nrows(), 2); // d
        assert_eq!(basis.ncols(), 4); // all samples
        assert_eq!(h.ncols(), 5); // kernel dim + bias

        let half = EstimatorConfig {
            kernel: Kernel::rbf(1.0),
            rect_kernel: 0.5,
            ..Default::default()
        };
        let (h, _, basis) = build_design_matrices(&half, &a, &b).unwrap();
        let basis = basis.unwrap();
        assert_eq!(basis.ncols(), 2); // floor(4 * 0.5)
        assert_eq!(h.ncols(), 3);
    }

    #[test]
    fn test_rbf_basis_column_order_is_class_a_first() {
        let a = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        let b = DMatrix::from_row_slice(1, 2, &[3.0, 4.0]);
        let config = EstimatorConfig {
            kernel: Kernel::rbf(1.0),
            ..Default::default()
        };

        let (_, _, basis) = build_design_matrices(&config, &a, &b).unwrap();
        let basis = basis.unwrap();
        assert_eq!((basis[(0, 0)], basis[(1, 0)]), (1.0, 2.0));
        assert_eq!((basis[(0, 1)], basis[(1, 1)]), (3.0, 4.0));
    }

    #[test]
    fn test_regularized_inverse_of_singular_matrix() {
        // Rank-1 matrix: singular on its own, invertible with the ridge
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let inv = regularized_inverse(m.clone()).unwrap();

        let product = (m + DMatrix::identity(2, 2) * REG_TERM) * inv;
        assert_relative_eq!(product[(0, 0)], 1.0, epsilon = 1e-8);
        assert_relative_eq!(product[(0, 1)], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_split_hyperplane() {
        let u = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let (w, b) = split_hyperplane(u);
        assert_eq!(w.len(), 2);
        assert_eq!(w[0], 1.0);
        assert_eq!(w[1], 2.0);
        assert_eq!(b, 3.0);
    }

    #[test]
    fn test_decision_function_dimension_check() {
        let planes = FittedPlanes {
            w1: DVector::from_vec(vec![1.0, 0.0]),
            b1: 0.0,
            w2: DVector::from_vec(vec![0.0, 1.0]),
            b2: 0.0,
            basis_t: None,
            n_features: 2,
        };

        let x = DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]);
        assert!(matches!(
            planes.decision_function(&x, &Kernel::Linear),
            Err(TsvmError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_decision_function_column_mapping() {
        // Plane 1 (class +1): x axis; plane 2 (class -1): y axis
        let planes = FittedPlanes {
            w1: DVector::from_vec(vec![1.0, 0.0]),
            b1: 0.0,
            w2: DVector::from_vec(vec![0.0, 1.0]),
            b2: 0.0,
            basis_t: None,
            n_features: 2,
        };

        let x = DMatrix::from_row_slice(1, 2, &[3.0, -5.0]);
        let dist = planes.decision_function(&x, &Kernel::Linear).unwrap();

        // Column 1: distance from (w1, b1); column 0: from (w2, b2)
        assert_relative_eq!(dist[(0, 1)], 3.0);
        assert_relative_eq!(dist[(0, 0)], 5.0);
    }
}
