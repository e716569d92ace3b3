//! Least Squares Twin Support Vector Machine estimator

use crate::core::{EstimatorConfig, Result, TsvmError, TwinEstimator};
use crate::estimator::base::{
    build_design_matrices, checked_inverse, partition_classes, split_hyperplane, FittedPlanes,
    REG_TERM,
};
use crate::kernel::Kernel;
use log::debug;
use nalgebra::{DMatrix, DVector};

/// Least Squares Twin Support Vector Machine (LSTSVM) for binary
/// classification
///
/// Shares the two-hyperplane prediction model of [`TwinSvm`](crate::TwinSvm)
/// but needs no QP solver: the hyperplanes come out of closed-form
/// regularized linear-system solves. For the RBF kernel the
/// Sherman-Morrison-Woodbury identity is used so that the large
/// (kernel dim + 1)-sized inversion is replaced by inversions of
/// class-sample-count size, pivoting on whichever class is smaller.
#[derive(Debug, Clone, Default)]
pub struct LeastSquaresTwinSvm {
    config: EstimatorConfig,
    planes: Option<FittedPlanes>,
}

impl LeastSquaresTwinSvm {
    /// Create an estimator with default configuration (linear kernel,
    /// C1 = C2 = 1)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator with the given configuration
    pub fn with_config(config: EstimatorConfig) -> Self {
        Self {
            config,
            planes: None,
        }
    }

    /// Set the kernel function
    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.config.kernel = kernel;
        self
    }

    /// Set the rectangular-kernel fraction
    pub fn with_rect_kernel(mut self, rect_kernel: f64) -> Self {
        self.config.rect_kernel = rect_kernel;
        self
    }

    /// Set the penalty parameter of the first optimization problem
    pub fn with_c1(mut self, c1: f64) -> Self {
        self.config.c1 = c1;
        self
    }

    /// Set the penalty parameter of the second optimization problem
    pub fn with_c2(mut self, c2: f64) -> Self {
        self.config.c2 = c2;
        self
    }

    /// Rebuild an already-fitted estimator; used when loading a persisted
    /// model
    pub(crate) fn from_fitted(config: EstimatorConfig, planes: FittedPlanes) -> Self {
        Self {
            config,
            planes: Some(planes),
        }
    }

    /// Get the estimator configuration
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Fitted hyperplanes, if the estimator has been fitted
    pub fn planes(&self) -> Option<&FittedPlanes> {
        self.planes.as_ref()
    }

    /// Closed-form solve for the linear kernel (direct normal equations,
    /// no ridge term)
    fn fit_linear(
        &self,
        h: &DMatrix<f64>,
        g: &DMatrix<f64>,
    ) -> Result<(DVector<f64>, DVector<f64>)> {
        let h_t = h.transpose();
        let g_t = g.transpose();
        let hth = &h_t * h;
        let gtg = &g_t * g;

        let e1 = DVector::from_element(h.nrows(), 1.0);
        let e2 = DVector::from_element(g.nrows(), 1.0);

        let inv1 = checked_inverse(&gtg + &hth / self.config.c1)?;
        let u1 = -(inv1 * (&g_t * &e2));

        let inv2 = checked_inverse(&hth + &gtg / self.config.c2)?;
        let u2 = inv2 * (&h_t * &e1);

        Ok((u1, u2))
    }

    /// SMW-based solve for the RBF kernel
    ///
    /// Pivots on the smaller class: with |A| < |B| the reduced inverse Y is
    /// built from G, otherwise the symmetric Z form is built from H. Both
    /// are algebraically equivalent to the direct solve; the branch only
    /// decides which Gram matrix gets inverted.
    fn fit_rbf(&self, h: &DMatrix<f64>, g: &DMatrix<f64>) -> Result<(DVector<f64>, DVector<f64>)> {
        let (c1, c2) = (self.config.c1, self.config.c2);
        let h_t = h.transpose();
        let g_t = g.transpose();
        let (m1, m2, k) = (h.nrows(), g.nrows(), h.ncols());

        let e1 = DVector::from_element(m1, 1.0);
        let e2 = DVector::from_element(m2, 1.0);

        if m1 < m2 {
            debug!("LSTSVM SMW pivot on G (|A| = {m1} < |B| = {m2})");
            let gram_inv = checked_inverse(DMatrix::identity(m2, m2) * REG_TERM + g * &g_t)?;
            let y = (DMatrix::identity(k, k) - &g_t * gram_inv * g) / REG_TERM;
            let hy = h * &y;
            let hyht = &hy * &h_t;

            let mid1 = checked_inverse(DMatrix::identity(m1, m1) * c1 + &hyht)?;
            let s1 = &y - &y * &h_t * mid1 * &hy;
            let u1 = -(s1 * (&g_t * &e2));

            let mid2 = checked_inverse(DMatrix::identity(m1, m1) / c2 + &hyht)?;
            let s2 = &y - &y * &h_t * mid2 * &hy;
            let u2 = (s2 * (&h_t * &e1)) * c2;

            Ok((u1, u2))
        } else {
            debug!("LSTSVM SMW pivot on H (|A| = {m1} >= |B| = {m2})");
            let gram_inv = checked_inverse(DMatrix::identity(m1, m1) * REG_TERM + h * &h_t)?;
            let z = (DMatrix::identity(k, k) - &h_t * gram_inv * h) / REG_TERM;
            let gz = g * &z;
            let gzgt = &gz * &g_t;

            let mid1 = checked_inverse(DMatrix::identity(m2, m2) / c1 + &gzgt)?;
            let s1 = &z - &z * &g_t * mid1 * &gz;
            let u1 = (s1 * (&g_t * &e2)) * c1;

            let mid2 = checked_inverse(DMatrix::identity(m2, m2) * c2 + &gzgt)?;
            let s2 = &z - &z * &g_t * mid2 * &gz;
            let u2 = s2 * (&h_t * &e1);

            Ok((u1, u2))
        }
    }
}

impl TwinEstimator for LeastSquaresTwinSvm {
    fn fit(&mut self, x: &DMatrix<f64>, y: &[f64]) -> Result<()> {
        // A failed fit must not leave a stale model behind
        self.planes = None;

        self.config.validate()?;

        let (mat_a, mat_b) = partition_classes(x, y)?;
        let (h, g, basis_t) = build_design_matrices(&self.config, &mat_a, &mat_b)?;

        let (u1, u2) = match self.config.kernel {
            Kernel::Linear => self.fit_linear(&h, &g)?,
            Kernel::Rbf { .. } => self.fit_rbf(&h, &g)?,
        };

        let (w1, b1) = split_hyperplane(u1);
        let (w2, b2) = split_hyperplane(u2);

        self.planes = Some(FittedPlanes {
            w1,
            b1,
            w2,
            b2,
            basis_t,
            n_features: x.ncols(),
        });
        Ok(())
    }

    fn decision_function(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let planes = self.planes.as_ref().ok_or(TsvmError::ModelNotTrained)?;
        planes.decision_function(x, &self.config.kernel)
    }

    fn hyperparameter_names(&self) -> Vec<&'static str> {
        self.config.hyperparameter_names()
    }
}
