//! Standard Twin Support Vector Machine estimator

use crate::core::{EstimatorConfig, Result, SolverConfig, SolverStatus, TsvmError, TwinEstimator};
use crate::estimator::base::{
    build_design_matrices, partition_classes, regularized_inverse, split_hyperplane, FittedPlanes,
};
use crate::kernel::Kernel;
use crate::solver::ClipDcd;
use log::debug;
use nalgebra::{DMatrix, DVector};

/// Standard Twin Support Vector Machine for binary classification
///
/// Fits two non-parallel hyperplanes by solving a pair of Wolfe dual
/// quadratic programs with the [`ClipDcd`] solver and recovering the primal
/// hyperplane parameters from the Lagrange multipliers.
///
/// # Example
///
/// ```rust
/// use nalgebra::DMatrix;
/// use twinsvm::{TwinEstimator, TwinSvm};
///
/// let x = DMatrix::from_row_slice(4, 2, &[2.0, 2.0, 2.0, 3.0, -2.0, -2.0, -2.0, -3.0]);
/// let y = [1.0, 1.0, -1.0, -1.0];
///
/// let mut model = TwinSvm::new();
/// model.fit(&x, &y).unwrap();
/// assert_eq!(model.predict(&x).unwrap(), y);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TwinSvm {
    config: EstimatorConfig,
    solver: ClipDcd,
    planes: Option<FittedPlanes>,
    solver_status: Option<[SolverStatus; 2]>,
}

impl TwinSvm {
    /// Create an estimator with default configuration (linear kernel,
    /// C1 = C2 = 1)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator with the given configuration
    pub fn with_config(config: EstimatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
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

    /// Set the penalty parameter of the first problem
    pub fn with_c1(mut self, c1: f64) -> Self {
        self.config.c1 = c1;
        self
    }

    /// Set the penalty parameter of the second problem
    pub fn with_c2(mut self, c2: f64) -> Self {
        self.config.c2 = c2;
        self
    }

    /// Replace the solver configuration
    pub fn with_solver_config(mut self, solver_config: SolverConfig) -> Self {
        self.solver = ClipDcd::new(solver_config);
        self
    }

    /// Rebuild an already-fitted estimator; used when loading a persisted
    /// model
    pub(crate) fn from_fitted(config: EstimatorConfig, planes: FittedPlanes) -> Self {
        Self {
            config,
            planes: Some(planes),
            ..Self::default()
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

    /// Solver outcomes of the two dual problems from the last fit
    ///
    /// A `converged: false` entry means the corresponding hyperplane was
    /// recovered from best-effort multipliers: geometrically valid, possibly
    /// suboptimal.
    pub fn solver_status(&self) -> Option<&[SolverStatus; 2]> {
        self.solver_status.as_ref()
    }
}

impl TwinEstimator for TwinSvm {
    fn fit(&mut self, x: &DMatrix<f64>, y: &[f64]) -> Result<()> {
        // A failed fit must not leave a stale model behind
        self.planes = None;
        self.solver_status = None;

        self.config.validate()?;

        let (mat_a, mat_b) = partition_classes(x, y)?;
        let (h, g, basis_t) = build_design_matrices(&self.config, &mat_a, &mat_b)?;

        let h_t = h.transpose();
        let g_t = g.transpose();

        let hth_inv = regularized_inverse(&h_t * &h)?;
        let gtg_inv = regularized_inverse(&g_t * &g)?;

        // Wolfe dual matrices of the two problems
        let dual1 = &g * &hth_inv * &g_t;
        let dual2 = &h * &gtg_inv * &h_t;

        let sol1 = self.solver.optimize(&dual1, self.config.c1)?;
        let sol2 = self.solver.optimize(&dual2, self.config.c2)?;
        debug!(
            "TSVM duals solved: problem 1 in {} sweeps, problem 2 in {} sweeps",
            sol1.status.sweeps, sol2.status.sweeps
        );

        // Recover primal hyperplane parameters from the multipliers
        let u1: DVector<f64> = -(&hth_inv * &g_t * &sol1.alpha);
        let u2: DVector<f64> = &gtg_inv * &h_t * &sol2.alpha;

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
        self.solver_status = Some([sol1.status, sol2.status]);
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
