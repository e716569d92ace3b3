//! Core type definitions for TSVM

use crate::core::error::{Result, TsvmError};
use crate::kernel::Kernel;
use serde::{Deserialize, Serialize};

/// Configuration shared by both TSVM estimators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Kernel function applied to the training samples
    pub kernel: Kernel,
    /// Fraction of training samples used as the RBF kernel basis
    /// (rectangular kernel), in (0, 1]
    pub rect_kernel: f64,
    /// Penalty parameter of the first optimization problem
    pub c1: f64,
    /// Penalty parameter of the second optimization problem
    pub c2: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            kernel: Kernel::Linear,
            rect_kernel: 1.0,
            c1: 1.0,
            c2: 1.0,
        }
    }
}

impl EstimatorConfig {
    /// Check that all hyperparameters are in their valid ranges
    pub fn validate(&self) -> Result<()> {
        self.kernel.validate()?;
        if self.c1 <= 0.0 {
            return Err(TsvmError::InvalidParameter(format!(
                "C1 must be positive, got: {}",
                self.c1
            )));
        }
        if self.c2 <= 0.0 {
            return Err(TsvmError::InvalidParameter(format!(
                "C2 must be positive, got: {}",
                self.c2
            )));
        }
        if self.rect_kernel <= 0.0 || self.rect_kernel > 1.0 {
            return Err(TsvmError::InvalidParameter(format!(
                "rect_kernel must be in (0, 1], got: {}",
                self.rect_kernel
            )));
        }
        Ok(())
    }

    /// Names of the tunable hyperparameters, for external search drivers.
    /// Gamma only counts as tunable when the kernel is RBF.
    pub fn hyperparameter_names(&self) -> Vec<&'static str> {
        match self.kernel {
            Kernel::Linear => vec!["C1", "C2"],
            Kernel::Rbf { .. } => vec!["C1", "C2", "gamma"],
        }
    }
}

/// Configuration for the ClipDCD solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Convergence tolerance on the largest coordinate change per sweep
    pub tolerance: f64,
    /// Maximum number of full coordinate sweeps
    pub max_sweeps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_sweeps: 5000,
        }
    }
}

/// Outcome of one ClipDCD run, kept on the fitted estimator so callers can
/// observe non-convergence without failing the fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverStatus {
    /// Number of full sweeps performed
    pub sweeps: usize,
    /// Whether the tolerance was reached before the sweep cap
    pub converged: bool,
}
