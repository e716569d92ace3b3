//! Clipped dual coordinate descent (ClipDCD) solver
//!
//! Solves the box-constrained quadratic program
//!
//! ```text
//! max_{alpha in [0, C]^n}  e^T alpha - 1/2 alpha^T Q alpha
//! ```
//!
//! which is the Wolfe dual of each TSVM hyperplane problem. Coordinates are
//! visited cyclically in ascending index order, so the result is fully
//! determined by (Q, C) and the solver configuration.

use crate::core::{Result, SolverConfig, SolverStatus, TsvmError};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

/// Diagonal entries at or below this magnitude are treated as numerically
/// zero and their coordinates skipped.
const DIAGONAL_FLOOR: f64 = 1e-12;

/// Solution of one dual problem
#[derive(Debug, Clone)]
pub struct ClipDcdResult {
    /// Lagrange multipliers, one per dual-problem row, each in [0, C]
    pub alpha: DVector<f64>,
    /// Solver outcome (sweep count, convergence flag)
    pub status: SolverStatus,
}

/// ClipDCD solver for the TSVM dual problems
///
/// Stateless apart from its configuration; every `optimize` call is
/// independently reproducible given its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipDcd {
    config: SolverConfig,
}

impl ClipDcd {
    /// Create a solver with the given configuration
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Get the solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve the dual problem for the given matrix Q and penalty C
    ///
    /// Q must be square, symmetric and positive semi-definite; symmetry and
    /// definiteness are caller preconditions and not checked (a non-PSD Q
    /// may simply fail to converge). Returns the multipliers best-effort
    /// even when the sweep cap is hit; non-convergence is reported through
    /// the status flag and a warning, not an error.
    pub fn optimize(&self, q: &DMatrix<f64>, c: f64) -> Result<ClipDcdResult> {
        if q.nrows() != q.ncols() {
            return Err(TsvmError::DimensionMismatch {
                expected: q.nrows(),
                actual: q.ncols(),
            });
        }
        if c <= 0.0 {
            return Err(TsvmError::InvalidParameter(format!(
                "C must be positive, got: {c}"
            )));
        }

        let n = q.nrows();
        if n == 0 {
            return Ok(ClipDcdResult {
                alpha: DVector::zeros(0),
                status: SolverStatus {
                    sweeps: 0,
                    converged: true,
                },
            });
        }

        let mut alpha = DVector::<f64>::zeros(n);
        let mut sweeps = 0;
        let mut converged = false;

        while sweeps < self.config.max_sweeps {
            let mut max_change: f64 = 0.0;
            let mut active = 0;

            for i in 0..n {
                let q_ii = q[(i, i)];
                if q_ii.abs() <= DIAGONAL_FLOOR {
                    continue;
                }
                active += 1;

                // Unconstrained optimum along coordinate i, then clip into
                // the box [0, C]
                let gradient = 1.0 - q.row(i).transpose().dot(&alpha);
                let updated = (alpha[i] + gradient / q_ii).clamp(0.0, c);

                max_change = max_change.max((updated - alpha[i]).abs());
                alpha[i] = updated;
            }

            if active == 0 {
                return Err(TsvmError::NumericalInstability(
                    "all diagonal entries of the dual matrix are zero".to_string(),
                ));
            }

            sweeps += 1;

            if max_change < self.config.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            debug!("ClipDCD converged after {sweeps} sweeps (n = {n})");
        } else {
            warn!(
                "ClipDCD hit the sweep cap ({}) without reaching tolerance {}; \
                 returning best-effort multipliers",
                self.config.max_sweeps, self.config.tolerance
            );
        }

        Ok(ClipDcdResult {
            alpha,
            status: SolverStatus { sweeps, converged },
        })
    }
}
