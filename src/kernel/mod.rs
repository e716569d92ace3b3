//! Kernel functions for TSVM

pub mod rbf;

pub use self::rbf::*;

use crate::core::error::{Result, TsvmError};
use serde::{Deserialize, Serialize};

/// Kernel function applied to training and test samples
///
/// Matched explicitly at fit and predict time; the gamma parameter only
/// exists for the RBF variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Kernel {
    /// Identity transform: samples are used as raw feature vectors
    Linear,
    /// Gaussian (RBF) kernel against a stored basis, see [`rbf`]
    Rbf { gamma: f64 },
}

impl Kernel {
    /// Create an RBF kernel with the given gamma parameter
    pub fn rbf(gamma: f64) -> Self {
        Self::Rbf { gamma }
    }

    /// Check that the kernel parameters are valid
    pub fn validate(&self) -> Result<()> {
        match *self {
            Kernel::Linear => Ok(()),
            Kernel::Rbf { gamma } if gamma > 0.0 => Ok(()),
            Kernel::Rbf { gamma } => Err(TsvmError::InvalidParameter(format!(
                "gamma must be positive, got: {gamma}"
            ))),
        }
    }

    /// Kernel name as used in serialized models
    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Linear => "linear",
            Kernel::Rbf { .. } => "RBF",
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::Linear
    }
}
