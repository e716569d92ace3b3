//! Rust implementation of Twin Support Vector Machines (TSVM)
//!
//! Based on "Twin Support Vector Machines for Pattern Classification"
//! by Jayadeva, Khemchandani and Chandra, and the least-squares variant
//! by Kumar and Gopal.

pub mod core;
pub mod estimator;
pub mod kernel;
pub mod persistence;
pub mod solver;

// Re-export main types for convenience
pub use crate::core::error::{Result, TsvmError};
pub use crate::core::traits::TwinEstimator;
pub use crate::core::types::{EstimatorConfig, SolverConfig, SolverStatus};
pub use crate::estimator::{LeastSquaresTwinSvm, TwinSvm};
pub use crate::kernel::Kernel;
pub use crate::solver::{ClipDcd, ClipDcdResult};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
