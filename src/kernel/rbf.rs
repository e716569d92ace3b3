//! RBF (Radial Basis Function) kernel evaluation
//!
//! The kernel used here is the reparameterized Gaussian
//! K(x, v) = exp(-2γ) * exp(2γ * x^T v), which drops the ||x||² and ||v||²
//! self-terms of the canonical exp(-γ * ||x - v||²) form. The two agree only
//! for unit-norm inputs, so callers are expected to bring their features onto
//! a comparable scale beforehand. The formula is kept as-is deliberately:
//! the fitted hyperplane geometry depends on it.

use nalgebra::{DMatrix, RowDVector};

/// Kernel-transform a whole sample matrix against a basis
///
/// `x` is n x d, `basis_t` is d x m (basis vectors already transposed).
/// Entry (i, j) is K(x_i, basis_j). Both factors are folded into a single
/// exponent, 2γ * (x_i^T basis_j - 1), so a gamma large enough to underflow
/// exp(-2γ) yields a clean 0.0 instead of 0 * inf = NaN.
pub fn projection(x: &DMatrix<f64>, basis_t: &DMatrix<f64>, gamma: f64) -> DMatrix<f64> {
    (x * basis_t).map(|dot| (2.0 * gamma * (dot - 1.0)).exp())
}

/// Kernel-transform a single sample row against a basis
///
/// Same contract as [`projection`] for a 1 x d row; returns a 1 x m row.
/// Used at prediction time, one test sample at a time.
pub fn project_row(row: &RowDVector<f64>, basis_t: &DMatrix<f64>, gamma: f64) -> RowDVector<f64> {
    (row * basis_t).map(|dot| (2.0 * gamma * (dot - 1.0)).exp())
}
