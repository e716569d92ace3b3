//! Core traits for TSVM implementation

use crate::core::error::Result;
use nalgebra::DMatrix;

/// Common interface of the TSVM-based estimators
///
/// Both classifiers fit two non-parallel hyperplanes, one kept close to each
/// class. Prediction assigns a sample to the class whose hyperplane is
/// nearest, which is why `predict` can be provided on top of
/// `decision_function`.
pub trait TwinEstimator {
    /// Fit the estimator to training data
    ///
    /// `x` is the n x d sample matrix; `y` holds one label per row, each
    /// exactly +1.0 or -1.0. Fitting replaces any previously fitted state.
    fn fit(&mut self, x: &DMatrix<f64>, y: &[f64]) -> Result<()>;

    /// Distance of every sample in `x` from both hyperplanes
    ///
    /// Returns an n x 2 matrix: column 0 is the unsigned distance from the
    /// class -1 hyperplane (w2, b2), column 1 from the class +1 hyperplane
    /// (w1, b1).
    fn decision_function(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>>;

    /// Predict class labels (+1.0 or -1.0) for the samples in `x`
    ///
    /// The closer hyperplane wins: label = 2 * argmin(dist) - 1. On a tie
    /// column 0 wins, so the sample is assigned to class -1.
    fn predict(&self, x: &DMatrix<f64>) -> Result<Vec<f64>> {
        let dist = self.decision_function(x)?;
        Ok((0..dist.nrows())
            .map(|i| if dist[(i, 1)] < dist[(i, 0)] { 1.0 } else { -1.0 })
            .collect())
    }

    /// Names of the hyperparameters of this estimator, for external
    /// grid-search collaborators
    fn hyperparameter_names(&self) -> Vec<&'static str>;
}
