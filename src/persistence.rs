//! Model serialization and persistence
//!
//! Saves and loads fitted TSVM models as JSON so a model trained in one
//! process can predict in another without refitting.

use crate::core::{EstimatorConfig, Result, TsvmError};
use crate::estimator::{FittedPlanes, LeastSquaresTwinSvm, TwinSvm};
use crate::kernel::Kernel;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a fitted TSVM-based model
#[derive(Serialize, Deserialize)]
pub struct SerializableModel {
    /// Estimator identifier: "TSVM" or "LSTSVM"
    pub estimator: String,
    /// Configuration the model was fitted with
    pub config: EstimatorConfig,
    /// Weight vector of class +1's hyperplane
    pub w1: Vec<f64>,
    /// Bias of class +1's hyperplane
    pub b1: f64,
    /// Weight vector of class -1's hyperplane
    pub w2: Vec<f64>,
    /// Bias of class -1's hyperplane
    pub b2: f64,
    /// Kernel basis as rows of length `n_features`, present for RBF models
    pub basis: Option<Vec<Vec<f64>>>,
    /// Raw feature dimensionality seen at fit time
    pub n_features: usize,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Creation timestamp
    pub created_at: String,
}

const ESTIMATOR_TSVM: &str = "TSVM";
const ESTIMATOR_LSTSVM: &str = "LSTSVM";

fn planes_to_parts(planes: &FittedPlanes) -> (Vec<f64>, f64, Vec<f64>, f64, Option<Vec<Vec<f64>>>) {
    // Basis columns are samples; serialize them back as rows
    let basis = planes.basis_t.as_ref().map(|basis_t| {
        (0..basis_t.ncols())
            .map(|j| basis_t.column(j).iter().copied().collect())
            .collect()
    });
    (
        planes.w1.iter().copied().collect(),
        planes.b1,
        planes.w2.iter().copied().collect(),
        planes.b2,
        basis,
    )
}

impl SerializableModel {
    /// Create a serializable model from a fitted standard TSVM
    pub fn from_twin_svm(model: &TwinSvm) -> Result<Self> {
        let planes = model.planes().ok_or(TsvmError::ModelNotTrained)?;
        Ok(Self::from_parts(ESTIMATOR_TSVM, *model.config(), planes))
    }

    /// Create a serializable model from a fitted LSTSVM
    pub fn from_lstsvm(model: &LeastSquaresTwinSvm) -> Result<Self> {
        let planes = model.planes().ok_or(TsvmError::ModelNotTrained)?;
        Ok(Self::from_parts(ESTIMATOR_LSTSVM, *model.config(), planes))
    }

    fn from_parts(estimator: &str, config: EstimatorConfig, planes: &FittedPlanes) -> Self {
        let (w1, b1, w2, b2, basis) = planes_to_parts(planes);
        Self {
            estimator: estimator.to_string(),
            config,
            w1,
            b1,
            w2,
            b2,
            basis,
            n_features: planes.n_features,
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(TsvmError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| TsvmError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(TsvmError::IoError)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| TsvmError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Rebuild the fitted hyperplane state
    pub fn to_planes(&self) -> Result<FittedPlanes> {
        let basis_t = match (&self.basis, &self.config.kernel) {
            (Some(rows), Kernel::Rbf { .. }) => {
                if rows.iter().any(|r| r.len() != self.n_features) {
                    return Err(TsvmError::SerializationError(
                        "kernel basis rows do not match n_features".to_string(),
                    ));
                }
                let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
                // rows.len() x d, transposed into the stored d x m layout
                Some(DMatrix::from_row_slice(rows.len(), self.n_features, &flat).transpose())
            }
            (None, Kernel::Linear) => None,
            _ => {
                return Err(TsvmError::SerializationError(
                    "kernel basis presence does not match kernel type".to_string(),
                ))
            }
        };

        Ok(FittedPlanes {
            w1: DVector::from_vec(self.w1.clone()),
            b1: self.b1,
            w2: DVector::from_vec(self.w2.clone()),
            b2: self.b2,
            basis_t,
            n_features: self.n_features,
        })
    }

    /// Convert back to a ready-to-predict standard TSVM
    pub fn to_twin_svm(&self) -> Result<TwinSvm> {
        if self.estimator != ESTIMATOR_TSVM {
            return Err(TsvmError::InvalidParameter(format!(
                "expected a {ESTIMATOR_TSVM} model, found: {}",
                self.estimator
            )));
        }
        Ok(TwinSvm::from_fitted(self.config, self.to_planes()?))
    }

    /// Convert back to a ready-to-predict LSTSVM
    pub fn to_lstsvm(&self) -> Result<LeastSquaresTwinSvm> {
        if self.estimator != ESTIMATOR_LSTSVM {
            return Err(TsvmError::InvalidParameter(format!(
                "expected a {ESTIMATOR_LSTSVM} model, found: {}",
                self.estimator
            )));
        }
        Ok(LeastSquaresTwinSvm::from_fitted(
            self.config,
            self.to_planes()?,
        ))
    }
}
