//! Per-class sample statistics
//!
//! Computes the sufficient statistics of the class-conditional Gaussians:
//! sample count, mean vector, and unbiased covariance matrix for each
//! class present in a dataset. These are the only quantities persisted by
//! checkpoints; everything else the model holds is derived from them.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::LabeledDataset;
use crate::error::{ModelError, ModelResult};

/// Sufficient statistics for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStatistics {
    /// Class label these statistics describe
    pub label: i32,
    /// Number of samples observed for the class
    pub count: usize,
    /// Sample mean vector
    pub mean: Array1<f64>,
    /// Unbiased sample covariance matrix (divisor n - 1)
    pub covariance: Array2<f64>,
}

impl ClassStatistics {
    /// Compute statistics from the samples of a single class.
    ///
    /// A single sample yields the zero covariance matrix; the covariance
    /// divisor is `n - 1` otherwise. The result is exactly symmetric by
    /// construction.
    pub fn from_samples(label: i32, samples: ArrayView2<'_, f64>) -> ModelResult<Self> {
        let n = samples.nrows();
        if n == 0 {
            return Err(ModelError::empty_dataset(format!(
                "class {} has no samples",
                label
            )));
        }
        let dim = samples.ncols();

        let mut mean = Array1::<f64>::zeros(dim);
        for row in samples.rows() {
            mean += &row;
        }
        mean /= n as f64;

        let mut covariance = Array2::<f64>::zeros((dim, dim));
        if n > 1 {
            for row in samples.rows() {
                for j in 0..dim {
                    let dj = row[j] - mean[j];
                    for k in j..dim {
                        covariance[[j, k]] += dj * (row[k] - mean[k]);
                    }
                }
            }
            let scale = 1.0 / (n as f64 - 1.0);
            for j in 0..dim {
                for k in j..dim {
                    let value = covariance[[j, k]] * scale;
                    covariance[[j, k]] = value;
                    covariance[[k, j]] = value;
                }
            }
        }

        Ok(Self {
            label,
            count: n,
            mean,
            covariance,
        })
    }

    /// Feature dimension.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Check whether the class has enough samples for a full-rank
    /// covariance estimate (`count >= dim + 1`).
    ///
    /// Failing this check is recoverable: the spectral floor still yields
    /// a usable decision operator, so training treats it as a warning
    /// rather than an abort.
    pub fn check_support(&self) -> ModelResult<()> {
        let required = self.dim() + 1;
        if self.count < required {
            return Err(ModelError::insufficient_samples(
                self.label,
                self.count,
                required,
            ));
        }
        Ok(())
    }
}

/// Partition a dataset by label and compute statistics for every class.
///
/// Classes are discovered as the sorted unique labels, so the returned
/// vector is ordered by ascending label and its positions double as the
/// dense class indices used throughout the model.
pub fn accumulate_classes(
    dataset: &LabeledDataset,
    parallel: bool,
) -> ModelResult<Vec<ClassStatistics>> {
    if dataset.is_empty() {
        return Err(ModelError::empty_dataset("statistics accumulation"));
    }

    let mut classes: Vec<i32> = dataset.labels().to_vec();
    classes.sort_unstable();
    classes.dedup();

    let groups: Vec<(i32, Vec<usize>)> = classes
        .into_iter()
        .map(|label| {
            let indices: Vec<usize> = dataset
                .labels()
                .iter()
                .enumerate()
                .filter(|(_, &l)| l == label)
                .map(|(i, _)| i)
                .collect();
            (label, indices)
        })
        .collect();

    let compute = |(label, indices): &(i32, Vec<usize>)| {
        let rows = dataset.features().select(Axis(0), indices);
        ClassStatistics::from_samples(*label, rows.view())
    };

    if parallel {
        groups.par_iter().map(compute).collect()
    } else {
        groups.iter().map(compute).collect()
    }
}
