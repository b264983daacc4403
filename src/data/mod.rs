//! Dataset containers and synthetic data generation
//!
//! Provides the labeled feature-vector container consumed by training,
//! plus a seeded Gaussian-blob generator for tests and demos.

pub mod synthetic;

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{ModelError, ModelResult};

/// A dataset of feature vectors with integer class labels.
///
/// Rows of `features` are samples; `labels[i]` is the class of row `i`.
/// Construction validates that every row has the same width and that the
/// label count matches the row count, so downstream code can rely on the
/// shapes being consistent.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    features: Array2<f64>,
    labels: Vec<i32>,
}

impl LabeledDataset {
    /// Create a dataset from a feature matrix and matching labels.
    pub fn new(features: Array2<f64>, labels: Vec<i32>) -> ModelResult<Self> {
        if labels.len() != features.nrows() {
            return Err(ModelError::dimension_mismatch(
                features.nrows(),
                labels.len(),
                "label count",
            ));
        }

        Ok(Self { features, labels })
    }

    /// Create a dataset from individual sample rows.
    ///
    /// Fails if the rows are ragged or the label count does not match.
    pub fn from_rows(rows: &[Vec<f64>], labels: &[i32]) -> ModelResult<Self> {
        if rows.len() != labels.len() {
            return Err(ModelError::dimension_mismatch(
                rows.len(),
                labels.len(),
                "label count",
            ));
        }

        let dim = rows.first().map(Vec::len).unwrap_or(0);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(ModelError::dimension_mismatch(
                    dim,
                    row.len(),
                    format!("sample row {}", i),
                ));
            }
        }

        let mut features = Array2::zeros((rows.len(), dim));
        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                features[[i, j]] = *value;
            }
        }

        Ok(Self {
            features,
            labels: labels.to_vec(),
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    /// Check if the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.features.nrows() == 0
    }

    /// Feature dimension.
    pub fn dim(&self) -> usize {
        self.features.ncols()
    }

    /// Full feature matrix, one sample per row.
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Class labels, aligned with feature rows.
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// View of a single sample with its label.
    pub fn sample(&self, idx: usize) -> (ArrayView1<'_, f64>, i32) {
        (self.features.row(idx), self.labels[idx])
    }

    /// Split into train and validation sets.
    ///
    /// # Arguments
    /// * `train_ratio` - Fraction of data to use for training (e.g., 0.8)
    ///
    /// # Returns
    /// Tuple of (train_dataset, val_dataset)
    pub fn split(self, train_ratio: f64) -> (Self, Self) {
        let split_idx = (self.len() as f64 * train_ratio) as usize;
        let (train_feat, val_feat) = self.features.view().split_at(Axis(0), split_idx);
        let (train_labels, val_labels) = self.labels.split_at(split_idx);

        (
            Self {
                features: train_feat.to_owned(),
                labels: train_labels.to_vec(),
            },
            Self {
                features: val_feat.to_owned(),
                labels: val_labels.to_vec(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_validates_label_count() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let result = LabeledDataset::new(features, vec![0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let result = LabeledDataset::from_rows(&rows, &[0, 1]);
        assert!(matches!(
            result,
            Err(ModelError::DimensionMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_from_rows_builds_matrix() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let dataset = LabeledDataset::from_rows(&rows, &[0, 1, 0]).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.dim(), 2);
        assert_eq!(dataset.labels(), &[0, 1, 0]);

        let (row, label) = dataset.sample(1);
        assert_eq!(row.to_vec(), vec![3.0, 4.0]);
        assert_eq!(label, 1);
    }

    #[test]
    fn test_split_preserves_alignment() {
        let rows = vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![2.0, 2.0],
            vec![3.0, 3.0],
            vec![4.0, 4.0],
        ];
        let dataset = LabeledDataset::from_rows(&rows, &[0, 1, 2, 3, 4]).unwrap();

        let (train, val) = dataset.split(0.8);
        assert_eq!(train.len(), 4);
        assert_eq!(val.len(), 1);
        assert_eq!(val.labels(), &[4]);
        assert_eq!(val.sample(0).0.to_vec(), vec![4.0, 4.0]);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = LabeledDataset::from_rows(&[], &[]).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.dim(), 0);
    }
}
