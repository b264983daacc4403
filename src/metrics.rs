//! Evaluation metrics for trained models

use ndarray::Array2;

use crate::data::LabeledDataset;
use crate::error::ModelResult;
use crate::model::GaussianDiscriminant;

/// Fraction of dataset samples the model labels correctly.
///
/// An empty dataset scores 0.0.
pub fn accuracy(model: &GaussianDiscriminant, dataset: &LabeledDataset) -> ModelResult<f64> {
    if dataset.is_empty() {
        return Ok(0.0);
    }

    let predictions = model.predict_batch(dataset.features())?;
    let correct = predictions
        .iter()
        .zip(dataset.labels().iter())
        .filter(|(predicted, truth)| predicted == truth)
        .count();
    Ok(correct as f64 / dataset.len() as f64)
}

/// Confusion counts over a labeled evaluation set.
///
/// Rows are true classes and columns predicted classes, both ordered by
/// the model's ascending labels. Samples whose true label the model never
/// saw in training are skipped.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    labels: Vec<i32>,
    counts: Array2<usize>,
}

impl ConfusionMatrix {
    /// Run the model over a dataset and tally the outcomes.
    pub fn evaluate(
        model: &GaussianDiscriminant,
        dataset: &LabeledDataset,
    ) -> ModelResult<Self> {
        let labels = model.labels();
        let n = labels.len();
        let mut counts = Array2::zeros((n, n));

        if !dataset.is_empty() {
            let predictions = model.predict_batch(dataset.features())?;
            for (&truth, &predicted) in dataset.labels().iter().zip(predictions.iter()) {
                if let (Some(t), Some(p)) = (model.index_of(truth), model.index_of(predicted)) {
                    counts[[t, p]] += 1;
                }
            }
        }

        Ok(Self { labels, counts })
    }

    /// Class labels in row/column order.
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Count of samples with the given true label predicted as the given
    /// label. Zero for labels the model does not know.
    pub fn count(&self, true_label: i32, predicted_label: i32) -> usize {
        match (
            self.labels.binary_search(&true_label),
            self.labels.binary_search(&predicted_label),
        ) {
            (Ok(t), Ok(p)) => self.counts[[t, p]],
            _ => 0,
        }
    }

    /// Total number of tallied samples.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of correctly classified samples (the diagonal).
    pub fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[[i, i]]).sum()
    }

    /// Accuracy over the tallied samples, 0.0 when nothing was tallied.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.correct() as f64 / total as f64
    }
}
