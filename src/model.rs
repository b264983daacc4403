//! Regularized Gaussian discriminant model
//!
//! One Gaussian per class: training estimates per-class means and
//! covariances, eigendecomposes each covariance once, and folds the
//! floored log-determinant and class prior into a per-class decision
//! bias. Classification evaluates the regularized Mahalanobis distance
//! through the precomputed whitening operators and picks the minimum,
//! so a query costs a matrix-vector product per class.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;

use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::checkpoint::DEFAULT_MODEL_NAME;
use crate::config::ModelConfig;
use crate::data::LabeledDataset;
use crate::error::{ModelError, ModelResult};
use crate::logging;
use crate::spectral::{DecisionOperator, SpectralDecomposition};
use crate::stats::{accumulate_classes, ClassStatistics};

/// Everything the model holds for one class.
///
/// `statistics` are the persisted sufficient statistics; the
/// decomposition, prior, and operator are derived from them during
/// finalization and rebuilt whole whenever tau changes.
#[derive(Debug, Clone)]
pub struct ClassModel {
    /// Sufficient statistics (label, count, mean, covariance)
    pub statistics: ClassStatistics,
    /// Eigendecomposition of the covariance, independent of tau
    pub decomposition: SpectralDecomposition,
    /// Class prior, count / total
    pub prior: f64,
    /// Whitening operator and decision bias under the current tau
    pub operator: DecisionOperator,
}

/// Summary of one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Number of distinct classes
    pub num_classes: usize,
    /// Feature dimension
    pub dim: usize,
    /// Total number of training samples
    pub total_samples: usize,
    /// Per-class sample counts, ordered by ascending label
    pub class_counts: Vec<(i32, usize)>,
    /// Labels whose covariance estimate is rank-deficient
    pub degenerate_labels: Vec<i32>,
    /// Regularization floor used for the decision operators
    pub tau: f64,
    /// Wall-clock training time in milliseconds
    pub elapsed_ms: u64,
}

/// Class-conditional Gaussian classifier with spectral regularization.
///
/// # Examples
///
/// ```
/// use gaussian_discriminant::{GaussianDiscriminant, LabeledDataset, ModelConfig};
/// use ndarray::array;
///
/// let dataset = LabeledDataset::from_rows(
///     &[
///         vec![0.1, 0.2],
///         vec![0.3, 0.1],
///         vec![9.8, 9.9],
///         vec![10.1, 10.3],
///     ],
///     &[0, 0, 1, 1],
/// )
/// .unwrap();
///
/// let mut model = GaussianDiscriminant::new(ModelConfig::default());
/// model.fit(&dataset).unwrap();
///
/// let query = array![0.2, 0.2];
/// assert_eq!(model.predict(query.view()).unwrap(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct GaussianDiscriminant {
    tau: f64,
    parallel: bool,
    dim: usize,
    classes: Vec<ClassModel>,
    label_to_index: HashMap<i32, usize>,
}

impl GaussianDiscriminant {
    /// Create an untrained model.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            tau: config.tau,
            parallel: config.parallel,
            dim: 0,
            classes: Vec::new(),
            label_to_index: HashMap::new(),
        }
    }

    /// Create an untrained model with an explicit regularization floor.
    pub fn with_tau(tau: f64) -> ModelResult<Self> {
        let mut model = Self::new(ModelConfig::default());
        model.set_tau(tau)?;
        Ok(model)
    }

    /// Train the model on a labeled dataset.
    ///
    /// Replaces any previous state. Classes with fewer than `dim + 1`
    /// samples are flagged in the summary and logged, but still trained:
    /// the regularization floor keeps their decision operators finite.
    pub fn fit(&mut self, dataset: &LabeledDataset) -> ModelResult<TrainingSummary> {
        let start = Instant::now();

        if dataset.is_empty() {
            return Err(ModelError::empty_dataset("training set"));
        }

        let statistics = accumulate_classes(dataset, self.parallel)?;

        let mut degenerate_labels = Vec::new();
        for stats in &statistics {
            if let Err(err) = stats.check_support() {
                warn!(
                    "{}; eigenvalue floor tau = {} keeps the class usable",
                    err, self.tau
                );
                degenerate_labels.push(stats.label);
            }
        }

        let class_counts: Vec<(i32, usize)> =
            statistics.iter().map(|s| (s.label, s.count)).collect();
        let total_samples: usize = statistics.iter().map(|s| s.count).sum();

        let classes = Self::finalize_classes(statistics, self.tau, self.parallel)?;

        self.dim = classes[0].statistics.dim();
        self.label_to_index = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.statistics.label, idx))
            .collect();
        self.classes = classes;

        let summary = TrainingSummary {
            num_classes: self.classes.len(),
            dim: self.dim,
            total_samples,
            class_counts,
            degenerate_labels,
            tau: self.tau,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "trained Gaussian discriminant: {} classes, dim {}, {} samples in {} ms",
            summary.num_classes, summary.dim, summary.total_samples, summary.elapsed_ms
        );
        if let Err(err) = logging::log_training_run(DEFAULT_MODEL_NAME, &summary) {
            warn!("failed to append training log entry: {err}");
        }

        Ok(summary)
    }

    /// Build a trained model from per-class statistics in one finalize
    /// step.
    ///
    /// This is the entry point for statistics accumulated outside of
    /// `fit`: compute a [`ClassStatistics`] per class (for example with
    /// [`ClassStatistics::from_samples`] over externally partitioned
    /// data), collect them, and finalize. Checkpoint loading goes
    /// through the same path. Statistics are sorted by label, every
    /// label must appear exactly once, priors are recomputed from the
    /// counts, and the spectral pass is re-run, so the derived state
    /// always matches the statistics and the given tau.
    pub fn from_class_statistics(
        mut statistics: Vec<ClassStatistics>,
        config: ModelConfig,
    ) -> ModelResult<Self> {
        if statistics.is_empty() {
            return Err(ModelError::empty_dataset("class statistics"));
        }
        statistics.sort_by_key(|s| s.label);
        for pair in statistics.windows(2) {
            if pair[0].label == pair[1].label {
                return Err(ModelError::duplicate_label(pair[0].label));
            }
        }

        let classes = Self::finalize_classes(statistics, config.tau, config.parallel)?;

        let mut model = Self::new(config);
        model.dim = classes[0].statistics.dim();
        model.label_to_index = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.statistics.label, idx))
            .collect();
        model.classes = classes;
        Ok(model)
    }

    fn finalize_classes(
        statistics: Vec<ClassStatistics>,
        tau: f64,
        parallel: bool,
    ) -> ModelResult<Vec<ClassModel>> {
        let dim = statistics[0].dim();
        for stats in &statistics {
            if stats.dim() != dim {
                return Err(ModelError::dimension_mismatch(
                    dim,
                    stats.dim(),
                    format!("class {} statistics", stats.label),
                ));
            }
        }

        // Priors are only meaningful once every class count is known
        let total: usize = statistics.iter().map(|s| s.count).sum();

        let build = |stats: ClassStatistics| {
            let prior = stats.count as f64 / total as f64;
            let decomposition = SpectralDecomposition::compute(&stats.covariance);
            let operator = DecisionOperator::build(&decomposition, tau, prior);
            ClassModel {
                statistics: stats,
                decomposition,
                prior,
                operator,
            }
        };

        if parallel {
            Ok(statistics.into_par_iter().map(build).collect())
        } else {
            Ok(statistics.into_iter().map(build).collect())
        }
    }

    /// Update the regularization floor.
    ///
    /// Eagerly rebuilds every class's whitening operator and decision
    /// bias from the stored decompositions; the raw statistics and
    /// eigenpairs do not depend on the floor, so nothing is
    /// re-decomposed. Callable before training, in which case the floor
    /// applies to the next `fit`.
    pub fn set_tau(&mut self, tau: f64) -> ModelResult<()> {
        if !tau.is_finite() || tau < 0.0 {
            return Err(ModelError::invalid_tau(
                tau,
                "must be finite and non-negative",
            ));
        }
        self.tau = tau;

        if self.classes.is_empty() {
            return Ok(());
        }

        let rebuild = |class: &mut ClassModel| {
            class.operator = DecisionOperator::build(&class.decomposition, tau, class.prior);
        };

        if self.parallel {
            self.classes.par_iter_mut().for_each(rebuild);
        } else {
            self.classes.iter_mut().for_each(rebuild);
        }

        info!(
            "rebuilt decision operators for {} classes with tau = {}",
            self.classes.len(),
            tau
        );
        if let Err(err) = logging::log_tau_update(DEFAULT_MODEL_NAME, tau, self.classes.len()) {
            warn!("failed to append tau update log entry: {err}");
        }
        Ok(())
    }

    /// Decision scores for a query, ordered by ascending label.
    ///
    /// Lower is better; the score of class `c` is the squared whitened
    /// distance to its mean plus the class bias.
    pub fn decision_scores(&self, query: ArrayView1<'_, f64>) -> ModelResult<Vec<f64>> {
        self.ensure_trained("decision_scores")?;
        self.check_query_dim(query.len(), "decision scores query")?;

        Ok(self
            .classes
            .iter()
            .map(|class| {
                let centered = &query - &class.statistics.mean;
                class.operator.score(centered.view())
            })
            .collect())
    }

    /// Predict the class label of a query.
    ///
    /// Ties are broken toward the class with the lowest index, which is
    /// the smallest label since classes are ordered by ascending label.
    pub fn predict(&self, query: ArrayView1<'_, f64>) -> ModelResult<i32> {
        self.ensure_trained("predict")?;
        self.check_query_dim(query.len(), "predict query")?;

        let scores = self.decision_scores(query)?;
        Ok(self.classes[argmin(&scores)].statistics.label)
    }

    /// Predict a label together with a confidence in `[0, 1]`.
    ///
    /// The confidence is the softmax weight of the winning class over
    /// `-score / 2`, i.e. the normalized posterior of the regularized
    /// model; higher means more confident.
    pub fn predict_with_confidence(&self, query: ArrayView1<'_, f64>) -> ModelResult<(i32, f64)> {
        self.ensure_trained("predict_with_confidence")?;
        self.check_query_dim(query.len(), "predict query")?;

        let scores = self.decision_scores(query)?;
        let best = argmin(&scores);

        // Shift by the winning score before exponentiating so the
        // winner's weight is exactly exp(0)
        let reference = scores[best];
        let total: f64 = scores
            .iter()
            .map(|score| (-(score - reference) / 2.0).exp())
            .sum();
        let confidence = 1.0 / total;

        Ok((self.classes[best].statistics.label, confidence))
    }

    /// Predict labels for every row of a query matrix.
    pub fn predict_batch(&self, queries: &Array2<f64>) -> ModelResult<Vec<i32>> {
        self.ensure_trained("predict_batch")?;
        self.check_query_dim(queries.ncols(), "batch query")?;

        if self.parallel {
            (0..queries.nrows())
                .into_par_iter()
                .map(|i| self.predict(queries.row(i)))
                .collect()
        } else {
            (0..queries.nrows()).map(|i| self.predict(queries.row(i))).collect()
        }
    }

    /// Current regularization floor.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Feature dimension, zero before training.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of trained classes.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Whether the model has been trained or loaded.
    pub fn is_trained(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Class labels in ascending order.
    pub fn labels(&self) -> Vec<i32> {
        self.classes.iter().map(|c| c.statistics.label).collect()
    }

    /// Dense index of a label, if the label was seen in training.
    pub fn index_of(&self, label: i32) -> Option<usize> {
        self.label_to_index.get(&label).copied()
    }

    /// Per-class state for a label.
    pub fn class(&self, label: i32) -> Option<&ClassModel> {
        self.index_of(label).map(|idx| &self.classes[idx])
    }

    /// All per-class state, ordered by ascending label.
    pub fn classes(&self) -> &[ClassModel] {
        &self.classes
    }

    /// Class priors, ordered by ascending label.
    pub fn priors(&self) -> Vec<f64> {
        self.classes.iter().map(|c| c.prior).collect()
    }

    fn ensure_trained(&self, operation: &str) -> ModelResult<()> {
        if self.classes.is_empty() {
            return Err(ModelError::not_trained(operation));
        }
        Ok(())
    }

    fn check_query_dim(&self, got: usize, context: &str) -> ModelResult<()> {
        if got != self.dim {
            return Err(ModelError::dimension_mismatch(self.dim, got, context));
        }
        Ok(())
    }
}

impl Default for GaussianDiscriminant {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

/// Index of the smallest score, scanning in order so ties keep the
/// lowest index. `total_cmp` makes the scan deterministic even for
/// pathological floating-point inputs.
fn argmin(scores: &[f64]) -> usize {
    let mut best = 0;
    for (idx, score) in scores.iter().enumerate().skip(1) {
        if score.total_cmp(&scores[best]) == Ordering::Less {
            best = idx;
        }
    }
    best
}
