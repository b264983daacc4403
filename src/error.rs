//! Error types for model training and classification
//!
//! All fallible operations in the crate return `ModelResult` instead of
//! panicking, so callers can distinguish recoverable per-class conditions
//! from hard contract violations.

use std::fmt;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error type for training, prediction, and parameter updates
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Feature dimension mismatch between input and model
    DimensionMismatch {
        expected: usize,
        got: usize,
        context: String,
    },

    /// A class has fewer samples than a full-rank covariance requires
    InsufficientSamples {
        label: i32,
        count: usize,
        required: usize,
    },

    /// The same class label was supplied more than once
    DuplicateLabel { label: i32 },

    /// Training set contains no samples
    EmptyDataset { context: String },

    /// Model has not been trained yet
    NotTrained { operation: String },

    /// Regularization floor is outside its valid range
    InvalidTau { value: f64, reason: String },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::DimensionMismatch {
                expected,
                got,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch in {}: expected {} features, got {}",
                    context, expected, got
                )
            }
            ModelError::InsufficientSamples {
                label,
                count,
                required,
            } => {
                write!(
                    f,
                    "Insufficient samples for class {}: {} observed, {} required for a full-rank covariance",
                    label, count, required
                )
            }
            ModelError::DuplicateLabel { label } => {
                write!(
                    f,
                    "Duplicate class label {}: every class must appear exactly once",
                    label
                )
            }
            ModelError::EmptyDataset { context } => {
                write!(f, "Empty dataset: {}", context)
            }
            ModelError::NotTrained { operation } => {
                write!(
                    f,
                    "Model not trained: operation '{}' requires a trained model. Call fit() or load a checkpoint first.",
                    operation
                )
            }
            ModelError::InvalidTau { value, reason } => {
                write!(
                    f,
                    "Invalid regularization floor tau = {}: {}",
                    value, reason
                )
            }
        }
    }
}

impl std::error::Error for ModelError {}

// Convenience constructors for common error patterns
impl ModelError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, got: usize, context: impl Into<String>) -> Self {
        ModelError::DimensionMismatch {
            expected,
            got,
            context: context.into(),
        }
    }

    /// Create an insufficient samples error
    pub fn insufficient_samples(label: i32, count: usize, required: usize) -> Self {
        ModelError::InsufficientSamples {
            label,
            count,
            required,
        }
    }

    /// Create a duplicate label error
    pub fn duplicate_label(label: i32) -> Self {
        ModelError::DuplicateLabel { label }
    }

    /// Create an empty dataset error
    pub fn empty_dataset(context: impl Into<String>) -> Self {
        ModelError::EmptyDataset {
            context: context.into(),
        }
    }

    /// Create a model not trained error
    pub fn not_trained(operation: impl Into<String>) -> Self {
        ModelError::NotTrained {
            operation: operation.into(),
        }
    }

    /// Create an invalid tau error
    pub fn invalid_tau(value: f64, reason: impl Into<String>) -> Self {
        ModelError::InvalidTau {
            value,
            reason: reason.into(),
        }
    }
}
