//! # Gaussian Discriminant
//!
//! A regularized class-conditional Gaussian classifier. Each class is
//! modeled by the mean and covariance of its training samples; covariances
//! are eigendecomposed once and their spectra floored at a tunable tau, so
//! rank-deficient classes still yield finite decision operators and scoring
//! a query never inverts a matrix.
//!
//! ## Quick Start
//!
//! ```rust
//! use gaussian_discriminant::{
//!     synthetic, BlobConfig, GaussianDiscriminant, ModelConfig,
//! };
//!
//! // Two well-separated classes
//! let centers = vec![vec![0.0, 0.0], vec![8.0, 8.0]];
//! let dataset = synthetic::gaussian_blobs(&centers, &BlobConfig::default()).unwrap();
//!
//! // Train and classify
//! let mut model = GaussianDiscriminant::new(ModelConfig::default());
//! let summary = model.fit(&dataset).unwrap();
//! println!("Trained {} classes in {} ms", summary.num_classes, summary.elapsed_ms);
//!
//! let query = ndarray::array![7.9, 8.2];
//! let (label, confidence) = model.predict_with_confidence(query.view()).unwrap();
//! println!("Predicted class {} with confidence {:.3}", label, confidence);
//! ```
//!
//! ## Core Modules
//!
//! - [`config`] - Model configuration via TOML
//! - [`data`] - Labeled datasets and synthetic blob generation
//! - [`stats`] - Per-class sufficient statistics
//! - [`spectral`] - Eigendecomposition, flooring, and whitening operators
//! - [`model`] - Training, classification, and tau retuning
//! - [`checkpoint`] - Versioned binary persistence
//! - [`metrics`] - Accuracy and confusion matrices
//! - [`logging`] - JSON line-delimited logging

pub mod checkpoint;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod spectral;
pub mod stats;

pub use checkpoint::{
    can_read_file, can_write_file, CheckpointError, Checkpointable, ModelSnapshot,
    DEFAULT_MODEL_NAME,
};
pub use config::{ConfigError, ModelConfig};
pub use data::synthetic::{self, BlobConfig};
pub use data::LabeledDataset;
pub use error::{ModelError, ModelResult};
pub use metrics::{accuracy, ConfusionMatrix};
pub use model::{ClassModel, GaussianDiscriminant, TrainingSummary};
pub use spectral::{DecisionOperator, SpectralDecomposition};
pub use stats::{accumulate_classes, ClassStatistics};
