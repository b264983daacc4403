//! Spectral regularization of class covariances
//!
//! Each class covariance is eigendecomposed once; the decomposition is
//! independent of the regularization floor, so retuning tau only rebuilds
//! the derived whitening operator and decision bias. Scoring a query is a
//! matrix-vector product per class, never a matrix inversion.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Eigendecomposition of a symmetric covariance matrix.
///
/// Eigenvalues are sorted in descending order and each **row** of
/// `eigenvectors` is the unit eigenvector paired with the eigenvalue at
/// the same position, so `Qᵀ · diag(λ) · Q` reconstructs the covariance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralDecomposition {
    /// Eigenvalues, descending
    pub eigenvalues: Array1<f64>,
    /// Row-major eigenvector matrix; row i pairs with eigenvalues[i]
    pub eigenvectors: Array2<f64>,
}

impl SpectralDecomposition {
    /// Decompose a symmetric covariance matrix.
    ///
    /// Works for any memory layout of the input, including transposed or
    /// reversed views copied into an owned array.
    pub fn compute(covariance: &Array2<f64>) -> Self {
        let dim = covariance.nrows();
        let eigen = SymmetricEigen::new(DMatrix::from_fn(dim, dim, |row, col| {
            covariance[[row, col]]
        }));

        // nalgebra returns eigenpairs unsorted with eigenvectors as
        // columns; reorder descending and store eigenvectors as rows.
        let mut order: Vec<usize> = (0..dim).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[b]
                .partial_cmp(&eigen.eigenvalues[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut eigenvalues = Array1::zeros(dim);
        let mut eigenvectors = Array2::zeros((dim, dim));
        for (row, &src) in order.iter().enumerate() {
            eigenvalues[row] = eigen.eigenvalues[src];
            for col in 0..dim {
                eigenvectors[[row, col]] = eigen.eigenvectors[(col, src)];
            }
        }

        Self {
            eigenvalues,
            eigenvectors,
        }
    }

    /// Feature dimension.
    pub fn dim(&self) -> usize {
        self.eigenvalues.len()
    }

    /// Spectrum with every eigenvalue raised to at least `tau`.
    pub fn floored(&self, tau: f64) -> Array1<f64> {
        self.eigenvalues.mapv(|lambda| lambda.max(tau))
    }

    /// Rebuild `Qᵀ · diag(λ) · Q` from the stored eigenpairs.
    pub fn reconstruct(&self) -> Array2<f64> {
        let mut scaled = self.eigenvectors.clone();
        for (mut row, &lambda) in scaled.rows_mut().into_iter().zip(self.eigenvalues.iter()) {
            row *= lambda;
        }
        self.eigenvectors.t().dot(&scaled)
    }
}

/// Whitening operator and decision bias for one class.
///
/// `whitening` is `diag(λ̃)^{-1/2} · Q` over the floored spectrum λ̃, so
/// the squared norm of `whitening · (x - mean)` is the regularized
/// Mahalanobis distance. `bias` folds the floored log-determinant and
/// the class prior into a single additive constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOperator {
    /// Rows are eigenvectors scaled by the inverse square root of the
    /// floored eigenvalue
    pub whitening: Array2<f64>,
    /// `Σ ln λ̃ - 2 ln prior`
    pub bias: f64,
}

impl DecisionOperator {
    /// Build the operator for one class from its stored decomposition.
    ///
    /// With `tau > 0` the floored spectrum is strictly positive and the
    /// operator is finite even for rank-deficient covariances.
    pub fn build(decomposition: &SpectralDecomposition, tau: f64, prior: f64) -> Self {
        let floored = decomposition.floored(tau);

        let mut whitening = decomposition.eigenvectors.clone();
        for (mut row, &lambda) in whitening.rows_mut().into_iter().zip(floored.iter()) {
            row /= lambda.sqrt();
        }

        let log_det: f64 = floored.iter().map(|lambda| lambda.ln()).sum();
        let bias = log_det - 2.0 * prior.ln();

        Self { whitening, bias }
    }

    /// Decision score for a query already centered on the class mean.
    pub fn score(&self, centered: ArrayView1<'_, f64>) -> f64 {
        let whitened = self.whitening.dot(&centered);
        whitened.iter().map(|v| v * v).sum::<f64>() + self.bias
    }
}
