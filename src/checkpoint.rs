//! Checkpoint trait and model persistence.
//!
//! This module provides a reusable [`Checkpointable`] trait that enforces a
//! deterministic, versioned serialization contract, plus its implementation
//! for the discriminant model. Snapshots persist only the per-class
//! sufficient statistics and tau; eigendecompositions and decision
//! operators are rebuilt on load so the derived state can never disagree
//! with what was stored.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::model::GaussianDiscriminant;
use crate::stats::ClassStatistics;

/// File identification magic, the bytes `GDA1` on disk.
const SNAPSHOT_MAGIC: u32 = u32::from_le_bytes(*b"GDA1");

/// Current snapshot schema version. Bump on any layout change.
const SNAPSHOT_VERSION: u32 = 1;

/// Model name recorded by [`Checkpointable::save_checkpoint`] when the
/// caller does not supply one.
pub const DEFAULT_MODEL_NAME: &str = "gaussian-discriminant";

/// Errors that can occur while saving or loading checkpoints.
#[derive(Debug)]
pub enum CheckpointError {
    /// Underlying I/O failure while reading or writing checkpoint files.
    Io(std::io::Error),
    /// Serialization or deserialization error from the binary codec.
    Serialization(bincode::Error),
    /// The checkpoint file was well formed but produced an incompatible schema version.
    VersionMismatch { expected: u32, found: u32 },
    /// The checkpoint file did not match the expected structure.
    InvalidFormat(String),
    /// Model-level error emitted while rebuilding the decision operators.
    Model(ModelError),
}

impl fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointError::Io(err) => write!(f, "I/O error while accessing checkpoint: {err}"),
            CheckpointError::Serialization(err) => {
                write!(f, "Failed to (de)serialize checkpoint payload: {err}")
            }
            CheckpointError::VersionMismatch { expected, found } => write!(
                f,
                "Checkpoint version mismatch: expected {expected}, found {found}",
            ),
            CheckpointError::InvalidFormat(msg) => {
                write!(f, "Checkpoint file has invalid structure: {msg}")
            }
            CheckpointError::Model(err) => write!(f, "Failed to rebuild model state: {err}"),
        }
    }
}

impl std::error::Error for CheckpointError {}

impl From<std::io::Error> for CheckpointError {
    fn from(err: std::io::Error) -> Self {
        CheckpointError::Io(err)
    }
}

impl From<bincode::Error> for CheckpointError {
    fn from(err: bincode::Error) -> Self {
        CheckpointError::Serialization(err)
    }
}

impl From<ModelError> for CheckpointError {
    fn from(err: ModelError) -> Self {
        CheckpointError::Model(err)
    }
}

/// Deterministic binary codec options shared by all checkpoint implementations.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_little_endian()
}

/// Components that support deterministic persistence implement this trait.
pub trait Checkpointable: Sized {
    /// Save the current state to `path` using the deterministic codec.
    fn save_checkpoint<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError>;

    /// Load a state from `path` as a new instance.
    fn load_checkpoint<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError>;

    /// Utility for writing a serializable snapshot with the shared codec.
    fn write_snapshot<P, T>(snapshot: &T, path: P) -> Result<(), CheckpointError>
    where
        P: AsRef<Path>,
        T: serde::Serialize,
    {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        codec().serialize_into(&mut writer, snapshot)?;
        writer.flush()?;
        Ok(())
    }

    /// Utility for reading a serializable snapshot with the shared codec.
    ///
    /// Snapshot types lead with the magic and version words; both are
    /// verified here before any payload byte reaches the codec, and the
    /// codec is capped at the file's own length, so a foreign or mangled
    /// file errors instead of driving the decoder into a huge allocation
    /// from a garbage length prefix.
    fn read_snapshot<P, T>(path: P) -> Result<T, CheckpointError>
    where
        P: AsRef<Path>,
        T: serde::de::DeserializeOwned,
    {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let mut header = [0u8; 8];
        reader.read_exact(&mut header).map_err(|err| {
            if err.kind() == std::io::ErrorKind::UnexpectedEof {
                CheckpointError::InvalidFormat("file ends before the snapshot header".into())
            } else {
                CheckpointError::Io(err)
            }
        })?;
        let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if magic != SNAPSHOT_MAGIC {
            return Err(CheckpointError::InvalidFormat(format!(
                "bad magic 0x{magic:08x}"
            )));
        }
        if version != SNAPSHOT_VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: version,
            });
        }

        // Replay the header so the snapshot deserializes in full
        let reader = header.as_slice().chain(reader);
        Ok(codec().with_limit(file_len).deserialize_from(reader)?)
    }
}

/// On-disk representation of a trained model.
///
/// The magic and version lead the payload as fixed-width integers, so a
/// reader can identify the format from the first eight bytes alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    magic: u32,
    version: u32,
    /// Caller-supplied model name
    pub name: String,
    /// Regularization floor active when the model was saved
    pub tau: f64,
    /// Feature dimension
    pub dim: usize,
    /// Per-class sufficient statistics
    pub records: Vec<ClassStatistics>,
}

impl ModelSnapshot {
    fn validate(&self) -> Result<(), CheckpointError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(CheckpointError::InvalidFormat(format!(
                "bad magic 0x{:08x}",
                self.magic
            )));
        }
        if self.version != SNAPSHOT_VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: self.version,
            });
        }
        if !self.tau.is_finite() || self.tau < 0.0 {
            return Err(CheckpointError::InvalidFormat(format!(
                "tau {} is not a valid regularization floor",
                self.tau
            )));
        }
        if self.records.is_empty() {
            return Err(CheckpointError::InvalidFormat(
                "snapshot contains no class records".into(),
            ));
        }

        let mut labels: Vec<i32> = Vec::with_capacity(self.records.len());
        for record in &self.records {
            if record.count == 0 {
                return Err(CheckpointError::InvalidFormat(format!(
                    "class {} has a zero sample count",
                    record.label
                )));
            }
            if record.mean.len() != self.dim {
                return Err(CheckpointError::InvalidFormat(format!(
                    "class {} mean has length {}, expected {}",
                    record.label,
                    record.mean.len(),
                    self.dim
                )));
            }
            if record.covariance.shape() != [self.dim, self.dim] {
                return Err(CheckpointError::InvalidFormat(format!(
                    "class {} covariance has shape {:?}, expected [{}, {}]",
                    record.label,
                    record.covariance.shape(),
                    self.dim,
                    self.dim
                )));
            }
            labels.push(record.label);
        }

        labels.sort_unstable();
        let unique = labels.len();
        labels.dedup();
        if labels.len() != unique {
            return Err(CheckpointError::InvalidFormat(
                "snapshot contains duplicate class labels".into(),
            ));
        }

        Ok(())
    }
}

impl GaussianDiscriminant {
    /// Capture the model's persistent state under the given name.
    ///
    /// Fails on an untrained model; a snapshot of nothing is not a
    /// meaningful artifact.
    pub fn to_snapshot(&self, name: &str) -> Result<ModelSnapshot, CheckpointError> {
        if !self.is_trained() {
            return Err(CheckpointError::Model(ModelError::not_trained(
                "save_checkpoint",
            )));
        }

        Ok(ModelSnapshot {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
            name: name.to_string(),
            tau: self.tau(),
            dim: self.dim(),
            records: self
                .classes()
                .iter()
                .map(|class| class.statistics.clone())
                .collect(),
        })
    }

    /// Rebuild a model from a snapshot, re-running the spectral pass on
    /// the stored statistics.
    pub fn from_snapshot(snapshot: ModelSnapshot) -> Result<Self, CheckpointError> {
        snapshot.validate()?;

        let config = ModelConfig {
            tau: snapshot.tau,
            ..ModelConfig::default()
        };
        Ok(Self::from_class_statistics(snapshot.records, config)?)
    }

    /// Save the model under a caller-supplied name.
    pub fn save_named<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<(), CheckpointError> {
        let snapshot = self.to_snapshot(name)?;
        Self::write_snapshot(&snapshot, path)
    }
}

impl Checkpointable for GaussianDiscriminant {
    fn save_checkpoint<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        self.save_named(path, DEFAULT_MODEL_NAME)
    }

    fn load_checkpoint<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError> {
        let snapshot: ModelSnapshot = Self::read_snapshot(path)?;
        Self::from_snapshot(snapshot)
    }
}

/// Check whether `path` looks like a loadable model snapshot.
///
/// Reads only the eight-byte magic and version header. Never fails:
/// missing files, short files, and foreign formats all report `false`.
pub fn can_read_file<P: AsRef<Path>>(path: P) -> bool {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };

    let mut header = [0u8; 8];
    if file.read_exact(&mut header).is_err() {
        return false;
    }

    let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    magic == SNAPSHOT_MAGIC && version == SNAPSHOT_VERSION
}

/// Check whether a snapshot could plausibly be written to `path`.
///
/// Probes without creating or truncating anything: an existing file must
/// be openable for writing, a new file needs an existing parent
/// directory. Never fails.
pub fn can_write_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || path.is_dir() {
        return false;
    }

    if path.exists() {
        return OpenOptions::new().append(true).open(path).is_ok();
    }

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
        // bare file name resolves against the working directory
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LabeledDataset;
    use ndarray::array;
    use tempfile::tempdir;

    fn trained_model() -> GaussianDiscriminant {
        let rows = vec![
            vec![0.0, 0.1],
            vec![0.2, 0.0],
            vec![0.1, 0.3],
            vec![10.0, 10.1],
            vec![10.2, 10.0],
            vec![10.1, 10.3],
        ];
        let dataset = LabeledDataset::from_rows(&rows, &[0, 0, 0, 1, 1, 1]).unwrap();
        let mut model = GaussianDiscriminant::with_tau(0.01).unwrap();
        model.fit(&dataset).unwrap();
        model
    }

    #[test]
    fn test_round_trip_preserves_statistics() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");

        let model = trained_model();
        model.save_checkpoint(&path).unwrap();
        let loaded = GaussianDiscriminant::load_checkpoint(&path).unwrap();

        assert_eq!(loaded.num_classes(), model.num_classes());
        assert_eq!(loaded.dim(), model.dim());
        assert_eq!(loaded.tau(), model.tau());

        for label in model.labels() {
            let original = model.class(label).unwrap();
            let restored = loaded.class(label).unwrap();
            assert_eq!(restored.statistics, original.statistics);
            assert!((restored.prior - original.prior).abs() < 1e-15);
        }
    }

    #[test]
    fn test_round_trip_identical_predictions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");

        let model = trained_model();
        model.save_checkpoint(&path).unwrap();
        let loaded = GaussianDiscriminant::load_checkpoint(&path).unwrap();

        let queries = array![[0.1, 0.1], [10.1, 10.1], [5.0, 5.0], [-3.0, 12.0]];
        for i in 0..queries.nrows() {
            let query = queries.row(i);
            assert_eq!(
                loaded.predict(query).unwrap(),
                model.predict(query).unwrap()
            );
        }
    }

    #[test]
    fn test_snapshot_records_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");

        let model = trained_model();
        model.save_named(&path, "field-survey-v2").unwrap();

        let snapshot: ModelSnapshot = GaussianDiscriminant::read_snapshot(&path).unwrap();
        assert_eq!(snapshot.name, "field-survey-v2");
        assert_eq!(snapshot.dim, 2);
        assert_eq!(snapshot.records.len(), 2);
    }

    #[test]
    fn test_save_untrained_model_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");

        let model = GaussianDiscriminant::default();
        let result = model.save_checkpoint(&path);
        assert!(matches!(
            result,
            Err(CheckpointError::Model(ModelError::NotTrained { .. }))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_can_read_file_accepts_saved_checkpoint() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");

        trained_model().save_checkpoint(&path).unwrap();
        assert!(can_read_file(&path));
    }

    #[test]
    fn test_can_read_file_rejects_missing_and_garbage() {
        let dir = tempdir().unwrap();

        assert!(!can_read_file(dir.path().join("absent.bin")));

        let garbage = dir.path().join("garbage.bin");
        std::fs::write(&garbage, b"not a model at all").unwrap();
        assert!(!can_read_file(&garbage));

        let truncated = dir.path().join("short.bin");
        std::fs::write(&truncated, [0x47u8, 0x44]).unwrap();
        assert!(!can_read_file(&truncated));
    }

    #[test]
    fn test_can_write_file_probes() {
        let dir = tempdir().unwrap();

        assert!(can_write_file(dir.path().join("new.bin")));
        assert!(!can_write_file(dir.path()));
        assert!(!can_write_file(dir.path().join("missing").join("new.bin")));

        let existing = dir.path().join("existing.bin");
        std::fs::write(&existing, b"payload").unwrap();
        assert!(can_write_file(&existing));
        // probing must not clobber the contents
        assert_eq!(std::fs::read(&existing).unwrap(), b"payload");
    }

    #[test]
    fn test_load_garbage_file_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let result = GaussianDiscriminant::load_checkpoint(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_high_byte_garbage_errors() {
        // every byte 0xFF: the magic check must reject this before the
        // codec ever sees the giant length prefixes inside
        let dir = tempdir().unwrap();
        let path = dir.path().join("noise.bin");
        std::fs::write(&path, vec![0xFFu8; 48]).unwrap();

        let result = GaussianDiscriminant::load_checkpoint(&path);
        assert!(matches!(result, Err(CheckpointError::InvalidFormat(_))));
    }

    #[test]
    fn test_load_text_file_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"csv,would,not,load").unwrap();

        let result = GaussianDiscriminant::load_checkpoint(&path);
        assert!(matches!(result, Err(CheckpointError::InvalidFormat(_))));
    }

    #[test]
    fn test_load_truncated_header_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stub.bin");
        std::fs::write(&path, &SNAPSHOT_MAGIC.to_le_bytes()[..3]).unwrap();

        let result = GaussianDiscriminant::load_checkpoint(&path);
        assert!(matches!(result, Err(CheckpointError::InvalidFormat(_))));
    }

    #[test]
    fn test_load_garbage_payload_behind_valid_header_errors() {
        // the header passes, so the codec runs; the 0xFF name length
        // prefix far exceeds the file length and must trip the codec's
        // size cap instead of attempting the allocation
        let dir = tempdir().unwrap();
        let path = dir.path().join("mangled.bin");

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&SNAPSHOT_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        bytes.extend(std::iter::repeat(0xFFu8).take(64));
        std::fs::write(&path, bytes).unwrap();

        let result = GaussianDiscriminant::load_checkpoint(&path);
        assert!(matches!(result, Err(CheckpointError::Serialization(_))));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.bin");

        let mut snapshot = trained_model().to_snapshot("future").unwrap();
        snapshot.version = SNAPSHOT_VERSION + 1;
        GaussianDiscriminant::write_snapshot(&snapshot, &path).unwrap();

        let result = GaussianDiscriminant::load_checkpoint(&path);
        assert!(matches!(
            result,
            Err(CheckpointError::VersionMismatch { found, .. }) if found == SNAPSHOT_VERSION + 1
        ));
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("foreign.bin");

        let mut snapshot = trained_model().to_snapshot("foreign").unwrap();
        snapshot.magic = 0xDEAD_BEEF;
        GaussianDiscriminant::write_snapshot(&snapshot, &path).unwrap();

        assert!(!can_read_file(&path));
        let result = GaussianDiscriminant::load_checkpoint(&path);
        assert!(matches!(result, Err(CheckpointError::InvalidFormat(_))));
    }

    #[test]
    fn test_malformed_records_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mangled.bin");

        let mut snapshot = trained_model().to_snapshot("mangled").unwrap();
        snapshot.records[0].mean = array![1.0, 2.0, 3.0];
        GaussianDiscriminant::write_snapshot(&snapshot, &path).unwrap();

        let result = GaussianDiscriminant::load_checkpoint(&path);
        assert!(matches!(result, Err(CheckpointError::InvalidFormat(_))));
    }

    #[test]
    fn test_failed_load_leaves_existing_model_usable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, b"garbage").unwrap();

        let model = trained_model();
        let before = model.predict(array![0.1, 0.1].view()).unwrap();

        assert!(GaussianDiscriminant::load_checkpoint(&path).is_err());

        assert_eq!(model.predict(array![0.1, 0.1].view()).unwrap(), before);
        assert_eq!(model.num_classes(), 2);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("model.bin");

        trained_model().save_checkpoint(&path).unwrap();
        assert!(path.exists());
        assert!(can_read_file(&path));
    }
}
