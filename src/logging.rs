use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::model::TrainingSummary;

fn log_dir() -> io::Result<()> {
    fs::create_dir_all("logs")
}

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    file.write_all(b"\n")
}

#[derive(Debug, Serialize)]
pub struct TrainingLogEntry {
    pub model: String,
    pub num_classes: usize,
    pub dim: usize,
    pub total_samples: usize,
    pub degenerate_classes: usize,
    pub tau: f64,
    pub elapsed_ms: u64,
    pub timestamp_ms: u128,
}

pub fn log_training_run(model: &str, summary: &TrainingSummary) -> io::Result<()> {
    log_dir()?;
    let entry = TrainingLogEntry {
        model: model.to_string(),
        num_classes: summary.num_classes,
        dim: summary.dim,
        total_samples: summary.total_samples,
        degenerate_classes: summary.degenerate_labels.len(),
        tau: summary.tau,
        elapsed_ms: summary.elapsed_ms,
        timestamp_ms: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    };
    append_json_line("logs/training.jsonl", &entry)
}

#[derive(Debug, Serialize)]
pub struct TauUpdateLogEntry {
    pub model: String,
    pub tau: f64,
    pub num_classes: usize,
    pub timestamp_ms: u128,
}

pub fn log_tau_update(model: &str, tau: f64, num_classes: usize) -> io::Result<()> {
    log_dir()?;
    let entry = TauUpdateLogEntry {
        model: model.to_string(),
        tau,
        num_classes,
        timestamp_ms: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    };
    append_json_line("logs/tau_updates.jsonl", &entry)
}
