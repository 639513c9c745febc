//! Reduction of per-atom confidence scores to a single per-job summary.

use crate::core::models::artifacts::{ScoreSummary, format_score};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Failed to write score file '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Arithmetic mean of `scores`; exactly `0.0` for an empty slice.
pub fn average(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// File name of the per-job score artifact, e.g. `prot1_pLDDT_80.00.txt`.
pub fn score_file_name(job: &str, score: f64) -> String {
    format!("{}_pLDDT_{}.txt", job, format_score(score))
}

/// The single line stored in the per-job score artifact.
pub fn score_line(score: f64) -> String {
    format!("Average pLDDT Score: {}\n", format_score(score))
}

/// Averages `scores` and writes the score artifact into `job_dir`.
///
/// # Errors
///
/// Only fails if the artifact cannot be written.
pub fn summarize(job: &str, job_dir: &Path, scores: &[f64]) -> Result<ScoreSummary, ScoreError> {
    let average_confidence = average(scores);
    let path = job_dir.join(score_file_name(job, average_confidence));
    std::fs::write(&path, score_line(average_confidence)).map_err(|e| ScoreError::Io {
        path: path.clone(),
        source: e,
    })?;

    Ok(ScoreSummary {
        job: job.to_string(),
        average_confidence,
        path,
    })
}
