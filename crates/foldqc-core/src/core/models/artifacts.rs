use std::fmt;
use std::path::PathBuf;

/// Formats a score the way every artifact does: fixed two decimals.
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Average confidence of one job.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub job: String,
    pub average_confidence: f64,
    /// The per-job text artifact holding the score.
    pub path: PathBuf,
}

impl ScoreSummary {
    pub fn formatted(&self) -> String {
        format_score(self.average_confidence)
    }

    pub fn to_report_row(&self) -> ReportRow {
        ReportRow {
            job: self.job.clone(),
            average: self.formatted(),
        }
    }
}

/// A rendered pairwise-error heatmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapArtifact {
    pub job: String,
    pub path: PathBuf,
    /// Side length `N` of the rendered `N x N` matrix.
    pub matrix_dim: usize,
    pub width: u32,
    pub height: u32,
}

/// One line of the consolidated score table.
///
/// The average is kept as its formatted string so the table and the per-job
/// file names can never disagree on rounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub job: String,
    pub average: String,
}

impl ReportRow {
    pub fn new(job: impl Into<String>, average: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            average: average.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    ScoreFile,
    Heatmap,
    Report,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::ScoreFile => "pLDDT score",
            ArtifactKind::Heatmap => "PAE heatmap",
            ArtifactKind::Report => "score report",
        };
        f.write_str(name)
    }
}
