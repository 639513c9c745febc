use super::config::ConfigError;
use crate::core::io::confidence::LoadError;
use crate::core::io::report::ReportError;
use crate::core::render::heatmap::RenderError;
use crate::core::scoring::ScoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to scan '{path}': {source}", path = path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Root '{path}' is not a directory", path = path.display())]
    NotADirectory { path: PathBuf },

    #[error("Job '{job}' failed to load: {source}")]
    Load {
        job: String,
        #[source]
        source: LoadError,
    },

    #[error("Job '{job}' failed to write its score: {source}")]
    Score {
        job: String,
        #[source]
        source: ScoreError,
    },

    #[error("Job '{job}' failed to write its heatmap: {source}")]
    Render {
        job: String,
        #[source]
        source: RenderError,
    },

    #[error(transparent)]
    Report(#[from] ReportError),
}
