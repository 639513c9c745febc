use crate::core::models::artifacts::ArtifactKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Progress {
    ScanFinished { jobs: u64, skipped: u64 },
    JobStart { job: String },
    ArtifactWritten { kind: ArtifactKind, job: String, path: PathBuf },
    JobFailed { job: String, reason: String },
    JobFinish,
    BatchFinish,
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards pipeline events to an optional observer.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
