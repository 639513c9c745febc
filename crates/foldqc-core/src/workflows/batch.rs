use crate::core::io::{confidence, report};
use crate::core::models::artifacts::{ArtifactKind, HeatmapArtifact, ReportRow, ScoreSummary};
use crate::core::render::heatmap;
use crate::core::scoring;
use crate::engine::config::{BatchConfig, FailurePolicy};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scanner::{self, JobEntry};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Load,
    Score,
    Render,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStage::Load => "load",
            JobStage::Score => "score",
            JobStage::Render => "render",
        };
        f.write_str(name)
    }
}

/// A job that did not produce every artifact it should have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub job: String,
    pub stage: JobStage,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Number of folders that held a confidence document.
    pub jobs_scanned: usize,
    pub skipped_folders: Vec<String>,
    pub scores: Vec<ScoreSummary>,
    pub heatmaps: Vec<HeatmapArtifact>,
    /// Report rows in processing order.
    pub rows: Vec<ReportRow>,
    pub failures: Vec<JobFailure>,
    /// Set when the consolidated report was written.
    pub report_path: Option<PathBuf>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Processes every job folder under `root`.
///
/// Jobs are handled one at a time in folder-name order. Each job's document
/// is loaded once; its score file and heatmap are written straight away and
/// its report row is kept in memory. The consolidated report is written once,
/// after the last job, replacing any earlier report.
///
/// # Errors
///
/// Scan errors always abort the run. Under [`FailurePolicy::FailFast`] a
/// document that cannot be loaded, or an artifact that cannot be written,
/// also aborts the run; artifacts of earlier jobs stay on disk and no report
/// is written. Malformed matrices never abort the run; they are recorded in
/// [`BatchOutcome::failures`].
#[instrument(skip_all, name = "batch_workflow", fields(root = %root.display()))]
pub fn run(
    root: &Path,
    config: &BatchConfig,
    reporter: &ProgressReporter,
) -> Result<BatchOutcome, EngineError> {
    let scan = scanner::scan(root, &config.scan)?;
    info!(
        "Found {} job(s) with a confidence document; {} folder(s) skipped.",
        scan.jobs.len(),
        scan.skipped.len()
    );
    reporter.report(Progress::ScanFinished {
        jobs: scan.jobs.len() as u64,
        skipped: scan.skipped.len() as u64,
    });

    let mut batch = BatchRun {
        config,
        reporter,
        outcome: BatchOutcome {
            jobs_scanned: scan.jobs.len(),
            skipped_folders: scan.skipped,
            ..BatchOutcome::default()
        },
    };

    for entry in &scan.jobs {
        reporter.report(Progress::JobStart {
            job: entry.job.clone(),
        });
        batch.process_job(entry)?;
        reporter.report(Progress::JobFinish);
    }

    let mut outcome = batch.outcome;
    if config.scores.enabled {
        let path = root.join(&config.scores.report_file_name);
        report::write_to_path(&outcome.rows, &path)?;
        info!(
            "Average pLDDT scores for {} job(s) written to {:?}",
            outcome.rows.len(),
            &path
        );
        reporter.report(Progress::ArtifactWritten {
            kind: ArtifactKind::Report,
            job: String::new(),
            path: path.clone(),
        });
        outcome.report_path = Some(path);
    }

    if !outcome.is_clean() {
        warn!("{} job failure(s) recorded.", outcome.failures.len());
    }
    reporter.report(Progress::BatchFinish);
    Ok(outcome)
}

struct BatchRun<'c, 'r, 'a> {
    config: &'c BatchConfig,
    reporter: &'r ProgressReporter<'a>,
    outcome: BatchOutcome,
}

impl BatchRun<'_, '_, '_> {
    fn process_job(&mut self, entry: &JobEntry) -> Result<(), EngineError> {
        let document = match confidence::load(&entry.document) {
            Ok(document) => document,
            Err(source) => {
                let message = source.to_string();
                let error = EngineError::Load {
                    job: entry.job.clone(),
                    source,
                };
                return self.fail(entry, JobStage::Load, message, Some(error));
            }
        };

        if self.config.scores.enabled {
            if let Some(scores) = document.atom_confidences.as_deref() {
                match scoring::summarize(&entry.job, &entry.folder, scores) {
                    Ok(summary) => self.record_score(summary),
                    Err(source) => {
                        let message = source.to_string();
                        let error = EngineError::Score {
                            job: entry.job.clone(),
                            source,
                        };
                        self.fail(entry, JobStage::Score, message, Some(error))?;
                    }
                }
            }
        }

        if self.config.heatmaps.enabled {
            if let Some(rows) = document.pairwise_error.as_deref() {
                let settings = &self.config.heatmaps.render;
                match heatmap::render_to_path(&entry.job, &entry.folder, rows, settings) {
                    Ok(artifact) => self.record_heatmap(artifact),
                    Err(source) if source.is_validation_failure() => {
                        self.fail(entry, JobStage::Render, source.to_string(), None)?;
                    }
                    Err(source) => {
                        let message = source.to_string();
                        let error = EngineError::Render {
                            job: entry.job.clone(),
                            source,
                        };
                        self.fail(entry, JobStage::Render, message, Some(error))?;
                    }
                }
            }
        }

        Ok(())
    }

    fn record_score(&mut self, summary: ScoreSummary) {
        info!(
            "Average pLDDT for {}: {} (saved to {:?})",
            summary.job,
            summary.formatted(),
            &summary.path
        );
        self.reporter.report(Progress::ArtifactWritten {
            kind: ArtifactKind::ScoreFile,
            job: summary.job.clone(),
            path: summary.path.clone(),
        });
        self.outcome.rows.push(summary.to_report_row());
        self.outcome.scores.push(summary);
    }

    fn record_heatmap(&mut self, artifact: HeatmapArtifact) {
        info!("Heatmap saved for {} at {:?}", artifact.job, &artifact.path);
        self.reporter.report(Progress::ArtifactWritten {
            kind: ArtifactKind::Heatmap,
            job: artifact.job.clone(),
            path: artifact.path.clone(),
        });
        self.outcome.heatmaps.push(artifact);
    }

    /// Records a per-job failure, or returns `fatal` when the policy says the
    /// batch must stop. A `None` error is always isolated.
    fn fail(
        &mut self,
        entry: &JobEntry,
        stage: JobStage,
        message: String,
        fatal: Option<EngineError>,
    ) -> Result<(), EngineError> {
        if let Some(error) = fatal {
            if self.config.failure_policy == FailurePolicy::FailFast {
                return Err(error);
            }
        }

        warn!("Job '{}' failed at {} stage: {}", entry.job, stage, message);
        self.reporter.report(Progress::JobFailed {
            job: entry.job.clone(),
            reason: message.clone(),
        });
        self.outcome.failures.push(JobFailure {
            job: entry.job.clone(),
            stage,
            message,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{BatchConfigBuilder, DEFAULT_DOCUMENT_SUFFIX, DEFAULT_REPORT_FILE_NAME};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    fn config(policy: FailurePolicy) -> BatchConfig {
        BatchConfigBuilder::new()
            .document_suffix(DEFAULT_DOCUMENT_SUFFIX)
            .report_file_name(DEFAULT_REPORT_FILE_NAME)
            .dpi(40)
            .failure_policy(policy)
            .build()
            .unwrap()
    }

    fn write_job(root: &Path, job: &str, content: &str) {
        let folder = root.join(job);
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join(format!("{}_confidences.json", job)), content).unwrap();
    }

    fn scenario_tree() -> TempDir {
        let dir = tempdir().unwrap();
        write_job(dir.path(), "prot1", r#"{"atom_plddts": [90, 80, 70]}"#);
        write_job(dir.path(), "prot2", r#"{"atom_plddts": []}"#);
        write_job(
            dir.path(),
            "prot3",
            r#"{"pae": [[0, 0, 0], [0, 0, 0], [0, 0, 0]]}"#,
        );
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        dir
    }

    fn report_of(root: &Path) -> String {
        fs::read_to_string(root.join(DEFAULT_REPORT_FILE_NAME)).unwrap()
    }

    #[test]
    fn scenarios_produce_expected_artifacts() {
        let dir = scenario_tree();
        let root = dir.path();

        let outcome = run(root, &config(FailurePolicy::FailFast), &ProgressReporter::new()).unwrap();

        assert!(outcome.is_clean());
        assert_eq!(outcome.jobs_scanned, 3);
        assert_eq!(outcome.skipped_folders, vec!["logs".to_string()]);
        assert_eq!(
            outcome.rows,
            vec![ReportRow::new("prot1", "80.00"), ReportRow::new("prot2", "0.00")]
        );
        assert_eq!(
            fs::read_to_string(root.join("prot1/prot1_pLDDT_80.00.txt")).unwrap(),
            "Average pLDDT Score: 80.00\n"
        );
        assert!(root.join("prot2/prot2_pLDDT_0.00.txt").is_file());
        assert_eq!(
            report_of(root),
            "Subfolder,Average pLDDT\nprot1,80.00\nprot2,0.00\n"
        );
        assert_eq!(outcome.report_path, Some(root.join(DEFAULT_REPORT_FILE_NAME)));

        assert_eq!(outcome.heatmaps.len(), 1);
        assert_eq!(outcome.heatmaps[0].job, "prot3");
        assert!(root.join("prot3/prot3_pae_heatmap.png").is_file());
        assert!(!root.join("prot1/prot1_pae_heatmap.png").exists());
        let prot3_files: Vec<_> = fs::read_dir(root.join("prot3"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(!prot3_files.iter().any(|name| name.contains("pLDDT")));
    }

    #[test]
    fn rerun_is_deterministic() {
        let dir = scenario_tree();
        let root = dir.path();
        let cfg = config(FailurePolicy::FailFast);
        let heatmap_path = root.join("prot3/prot3_pae_heatmap.png");

        run(root, &cfg, &ProgressReporter::new()).unwrap();
        let first_report = fs::read(root.join(DEFAULT_REPORT_FILE_NAME)).unwrap();
        let first_png = fs::read(&heatmap_path).unwrap();

        run(root, &cfg, &ProgressReporter::new()).unwrap();
        assert_eq!(fs::read(root.join(DEFAULT_REPORT_FILE_NAME)).unwrap(), first_report);
        assert_eq!(fs::read(&heatmap_path).unwrap(), first_png);
    }

    #[test]
    fn non_square_matrix_is_isolated_even_when_failing_fast() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_job(root, "a", r#"{"atom_plddts": [50], "pae": [[0, 1], [1]]}"#);
        write_job(root, "b", r#"{"atom_plddts": [60], "pae": [[0, 1], [1, 0]]}"#);

        let outcome = run(root, &config(FailurePolicy::FailFast), &ProgressReporter::new()).unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].job, "a");
        assert_eq!(outcome.failures[0].stage, JobStage::Render);
        assert!(!root.join("a/a_pae_heatmap.png").exists());
        assert!(root.join("b/b_pae_heatmap.png").is_file());
        assert_eq!(report_of(root), "Subfolder,Average pLDDT\na,50.00\nb,60.00\n");
    }

    fn tree_with_malformed_middle_job() -> TempDir {
        let dir = tempdir().unwrap();
        write_job(dir.path(), "a_good", r#"{"atom_plddts": [70, 90]}"#);
        write_job(dir.path(), "b_broken", r#"{"atom_plddts": [70, "#);
        write_job(dir.path(), "c_good", r#"{"atom_plddts": [10]}"#);
        dir
    }

    #[test]
    fn malformed_document_aborts_run_when_failing_fast() {
        let dir = tree_with_malformed_middle_job();
        let root = dir.path();

        let result = run(root, &config(FailurePolicy::FailFast), &ProgressReporter::new());

        match result {
            Err(EngineError::Load { job, .. }) => assert_eq!(job, "b_broken"),
            other => panic!("expected load failure, got {:?}", other),
        }
        assert!(root.join("a_good/a_good_pLDDT_80.00.txt").is_file());
        assert!(!root.join("c_good/c_good_pLDDT_10.00.txt").exists());
        assert!(!root.join(DEFAULT_REPORT_FILE_NAME).exists());
    }

    #[test]
    fn malformed_document_is_recorded_when_isolating() {
        let dir = tree_with_malformed_middle_job();
        let root = dir.path();

        let outcome = run(root, &config(FailurePolicy::Isolate), &ProgressReporter::new()).unwrap();

        assert!(!outcome.is_clean());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].job, "b_broken");
        assert_eq!(outcome.failures[0].stage, JobStage::Load);
        assert_eq!(
            report_of(root),
            "Subfolder,Average pLDDT\na_good,80.00\nc_good,10.00\n"
        );
    }

    #[test]
    fn document_without_fields_yields_nothing() {
        let dir = tempdir().unwrap();
        write_job(dir.path(), "bare", r#"{"token_res_ids": [1, 2]}"#);

        let outcome =
            run(dir.path(), &config(FailurePolicy::FailFast), &ProgressReporter::new()).unwrap();

        assert!(outcome.rows.is_empty());
        assert!(outcome.heatmaps.is_empty());
        assert_eq!(report_of(dir.path()), "Subfolder,Average pLDDT\n");
    }

    #[test]
    fn disabled_stages_write_nothing() {
        let dir = scenario_tree();
        let root = dir.path();
        let mut cfg = config(FailurePolicy::FailFast);
        cfg.scores.enabled = false;
        cfg.heatmaps.enabled = false;

        let outcome = run(root, &cfg, &ProgressReporter::new()).unwrap();

        assert!(outcome.rows.is_empty());
        assert!(outcome.report_path.is_none());
        assert!(!root.join(DEFAULT_REPORT_FILE_NAME).exists());
        assert!(!root.join("prot1/prot1_pLDDT_80.00.txt").exists());
        assert!(!root.join("prot3/prot3_pae_heatmap.png").exists());
    }

    #[test]
    fn stale_report_is_replaced() {
        let dir = scenario_tree();
        let root = dir.path();
        fs::write(
            root.join(DEFAULT_REPORT_FILE_NAME),
            "Subfolder,Average pLDDT\nold,1.00\nolder,2.00\n",
        )
        .unwrap();

        run(root, &config(FailurePolicy::FailFast), &ProgressReporter::new()).unwrap();

        assert!(!report_of(root).contains("old"));
    }

    #[test]
    fn progress_reports_one_event_per_artifact() {
        let dir = scenario_tree();
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::ArtifactWritten { kind, .. } = event {
                events.lock().unwrap().push(kind);
            }
        }));

        run(dir.path(), &config(FailurePolicy::FailFast), &reporter).unwrap();
        drop(reporter);

        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                ArtifactKind::ScoreFile,
                ArtifactKind::ScoreFile,
                ArtifactKind::Heatmap,
                ArtifactKind::Report
            ]
        );
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let result = run(
            &dir.path().join("missing"),
            &config(FailurePolicy::Isolate),
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::NotADirectory { .. })));
    }
}
