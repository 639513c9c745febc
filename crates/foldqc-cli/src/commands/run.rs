use crate::cli::Cli;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use foldqc::engine::config::FailurePolicy;
use foldqc::engine::progress::ProgressReporter;
use foldqc::workflows::{self, batch::BatchOutcome};
use tracing::{info, warn};

pub fn run(args: &Cli) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(args)?;

    let progress_handler = if args.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };

    let outcome = execute(&app_config, &progress_handler)?;
    print_summary(&outcome, args.quiet);

    if !outcome.failures.is_empty() && app_config.batch.failure_policy == FailurePolicy::Isolate {
        return Err(CliError::JobsFailed {
            count: outcome.failures.len(),
        });
    }

    Ok(())
}

fn execute(config: &AppConfig, progress_handler: &CliProgressHandler) -> Result<BatchOutcome> {
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Processing job folders under {:?}", &config.root);
    match workflows::batch::run(&config.root, &config.batch, &reporter) {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            progress_handler.abandon();
            if config.batch.scores.enabled {
                warn!("Batch aborted; the score report was not written.");
            }
            Err(e.into())
        }
    }
}

fn print_summary(outcome: &BatchOutcome, quiet: bool) {
    info!(
        "Batch finished: {} job(s), {} score file(s), {} heatmap(s), {} failure(s).",
        outcome.jobs_scanned,
        outcome.scores.len(),
        outcome.heatmaps.len(),
        outcome.failures.len()
    );
    if quiet {
        return;
    }

    if outcome.jobs_scanned == 0 {
        println!("Warning: no job folders with a confidence file were found.");
    }
    println!(
        "Processed {} job(s): {} score file(s), {} heatmap(s).",
        outcome.jobs_scanned,
        outcome.scores.len(),
        outcome.heatmaps.len()
    );
    if let Some(path) = &outcome.report_path {
        println!(
            "✓ Report with {} row(s) written to: {}",
            outcome.rows.len(),
            path.display()
        );
    }
    for failure in &outcome.failures {
        println!(
            "  ✗ {} ({} stage): {}",
            failure.job, failure.stage, failure.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::progress::SharedBuffer;
    use foldqc::engine::config::{
        BatchConfigBuilder, DEFAULT_DOCUMENT_SUFFIX, DEFAULT_REPORT_FILE_NAME,
    };
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_job(root: &Path, job: &str, content: &str) {
        let folder = root.join(job);
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join(format!("{}_confidences.json", job)), content).unwrap();
    }

    fn app_config(root: &Path, policy: FailurePolicy) -> AppConfig {
        AppConfig {
            root: root.to_path_buf(),
            batch: BatchConfigBuilder::new()
                .document_suffix(DEFAULT_DOCUMENT_SUFFIX)
                .report_file_name(DEFAULT_REPORT_FILE_NAME)
                .dpi(40)
                .failure_policy(policy)
                .build()
                .unwrap(),
        }
    }

    #[test]
    fn prints_one_line_per_written_artifact() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_job(root, "prot1", r#"{"atom_plddts": [90, 80, 70]}"#);
        write_job(root, "prot3", r#"{"pae": [[0, 0, 0], [0, 0, 0], [0, 0, 0]]}"#);
        fs::create_dir_all(root.join("empty")).unwrap();

        let buffer = SharedBuffer::default();
        let handler = CliProgressHandler::with_sink(Box::new(buffer.clone()));
        let outcome = execute(&app_config(root, FailurePolicy::FailFast), &handler).unwrap();

        assert!(outcome.is_clean());
        let lines = buffer.lines();
        let artifact_lines: Vec<_> = lines.iter().filter(|l| l.contains(" -> ")).collect();
        assert_eq!(artifact_lines.len(), 3);
        assert!(artifact_lines[0].ends_with("prot1_pLDDT_80.00.txt"));
        assert!(artifact_lines[1].ends_with("prot3_pae_heatmap.png"));
        assert!(artifact_lines[2].ends_with(DEFAULT_REPORT_FILE_NAME));
        assert!(lines.iter().any(|l| l.contains("Skipped 1 folder(s)")));
    }

    #[test]
    fn aborted_batch_returns_the_engine_error() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_job(root, "prot1", "{ not json");

        let handler = CliProgressHandler::hidden();
        let result = execute(&app_config(root, FailurePolicy::FailFast), &handler);

        assert!(matches!(result, Err(CliError::Core(_))));
        assert!(!root.join(DEFAULT_REPORT_FILE_NAME).exists());
    }
}
