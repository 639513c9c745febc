use foldqc::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

type LineSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Drives the progress bar and prints one line per written artifact.
///
/// Lines are printed whenever the handler is not quiet, including when the
/// bar itself is not drawn because stderr is not a terminal.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
    quiet: bool,
    sink: LineSink,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Scanning...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));

        Self::build(pb, false, Box::new(io::stderr()))
    }

    /// A handler that neither draws nor prints, used with `--quiet`.
    pub fn hidden() -> Self {
        Self::build(ProgressBar::hidden(), true, Box::new(io::sink()))
    }

    /// A handler without a visible bar whose lines go to `sink`.
    #[cfg(test)]
    pub(crate) fn with_sink(sink: Box<dyn Write + Send>) -> Self {
        Self::build(ProgressBar::hidden(), false, sink)
    }

    fn build(pb: ProgressBar, quiet: bool, sink: Box<dyn Write + Send>) -> Self {
        Self {
            pb: Arc::new(Mutex::new(pb)),
            quiet,
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();
        let sink = self.sink.clone();
        let quiet = self.quiet;

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            let print = |line: String| {
                if !quiet {
                    pb_guard.suspend(|| Self::write_line(&sink, &line));
                }
            };

            match progress {
                Progress::ScanFinished { jobs, skipped } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.set_length(jobs);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_message("Processing");
                    if skipped > 0 {
                        print(format!(
                            "  Skipped {} folder(s) without a confidence file",
                            skipped
                        ));
                    }
                }
                Progress::JobStart { job } => {
                    pb_guard.set_message(job);
                }
                Progress::ArtifactWritten { kind, job, path } => {
                    print(Self::artifact_line(&kind.to_string(), &job, &path));
                }
                Progress::JobFailed { job, reason } => {
                    print(format!("  ✗ {}: {}", job, reason));
                }
                Progress::JobFinish => {
                    pb_guard.inc(1);
                }
                Progress::BatchFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message("✓ Done");
                }
            }
        })
    }

    /// Leaves the bar where it stopped, for batches aborted by an error.
    pub fn abandon(&self) {
        if let Ok(pb_guard) = self.pb.lock() {
            pb_guard.disable_steady_tick();
            pb_guard.abandon_with_message("✗ Aborted");
        }
    }

    fn artifact_line(kind: &str, job: &str, path: &std::path::Path) -> String {
        if job.is_empty() {
            format!("  {} -> {}", kind, path.display())
        } else {
            format!("  {} [{}] -> {}", kind, job, path.display())
        }
    }

    fn write_line(sink: &LineSink, line: &str) {
        let Ok(mut out) = sink.lock() else {
            warn!("Progress output mutex was poisoned. Dropping line: {}", line);
            return;
        };
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!("Failed to print progress line: {}", e);
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory line sink shared between a handler and the test inspecting it.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub(crate) fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
