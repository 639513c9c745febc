use crate::core::render::colormap::ColorScale;
use crate::core::render::heatmap::RenderSettings;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_DOCUMENT_SUFFIX: &str = "_confidences.json";
pub const DEFAULT_IGNORED_SUFFIX: &str = "_summary_confidences.json";
pub const DEFAULT_REPORT_FILE_NAME: &str = "average_plddt_scores.csv";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
}

/// What happens to the rest of the batch when one job fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Document and artifact-write failures abort the run before the report
    /// is written. Malformed matrices are still isolated per job.
    #[default]
    FailFast,
    /// Every per-job failure is recorded and the run continues; the partial
    /// report is written at the end.
    Isolate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub document_suffix: String,
    /// File names ending with any of these are never treated as documents,
    /// even when they also end with `document_suffix`.
    pub ignored_suffixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreStageConfig {
    pub enabled: bool,
    pub report_file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapStageConfig {
    pub enabled: bool,
    pub render: RenderSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub scan: ScanConfig,
    pub scores: ScoreStageConfig,
    pub heatmaps: HeatmapStageConfig,
    pub failure_policy: FailurePolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig {
                document_suffix: DEFAULT_DOCUMENT_SUFFIX.to_string(),
                ignored_suffixes: vec![DEFAULT_IGNORED_SUFFIX.to_string()],
            },
            scores: ScoreStageConfig {
                enabled: true,
                report_file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
            },
            heatmaps: HeatmapStageConfig {
                enabled: true,
                render: RenderSettings::default(),
            },
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    document_suffix: Option<String>,
    ignored_suffixes: Option<Vec<String>>,
    scores_enabled: Option<bool>,
    report_file_name: Option<String>,
    heatmaps_enabled: Option<bool>,
    dpi: Option<u32>,
    figure_size: Option<f64>,
    color_scale: Option<ColorScale>,
    max_render_bytes: Option<u64>,
    failure_policy: Option<FailurePolicy>,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.document_suffix = Some(suffix.into());
        self
    }
    pub fn ignored_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.ignored_suffixes = Some(suffixes);
        self
    }
    pub fn scores_enabled(mut self, enabled: bool) -> Self {
        self.scores_enabled = Some(enabled);
        self
    }
    pub fn report_file_name(mut self, name: impl Into<String>) -> Self {
        self.report_file_name = Some(name.into());
        self
    }
    pub fn heatmaps_enabled(mut self, enabled: bool) -> Self {
        self.heatmaps_enabled = Some(enabled);
        self
    }
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }
    pub fn figure_size(mut self, inches: f64) -> Self {
        self.figure_size = Some(inches);
        self
    }
    pub fn color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale = Some(scale);
        self
    }
    pub fn max_render_bytes(mut self, bytes: u64) -> Self {
        self.max_render_bytes = Some(bytes);
        self
    }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// The document suffix and report file name are required; every other
    /// setting falls back to [`BatchConfig::default`].
    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        let defaults = BatchConfig::default();

        let document_suffix = self
            .document_suffix
            .ok_or(ConfigError::MissingParameter("document_suffix"))?;
        if document_suffix.is_empty() {
            return Err(invalid("document_suffix", "must not be empty"));
        }
        let report_file_name = self
            .report_file_name
            .ok_or(ConfigError::MissingParameter("report_file_name"))?;
        if report_file_name.is_empty() || report_file_name.contains(['/', '\\']) {
            return Err(invalid(
                "report_file_name",
                "must be a plain, non-empty file name",
            ));
        }

        let dpi = self.dpi.unwrap_or(defaults.heatmaps.render.dpi);
        if dpi == 0 {
            return Err(invalid("dpi", "must be greater than zero"));
        }
        let figure_size = self
            .figure_size
            .unwrap_or(defaults.heatmaps.render.figure_size);
        if !figure_size.is_finite() || figure_size <= 0.0 {
            return Err(invalid("figure_size", "must be a positive number of inches"));
        }
        let color_scale = self
            .color_scale
            .unwrap_or(defaults.heatmaps.render.color_scale);
        if let ColorScale::Fixed { min, max } = color_scale {
            if !min.is_finite() || !max.is_finite() || max <= min {
                return Err(invalid(
                    "color_scale",
                    format!("fixed range requires finite min < max (got {min}..{max})"),
                ));
            }
        }

        Ok(BatchConfig {
            scan: ScanConfig {
                document_suffix,
                ignored_suffixes: self
                    .ignored_suffixes
                    .unwrap_or(defaults.scan.ignored_suffixes),
            },
            scores: ScoreStageConfig {
                enabled: self.scores_enabled.unwrap_or(defaults.scores.enabled),
                report_file_name,
            },
            heatmaps: HeatmapStageConfig {
                enabled: self.heatmaps_enabled.unwrap_or(defaults.heatmaps.enabled),
                render: RenderSettings {
                    dpi,
                    figure_size,
                    color_scale,
                    max_render_bytes: self
                        .max_render_bytes
                        .unwrap_or(defaults.heatmaps.render.max_render_bytes),
                },
            },
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
        })
    }
}

fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        parameter,
        reason: reason.into(),
    }
}
