use crate::error::{CliError, Result};
use foldqc::core::render::colormap::ColorScale;
use foldqc::engine::config::FailurePolicy;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileScanConfig {
    pub document_suffix: Option<String>,
    pub ignore_suffixes: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileScoresConfig {
    pub enabled: Option<bool>,
    pub report_file: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileHeatmapConfig {
    pub enabled: Option<bool>,
    pub dpi: Option<u32>,
    pub figure_size: Option<f64>,
    pub max_render_bytes: Option<u64>,
    pub color_scale: Option<ColorScale>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub failure_policy: Option<FailurePolicy>,
    pub scan: Option<FileScanConfig>,
    pub scores: Option<FileScoresConfig>,
    pub heatmap: Option<FileHeatmapConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
