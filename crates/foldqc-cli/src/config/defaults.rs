use foldqc::core::render::heatmap::RenderSettings;
use foldqc::engine::config::{
    DEFAULT_DOCUMENT_SUFFIX, DEFAULT_IGNORED_SUFFIX, DEFAULT_REPORT_FILE_NAME, FailurePolicy,
};

pub struct DefaultsConfig {
    pub document_suffix: String,
    pub ignored_suffixes: Vec<String>,
    pub scores_enabled: bool,
    pub report_file: String,
    pub heatmaps_enabled: bool,
    pub dpi: u32,
    pub figure_size: f64,
    pub max_render_bytes: u64,
    pub failure_policy: FailurePolicy,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let render = RenderSettings::default();
        Self {
            document_suffix: DEFAULT_DOCUMENT_SUFFIX.to_string(),
            ignored_suffixes: vec![DEFAULT_IGNORED_SUFFIX.to_string()],
            scores_enabled: true,
            report_file: DEFAULT_REPORT_FILE_NAME.to_string(),
            heatmaps_enabled: true,
            dpi: render.dpi,
            figure_size: render.figure_size,
            max_render_bytes: render.max_render_bytes,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}
