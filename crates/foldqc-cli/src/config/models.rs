use foldqc::engine::config::BatchConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub root: PathBuf,
    pub batch: BatchConfig,
}
