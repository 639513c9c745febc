use super::config::ScanConfig;
use super::error::EngineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A job folder that holds a confidence document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEntry {
    /// Folder name, used as the job id in every artifact name.
    pub job: String,
    pub folder: PathBuf,
    pub document: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Jobs in lexicographic folder-name order.
    pub jobs: Vec<JobEntry>,
    /// Folders that held no confidence document.
    pub skipped: Vec<String>,
}

/// Lists the immediate subdirectories of `root` and locates each one's
/// confidence document.
///
/// # Errors
///
/// Fails if `root` is not a readable directory or one of its subdirectories
/// cannot be listed.
pub fn scan(root: &Path, config: &ScanConfig) -> Result<ScanResult, EngineError> {
    if !root.is_dir() {
        return Err(EngineError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut folders = Vec::new();
    for entry in read_dir(root)? {
        let path = entry.path();
        if path.is_dir() {
            folders.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    folders.sort_by(|a, b| a.0.cmp(&b.0));

    let mut result = ScanResult::default();
    for (job, folder) in folders {
        match find_document(&folder, config)? {
            Some(document) => result.jobs.push(JobEntry {
                job,
                folder,
                document,
            }),
            None => {
                debug!(
                    "No '*{}' document in '{}', skipping.",
                    config.document_suffix, job
                );
                result.skipped.push(job);
            }
        }
    }
    Ok(result)
}

/// Picks the confidence document inside `folder`, if any.
///
/// When several files qualify the lexicographically first one wins.
pub fn find_document(folder: &Path, config: &ScanConfig) -> Result<Option<PathBuf>, EngineError> {
    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    for entry in read_dir(folder)? {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_document_name(&name, config) && path.is_file() {
            candidates.push((name, path));
        }
    }
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    if candidates.len() > 1 {
        warn!(
            "Found {} confidence documents in '{}'; using '{}'.",
            candidates.len(),
            folder.display(),
            candidates[0].0
        );
    }
    Ok(candidates.into_iter().next().map(|(_, path)| path))
}

fn is_document_name(name: &str, config: &ScanConfig) -> bool {
    name.ends_with(&config.document_suffix)
        && !config
            .ignored_suffixes
            .iter()
            .any(|ignored| name.ends_with(ignored.as_str()))
}

fn read_dir(path: &Path) -> Result<Vec<fs::DirEntry>, EngineError> {
    let to_error = |e| EngineError::Scan {
        path: path.to_path_buf(),
        source: e,
    };
    fs::read_dir(path)
        .map_err(to_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_error)
}
