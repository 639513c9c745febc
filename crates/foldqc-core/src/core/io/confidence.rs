use crate::core::models::document::ConfidenceDocument;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read confidence document '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed confidence document '{path}': {source}", path = path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Json { path, .. } => path,
        }
    }
}

/// Parses a confidence document from any reader.
///
/// Only JSON well-formedness and the basic shape of the two known fields are
/// checked. Unknown keys are ignored.
pub fn read_from(reader: impl Read) -> Result<ConfidenceDocument, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Opens and parses the confidence document at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be opened or read and
/// [`LoadError::Json`] if its content is not a valid document.
pub fn load(path: &Path) -> Result<ConfidenceDocument, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_from(BufReader::new(file)).map_err(|e| {
        if e.is_io() {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e.into(),
            }
        } else {
            LoadError::Json {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_succeeds_with_valid_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job_confidences.json");
        fs::write(
            &path,
            r#"{"atom_plddts": [90.0, 80.0, 70.0], "pae": [[0.0]], "atom_chain_ids": ["A"]}"#,
        )
        .unwrap();

        let doc = load(&path).unwrap();
        assert_eq!(doc.atom_confidences, Some(vec![90.0, 80.0, 70.0]));
        assert_eq!(doc.pairwise_error, Some(vec![vec![0.0]]));
    }

    #[test]
    fn load_accepts_document_without_known_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job_confidences.json");
        fs::write(&path, "{}").unwrap();

        let doc = load(&path).unwrap();
        assert_eq!(doc, ConfidenceDocument::default());
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent_confidences.json");
        let result = load(&path);
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_truncated_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job_confidences.json");
        fs::write(&path, r#"{"atom_plddts": [90.0, 80.0"#).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn load_fails_for_wrongly_shaped_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job_confidences.json");
        fs::write(&path, r#"{"pae": [1.0, 2.0]}"#).unwrap();

        assert!(matches!(load(&path), Err(LoadError::Json { .. })));
    }

    #[test]
    fn read_from_parses_in_memory_bytes() {
        let doc = read_from(&br#"{"atom_plddts": []}"#[..]).unwrap();
        assert_eq!(doc.atom_confidences, Some(vec![]));
        assert!(doc.pairwise_error.is_none());
    }
}
