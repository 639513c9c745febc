use crate::core::models::artifacts::ReportRow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const REPORT_HEADER: [&str; 2] = ["Subfolder", "Average pLDDT"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write score report '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CSV error while writing score report '{path}': {source}", path = path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Serializes the header and all rows, in order, to `writer`.
pub fn write_to(rows: &[ReportRow], writer: impl Write) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REPORT_HEADER)?;
    for row in rows {
        csv_writer.write_record([row.job.as_str(), row.average.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the consolidated report to `path`, replacing any previous file.
pub fn write_to_path(rows: &[ReportRow], path: &Path) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_to(rows, io::BufWriter::new(file)).map_err(|e| ReportError::Csv {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn write_to_emits_header_and_rows_in_order() {
        let rows = vec![ReportRow::new("prot1", "80.00"), ReportRow::new("prot2", "0.00")];
        let mut buffer = Vec::new();
        write_to(&rows, &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Subfolder,Average pLDDT\nprot1,80.00\nprot2,0.00\n"
        );
    }

    #[test]
    fn write_to_with_no_rows_emits_header_only() {
        let mut buffer = Vec::new();
        write_to(&[], &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "Subfolder,Average pLDDT\n");
    }

    #[test]
    fn write_to_quotes_job_names_containing_commas() {
        let mut buffer = Vec::new();
        write_to(&[ReportRow::new("a,b", "1.00")], &mut buffer).unwrap();
        assert!(String::from_utf8(buffer).unwrap().ends_with("\"a,b\",1.00\n"));
    }

    #[test]
    fn write_to_path_overwrites_existing_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("average_plddt_scores.csv");
        fs::write(&path, "stale content that is longer than the new report\n".repeat(10)).unwrap();

        write_to_path(&[ReportRow::new("prot1", "80.00")], &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Subfolder,Average pLDDT\nprot1,80.00\n"
        );
    }

    #[test]
    fn write_to_path_fails_when_parent_is_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("report.csv");
        assert!(matches!(
            write_to_path(&[], &path),
            Err(ReportError::Io { .. })
        ));
    }
}
