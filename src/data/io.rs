//! JSON Lines dataset file reading and writing.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::data::record::{Category, Labeled};
use crate::error::{AegisError, Result};

/// Read a dataset file: one JSON record per line, blank lines skipped.
///
/// A missing file or a file containing zero records is a fatal `Data`
/// error; the pipeline must not proceed on an empty dataset.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(AegisError::data(format!(
            "dataset file does not exist: {}",
            path.display()
        )));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(&line).map_err(|e| {
            AegisError::data(format!(
                "invalid record at {}:{}: {e}",
                path.display(),
                line_num + 1
            ))
        })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(AegisError::data(format!(
            "dataset file contains no records: {}",
            path.display()
        )));
    }

    Ok(records)
}

/// Write a dataset file: one JSON record per line.
///
/// Parent directories are created as needed.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(())
}

/// Per-category record counts in [`Category::ALL`] order.
pub fn label_distribution<T: Labeled>(records: &[T]) -> [usize; Category::COUNT] {
    let mut counts = [0usize; Category::COUNT];
    for record in records {
        counts[record.category().index()] += 1;
    }
    counts
}

/// Render a label distribution for log output.
pub fn format_distribution(counts: &[usize; Category::COUNT]) -> String {
    Category::ALL
        .iter()
        .map(|c| format!("{}({})={}", c.name(), c.label(), counts[c.index()]))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Record;

    #[test]
    fn test_read_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");

        let records = vec![
            Record {
                text: "hello".to_string(),
                category: Category::Positive,
            },
            Record {
                text: "".to_string(),
                category: Category::Negative,
            },
        ];

        write_records(&path, &records).unwrap();
        let back: Vec<Record> = read_records(&path).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_read_missing_file_is_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.jsonl");

        let result: Result<Vec<Record>> = read_records(&path);
        assert!(matches!(result, Err(AegisError::Data(_))));
    }

    #[test]
    fn test_read_empty_file_is_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        std::fs::write(&path, "\n\n").unwrap();

        let result: Result<Vec<Record>> = read_records(&path);
        assert!(matches!(result, Err(AegisError::Data(_))));
    }

    #[test]
    fn test_label_distribution() {
        let records = vec![
            Record {
                text: "a".to_string(),
                category: Category::Negative,
            },
            Record {
                text: "b".to_string(),
                category: Category::Negative,
            },
            Record {
                text: "c".to_string(),
                category: Category::Positive,
            },
        ];

        let counts = label_distribution(&records);
        assert_eq!(counts, [2, 0, 1]);
        let rendered = format_distribution(&counts);
        assert!(rendered.contains("Negative(-1)=2"));
        assert!(rendered.contains("Neutral(0)=0"));
    }
}
