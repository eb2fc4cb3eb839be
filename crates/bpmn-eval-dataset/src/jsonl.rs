//! Line-delimited JSON reading and writing.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::DatasetError;

/// Reads one JSON value per non-blank line.
pub fn read_jsonl<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>, DatasetError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| DatasetError::InvalidLine {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Writes `records` one per line, creating parent directories as needed.
pub fn write_jsonl<T: Serialize, P: AsRef<Path>>(
    path: P,
    records: &[T],
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads the string `field` of every record in a JSONL file.
///
/// Records missing the field contribute an empty string so that positions
/// still line up with a paired file.
pub fn read_field<P: AsRef<Path>>(path: P, field: &str) -> Result<Vec<String>, DatasetError> {
    let records: Vec<serde_json::Value> = read_jsonl(path)?;
    Ok(records
        .iter()
        .map(|record| {
            record
                .get(field)
                .and_then(|value| value.as_str())
                .unwrap_or_default()
                .to_string()
        })
        .collect())
}
