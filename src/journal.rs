//! Append-only JSON-lines log of records, one record per line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::record::Record;

pub fn default_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("heatmark")
        .join("records.jsonl")
}

/// Validates and appends one record, creating the file and its parent
/// directories if needed.
pub fn append(path: &Path, record: &Record) -> Result<()> {
    record.validate().map_err(Error::RejectedRecord)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), project = %record.project, "appended record");
    Ok(())
}

/// Reads every record. A missing file is an empty journal.
pub fn load(path: &Path) -> Result<Vec<Record>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "journal not found, treating as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;
        let record: Record =
            serde_json::from_str(&line).map_err(|source| Error::Json { line: number, source })?;
        record.validate().map_err(|message| Error::InvalidRecord {
            line: number,
            message,
        })?;
        records.push(record);
    }

    tracing::debug!(path = %path.display(), count = records.len(), "loaded journal");
    Ok(records)
}
