// src/punch_loader.rs
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::punch_records::RawPunch;

pub const DEFAULT_PUNCHES_PATH: &str = "data/punch_records.json";

#[derive(Error, Debug)]
pub enum PunchSourceError {
    #[error("Punch file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("File I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("Punch file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Punch file must contain a JSON array, found {found}")]
    NotAnArray { found: &'static str },
}

/// Anything that can supply the raw punch entries for a day. Entries are
/// returned untyped; validation belongs to the record filter.
pub trait PunchSource {
    fn load_punches(&self, date: NaiveDate) -> Result<Vec<RawPunch>, PunchSourceError>;
}

/// A JSON array of punch objects on disk, usually the time-clock export.
#[derive(Debug, Clone)]
pub struct JsonPunchFile {
    path: PathBuf,
}

impl JsonPunchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PunchSource for JsonPunchFile {
    // The export holds several days; the date is applied by the record filter.
    fn load_punches(&self, _date: NaiveDate) -> Result<Vec<RawPunch>, PunchSourceError> {
        if !self.path.exists() {
            return Err(PunchSourceError::NotFound {
                path: self.path.clone(),
            });
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| PunchSourceError::Io {
            source: e,
            context: format!("reading {}", self.path.display()),
        })?;

        match serde_json::from_str::<Value>(&contents)? {
            Value::Array(entries) => {
                info!(
                    "Read {} raw punch entries from {}",
                    entries.len(),
                    self.path.display()
                );
                Ok(entries)
            }
            other => Err(PunchSourceError::NotAnArray {
                found: json_kind(&other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod punch_loader_tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_every_entry_untyped() {
        let file = file_with(
            r#"[
                {"cedula": 1, "fecha": "2025-03-10", "hora": "07:55:00", "tipo": "IN"},
                {"cedula": 1, "fecha": "2025-03-10"},
                42
            ]"#,
        );
        let punches = JsonPunchFile::new(file.path()).load_punches(day()).unwrap();
        assert_eq!(punches.len(), 3);
        assert_eq!(punches[2], serde_json::json!(42));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonPunchFile::new(dir.path().join("nope.json"));
        let err = source.load_punches(day()).unwrap_err();
        assert!(matches!(err, PunchSourceError::NotFound { .. }));
    }

    #[test]
    fn broken_json_is_a_parse_error() {
        let file = file_with(r#"[{"cedula": 1,"#);
        let err = JsonPunchFile::new(file.path()).load_punches(day()).unwrap_err();
        assert!(matches!(err, PunchSourceError::Json(_)));
    }

    #[test]
    fn top_level_object_is_rejected() {
        let file = file_with(r#"{"records": []}"#);
        let err = JsonPunchFile::new(file.path()).load_punches(day()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Punch file must contain a JSON array, found an object"
        );
    }
}
