// src/csv_report.rs
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::attendance_resolver::{AttendanceResult, AttendanceStatus};
use crate::punch_records::EmployeeId;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Column order of the report. Downstream payroll imports rely on it.
pub const CSV_HEADERS: [&str; 6] = [
    "employee_id",
    "name",
    "entry_time",
    "exit_time",
    "worked_duration",
    "status",
];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("File I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct AttendanceRow<'a> {
    employee_id: EmployeeId,
    name: &'a str,
    entry_time: String,
    exit_time: String,
    worked_duration: String,
    status: AttendanceStatus,
}

impl<'a> From<&'a AttendanceResult> for AttendanceRow<'a> {
    fn from(result: &'a AttendanceResult) -> Self {
        Self {
            employee_id: result.employee_id,
            name: &result.name,
            entry_time: result.entry_time_display(),
            exit_time: result.exit_time_display(),
            worked_duration: result.worked_duration.to_string(),
            status: result.status,
        }
    }
}

/// Writes one `attendance_report_YYYYMMDD.csv` per processed day.
#[derive(Debug, Clone)]
pub struct CsvReport {
    output_dir: PathBuf,
}

impl CsvReport {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn report_path(&self, date: NaiveDate) -> PathBuf {
        self.output_dir
            .join(format!("attendance_report_{}.csv", date.format("%Y%m%d")))
    }

    /// Writes the header and one row per result, in the given order.
    pub fn write(
        &self,
        date: NaiveDate,
        results: &[AttendanceResult],
    ) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.output_dir).map_err(|e| ReportError::Io {
            source: e,
            context: format!("creating {}", self.output_dir.display()),
        })?;

        let path = self.report_path(date);
        write_rows(&path, results)?;

        info!("CSV report written: {}", path.display());
        Ok(path)
    }
}

fn write_rows(path: &Path, results: &[AttendanceResult]) -> Result<(), ReportError> {
    // Headers are written by hand so an empty roster still gets them.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(CSV_HEADERS)?;
    for result in results {
        writer.serialize(AttendanceRow::from(result))?;
    }
    writer.flush().map_err(|e| ReportError::Io {
        source: e,
        context: format!("flushing {}", path.display()),
    })?;
    Ok(())
}
