// src/main.rs
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use attendance_core::cli::{self, Cli};
use attendance_core::config::{AppConfig, ConfigError};
use attendance_core::csv_report::{CsvReport, ReportError};
use attendance_core::daily_run::{self, DailyAttendance};
use attendance_core::logging;
use attendance_core::punch_loader::JsonPunchFile;
use attendance_core::reporter::TracingReporter;
use attendance_core::roster_client::RosterClient;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Report could not be written: {0}")]
    Report(#[from] ReportError),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Cli::parse();

    let mut config = AppConfig::from_env().map_err(AppError::from)?;
    args.apply_overrides(&mut config);
    config.validate().map_err(AppError::from)?;

    let now = Local::now();
    let date = cli::resolve_date(args.date, now.date_naive());

    // Logging problems never stop the run.
    let _logging = match logging::init_logging(&config.logs_dir, date, now.naive_local()) {
        Ok(setup) => {
            match &setup.log_file {
                Ok(path) => info!("Logger configured: {}", path.display()),
                Err(e) => warn!("Logging to stdout only: {}", e),
            }
            Some(setup)
        }
        Err(e) => {
            eprintln!("Logger setup failed, continuing without logs: {}", e);
            None
        }
    };

    let report_path = run(&config, date)
        .await
        .with_context(|| format!("Attendance run for {} failed", date))?;
    info!("Attendance report for {} saved to {}", date, report_path.display());

    Ok(())
}

// Extract, transform, load for one day.
async fn run(config: &AppConfig, date: NaiveDate) -> Result<PathBuf, AppError> {
    info!("Processing attendance for {}", date);
    let reporter = TracingReporter;

    let roster_client = RosterClient::new(config.roster_client_config());
    let roster = daily_run::load_roster_or_empty(roster_client, &reporter).await;

    let punch_file = JsonPunchFile::new(&config.punches_path);
    info!("Loading punches from {}", punch_file.path().display());
    let raw_punches = daily_run::load_punches(&punch_file, date, &reporter);

    let day = daily_run::process_day(&roster, &raw_punches, date, &reporter);
    log_summary(&day);

    Ok(CsvReport::new(&config.output_dir).write(date, &day.results)?)
}

fn log_summary(day: &DailyAttendance) {
    let tally = &day.tally;
    info!("===== ATTENDANCE SUMMARY {} =====", day.date);
    info!("Total employees: {}", tally.total());
    info!("Attended: {}", tally.attended());
    info!("Absent: {}", tally.absent);
    info!("Incomplete: {}", tally.incomplete);
    info!(
        "Assisted: {}, Late: {}, In progress: {}",
        tally.assisted, tally.late, tally.in_progress
    );
    let flagged = day.results.iter().filter(|r| r.out_of_order).count();
    if flagged > 0 {
        info!("Out-of-order punch days: {}", flagged);
    }
    info!("=================================");
}
