// src/cli.rs
use chrono::NaiveDate;
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::punch_records::DATE_FORMAT;

#[derive(Parser, Debug)]
#[command(
    name = "attendance-core",
    version,
    about = "Derives daily attendance from time-clock punches and saves to CSV"
)]
pub struct Cli {
    /// Day to process (YYYY-MM-DD). Prompts on a terminal when omitted.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// JSON export of time-clock punches
    #[arg(long)]
    pub punches: Option<PathBuf>,

    /// Directory for the CSV report
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Directory for run logs
    #[arg(long)]
    pub logs_dir: Option<PathBuf>,

    /// Roster endpoint returning [{"id": .., "name": ..}, ..]
    #[arg(long)]
    pub roster_url: Option<String>,
}

impl Cli {
    /// Flags win over the environment.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(path) = &self.punches {
            config.punches_path = path.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.logs_dir {
            config.logs_dir = dir.clone();
        }
        if let Some(url) = &self.roster_url {
            config.roster_url = url.clone();
        }
    }
}

/// Interprets the answer to the date prompt. Empty input means today.
pub fn date_from_input(input: &str, today: NaiveDate) -> Result<NaiveDate, chrono::ParseError> {
    let input = input.trim();
    if input.is_empty() {
        Ok(today)
    } else {
        NaiveDate::parse_from_str(input, DATE_FORMAT)
    }
}

/// Picks the day to process: the `--date` flag, else the answer to a prompt
/// when stdin is a terminal, else today.
pub fn resolve_date(flag: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    if let Some(date) = flag {
        return date;
    }
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return today;
    }
    prompt_for_date(&mut stdin.lock(), &mut io::stdout(), today)
}

/// Asks for a date on `output` and reads one line from `input`. A bad or
/// unreadable answer falls back to today.
pub fn prompt_for_date(
    input: &mut impl BufRead,
    output: &mut impl Write,
    today: NaiveDate,
) -> NaiveDate {
    // Prompt problems are not worth aborting the run for.
    let _ = write!(
        output,
        "Enter the date to process (YYYY-MM-DD) or press Enter for today: "
    );
    let _ = output.flush();
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return today;
    }

    date_from_input(&answer, today).unwrap_or_else(|_| {
        let _ = writeln!(output, "Invalid date format. Using today's date ({}).", today);
        today
    })
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, DATE_FORMAT).unwrap()
    }

    #[test]
    fn blank_answer_means_today() {
        assert_eq!(date_from_input("  \n", d("2025-03-10")), Ok(d("2025-03-10")));
    }

    #[test]
    fn answer_is_parsed_as_iso_date() {
        assert_eq!(date_from_input("2024-12-31\n", d("2025-03-10")), Ok(d("2024-12-31")));
        assert!(date_from_input("31/12/2024", d("2025-03-10")).is_err());
    }

    #[test]
    fn date_flag_skips_the_prompt() {
        assert_eq!(resolve_date(Some(d("2024-01-02")), d("2025-03-10")), d("2024-01-02"));
    }

    #[test]
    fn prompt_answer_selects_the_day() {
        let mut input = io::Cursor::new("2024-12-31\n");
        let mut output = Vec::new();

        let date = prompt_for_date(&mut input, &mut output, d("2025-03-10"));

        assert_eq!(date, d("2024-12-31"));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with("Enter the date to process"));
        assert!(!shown.contains("Invalid date format"));
    }

    #[test]
    fn bad_prompt_answer_falls_back_to_today() {
        let mut input = io::Cursor::new("10/03/2025\n");
        let mut output = Vec::new();

        let date = prompt_for_date(&mut input, &mut output, d("2025-03-10"));

        assert_eq!(date, d("2025-03-10"));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.ends_with("Invalid date format. Using today's date (2025-03-10).\n"));
    }

    #[test]
    fn closed_stdin_means_today() {
        let mut input = io::Cursor::new("");
        let mut output = Vec::new();

        assert_eq!(
            prompt_for_date(&mut input, &mut output, d("2025-03-10")),
            d("2025-03-10")
        );
    }

    #[test]
    fn flags_override_configuration() {
        let cli = Cli::try_parse_from([
            "attendance-core",
            "--date",
            "2025-03-10",
            "--punches",
            "clock.json",
            "--roster-url",
            "http://localhost:9000/users",
        ])
        .unwrap();
        let mut config = AppConfig::from_vars(Vec::new()).unwrap();

        cli.apply_overrides(&mut config);

        assert_eq!(cli.date, Some(d("2025-03-10")));
        assert_eq!(config.punches_path, PathBuf::from("clock.json"));
        assert_eq!(config.roster_url, "http://localhost:9000/users");
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn malformed_date_flag_is_rejected() {
        assert!(Cli::try_parse_from(["attendance-core", "--date", "yesterday"]).is_err());
    }
}
