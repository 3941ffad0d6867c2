//! Append-only session history log
//!
//! One CSV row per completed session:
//!
//! ```text
//! date,time,avg_rt_ms,fastest_ms,slowest_ms,all_trials_ms
//! 2024-03-01,09:30,155.0,150.0,160.0,150.0|160.0|155.0|158.0|152.0
//! ```
//!
//! Rows are only ever appended. Loading tolerates damaged rows by skipping
//! them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::summary::SessionSummary;

/// File name of the log inside the home directory
pub const LOG_FILE_NAME: &str = "reaction_time_log.csv";

/// Header row written when the log is created
pub const HEADER: &str = "date,time,avg_rt_ms,fastest_ms,slowest_ms,all_trials_ms";

/// Column holding the per-session average
pub const AVERAGE_COLUMN: &str = "avg_rt_ms";

/// Delta (ms) from the personal mean beyond which a session counts as faster/slower
pub const BASELINE_TOLERANCE_MS: f64 = 10.0;

const FIELD_COUNT: usize = 6;
const TRIAL_SEPARATOR: char = '|';

/// Errors decoding a single history row
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    Date(String),

    #[error("Invalid time '{0}' (expected HH:MM)")]
    Time(String),

    #[error("Invalid number '{value}' in field {field}")]
    Number { field: &'static str, value: String },
}

/// Errors reading or writing the history log
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Could not determine the home directory for the history log")]
    NoHomeDir,

    #[error("Failed to read history log {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write history log {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// `~/reaction_time_log.csv`
pub fn default_log_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(LOG_FILE_NAME))
        .ok_or(HistoryError::NoHomeDir)
}

/// One persisted session
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub date: NaiveDate,
    /// Minute precision
    pub time: NaiveTime,
    pub average_ms: f64,
    pub fastest_ms: f64,
    pub slowest_ms: f64,
    pub trials_ms: Vec<f64>,
}

impl HistoryRecord {
    /// Stamp a session summary with the local time it completed at
    pub fn from_summary(summary: &SessionSummary, completed_at: NaiveDateTime) -> Self {
        let time = completed_at.time();
        Self {
            date: completed_at.date(),
            time: NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time),
            average_ms: summary.average_ms(),
            fastest_ms: summary.fastest_ms(),
            slowest_ms: summary.slowest_ms(),
            trials_ms: summary.trials_ms().to_vec(),
        }
    }

    /// Format as one CSV row (no trailing newline)
    pub fn encode(&self) -> String {
        let trials = self
            .trials_ms
            .iter()
            .map(|ms| format!("{:.1}", ms))
            .collect::<Vec<_>>()
            .join("|");

        format!(
            "{},{},{:.1},{:.1},{:.1},{}",
            self.date.format("%Y-%m-%d"),
            self.time.format("%H:%M"),
            self.average_ms,
            self.fastest_ms,
            self.slowest_ms,
            trials
        )
    }

    /// Parse one CSV row produced by [`HistoryRecord::encode`]
    pub fn decode(line: &str) -> std::result::Result<Self, RecordError> {
        let fields = split_row(line);
        if fields.len() != FIELD_COUNT {
            return Err(RecordError::FieldCount {
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        }

        let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
            .map_err(|_| RecordError::Date(fields[0].to_string()))?;
        let time = NaiveTime::parse_from_str(fields[1], "%H:%M")
            .map_err(|_| RecordError::Time(fields[1].to_string()))?;

        let trials_ms = if fields[5].is_empty() {
            Vec::new()
        } else {
            fields[5]
                .split(TRIAL_SEPARATOR)
                .map(|value| parse_ms("all_trials_ms", value))
                .collect::<std::result::Result<Vec<_>, _>>()?
        };

        Ok(Self {
            date,
            time,
            average_ms: parse_ms("avg_rt_ms", fields[2])?,
            fastest_ms: parse_ms("fastest_ms", fields[3])?,
            slowest_ms: parse_ms("slowest_ms", fields[4])?,
            trials_ms,
        })
    }
}

/// Comma-separated fields of one log row, whitespace-trimmed
fn split_row(line: &str) -> Vec<&str> {
    line.trim_end().split(',').map(str::trim).collect()
}

fn parse_ms(field: &'static str, value: &str) -> std::result::Result<f64, RecordError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|ms| ms.is_finite())
        .ok_or_else(|| RecordError::Number {
            field,
            value: value.to_string(),
        })
}

/// History log on disk
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Averages of prior sessions for the personal baseline
    ///
    /// Returns `None` when the log is missing or holds fewer than two usable
    /// averages. Otherwise every average except the trailing one, in file
    /// order. Rows with a non-numeric average are skipped.
    pub fn load(&self) -> Result<Option<Vec<f64>>> {
        let mut averages = self.read_averages()?;
        if averages.len() > 1 {
            averages.pop();
            Ok(Some(averages))
        } else {
            Ok(None)
        }
    }

    /// Every well-formed record in file order
    pub fn load_records(&self) -> Result<Vec<HistoryRecord>> {
        let Some(content) = self.read_content()? else {
            return Ok(Vec::new());
        };

        let records = data_rows(&content)
            .filter_map(|(line_no, line)| match HistoryRecord::decode(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::debug!("Skipping history line {}: {}", line_no, e);
                    None
                }
            })
            .collect();

        Ok(records)
    }

    /// Append one record, creating the log with a header row if needed
    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        let write_err = |source: io::Error| HistoryError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;

        let mut chunk = String::new();
        if file.metadata().map_err(write_err)?.len() == 0 {
            tracing::debug!("Creating history log at {}", self.path.display());
            chunk.push_str(HEADER);
            chunk.push('\n');
        }
        chunk.push_str(&record.encode());
        chunk.push('\n');

        file.write_all(chunk.as_bytes()).map_err(write_err)?;
        Ok(())
    }

    /// Log text; bytes that are not UTF-8 become U+FFFD so their rows fail to parse
    fn read_content(&self) -> Result<Option<String>> {
        match fs::read(&self.path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => Ok(Some(content)),
                Err(e) => {
                    tracing::debug!(
                        "History log {} contains invalid UTF-8",
                        self.path.display()
                    );
                    Ok(Some(String::from_utf8_lossy(e.as_bytes()).into_owned()))
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(HistoryError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn read_averages(&self) -> Result<Vec<f64>> {
        let Some(content) = self.read_content()? else {
            return Ok(Vec::new());
        };

        let Some(header) = content.lines().find(|line| !line.trim().is_empty()) else {
            return Ok(Vec::new());
        };
        let Some(column) = split_row(header)
            .into_iter()
            .position(|name| name == AVERAGE_COLUMN)
        else {
            tracing::debug!("History header has no {} column", AVERAGE_COLUMN);
            return Ok(Vec::new());
        };

        let averages = data_rows(&content)
            .filter_map(|(line_no, line)| {
                let field = split_row(line).get(column).copied().unwrap_or("");
                match parse_ms(AVERAGE_COLUMN, field) {
                    Ok(average) => Some(average),
                    Err(e) => {
                        tracing::debug!("Skipping history line {}: {}", line_no, e);
                        None
                    }
                }
            })
            .collect();

        Ok(averages)
    }
}

/// Non-blank lines after the header, with 1-based line numbers
fn data_rows(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
        .skip(1)
}

/// How today's session compares with the personal mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineVerdict {
    /// More than 10 ms faster than usual
    Faster,
    /// More than 10 ms slower than usual
    Slower,
    /// Within 10 ms of usual
    Consistent,
}

/// Today's average against the mean of prior sessions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// Number of prior sessions averaged
    pub sessions: usize,
    pub personal_average_ms: f64,
    /// Today minus personal average (negative is faster)
    pub delta_ms: f64,
    pub verdict: BaselineVerdict,
}

impl Baseline {
    /// `None` when there are no prior averages
    pub fn compare(prior_averages: &[f64], today_ms: f64) -> Option<Self> {
        if prior_averages.is_empty() {
            return None;
        }

        let personal_average_ms =
            prior_averages.iter().sum::<f64>() / prior_averages.len() as f64;
        let delta_ms = today_ms - personal_average_ms;
        let verdict = if delta_ms < -BASELINE_TOLERANCE_MS {
            BaselineVerdict::Faster
        } else if delta_ms > BASELINE_TOLERANCE_MS {
            BaselineVerdict::Slower
        } else {
            BaselineVerdict::Consistent
        };

        Some(Self {
            sessions: prior_averages.len(),
            personal_average_ms,
            delta_ms,
            verdict,
        })
    }
}
