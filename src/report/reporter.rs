//! Error reporting
//!
//! Turns the codes collected across a chain into the terminal error
//! payload, and mirrors each code into an append-only log file. The log
//! line format is fixed so the file can be parsed back into structured
//! entries.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::ErrorEntry;

static LOG_LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(.*?)\] Shortcode: (.*?) \| Message: (.*)$").expect("log pattern is valid")
});

/// RFC 3339 timestamp used in payloads and envelopes.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Runtime environment controlling how much error detail is exposed.
///
/// Production renders a reduced payload and writes the log; development
/// renders every collected code and skips the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

/// Reporter configuration.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Append-only log destination
    pub log_file: PathBuf,
    /// Expose full error details regardless of environment
    pub display_errors: bool,
    pub environment: Environment,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("error_log.txt"),
            display_errors: false,
            environment: Environment::Production,
        }
    }
}

/// A parsed line from the error log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedError {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

/// Terminal error payload handed back by `run`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    codes: Vec<String>,
    payload: Value,
}

impl ErrorReport {
    /// Shortcodes that produced this report, in arrival order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// The structured payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Whether any collected code starts with `code` (detail suffixes on
    /// shortcodes are ignored).
    pub fn contains(&self, code: &str) -> bool {
        self.codes
            .iter()
            .any(|collected| collected == code || collected.starts_with(&format!("{code}:")))
    }

    /// Renders the payload as pretty JSON text.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.payload).expect("report serialization cannot fail")
    }
}

/// Maps collected codes to messages, appends log lines and renders the
/// terminal payload.
pub struct Reporter {
    config: ReporterConfig,
}

impl Reporter {
    pub fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    /// Processes the collected entries: one log line per code, then the
    /// rendered payload. Detail is folded into both the shortcode and the
    /// message.
    pub fn handle(&self, entries: &[ErrorEntry]) -> ErrorReport {
        let mut detailed = Vec::with_capacity(entries.len());
        for entry in entries {
            let shortcode = entry.shortcode();
            let message = entry.message();
            self.append_log(&shortcode, &message);
            detailed.push(json!({"code": shortcode, "message": message}));
        }

        let payload = if self.config.display_errors
            || self.config.environment == Environment::Development
        {
            json!({
                "status": "error",
                "errors": detailed,
                "timestamp": timestamp(),
            })
        } else {
            let last = entries.last().map(ErrorEntry::shortcode).unwrap_or_default();
            json!({
                "status": "error",
                "code": last,
                "message": "An error occurred. Please contact support.",
                "timestamp": timestamp(),
            })
        };

        ErrorReport {
            codes: entries.iter().map(ErrorEntry::shortcode).collect(),
            payload,
        }
    }

    /// Appends one line to the log file. Logging only happens in the
    /// production environment; a line that cannot be written is dropped.
    fn append_log(&self, shortcode: &str, message: &str) {
        if self.config.environment != Environment::Production {
            return;
        }

        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{stamp}] Shortcode: {shortcode} | Message: {message}\n");

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.log_file)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(err) = written {
            tracing::warn!(path = %self.config.log_file.display(), %err, "error log line dropped");
        }
    }

    /// Parses the log file back into structured entries. Malformed lines
    /// are skipped; a missing file yields an empty list.
    pub fn errors_log(&self) -> Vec<LoggedError> {
        let Ok(contents) = fs::read_to_string(&self.config.log_file) else {
            return Vec::new();
        };

        contents
            .lines()
            .filter_map(|line| {
                let captures = LOG_LINE_PATTERN.captures(line)?;
                Some(LoggedError {
                    timestamp: captures[1].to_string(),
                    code: captures[2].to_string(),
                    message: captures[3].to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, environment: Environment) -> ReporterConfig {
        ReporterConfig {
            log_file: dir.path().join("error_log.txt"),
            display_errors: false,
            environment,
        }
    }

    #[test]
    fn test_production_payload_is_reduced() {
        let dir = TempDir::new().unwrap();
        let reporter = Reporter::new(config_in(&dir, Environment::Production));

        let entries = vec![
            ErrorEntry::new(ErrorCode::OrderNoData),
            ErrorEntry::new(ErrorCode::QueryNoDataFound),
        ];
        let report = reporter.handle(&entries);

        let payload = report.payload();
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["code"], "QUERY|NODATAFOUND");
        assert_eq!(payload["message"], "An error occurred. Please contact support.");
        assert!(payload.get("errors").is_none());
    }

    #[test]
    fn test_development_payload_lists_every_code() {
        let dir = TempDir::new().unwrap();
        let reporter = Reporter::new(config_in(&dir, Environment::Development));

        let entries = vec![
            ErrorEntry::new(ErrorCode::OrderNoData),
            ErrorEntry::with_detail(ErrorCode::InsertExtraKey, "mayor"),
        ];
        let report = reporter.handle(&entries);

        let errors = report.payload()["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["code"], "ORDER|NODATA");
        assert_eq!(errors[1]["code"], "INSERT|EXTRAKEY: mayor");
        assert!(report.contains("INSERT|EXTRAKEY"));
    }

    #[test]
    fn test_log_lines_round_trip() {
        let dir = TempDir::new().unwrap();
        let reporter = Reporter::new(config_in(&dir, Environment::Production));

        reporter.handle(&[ErrorEntry::new(ErrorCode::JsonInvalid)]);
        reporter.handle(&[ErrorEntry::with_detail(ErrorCode::BetweenInvalidKey, "area")]);

        let logged = reporter.errors_log();
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[0].code, "JSON|INVALID");
        assert_eq!(logged[0].message, ErrorCode::JsonInvalid.message());
        assert_eq!(logged[1].code, "BETWEEN|INVALIDKEY: area");
    }

    #[test]
    fn test_development_environment_does_not_log() {
        let dir = TempDir::new().unwrap();
        let reporter = Reporter::new(config_in(&dir, Environment::Development));

        reporter.handle(&[ErrorEntry::new(ErrorCode::JsonInvalid)]);
        assert!(reporter.errors_log().is_empty());
    }

    #[test]
    fn test_missing_log_file_yields_empty() {
        let dir = TempDir::new().unwrap();
        let reporter = Reporter::new(config_in(&dir, Environment::Production));
        assert!(reporter.errors_log().is_empty());
    }

    #[test]
    fn test_malformed_log_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, Environment::Production);
        fs::write(&config.log_file, "not a log line\n").unwrap();

        let reporter = Reporter::new(config);
        reporter.handle(&[ErrorEntry::new(ErrorCode::DataEmpty)]);

        let logged = reporter.errors_log();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].code, "DATA|EMPTY");
    }
}
