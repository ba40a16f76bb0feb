//! Structured event sink for the CLI: every startup, shutdown, and
//! decoded-record event is emitted as one `LogEvent`, rendered in the
//! user's chosen format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Logfmt,
    Pretty,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent<'a> {
    pub timestamp: DateTime<Utc>,
    pub level: &'a str,
    pub subsystem: &'a str,
    pub message: String,
}

pub struct StructuredLogger {
    format: OutputFormat,
}

impl StructuredLogger {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn emit(&self, level: &str, subsystem: &str, message: impl Into<String>) {
        let event = LogEvent {
            timestamp: Utc::now(),
            level,
            subsystem,
            message: message.into(),
        };
        match self.format {
            OutputFormat::Json => {
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("{line}");
                }
            }
            OutputFormat::Logfmt => {
                println!(
                    "ts={} level={} subsystem={} msg={:?}",
                    event.timestamp.to_rfc3339(),
                    event.level,
                    event.subsystem,
                    event.message
                );
            }
            OutputFormat::Pretty => {
                println!(
                    "[{}] {:>5} {:<10} {}",
                    event.timestamp.format("%H:%M:%S"),
                    event.level.to_uppercase(),
                    event.subsystem,
                    event.message
                );
            }
        }
    }

    pub fn info(&self, subsystem: &str, message: impl Into<String>) {
        self.emit("info", subsystem, message);
    }

    pub fn warn(&self, subsystem: &str, message: impl Into<String>) {
        self.emit("warn", subsystem, message);
    }

    pub fn error(&self, subsystem: &str, message: impl Into<String>) {
        self.emit("error", subsystem, message);
    }
}
