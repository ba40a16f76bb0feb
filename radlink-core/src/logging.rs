//! Minimal diagnostic logger for the receiver core.
//!
//! Deliberately not `log`/`tracing`: the core crate only ever needs to
//! report a handful of named, per-subsystem events (framer resync,
//! CRC-16 drops, config rejects) and the CLI crate owns the richer
//! structured sink. Kept subsystem- and level-filterable so a future sink
//! swap doesn't require touching call sites.

use std::io::Write;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

enum Sink {
    Writer(Mutex<Box<dyn Write + Send>>),
    Discard,
}

/// Level- and subsystem-filtered logger. Construct once at startup and
/// share by reference; interior mutability is confined to the write sink.
pub struct SignalLogger {
    sink: Sink,
    min_level: Level,
}

impl SignalLogger {
    pub fn new(writer: Box<dyn Write + Send>, min_level: Level) -> Self {
        Self {
            sink: Sink::Writer(Mutex::new(writer)),
            min_level,
        }
    }

    /// A logger that discards every event. Used in tests and wherever a
    /// caller has no interest in diagnostics.
    pub fn silent() -> Self {
        Self {
            sink: Sink::Discard,
            min_level: Level::Error,
        }
    }

    pub fn log(&self, level: Level, subsystem: &str, message: &str) {
        if level < self.min_level {
            return;
        }
        let Sink::Writer(writer) = &self.sink else {
            return;
        };
        let mut writer = writer.lock().expect("signal logger mutex poisoned");
        let _ = writeln!(writer, "[{level:?}] {subsystem}: {message}");
    }

    pub fn debug(&self, subsystem: &str, message: &str) {
        self.log(Level::Debug, subsystem, message);
    }

    pub fn info(&self, subsystem: &str, message: &str) {
        self.log(Level::Info, subsystem, message);
    }

    pub fn warn(&self, subsystem: &str, message: &str) {
        self.log(Level::Warn, subsystem, message);
    }

    pub fn error(&self, subsystem: &str, message: &str) {
        self.log(Level::Error, subsystem, message);
    }
}
