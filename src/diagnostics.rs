//! Diagnostics emitted while filtering.
//!
//! Events go to one of two channels: informational and warning events to the `info` sink,
//! error events to the `error` sink. A [`Diagnostics`] value is passed explicitly into the
//! pipeline, so each run decides where its events end up. Every line has the shape
//! `LEVEL - message`.

use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::rc::Rc;

use anyhow::{Context, Result};
use log::Level;

/// Somewhere diagnostic events can be appended to.
pub trait DiagnosticSink {
    fn emit(&mut self, level: Level, message: &str);
}

/// Formats an event as `LEVEL - message`.
pub fn format_event(level: Level, message: &str) -> String {
    format!("{level} - {message}")
}

/// Forwards events to the process logger.
#[derive(Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, level: Level, message: &str) {
        log!(level, "{message}");
    }
}

/// Appends events to a file, and forwards them to the process logger.
pub struct FileSink {
    path: String,
    file: File,
}

impl FileSink {
    /// Opens `path` for appending, creating it if it does not exist.
    pub fn append(path: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Unable to open log file {path}"))?;

        Ok(FileSink {
            path: path.to_string(),
            file,
        })
    }
}

impl DiagnosticSink for FileSink {
    fn emit(&mut self, level: Level, message: &str) {
        log!(level, "{message}");

        if let Err(e) = writeln!(self.file, "{}", format_event(level, message)) {
            warn!("Could not write to {}: {e}", self.path);
        }
    }
}

/// Keeps events in memory. Clones share the same buffer.
#[derive(Default, Clone)]
pub struct MemorySink(Rc<RefCell<Vec<String>>>);

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The events recorded so far, formatted as `LEVEL - message`.
    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, level: Level, message: &str) {
        self.0.borrow_mut().push(format_event(level, message));
    }
}

/// The two diagnostic channels of a filtering run.
pub struct Diagnostics {
    info: Box<dyn DiagnosticSink>,
    error: Box<dyn DiagnosticSink>,
}

impl Default for Diagnostics {
    /// Both channels forward to the process logger.
    fn default() -> Self {
        Diagnostics::new(LogSink, LogSink)
    }
}

impl Diagnostics {
    pub fn new(info: impl DiagnosticSink + 'static, error: impl DiagnosticSink + 'static) -> Self {
        Diagnostics {
            info: Box::new(info),
            error: Box::new(error),
        }
    }

    /// Replaces the info/warning channel.
    pub fn with_info_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.info = Box::new(sink);
        self
    }

    /// Replaces the error channel.
    pub fn with_error_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.error = Box::new(sink);
        self
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.info.emit(Level::Info, message.as_ref());
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.info.emit(Level::Warn, message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.error.emit(Level::Error, message.as_ref());
    }
}
