//! Conversion progress logging.
//!
//! Info and success entries go to stdout, warnings and errors to stderr.
//! Quiet mode hides stdout progress only.

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Terminal rendering of this entry
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "  ",
            LogLevel::Success => "✅",
            LogLevel::Warning => "⚠️ ",
            LogLevel::Error => "❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global logger
pub static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// Prints log entries to the terminal
pub struct Logger {
    quiet: AtomicBool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            quiet: AtomicBool::new(false),
        }
    }

    /// Stop printing info and success entries; warnings and errors still
    /// print.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    /// Whether an entry of this level is printed
    pub fn is_shown(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Info | LogLevel::Success => !self.quiet.load(Ordering::Relaxed),
            LogLevel::Warning | LogLevel::Error => true,
        }
    }

    pub fn log(&self, entry: LogEntry) {
        if !self.is_shown(entry.level) {
            return;
        }
        match entry.level {
            LogLevel::Info | LogLevel::Success => println!("{}", entry.render()),
            LogLevel::Warning | LogLevel::Error => eprintln!("{}", entry.render()),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_warning_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::warning(msg).with_indent(indent));
}
