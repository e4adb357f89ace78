//! Injected logging interface.
//!
//! Components receive an `Arc<dyn Logger>` at construction instead of
//! reaching for a global. [`TracingLogger`] forwards to `tracing`.

use serde_json::Value;
use shaku::{Component, Interface};
use std::fmt::{self, Display};

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// Logging sink taking `(message, tag, metadata)`.
pub trait Logger: Interface {
    /// Records a message at the given level.
    fn log(&self, level: LogLevel, message: &str, tag: &str, metadata: &Value);

    fn debug(&self, message: &str, tag: &str, metadata: &Value) {
        self.log(LogLevel::Debug, message, tag, metadata);
    }

    fn info(&self, message: &str, tag: &str, metadata: &Value) {
        self.log(LogLevel::Info, message, tag, metadata);
    }

    fn warn(&self, message: &str, tag: &str, metadata: &Value) {
        self.log(LogLevel::Warn, message, tag, metadata);
    }

    fn error(&self, message: &str, tag: &str, metadata: &Value) {
        self.log(LogLevel::Error, message, tag, metadata);
    }
}

/// [`Logger`] backed by `tracing` events.
#[derive(Component, Debug, Default, Clone, Copy)]
#[shaku(interface = Logger)]
pub struct TracingLogger {}

impl TracingLogger {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, tag: &str, metadata: &Value) {
        match level {
            LogLevel::Debug => tracing::debug!(tag = %tag, metadata = %metadata, "{}", message),
            LogLevel::Info => tracing::info!(tag = %tag, metadata = %metadata, "{}", message),
            LogLevel::Warn => tracing::warn!(tag = %tag, metadata = %metadata, "{}", message),
            LogLevel::Error => tracing::error!(tag = %tag, metadata = %metadata, "{}", message),
        }
    }
}
