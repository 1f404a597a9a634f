//! Timestamped messages shown at the prompt

use crate::error::Result;
use crate::input::Terminal;
use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }
}

/// `HH:MM:SS [LEVEL]: details`
pub fn format_line(level: LogLevel, details: &str) -> String {
    format!("{} [{}]: {}", Local::now().format("%H:%M:%S"), level.label(), details)
}

/// Write a console line and mirror it to the tracing log
pub fn log<T: Terminal + ?Sized>(term: &mut T, level: LogLevel, details: &str) -> Result<()> {
    match level {
        LogLevel::Info => tracing::info!("{}", details),
        LogLevel::Warn => tracing::warn!("{}", details),
        LogLevel::Error | LogLevel::Fatal => tracing::error!("{}", details),
    }
    term.write(&format_line(level, details))?;
    term.write("\n")
}
