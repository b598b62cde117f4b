//! Log level definitions and severity resolution
//!
//! GELF carries syslog severities: 1 is the most severe. A caller may name a
//! level, pass a raw numeric code, or pass nothing at all. [`resolve`] turns
//! any of those into the number written to the record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric severity as it appears in the `level` field
pub type SeverityLevel = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Emergency = 1,
    Alert = 2,
    Critical = 3,
    Error = 4,
    Warning = 5,
    Notice = 6,
    Info = 7,
    Debug = 8,
}

impl LogLevel {
    pub const ALL: [LogLevel; 8] = [
        LogLevel::Emergency,
        LogLevel::Alert,
        LogLevel::Critical,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Notice,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    pub fn code(&self) -> SeverityLevel {
        *self as SeverityLevel
    }

    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Emergency => "emergency",
            LogLevel::Alert => "alert",
            LogLevel::Critical => "critical",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Notice => "notice",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "emergency" => Ok(LogLevel::Emergency),
            "alert" => Ok(LogLevel::Alert),
            "critical" => Ok(LogLevel::Critical),
            "error" => Ok(LogLevel::Error),
            "warning" => Ok(LogLevel::Warning),
            "notice" => Ok(LogLevel::Notice),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// The `level` argument of a log call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Severity {
    /// No level given; the logger's default applies
    #[default]
    Unspecified,
    /// A raw numeric code, passed through without range checks
    Code(SeverityLevel),
    /// A level name, looked up in the fixed table
    Name(String),
}

impl From<LogLevel> for Severity {
    fn from(level: LogLevel) -> Self {
        Severity::Code(level.code())
    }
}

impl From<i64> for Severity {
    fn from(code: i64) -> Self {
        Severity::Code(code)
    }
}

impl From<i32> for Severity {
    fn from(code: i32) -> Self {
        Severity::Code(code as i64)
    }
}

impl From<&str> for Severity {
    fn from(name: &str) -> Self {
        Severity::Name(name.to_string())
    }
}

impl From<String> for Severity {
    fn from(name: String) -> Self {
        Severity::Name(name)
    }
}

impl<T: Into<Severity>> From<Option<T>> for Severity {
    fn from(level: Option<T>) -> Self {
        level.map_or(Severity::Unspecified, Into::into)
    }
}

/// Resolve a severity to its numeric level
///
/// Names are matched exactly against the table (`"info"` → 7). Unknown
/// names and an unspecified level both fall back to `default_level`.
pub fn resolve(level: &Severity, default_level: SeverityLevel) -> SeverityLevel {
    match level {
        Severity::Unspecified => default_level,
        Severity::Code(code) => *code,
        Severity::Name(name) => LogLevel::ALL
            .iter()
            .find(|candidate| candidate.name() == name.as_str())
            .map_or(default_level, LogLevel::code),
    }
}
