//! Timestamp formatting for the `{timestamp}` token
//!
//! Supports ISO 8601, RFC 3339, Unix timestamps, and custom strftime formats.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options
///
/// The configured format is what `{timestamp}` renders when the placeholder has
/// no arguments. Arguments select a format per placeholder:
///
/// ```
/// use scoped_logger::core::TimestampFormat;
///
/// let args = vec!["unix_ms".to_string()];
/// assert_eq!(TimestampFormat::from_token_args(&args), Some(TimestampFormat::UnixMillis));
///
/// // strftime patterns contain the ':' separator, so the pieces are re-joined
/// let args: Vec<String> = ["%H", "%M", "%S"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(
///     TimestampFormat::from_token_args(&args),
///     Some(TimestampFormat::Custom("%H:%M:%S".to_string()))
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Seconds since the epoch
    Unix,

    /// Milliseconds since the epoch
    UnixMillis,

    /// Microseconds since the epoch
    UnixMicros,

    /// Any strftime-compatible pattern
    Custom(String),
}

impl TimestampFormat {
    /// Format `datetime`; a malformed custom pattern is an error, never a panic
    pub fn format(&self, datetime: &DateTime<Utc>) -> Result<String> {
        let text = match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(pattern) => {
                let mut text = String::with_capacity(pattern.len() * 2);
                write!(text, "{}", datetime.format(pattern))
                    .map_err(|_| invalid_pattern(pattern))?;
                text
            }
        };
        Ok(text)
    }

    /// Reject custom patterns containing specifiers strftime does not know
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(pattern) = self {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(invalid_pattern(pattern));
            }
        }
        Ok(())
    }

    /// Select a format from placeholder arguments
    ///
    /// Returns `None` when there are no arguments, meaning "use the configured
    /// default". Unknown keywords are treated as strftime patterns.
    #[must_use]
    pub fn from_token_args(args: &[String]) -> Option<Self> {
        let first = args.first()?;
        if args.len() == 1 {
            if let Some(named) = Self::from_keyword(first) {
                return Some(named);
            }
        }
        Some(TimestampFormat::Custom(args.join(":")))
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "iso8601" => Some(TimestampFormat::Iso8601),
            "iso8601_micros" => Some(TimestampFormat::Iso8601Micros),
            "rfc3339" => Some(TimestampFormat::Rfc3339),
            "unix" => Some(TimestampFormat::Unix),
            "unix_ms" => Some(TimestampFormat::UnixMillis),
            "unix_us" => Some(TimestampFormat::UnixMicros),
            _ => None,
        }
    }
}

fn invalid_pattern(pattern: &str) -> LoggerError {
    LoggerError::config(
        "TimestampFormat",
        format!("invalid strftime pattern '{}'", pattern),
    )
}
