//! JSON appender for structured logging

use crate::core::{Appender, Record, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON file appender for structured logging
///
/// Writes each record as a single-line JSON object (JSONL format) with every
/// record field plus the template output under `rendered`.
/// Compatible with log aggregation tools like ELK, Loki, etc.
pub struct JsonAppender {
    writer: BufWriter<File>,
    pretty: bool,
}

impl JsonAppender {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path, false)
    }

    /// Multi-line pretty-printed objects instead of JSONL
    pub fn new_pretty<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path, true)
    }

    fn open<P: AsRef<Path>>(path: P, pretty: bool) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            pretty,
        })
    }
}

/// JSON object for `record` with the rendered line attached
pub fn to_json_value(rendered: &str, record: &Record) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(record)?;
    if let serde_json::Value::Object(map) = &mut value {
        map.insert(
            "rendered".to_string(),
            serde_json::Value::String(rendered.to_string()),
        );
    }
    Ok(value)
}

impl Appender for JsonAppender {
    fn name(&self) -> &str {
        "json"
    }

    fn append(&mut self, rendered: &str, record: &Record) -> Result<()> {
        let value = to_json_value(rendered, record)?;

        let json = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };

        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogContext, LogLevel};
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn scope(path: &[&str]) -> Arc<[String]> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_json_appender() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test.jsonl");

        let mut appender = JsonAppender::new(&log_path)?;

        let context = LogContext::new()
            .with_field("user_id", 123)
            .with_field("action", "login");

        let record = Record::new(LogLevel::Info, scope(&["auth"]), "User logged in")
            .with_context(context);

        appender.append("[INFO] auth: User logged in", &record)?;
        appender.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let parsed: serde_json::Value = serde_json::from_str(content.trim_end())?;
        assert_eq!(parsed["message"], "User logged in");
        assert_eq!(parsed["rendered"], "[INFO] auth: User logged in");
        assert_eq!(parsed["scope"][0], "auth");
        assert_eq!(parsed["context"]["user_id"], 123);

        Ok(())
    }

    #[test]
    fn test_json_appender_multiple_records() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test_multiple.jsonl");

        let mut appender = JsonAppender::new(&log_path)?;

        for i in 0..5 {
            let context = LogContext::new().with_field("iteration", i);
            let message = format!("Iteration {}", i);
            let record =
                Record::new(LogLevel::Debug, scope(&["loop"]), message.clone()).with_context(context);

            appender.append(&message, &record)?;
        }

        appender.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);

        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert!(parsed["message"].is_string());
            assert!(parsed["level"].is_string());
            assert!(parsed["rendered"].is_string());
        }

        Ok(())
    }
}
