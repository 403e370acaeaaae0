//! File appender implementation

use crate::core::{Appender, LoggerError, Record, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one rendered line per record to a file
pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileAppender {
    /// Open `path` for appending, creating it if missing
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = Some(BufWriter::new(file));

        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&mut self, rendered: &str, _record: &Record) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        writer.write_all(rendered.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_file_appender_appends_lines() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("app.log");
        let record = Record::new(LogLevel::Info, Arc::from(Vec::new()), "ignored");

        {
            let mut appender = FileAppender::new(&log_path)?;
            appender.append("first", &record)?;
            appender.append("second", &record)?;
            appender.flush()?;
        }
        {
            let mut appender = FileAppender::new(&log_path)?;
            appender.append("third", &record)?;
        }

        let content = fs::read_to_string(&log_path)?;
        assert_eq!(content, "first\nsecond\nthird\n");
        Ok(())
    }

    #[test]
    fn test_unopenable_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no_such_dir").join("app.log");
        assert!(matches!(
            FileAppender::new(missing),
            Err(LoggerError::IoError(_))
        ));
    }
}
