//! Console appender implementation

use crate::core::{Appender, LogLevel, Record, Result};
use colored::Colorize;

/// Writes rendered lines to stdout, or stderr for `Error` and `Fatal`
pub struct ConsoleAppender {
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn paint(&self, rendered: &str, level: LogLevel) -> String {
        if self.use_colors {
            rendered.color(level.color_code()).to_string()
        } else {
            rendered.to_string()
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, rendered: &str, record: &Record) -> Result<()> {
        let output = self.paint(rendered, record.level());

        match record.level() {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        // Both streams are written to
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
