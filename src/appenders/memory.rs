//! In-memory appender, mostly for tests and diagnostics

use crate::core::{Appender, Record, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects rendered lines and their records in memory
///
/// Clones share the same buffer, so keep one clone to inspect what a config
/// wrote after handing the other to the builder.
///
/// ```
/// use scoped_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let config = LoggerConfig::builder()
///     .with_template("{level:lower} {message}")
///     .on_unresolved_token(UnresolvedTokenPolicy::Fail)
///     .with_appender(memory.clone())
///     .build()
///     .unwrap();
///
/// let registry = ScopeRegistry::new(config);
/// registry.root().warn("disk almost full").unwrap();
/// assert_eq!(memory.lines(), vec!["warn disk almost full"]);
/// ```
#[derive(Clone, Default)]
pub struct MemoryAppender {
    captured: Arc<Mutex<Vec<(String, Record)>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.captured
            .lock()
            .iter()
            .map(|(line, _)| line.clone())
            .collect()
    }

    pub fn records(&self) -> Vec<Record> {
        self.captured
            .lock()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.captured.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.lock().is_empty()
    }

    pub fn clear(&self) {
        self.captured.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, rendered: &str, record: &Record) -> Result<()> {
        self.captured
            .lock()
            .push((rendered.to_string(), record.clone()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
