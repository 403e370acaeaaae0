//! Log record structure
//!
//! A [`Record`] is built once per enabled log call, handed to the renderer and
//! the bound appenders, then dropped. It is never mutated after construction.

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::sync::Arc;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<Arc<str>>>> = const { RefCell::new(None) };
}

fn current_thread_id() -> Arc<str> {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()).into())
            .clone()
    })
}

fn current_thread_name() -> Option<Arc<str>> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(Arc::from))
            .clone()
    })
}

/// Error attached to a record, captured from any `std::error::Error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    /// Messages of the `source()` chain, outermost cause first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
        }
    }

    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            causes,
        }
    }

    /// Message followed by every cause, joined with `": "`
    pub fn chain(&self) -> String {
        let mut out = self.message.clone();
        for cause in &self.causes {
            out.push_str(": ");
            out.push_str(cause);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    timestamp: DateTime<Utc>,
    level: LogLevel,
    scope: Arc<[String]>,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<LogContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ErrorPayload>,
    logger: Arc<str>,
    hostname: Arc<str>,
    process_id: u32,
    thread_id: Arc<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thread_name: Option<Arc<str>>,
}

impl Record {
    /// Create a record stamped with the current time and calling thread
    pub fn new(level: LogLevel, scope: Arc<[String]>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            scope,
            message: message.into(),
            context: None,
            error: None,
            logger: Arc::from(""),
            hostname: Arc::from(""),
            process_id: std::process::id(),
            thread_id: current_thread_id(),
            thread_name: current_thread_name(),
        }
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_error(mut self, error: ErrorPayload) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach the emitting logger's name and host
    pub fn with_origin(mut self, logger: Arc<str>, hostname: Arc<str>) -> Self {
        self.logger = logger;
        self.hostname = hostname;
        self
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn scope_path(&self, separator: &str) -> String {
        self.scope.join(separator)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> Option<&LogContext> {
        self.context.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        self.error.as_ref()
    }

    pub fn logger(&self) -> &str {
        &self.logger
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn process_id(&self) -> u32 {
        self.process_id
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }
}
