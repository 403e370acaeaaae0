//! # Scoped Logger
//!
//! Hierarchical, scope-based logging with a compiled token template formatter.
//!
//! ## Features
//!
//! - **Scopes**: a tree of named scopes (`app.db.pool`) whose levels are
//!   inherited from the nearest ancestor that sets one
//! - **Templates**: `"[{level}] {scope}: {message}"` is compiled once into
//!   tokens and rendered per record, with custom tokens pluggable
//! - **Immutable configs**: built once with a builder, shared by any number of
//!   scopes, swapped whole rather than mutated
//! - **Thread Safe**: level checks are lock-free on a warm cache
//!
//! ```
//! use scoped_logger::prelude::*;
//!
//! let memory = MemoryAppender::new();
//! let config = LoggerConfig::builder()
//!     .with_template("[{level}] {scope}: {message}")
//!     .on_unresolved_token(UnresolvedTokenPolicy::Fail)
//!     .with_appender(memory.clone())
//!     .build()
//!     .unwrap();
//!
//! let registry = ScopeRegistry::new(config);
//! let db = registry.scope("app.db").unwrap();
//! db.info("connected").unwrap();
//!
//! assert_eq!(memory.lines(), vec!["[INFO] app.db: connected"]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    #[cfg(feature = "file")]
    pub use crate::appenders::{FileAppender, JsonAppender};
    pub use crate::appenders::MemoryAppender;
    pub use crate::core::{
        Appender, ErrorPayload, FieldValue, LogContext, LogLevel, LoggerConfig,
        LoggerConfigBuilder, LoggerError, LoggerMetrics, LoggerSettings, Record, Result, Scope,
        ScopeGuard, ScopeRegistry, Template, TimestampFormat, UnresolvedTokenPolicy,
    };
}

#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
#[cfg(feature = "file")]
pub use appenders::{FileAppender, JsonAppender};
pub use appenders::MemoryAppender;
pub use core::{
    Appender, ErrorPayload, FieldValue, LogContext, LogLevel, LoggerConfig, LoggerConfigBuilder,
    LoggerError, LoggerMetrics, LoggerSettings, Record, Result, Scope, ScopeGuard, ScopeRegistry,
    Template, TimestampFormat, UnresolvedTokenPolicy,
};
