//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod log_context;
pub mod log_level;
pub(crate) mod logger;
pub mod metrics;
pub mod record;
pub mod renderer;
pub mod resolver;
pub mod scope;
pub mod template;
pub mod timestamp;

pub use appender::{share, Appender, SharedAppender};
pub use config::{
    LoggerConfig, LoggerConfigBuilder, LoggerSettings, DEFAULT_HOSTNAME, DEFAULT_LOGGER_NAME,
};
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, LogContext};
pub use log_level::LogLevel;
pub use metrics::LoggerMetrics;
pub use record::{ErrorPayload, Record};
pub use renderer::{Rendered, Renderer, UnresolvedTokenPolicy};
pub use resolver::{sanitize_message, ResolverSet, TokenResolver, TryResolverFn};
pub use scope::{Scope, ScopeGuard, ScopeRegistry, SCOPE_SEPARATOR};
pub use template::{Template, Token};
pub use timestamp::TimestampFormat;
