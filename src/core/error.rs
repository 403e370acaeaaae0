//! Error types for the logger system

use super::log_level::LogLevel;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed or incomplete configuration
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Scope path with empty or otherwise unusable segments
    #[error("Invalid scope path '{path}': {message}")]
    InvalidScopePath { path: String, message: String },

    /// Malformed template string, `offset` is a byte offset into the source
    #[error("Template syntax error at byte {offset}: {message}")]
    TemplateSyntax { offset: usize, message: String },

    /// Placeholder name with no registered resolver
    #[error("Unresolved template token '{token}'")]
    UnresolvedToken { token: String },

    /// A record could not be rendered
    ///
    /// The raw level and message stay available so the caller can still
    /// recover the event.
    #[error("Failed to render {level} record for scope '{scope}': {source}")]
    RenderFailed {
        level: LogLevel,
        scope: String,
        message: String,
        #[source]
        source: Box<LoggerError>,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an invalid scope path error
    pub fn scope_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidScopePath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a template syntax error at the given byte offset
    pub fn template_syntax(offset: usize, message: impl Into<String>) -> Self {
        LoggerError::TemplateSyntax {
            offset,
            message: message.into(),
        }
    }

    pub fn unresolved_token(token: impl Into<String>) -> Self {
        LoggerError::UnresolvedToken {
            token: token.into(),
        }
    }

    /// Wrap a rendering error together with the raw record content
    pub fn render_failed(
        level: LogLevel,
        scope: impl Into<String>,
        message: impl Into<String>,
        source: LoggerError,
    ) -> Self {
        LoggerError::RenderFailed {
            level,
            scope: scope.into(),
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True for the configuration error family (`InvalidConfiguration`, `InvalidScopePath`)
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidConfiguration { .. } | LoggerError::InvalidScopePath { .. }
        )
    }

    /// Byte offset of a template syntax error, if this is one
    pub fn template_offset(&self) -> Option<usize> {
        match self {
            LoggerError::TemplateSyntax { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
