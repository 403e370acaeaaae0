//! Logging macros for ergonomic log message formatting.
//!
//! These macros take a [`Scope`](crate::Scope) and format the message like
//! `format!`, but only once the scope's level check has passed. Each returns
//! the `Result<()>` of the underlying log call.
//!
//! # Examples
//!
//! ```
//! use scoped_logger::prelude::*;
//! use scoped_logger::info;
//!
//! let config = LoggerConfig::builder()
//!     .with_template("[{level}] {scope}: {message}")
//!     .on_unresolved_token(UnresolvedTokenPolicy::Fail)
//!     .build()
//!     .unwrap();
//! let registry = ScopeRegistry::new(config);
//! let server = registry.scope("server").unwrap();
//!
//! // Basic logging
//! info!(server, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(server, "Server listening on port {}", port).unwrap();
//! ```

/// Log a message at the given level with automatic formatting.
///
/// # Examples
///
/// ```
/// # use scoped_logger::prelude::*;
/// # let config = LoggerConfig::builder()
/// #     .with_template("{message}")
/// #     .on_unresolved_token(UnresolvedTokenPolicy::Fail)
/// #     .build()
/// #     .unwrap();
/// # let scope = ScopeRegistry::new(config).root();
/// use scoped_logger::log;
/// log!(scope, LogLevel::Info, "Simple message").unwrap();
/// log!(scope, LogLevel::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($scope:expr, $level:expr, $($arg:tt)+) => {
        $scope.log_args($level, format_args!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($scope:expr, $($arg:tt)+) => {
        $crate::log!($scope, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($scope:expr, $($arg:tt)+) => {
        $crate::log!($scope, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use scoped_logger::prelude::*;
/// # let config = LoggerConfig::builder()
/// #     .with_template("{message}")
/// #     .on_unresolved_token(UnresolvedTokenPolicy::Fail)
/// #     .build()
/// #     .unwrap();
/// # let registry = ScopeRegistry::new(config);
/// use scoped_logger::info;
/// let jobs = registry.scope("jobs").unwrap();
/// info!(jobs, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($scope:expr, $($arg:tt)+) => {
        $crate::log!($scope, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($scope:expr, $($arg:tt)+) => {
        $crate::log!($scope, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($scope:expr, $($arg:tt)+) => {
        $crate::log!($scope, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($scope:expr, $($arg:tt)+) => {
        $crate::log!($scope, $crate::LogLevel::Fatal, $($arg)+)
    };
}
