//! Placeholder resolution
//!
//! A [`ResolverSet`] is the capability set consulted by the renderer: one
//! name → function map holding the built-in tokens plus any custom ones
//! registered through the config builder. A custom resolver registered under a
//! built-in name replaces it.

use super::error::{LoggerError, Result};
use super::record::Record;
use super::timestamp::TimestampFormat;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Resolves one placeholder against a record
pub trait TokenResolver: Send + Sync {
    /// Substitution text for `name`, or `UnresolvedToken` when `name` is unknown
    fn resolve(&self, name: &str, args: &[String], record: &Record) -> Result<String>;
}

/// A token function that may fail, aborting the render of that record
pub type TryResolverFn = Arc<dyn Fn(&[String], &Record) -> Result<String> + Send + Sync>;

/// Escape control characters that would let a message forge extra log lines
pub fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[derive(Clone, Default)]
pub struct ResolverSet {
    resolvers: HashMap<String, TryResolverFn>,
}

impl ResolverSet {
    /// An empty set; every lookup fails
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in tokens, with `{timestamp}` defaulting to `timestamp_format`
    pub fn builtin(timestamp_format: TimestampFormat) -> Self {
        let mut set = Self::empty();

        set.try_register("timestamp", move |args, record| {
            match TimestampFormat::from_token_args(args) {
                Some(format) => format.format(record.timestamp()),
                None => timestamp_format.format(record.timestamp()),
            }
        });

        set.register("level", |args, record| {
            let level = record.level();
            match args.first().map(String::as_str) {
                Some("lower") => level.to_str().to_lowercase(),
                Some("short") => level.short_name().to_string(),
                Some("pad") => format!("{:5}", level.to_str()),
                _ => level.to_str().to_string(),
            }
        });

        set.register("scope", |args, record| {
            let separator = args.first().map(String::as_str).unwrap_or(".");
            record.scope_path(separator)
        });

        set.register("message", |_, record| sanitize_message(record.message()));

        set.register("context", |args, record| {
            let Some(context) = record.context() else {
                return args.get(1).cloned().unwrap_or_default();
            };
            match args.first() {
                None => context.format_fields(),
                Some(key) => match context.get(key) {
                    Some(value) => value.to_string(),
                    None => args.get(1).cloned().unwrap_or_default(),
                },
            }
        });

        set.register("error", |args, record| match record.error() {
            Some(error) if args.first().map(String::as_str) == Some("chain") => error.chain(),
            Some(error) => error.message.clone(),
            None => String::new(),
        });

        set.register("name", |_, record| record.logger().to_string());
        set.register("hostname", |_, record| record.hostname().to_string());
        set.register("pid", |_, record| record.process_id().to_string());
        set.register("tid", |_, record| record.thread_id().to_string());
        set.register("thread", |_, record| {
            record
                .thread_name()
                .unwrap_or_else(|| record.thread_id())
                .to_string()
        });

        set
    }

    /// Register (or replace) the resolver for `name`
    pub fn register<F>(&mut self, name: impl Into<String>, resolver: F)
    where
        F: Fn(&[String], &Record) -> String + Send + Sync + 'static,
    {
        self.try_register(name, move |args, record| Ok(resolver(args, record)));
    }

    /// Register a resolver whose failure aborts rendering of the record
    pub fn try_register<F>(&mut self, name: impl Into<String>, resolver: F)
    where
        F: Fn(&[String], &Record) -> Result<String> + Send + Sync + 'static,
    {
        self.resolvers.insert(name.into(), Arc::new(resolver));
    }

    pub fn register_shared(&mut self, name: impl Into<String>, resolver: TryResolverFn) {
        self.resolvers.insert(name.into(), resolver);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resolvers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl TokenResolver for ResolverSet {
    fn resolve(&self, name: &str, args: &[String], record: &Record) -> Result<String> {
        match self.resolvers.get(name) {
            Some(resolver) => resolver(args, record),
            None => Err(LoggerError::unresolved_token(name)),
        }
    }
}

impl fmt::Debug for ResolverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverSet")
            .field("names", &self.names())
            .finish()
    }
}
