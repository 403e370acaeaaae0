//! Immutable logger configuration and its builder

use super::{
    appender::{share, Appender, SharedAppender},
    error::{LoggerError, Result},
    log_level::LogLevel,
    record::Record,
    renderer::{Rendered, Renderer, UnresolvedTokenPolicy},
    resolver::{ResolverSet, TryResolverFn},
    template::{Template, Token},
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

pub const DEFAULT_LOGGER_NAME: &str = "root";
/// Used only when the machine's own host name cannot be read
pub const DEFAULT_HOSTNAME: &str = "localhost";

/// A frozen logger configuration
///
/// Built once by [`LoggerConfigBuilder::build`] and shared (usually as
/// `Arc<LoggerConfig>`) by every scope that uses it. There are no mutators;
/// replace a config by building a new one.
pub struct LoggerConfig {
    name: Arc<str>,
    hostname: Arc<str>,
    level: LogLevel,
    template: Template,
    timestamp_format: TimestampFormat,
    resolvers: ResolverSet,
    renderer: Renderer,
    appenders: Vec<SharedAppender>,
}

impl LoggerConfig {
    /// Create a builder for LoggerConfig
    ///
    /// # Example
    /// ```
    /// use scoped_logger::prelude::*;
    ///
    /// let config = LoggerConfig::builder()
    ///     .with_level(LogLevel::Debug)
    ///     .with_template("[{level}] {scope}: {message}")
    ///     .on_unresolved_token(UnresolvedTokenPolicy::Fail)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.level(), LogLevel::Debug);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerConfigBuilder {
        LoggerConfigBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Default minimum level for scopes without an explicit level
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    pub fn unresolved_token_policy(&self) -> &UnresolvedTokenPolicy {
        self.renderer.policy()
    }

    pub fn resolvers(&self) -> &ResolverSet {
        &self.resolvers
    }

    pub fn appenders(&self) -> &[SharedAppender] {
        &self.appenders
    }

    /// Stamp a fresh record with this config's logger name and host
    pub(crate) fn stamp(&self, record: Record) -> Record {
        record.with_origin(Arc::clone(&self.name), Arc::clone(&self.hostname))
    }

    /// Render `record` with this config's template, resolvers and policy
    pub fn render(&self, record: &Record) -> Result<Rendered> {
        self.renderer
            .render_counted(&self.template, record, &self.resolvers)
    }

    pub fn flush(&self) -> Result<()> {
        for appender in &self.appenders {
            appender.lock().flush()?;
        }
        Ok(())
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let appender_names: Vec<String> = self
            .appenders
            .iter()
            .map(|appender| appender.lock().name().to_string())
            .collect();

        f.debug_struct("LoggerConfig")
            .field("name", &self.name)
            .field("hostname", &self.hostname)
            .field("level", &self.level)
            .field("template", &self.template.to_string())
            .field("timestamp_format", &self.timestamp_format)
            .field("unresolved_token_policy", self.renderer.policy())
            .field("resolvers", &self.resolvers)
            .field("appenders", &appender_names)
            .finish()
    }
}

enum TemplateSource {
    Raw(String),
    Compiled(Template),
}

/// Builder for constructing a [`LoggerConfig`] with a fluent API
///
/// Setters are last-write-wins: calling `with_level` twice keeps the second
/// value, and `with_template` / `with_compiled_template` replace each other.
/// `with_appender` and `with_resolver` accumulate; registering a resolver name
/// again replaces the earlier function.
///
/// A template and an unresolved-token policy are required.
///
/// # Example
/// ```
/// use scoped_logger::prelude::*;
///
/// let config = LoggerConfig::builder()
///     .with_level(LogLevel::Debug)
///     .with_level(LogLevel::Error)
///     .with_template("{level} {message}")
///     .on_unresolved_token(UnresolvedTokenPolicy::Verbatim)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.level(), LogLevel::Error);
/// ```
pub struct LoggerConfigBuilder {
    name: Option<String>,
    hostname: Option<String>,
    level: LogLevel,
    template: Option<TemplateSource>,
    timestamp_format: TimestampFormat,
    unresolved: Option<UnresolvedTokenPolicy>,
    resolvers: Vec<(String, TryResolverFn)>,
    appenders: Vec<SharedAppender>,
}

impl LoggerConfigBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            hostname: None,
            level: LogLevel::Info,
            template: None,
            timestamp_format: TimestampFormat::default(),
            unresolved: None,
            resolvers: Vec::new(),
            appenders: Vec::new(),
        }
    }

    /// Logger name rendered by `{name}`
    #[must_use = "builder methods return a new value"]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Host name rendered by `{hostname}`; defaults to this machine's name
    #[must_use = "builder methods return a new value"]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the level from a case-insensitive name such as `"warn"`
    pub fn with_level_name(self, name: &str) -> Result<Self> {
        let level = name.parse::<LogLevel>()?;
        Ok(self.with_level(level))
    }

    /// Template source, compiled by [`build`](Self::build)
    #[must_use = "builder methods return a new value"]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(TemplateSource::Raw(template.into()));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_compiled_template(mut self, template: Template) -> Self {
        self.template = Some(TemplateSource::Compiled(template));
        self
    }

    /// Format used by `{timestamp}` when the placeholder has no arguments
    #[must_use = "builder methods return a new value"]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_unresolved_token(mut self, policy: UnresolvedTokenPolicy) -> Self {
        self.unresolved = Some(policy);
        self
    }

    /// Register a custom token, e.g. `{region}` or `{request:short}`
    ///
    /// # Example
    /// ```
    /// use scoped_logger::prelude::*;
    ///
    /// let config = LoggerConfig::builder()
    ///     .with_template("{region} {message}")
    ///     .with_resolver("region", |_args, _record| "eu-west-1".to_string())
    ///     .on_unresolved_token(UnresolvedTokenPolicy::Fail)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(config.resolvers().contains("region"));
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn with_resolver<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&[String], &Record) -> String + Send + Sync + 'static,
    {
        self.resolvers
            .push((name.into(), Arc::new(move |args, record| Ok(resolver(args, record)))));
        self
    }

    /// Register a custom token that can fail
    ///
    /// An error from `resolver` fails the whole log call with
    /// [`LoggerError::RenderFailed`], which still carries the raw level and
    /// message. It is not subject to the unresolved-token policy.
    #[must_use = "builder methods return a new value"]
    pub fn with_fallible_resolver<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&[String], &Record) -> Result<String> + Send + Sync + 'static,
    {
        self.resolvers.push((name.into(), Arc::new(resolver)));
        self
    }

    /// Bind an appender (sink)
    #[must_use = "builder methods return a new value"]
    pub fn with_appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(share(appender));
        self
    }

    /// Bind an appender that is already shared with another config
    #[must_use = "builder methods return a new value"]
    pub fn with_shared_appender(mut self, appender: SharedAppender) -> Self {
        self.appenders.push(appender);
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> Result<LoggerConfig> {
        let template = match self.template {
            Some(TemplateSource::Raw(source)) => Template::compile(&source)?,
            Some(TemplateSource::Compiled(template)) => template,
            None => {
                return Err(LoggerError::config(
                    "LoggerConfigBuilder",
                    "a template is required",
                ))
            }
        };

        let policy = self.unresolved.ok_or_else(|| {
            LoggerError::config(
                "LoggerConfigBuilder",
                "an unresolved-token policy is required",
            )
        })?;

        self.timestamp_format.validate()?;
        let custom_timestamp = self.resolvers.iter().any(|(name, _)| name == "timestamp");
        if !custom_timestamp {
            validate_timestamp_placeholders(&template)?;
        }

        let mut resolvers = ResolverSet::builtin(self.timestamp_format.clone());
        for (name, resolver) in self.resolvers {
            if name.is_empty() {
                return Err(LoggerError::config(
                    "LoggerConfigBuilder",
                    "resolver names must not be empty",
                ));
            }
            resolvers.register_shared(name, resolver);
        }

        Ok(LoggerConfig {
            name: Arc::from(self.name.as_deref().unwrap_or(DEFAULT_LOGGER_NAME)),
            hostname: match self.hostname {
                Some(hostname) => Arc::from(hostname),
                None => local_hostname(),
            },
            level: self.level,
            template,
            timestamp_format: self.timestamp_format,
            resolvers,
            renderer: Renderer::new(policy),
            appenders: self.appenders,
        })
    }
}

/// Check the strftime patterns given as `{timestamp:...}` arguments
fn validate_timestamp_placeholders(template: &Template) -> Result<()> {
    for token in template.tokens() {
        if let Token::Placeholder { name, args } = token {
            if name == "timestamp" {
                if let Some(format) = TimestampFormat::from_token_args(args) {
                    format.validate()?;
                }
            }
        }
    }
    Ok(())
}

/// Name of this machine, looked up once per process
fn local_hostname() -> Arc<str> {
    static HOSTNAME: OnceLock<Arc<str>> = OnceLock::new();
    HOSTNAME
        .get_or_init(|| {
            let hostname = gethostname::gethostname();
            match hostname.to_str() {
                Some(name) if !name.is_empty() => Arc::from(name),
                _ => Arc::from(DEFAULT_HOSTNAME),
            }
        })
        .clone()
}

impl Default for LoggerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable description of a logger configuration
///
/// Level names are validated when the settings are turned into a builder;
/// missing template or policy surface from `build()` as configuration errors.
///
/// ```
/// use scoped_logger::core::LoggerSettings;
///
/// let settings = LoggerSettings::from_json(r#"{
///     "level": "debug",
///     "template": "[{level}] {scope}: {message}",
///     "unresolved_token": "verbatim",
///     "scopes": { "app.db": "warn" }
/// }"#).unwrap();
///
/// let config = settings.to_builder().unwrap().build().unwrap();
/// assert_eq!(config.level(), scoped_logger::LogLevel::Debug);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub timestamp_format: TimestampFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved_token: Option<UnresolvedTokenPolicy>,
    /// Dotted scope path → level name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scopes: BTreeMap<String, String>,
}

impl LoggerSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_builder(&self) -> Result<LoggerConfigBuilder> {
        let mut builder = LoggerConfigBuilder::new()
            .with_timestamp_format(self.timestamp_format.clone());

        if let Some(name) = &self.name {
            builder = builder.with_name(name.clone());
        }
        if let Some(hostname) = &self.hostname {
            builder = builder.with_hostname(hostname.clone());
        }
        if let Some(level) = &self.level {
            builder = builder.with_level_name(level)?;
        }
        if let Some(template) = &self.template {
            builder = builder.with_template(template.clone());
        }
        if let Some(policy) = &self.unresolved_token {
            builder = builder.on_unresolved_token(policy.clone());
        }

        Ok(builder)
    }

    /// Per-scope levels with names parsed
    pub fn scope_levels(&self) -> Result<Vec<(String, LogLevel)>> {
        self.scopes
            .iter()
            .map(|(path, level)| Ok((path.clone(), level.parse::<LogLevel>()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;

    fn minimal() -> LoggerConfigBuilder {
        LoggerConfig::builder()
            .with_template("{message}")
            .on_unresolved_token(UnresolvedTokenPolicy::Fail)
    }

    #[test]
    fn test_builder_defaults() {
        let config = minimal().build().unwrap();
        assert_eq!(config.level(), LogLevel::Info);
        assert_eq!(config.name(), DEFAULT_LOGGER_NAME);
        assert_eq!(config.timestamp_format(), &TimestampFormat::Iso8601);
        assert!(config.appenders().is_empty());
    }

    #[test]
    fn test_level_last_write_wins() {
        let config = minimal()
            .with_level(LogLevel::Debug)
            .with_level(LogLevel::Error)
            .build()
            .unwrap();
        assert_eq!(config.level(), LogLevel::Error);
    }

    #[test]
    fn test_template_last_write_wins() {
        let config = minimal()
            .with_template("{level}")
            .with_compiled_template(Template::compile("{scope}").unwrap())
            .with_template("[{message}]")
            .build()
            .unwrap();
        assert_eq!(config.template().to_string(), "[{message}]");
    }

    #[test]
    fn test_policy_last_write_wins() {
        let config = minimal()
            .on_unresolved_token(UnresolvedTokenPolicy::Verbatim)
            .on_unresolved_token(UnresolvedTokenPolicy::Marker("?".to_string()))
            .build()
            .unwrap();
        assert_eq!(
            config.unresolved_token_policy(),
            &UnresolvedTokenPolicy::Marker("?".to_string())
        );
    }

    #[test]
    fn test_order_insensitive() {
        let a = LoggerConfig::builder()
            .with_level(LogLevel::Warn)
            .with_template("{level}")
            .on_unresolved_token(UnresolvedTokenPolicy::Fail)
            .build()
            .unwrap();
        let b = LoggerConfig::builder()
            .on_unresolved_token(UnresolvedTokenPolicy::Fail)
            .with_template("{level}")
            .with_level(LogLevel::Warn)
            .build()
            .unwrap();

        assert_eq!(a.level(), b.level());
        assert_eq!(a.template(), b.template());
        assert_eq!(a.unresolved_token_policy(), b.unresolved_token_policy());
    }

    #[test]
    fn test_missing_template_is_config_error() {
        let err = LoggerConfig::builder()
            .with_level(LogLevel::Debug)
            .on_unresolved_token(UnresolvedTokenPolicy::Fail)
            .build()
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_missing_policy_is_config_error() {
        let err = LoggerConfig::builder()
            .with_template("{message}")
            .build()
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("unresolved-token policy"));
    }

    #[test]
    fn test_bad_template_propagates_syntax_error() {
        let err = minimal().with_template("{level").build().unwrap_err();
        assert_eq!(err.template_offset(), Some(0));
    }

    #[test]
    fn test_level_name() {
        let builder = minimal().with_level_name("WaRn").unwrap();
        assert_eq!(builder.build().unwrap().level(), LogLevel::Warn);

        let err = minimal().with_level_name("loud").err().unwrap();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_custom_resolver_last_registration_wins() {
        let config = minimal()
            .with_template("{env}")
            .with_resolver("env", |_, _| "staging".to_string())
            .with_resolver("env", |_, _| "prod".to_string())
            .build()
            .unwrap();

        let record = config.stamp(Record::new(LogLevel::Info, Arc::from(Vec::new()), "m"));
        assert_eq!(config.render(&record).unwrap().text, "prod");
    }

    #[test]
    fn test_empty_resolver_name_rejected() {
        let err = minimal()
            .with_resolver("", |_, _| String::new())
            .build()
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_appenders_accumulate() {
        let config = minimal()
            .with_appender(MemoryAppender::new())
            .with_appender(MemoryAppender::new())
            .build()
            .unwrap();
        assert_eq!(config.appenders().len(), 2);
        assert!(format!("{:?}", config).contains("memory"));
    }

    #[test]
    fn test_settings_from_json() {
        let settings = LoggerSettings::from_json(
            r#"{
                "name": "api",
                "level": "ERROR",
                "template": "{name}: {message}",
                "timestamp_format": "rfc3339",
                "unresolved_token": { "marker": "??" },
                "scopes": { "app": "warn", "app.db": "trace" }
            }"#,
        )
        .unwrap();

        let config = settings.to_builder().unwrap().build().unwrap();
        assert_eq!(config.name(), "api");
        assert_eq!(config.level(), LogLevel::Error);
        assert_eq!(config.timestamp_format(), &TimestampFormat::Rfc3339);
        assert_eq!(
            config.unresolved_token_policy(),
            &UnresolvedTokenPolicy::Marker("??".to_string())
        );
        assert_eq!(
            settings.scope_levels().unwrap(),
            vec![
                ("app".to_string(), LogLevel::Warn),
                ("app.db".to_string(), LogLevel::Trace)
            ]
        );
    }

    #[test]
    fn test_settings_invalid_level() {
        let settings = LoggerSettings {
            level: Some("chatty".to_string()),
            ..LoggerSettings::default()
        };
        assert!(settings.to_builder().err().unwrap().is_config_error());
    }

    #[test]
    fn test_settings_without_template_fail_at_build() {
        let settings = LoggerSettings::from_json(r#"{ "unresolved_token": "fail" }"#).unwrap();
        let err = settings.to_builder().unwrap().build().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_hostname_defaults_to_machine_name() {
        let machine = gethostname::gethostname();
        let config = minimal().build().unwrap();
        match machine.to_str() {
            Some(name) if !name.is_empty() => assert_eq!(config.hostname(), name),
            _ => assert_eq!(config.hostname(), DEFAULT_HOSTNAME),
        }

        let config = minimal().with_hostname("node-7").build().unwrap();
        assert_eq!(config.hostname(), "node-7");
    }

    #[test]
    fn test_build_rejects_invalid_timestamp_format() {
        let err = minimal()
            .with_timestamp_format(TimestampFormat::Custom("%Q".to_string()))
            .build()
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_build_rejects_invalid_timestamp_placeholder() {
        let err = minimal()
            .with_template("{timestamp:%Q} {message}")
            .build()
            .unwrap_err();
        assert!(err.is_config_error());

        assert!(minimal()
            .with_template("{timestamp:%H:%M:%S} {timestamp:unix_ms} {message}")
            .build()
            .is_ok());
    }

    #[test]
    fn test_custom_timestamp_resolver_skips_strftime_check() {
        let config = minimal()
            .with_template("{timestamp:%Q}")
            .with_resolver("timestamp", |args, _| args.join(":"))
            .build()
            .unwrap();
        assert!(config.resolvers().contains("timestamp"));
    }
}
