//! Hierarchical scopes and the scope registry
//!
//! The registry owns every scope node in an arena; nodes refer to their parent
//! by index, never by ownership. A [`Scope`] is a cheap handle (registry +
//! node) that callers keep around and log through.
//!
//! Effective level = the nearest explicit level walking up from the scope, or
//! the registry default if no ancestor sets one. Resolved levels are cached per
//! node and stamped with the registry generation. Every level mutation bumps
//! the generation while holding the arena write lock, which invalidates all
//! caches (every descendant included) before the mutating call returns.

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_context::LogContext,
    log_level::LogLevel,
    logger,
    metrics::LoggerMetrics,
    record::{ErrorPayload, Record},
};
use parking_lot::RwLock;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

/// Separator between segments in a scope's full name
pub const SCOPE_SEPARATOR: &str = ".";

const NO_LEVEL: u8 = u8::MAX;
const GENERATION_MASK: u64 = u64::MAX >> 8;

type ScopeId = usize;
const ROOT: ScopeId = 0;

struct ScopeNode {
    id: ScopeId,
    parent: Option<ScopeId>,
    segments: Arc<[String]>,
    full_name: String,
    explicit: AtomicU8,
    /// `generation << 8 | rank`; zero never matches since generations start at 1
    cached: AtomicU64,
    config: RwLock<Option<Arc<LoggerConfig>>>,
}

impl ScopeNode {
    fn new(id: ScopeId, parent: Option<ScopeId>, segments: Arc<[String]>) -> Self {
        let full_name = segments.join(SCOPE_SEPARATOR);
        Self {
            id,
            parent,
            segments,
            full_name,
            explicit: AtomicU8::new(NO_LEVEL),
            cached: AtomicU64::new(0),
            config: RwLock::new(None),
        }
    }

    fn explicit_level(&self) -> Option<LogLevel> {
        LogLevel::from_rank(self.explicit.load(Ordering::Acquire))
    }
}

struct ScopeArena {
    nodes: Vec<Arc<ScopeNode>>,
    children: Vec<BTreeMap<String, ScopeId>>,
    by_path: HashMap<String, ScopeId>,
}

impl ScopeArena {
    fn new() -> Self {
        let root = Arc::new(ScopeNode::new(ROOT, None, Arc::from(Vec::new())));
        let mut by_path = HashMap::new();
        by_path.insert(String::new(), ROOT);

        Self {
            nodes: vec![root],
            children: vec![BTreeMap::new()],
            by_path,
        }
    }

    fn resolve_level(&self, mut id: ScopeId, default: LogLevel) -> LogLevel {
        loop {
            let node = &self.nodes[id];
            if let Some(level) = node.explicit_level() {
                return level;
            }
            match node.parent {
                Some(parent) => id = parent,
                None => return default,
            }
        }
    }

    fn resolve_config(&self, mut id: ScopeId) -> Option<Arc<LoggerConfig>> {
        loop {
            let node = &self.nodes[id];
            if let Some(config) = node.config.read().as_ref() {
                return Some(Arc::clone(config));
            }
            id = node.parent?;
        }
    }

    /// Create the missing nodes along `segments`; returns the last node
    fn insert_path(&mut self, segments: &[String]) -> Arc<ScopeNode> {
        let mut current = ROOT;
        for (depth, segment) in segments.iter().enumerate() {
            current = match self.children[current].get(segment) {
                Some(&child) => child,
                None => {
                    let id = self.nodes.len();
                    let path: Arc<[String]> = segments[..=depth].to_vec().into();
                    let node = Arc::new(ScopeNode::new(id, Some(current), path));

                    self.by_path.insert(node.full_name.clone(), id);
                    self.children[current].insert(segment.clone(), id);
                    self.children.push(BTreeMap::new());
                    self.nodes.push(node);
                    id
                }
            };
        }
        Arc::clone(&self.nodes[current])
    }
}

pub(crate) struct RegistryInner {
    arena: RwLock<ScopeArena>,
    generation: AtomicU64,
    default_level: AtomicU8,
    config: RwLock<Arc<LoggerConfig>>,
    metrics: LoggerMetrics,
}

impl RegistryInner {
    fn default_level(&self) -> LogLevel {
        LogLevel::from_rank(self.default_level.load(Ordering::Acquire)).unwrap_or_default()
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire) & GENERATION_MASK
    }

    /// Must be called with the arena write lock held
    fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    fn effective_level(&self, node: &ScopeNode) -> LogLevel {
        let cached = node.cached.load(Ordering::Acquire);
        if cached >> 8 == self.current_generation() {
            if let Some(level) = LogLevel::from_rank(cached as u8) {
                return level;
            }
        }

        let arena = self.arena.read();
        let generation = self.current_generation();
        let level = arena.resolve_level(node.id, self.default_level());
        node.cached
            .store(generation << 8 | level.rank() as u64, Ordering::Release);
        level
    }

    fn config_for(&self, node: &ScopeNode) -> Arc<LoggerConfig> {
        let bound = self.arena.read().resolve_config(node.id);
        bound.unwrap_or_else(|| Arc::clone(&self.config.read()))
    }

    pub(crate) fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn bound_configs(&self) -> Vec<Arc<LoggerConfig>> {
        let mut configs = vec![Arc::clone(&self.config.read())];
        let arena = self.arena.read();
        for node in &arena.nodes {
            if let Some(config) = node.config.read().as_ref() {
                if !configs.iter().any(|known| Arc::ptr_eq(known, config)) {
                    configs.push(Arc::clone(config));
                }
            }
        }
        configs
    }

    fn flush(&self) -> Result<()> {
        for config in self.bound_configs() {
            config.flush()?;
        }
        Ok(())
    }
}

impl Drop for RegistryInner {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let failures = self.metrics.sink_failures();
        if failures > 0 {
            eprintln!(
                "[LOGGER WARNING] Scope registry shutting down with {} failed writes (failure rate: {:.2}%)",
                failures,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Owner of the scope tree for one logging subsystem
///
/// Construct one per subsystem and pass it (or scopes obtained from it) to the
/// code that logs. Cloning is cheap and yields a handle to the same tree.
///
/// # Example
/// ```
/// use scoped_logger::prelude::*;
///
/// let config = LoggerConfig::builder()
///     .with_template("[{level}] {scope}: {message}")
///     .on_unresolved_token(UnresolvedTokenPolicy::Fail)
///     .build()
///     .unwrap();
/// let registry = ScopeRegistry::new(config);
///
/// let app = registry.scope("app").unwrap();
/// app.set_level(LogLevel::Warn);
///
/// let db = registry.scope("app.db").unwrap();
/// assert!(!db.should_log(LogLevel::Info));
/// assert!(db.should_log(LogLevel::Error));
/// ```
#[derive(Clone)]
pub struct ScopeRegistry {
    inner: Arc<RegistryInner>,
}

impl ScopeRegistry {
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_shared_config(Arc::new(config))
    }

    /// The registry default level starts out as `config.level()`
    pub fn with_shared_config(config: Arc<LoggerConfig>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                arena: RwLock::new(ScopeArena::new()),
                generation: AtomicU64::new(1),
                default_level: AtomicU8::new(config.level().rank()),
                config: RwLock::new(config),
                metrics: LoggerMetrics::new(),
            }),
        }
    }

    pub fn root(&self) -> Scope {
        let node = Arc::clone(&self.inner.arena.read().nodes[ROOT]);
        Scope::from_parts(&self.inner, node)
    }

    /// Look up a scope, creating it and any missing ancestors
    ///
    /// An empty path is the root scope. Segments must be non-empty and must not
    /// contain the `.` separator.
    pub fn get_or_create<S: AsRef<str>>(&self, path: &[S]) -> Result<Scope> {
        let segments = validate_segments(path)?;
        let full_name = segments.join(SCOPE_SEPARATOR);

        let existing = {
            let arena = self.inner.arena.read();
            arena
                .by_path
                .get(&full_name)
                .map(|&id| Arc::clone(&arena.nodes[id]))
        };
        if let Some(node) = existing {
            return Ok(Scope::from_parts(&self.inner, node));
        }

        let node = self.inner.arena.write().insert_path(&segments);
        Ok(Scope::from_parts(&self.inner, node))
    }

    /// Look up a scope by dotted name (`"app.db"`), creating it if needed
    pub fn scope(&self, dotted: &str) -> Result<Scope> {
        self.get_or_create(&split_dotted(dotted)?)
    }

    /// Look up an existing scope by dotted name without creating it
    pub fn get(&self, dotted: &str) -> Option<Scope> {
        let arena = self.inner.arena.read();
        let id = *arena.by_path.get(dotted)?;
        let node = Arc::clone(&arena.nodes[id]);
        drop(arena);
        Some(Scope::from_parts(&self.inner, node))
    }

    /// Number of scopes, root included
    pub fn len(&self) -> usize {
        self.inner.arena.read().nodes.len()
    }

    /// Always false; the root scope exists from construction
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Full names of all scopes, sorted (the root is `""`)
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.inner.arena.read().by_path.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn default_level(&self) -> LogLevel {
        self.inner.default_level()
    }

    /// Change the level used where no scope on the path sets one
    pub fn set_default_level(&self, level: LogLevel) {
        let _arena = self.inner.arena.write();
        self.inner
            .default_level
            .store(level.rank(), Ordering::Release);
        self.inner.invalidate();
    }

    /// The registry-wide config, used by scopes with no bound config
    pub fn config(&self) -> Arc<LoggerConfig> {
        Arc::clone(&self.inner.config.read())
    }

    /// Swap the registry-wide config; its level becomes the new default level
    pub fn replace_config(&self, config: LoggerConfig) -> Arc<LoggerConfig> {
        let config = Arc::new(config);
        let _arena = self.inner.arena.write();
        let previous = std::mem::replace(&mut *self.inner.config.write(), Arc::clone(&config));
        self.inner
            .default_level
            .store(config.level().rank(), Ordering::Release);
        self.inner.invalidate();
        previous
    }

    /// Set explicit levels from `(dotted path, level)` pairs
    pub fn apply_scope_levels<I, S>(&self, levels: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, LogLevel)>,
        S: AsRef<str>,
    {
        for (path, level) in levels {
            self.scope(path.as_ref())?.set_level(level);
        }
        Ok(())
    }

    /// The innermost scope entered on this thread that belongs to this
    /// registry, or the root scope
    pub fn current(&self) -> Scope {
        ACTIVE_SCOPES.with(|stack| {
            stack
                .borrow()
                .iter()
                .rev()
                .find(|scope| Arc::ptr_eq(&scope.registry, &self.inner))
                .cloned()
        })
        .unwrap_or_else(|| self.root())
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.inner.metrics()
    }

    /// Flush the appenders of the registry config and of every bound config
    pub fn flush(&self) -> Result<()> {
        self.inner.flush()
    }
}

impl fmt::Debug for ScopeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeRegistry")
            .field("scopes", &self.len())
            .field("default_level", &self.default_level())
            .finish()
    }
}

fn validate_segments<S: AsRef<str>>(path: &[S]) -> Result<Vec<String>> {
    path.iter()
        .map(|segment| {
            let segment = segment.as_ref();
            if segment.is_empty() {
                Err(LoggerError::scope_path(
                    joined(path),
                    "scope names must not be empty",
                ))
            } else if segment.contains(SCOPE_SEPARATOR) {
                Err(LoggerError::scope_path(
                    joined(path),
                    format!("scope name '{}' contains '{}'", segment, SCOPE_SEPARATOR),
                ))
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}

fn joined<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(SCOPE_SEPARATOR)
}

fn split_dotted(dotted: &str) -> Result<Vec<&str>> {
    if dotted.is_empty() {
        return Ok(Vec::new());
    }
    let segments: Vec<&str> = dotted.split(SCOPE_SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(LoggerError::scope_path(dotted, "scope names must not be empty"));
    }
    Ok(segments)
}

thread_local! {
    static ACTIVE_SCOPES: RefCell<Vec<Scope>> = const { RefCell::new(Vec::new()) };
}

/// Keeps a scope as the thread's current scope until dropped
///
/// Returned by [`Scope::enter`]. Not `Send`: it must be dropped on the thread
/// that created it.
#[must_use = "the scope is left as soon as the guard is dropped"]
pub struct ScopeGuard {
    node: Arc<ScopeNode>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        ACTIVE_SCOPES.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack
                .iter()
                .rposition(|scope| Arc::ptr_eq(&scope.node, &self.node))
            {
                stack.remove(pos);
            }
        });
    }
}

/// Handle to one node of a [`ScopeRegistry`]
#[derive(Clone)]
pub struct Scope {
    registry: Arc<RegistryInner>,
    node: Arc<ScopeNode>,
}

impl Scope {
    fn from_parts(registry: &Arc<RegistryInner>, node: Arc<ScopeNode>) -> Self {
        Self {
            registry: Arc::clone(registry),
            node,
        }
    }

    pub fn path(&self) -> &[String] {
        &self.node.segments
    }

    /// Last path segment; empty for the root
    pub fn name(&self) -> &str {
        self.node.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Dotted path, e.g. `app.db`
    pub fn full_name(&self) -> &str {
        &self.node.full_name
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    pub fn parent(&self) -> Option<Scope> {
        let parent = self.node.parent?;
        let node = Arc::clone(&self.registry.arena.read().nodes[parent]);
        Some(Scope::from_parts(&self.registry, node))
    }

    /// Get or create the direct child called `name`
    pub fn child(&self, name: &str) -> Result<Scope> {
        let mut path: Vec<&str> = self.node.segments.iter().map(String::as_str).collect();
        path.push(name);
        ScopeRegistry {
            inner: Arc::clone(&self.registry),
        }
        .get_or_create(&path)
    }

    /// Direct children, ordered by name
    pub fn children(&self) -> Vec<Scope> {
        let arena = self.registry.arena.read();
        arena.children[self.node.id]
            .values()
            .map(|&id| Scope::from_parts(&self.registry, Arc::clone(&arena.nodes[id])))
            .collect()
    }

    /// Explicit level on this scope, if any
    pub fn level(&self) -> Option<LogLevel> {
        self.node.explicit_level()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.store_level(level.rank());
    }

    /// Go back to inheriting the level from the parent
    pub fn clear_level(&self) {
        self.store_level(NO_LEVEL);
    }

    fn store_level(&self, rank: u8) {
        let _arena = self.registry.arena.write();
        self.node.explicit.store(rank, Ordering::Release);
        self.registry.invalidate();
    }

    pub fn effective_level(&self) -> LogLevel {
        self.registry.effective_level(&self.node)
    }

    /// Level check done before any record is built
    #[inline]
    pub fn should_log(&self, level: LogLevel) -> bool {
        LogLevel::is_enabled(level, self.effective_level())
    }

    /// Use `config` for this scope and every descendant without its own binding
    pub fn bind_config(&self, config: Arc<LoggerConfig>) {
        *self.node.config.write() = Some(config);
    }

    pub fn unbind_config(&self) -> Option<Arc<LoggerConfig>> {
        self.node.config.write().take()
    }

    /// The config this scope logs through
    pub fn config(&self) -> Arc<LoggerConfig> {
        self.registry.config_for(&self.node)
    }

    /// Make this the thread's current scope until the guard is dropped
    pub fn enter(&self) -> ScopeGuard {
        ACTIVE_SCOPES.with(|stack| stack.borrow_mut().push(self.clone()));
        ScopeGuard {
            node: Arc::clone(&self.node),
            _not_send: PhantomData,
        }
    }

    /// The innermost scope entered on this thread, from any registry
    pub fn current() -> Option<Scope> {
        ACTIVE_SCOPES.with(|stack| stack.borrow().last().cloned())
    }

    fn suppressed(&self) -> Result<()> {
        self.registry.metrics().record_suppressed();
        Ok(())
    }

    fn emit(&self, record: Record) -> Result<()> {
        let config = self.config();
        logger::emit(&config, self.registry.metrics(), record)
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        if !self.should_log(level) {
            return self.suppressed();
        }
        self.emit(Record::new(level, Arc::clone(&self.node.segments), message))
    }

    /// Log pre-formatted arguments; formatting only happens when enabled
    pub fn log_args(&self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<()> {
        if !self.should_log(level) {
            return self.suppressed();
        }
        self.emit(Record::new(level, Arc::clone(&self.node.segments), args.to_string()))
    }

    /// Log with structured context fields
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        if !self.should_log(level) {
            return self.suppressed();
        }
        let record =
            Record::new(level, Arc::clone(&self.node.segments), message).with_context(context);
        self.emit(record)
    }

    /// Log with an attached error and its source chain
    pub fn log_error(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        error: &(dyn std::error::Error + 'static),
    ) -> Result<()> {
        if !self.should_log(level) {
            return self.suppressed();
        }
        let record = Record::new(level, Arc::clone(&self.node.segments), message)
            .with_error(ErrorPayload::from_error(error));
        self.emit(record)
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }

    pub fn info_with_context(&self, message: impl Into<String>, context: LogContext) -> Result<()> {
        self.log_with_context(LogLevel::Info, message, context)
    }

    pub fn error_with_context(
        &self,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        self.log_with_context(LogLevel::Error, message, context)
    }

    pub fn error_with_cause(
        &self,
        message: impl Into<String>,
        error: &(dyn std::error::Error + 'static),
    ) -> Result<()> {
        self.log_error(LogLevel::Error, message, error)
    }

    /// Flush the appenders of this scope's config
    pub fn flush(&self) -> Result<()> {
        self.config().flush()
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Scope {}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("path", &self.full_name())
            .field("level", &self.level())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::UnresolvedTokenPolicy;

    fn registry(level: LogLevel) -> ScopeRegistry {
        let config = LoggerConfig::builder()
            .with_level(level)
            .with_template("[{level}] {scope}: {message}")
            .on_unresolved_token(UnresolvedTokenPolicy::Fail)
            .build()
            .unwrap();
        ScopeRegistry::new(config)
    }

    #[test]
    fn test_get_or_create_links_ancestors() {
        let registry = registry(LogLevel::Info);
        let db = registry.get_or_create(&["app", "db", "pool"]).unwrap();

        assert_eq!(db.full_name(), "app.db.pool");
        assert_eq!(db.name(), "pool");
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.paths(), vec!["", "app", "app.db", "app.db.pool"]);

        let parent = db.parent().unwrap();
        assert_eq!(parent.full_name(), "app.db");
        assert_eq!(parent.parent().unwrap().parent().unwrap(), registry.root());
        assert!(registry.root().parent().is_none());
    }

    #[test]
    fn test_paths_are_unique() {
        let registry = registry(LogLevel::Info);
        let a = registry.scope("app.db").unwrap();
        let b = registry.get_or_create(&["app", "db"]).unwrap();
        let c = registry.scope("app").unwrap().child("db").unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_empty_path_is_root() {
        let registry = registry(LogLevel::Info);
        let empty: [&str; 0] = [];
        assert!(registry.get_or_create(&empty).unwrap().is_root());
        assert!(registry.scope("").unwrap().is_root());
    }

    #[test]
    fn test_invalid_paths() {
        let registry = registry(LogLevel::Info);
        assert!(registry.scope("app..db").unwrap_err().is_config_error());
        assert!(registry.scope(".app").is_err());
        assert!(registry.get_or_create(&["app", ""]).is_err());
        assert!(registry.get_or_create(&["a.b"]).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_does_not_create() {
        let registry = registry(LogLevel::Info);
        assert!(registry.get("app").is_none());
        registry.scope("app").unwrap();
        assert!(registry.get("app").is_some());
    }

    #[test]
    fn test_default_level_without_explicit_levels() {
        let registry = registry(LogLevel::Warn);
        let scope = registry.scope("a.b.c").unwrap();
        assert_eq!(scope.effective_level(), LogLevel::Warn);
        assert_eq!(scope.level(), None);
    }

    #[test]
    fn test_ancestor_level_reaches_descendants() {
        let registry = registry(LogLevel::Info);
        let db = registry.scope("app.db").unwrap();
        assert_eq!(db.effective_level(), LogLevel::Info);

        registry.scope("app").unwrap().set_level(LogLevel::Error);
        assert_eq!(db.effective_level(), LogLevel::Error);

        let created_later = registry.scope("app.cache.redis").unwrap();
        assert_eq!(created_later.effective_level(), LogLevel::Error);
    }

    #[test]
    fn test_explicit_level_shadows_ancestor() {
        let registry = registry(LogLevel::Info);
        let app = registry.scope("app").unwrap();
        let db = registry.scope("app.db").unwrap();

        db.set_level(LogLevel::Trace);
        app.set_level(LogLevel::Fatal);
        assert_eq!(db.effective_level(), LogLevel::Trace);

        db.clear_level();
        assert_eq!(db.effective_level(), LogLevel::Fatal);

        app.clear_level();
        assert_eq!(db.effective_level(), LogLevel::Info);
    }

    #[test]
    fn test_default_level_change_invalidates_cache() {
        let registry = registry(LogLevel::Info);
        let scope = registry.scope("svc").unwrap();
        assert!(scope.should_log(LogLevel::Info));

        registry.set_default_level(LogLevel::Error);
        assert!(!scope.should_log(LogLevel::Info));
        assert_eq!(registry.default_level(), LogLevel::Error);
    }

    #[test]
    fn test_replace_config_changes_default_level() {
        let registry = registry(LogLevel::Info);
        let scope = registry.scope("svc").unwrap();
        assert_eq!(scope.effective_level(), LogLevel::Info);

        let replacement = LoggerConfig::builder()
            .with_level(LogLevel::Debug)
            .with_template("{message}")
            .on_unresolved_token(UnresolvedTokenPolicy::Fail)
            .build()
            .unwrap();
        let previous = registry.replace_config(replacement);

        assert_eq!(previous.level(), LogLevel::Info);
        assert_eq!(scope.effective_level(), LogLevel::Debug);
        assert_eq!(scope.config().template().to_string(), "{message}");
    }

    #[test]
    fn test_bound_config_is_inherited() {
        let registry = registry(LogLevel::Info);
        let memory = MemoryAppender::new();
        let config = Arc::new(
            LoggerConfig::builder()
                .with_template("db> {message}")
                .on_unresolved_token(UnresolvedTokenPolicy::Fail)
                .with_appender(memory.clone())
                .build()
                .unwrap(),
        );

        let db = registry.scope("app.db").unwrap();
        db.bind_config(Arc::clone(&config));

        registry.scope("app.db.pool").unwrap().info("acquired").unwrap();
        registry.scope("app").unwrap().info("not routed").unwrap();
        assert_eq!(memory.lines(), vec!["db> acquired"]);

        db.unbind_config();
        registry.scope("app.db.pool").unwrap().info("back").unwrap();
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_children_sorted() {
        let registry = registry(LogLevel::Info);
        registry.scope("app.web").unwrap();
        registry.scope("app.db").unwrap();
        let names: Vec<String> = registry
            .scope("app")
            .unwrap()
            .children()
            .iter()
            .map(|scope| scope.name().to_string())
            .collect();
        assert_eq!(names, vec!["db", "web"]);
    }

    #[test]
    fn test_enter_sets_current_scope() {
        let registry = registry(LogLevel::Info);
        let app = registry.scope("app").unwrap();
        let db = registry.scope("app.db").unwrap();

        assert!(registry.current().is_root());
        {
            let _outer = app.enter();
            assert_eq!(registry.current(), app);
            {
                let _inner = db.enter();
                assert_eq!(Scope::current(), Some(db.clone()));
            }
            assert_eq!(registry.current(), app);
        }
        assert!(registry.current().is_root());
        assert_eq!(Scope::current(), None);
    }

    #[test]
    fn test_current_ignores_other_registries() {
        let first = registry(LogLevel::Info);
        let second = registry(LogLevel::Info);
        let scope = first.scope("only.first").unwrap();

        let _guard = scope.enter();
        assert_eq!(first.current(), scope);
        assert!(second.current().is_root());
    }

    #[test]
    fn test_apply_scope_levels() {
        let registry = registry(LogLevel::Info);
        registry
            .apply_scope_levels(vec![("app", LogLevel::Warn), ("app.db", LogLevel::Trace)])
            .unwrap();

        assert_eq!(registry.scope("app.web").unwrap().effective_level(), LogLevel::Warn);
        assert_eq!(registry.scope("app.db").unwrap().effective_level(), LogLevel::Trace);
        assert!(registry.apply_scope_levels(vec![("a..b", LogLevel::Warn)]).is_err());
    }
}
