//! Main logger implementation
//!
//! A log call runs entirely on the caller's thread:
//!
//! 1. the level is resolved ([`resolve`])
//! 2. defaults are merged under the caller's context ([`DefaultStore::apply`])
//! 3. the merged context is flattened, running producers ([`flatten`])
//! 4. missing metadata fields are filled ([`MetadataEnricher::enrich`])
//! 5. the GELF record is assembled ([`assemble`])
//! 6. the record is pushed as JSON, or kept in memory in dry-run mode
//!
//! Only step 6 can fail, and that failure is reported as `false`.

use super::{
    config::{validate_level, LoggerConfig},
    context::{Context, ContextValue},
    defaults::DefaultStore,
    error::{LoggerError, Result},
    flatten::flatten,
    log_level::{resolve, LogLevel, Severity, SeverityLevel},
    metadata::{MetadataEnricher, MetadataSource, ProcessMetadata},
    metrics::LoggerMetrics,
    publisher::QueuePublisher,
    record::{assemble, GelfRecord},
};
use crate::queue::RedisQueue;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// GELF logger publishing onto a named queue
///
/// `log` and `set_default` take `&mut self`; share a logger between threads
/// behind your own lock.
pub struct Logger {
    publisher: Option<Box<dyn QueuePublisher>>,
    queue: String,
    hostname: String,
    default_level: SeverityLevel,
    dry_run: bool,
    defaults: DefaultStore,
    enricher: MetadataEnricher,
    /// Most recent record built in dry-run mode
    last_record: Option<GelfRecord>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Create a builder for configuring a logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Build the record and push it
    ///
    /// Returns `true` when the queue accepted the record, or when dry-run
    /// mode kept it. Any failure to serialize or push yields `false`.
    pub fn log(
        &mut self,
        level: impl Into<Severity>,
        message: impl AsRef<str>,
        context: Context,
    ) -> bool {
        let record = self.prepare(level, message, &context);

        if self.dry_run {
            self.metrics.record_captured();
            self.last_record = Some(record);
            return true;
        }

        match self.publish(&record) {
            Ok(()) => {
                self.metrics.record_pushed();
                true
            }
            Err(e) => {
                self.metrics.record_failed();
                tracing::warn!(queue = %self.queue, error = %e, "failed to enqueue log record");
                false
            }
        }
    }

    /// Build the record a call to [`Logger::log`] would send
    ///
    /// Producers in the defaults and in `context` run during this call.
    pub fn prepare(
        &self,
        level: impl Into<Severity>,
        message: impl AsRef<str>,
        context: &Context,
    ) -> GelfRecord {
        let now = Utc::now();
        let level = resolve(&level.into(), self.default_level);

        let merged = self.defaults.apply(context);
        let mut fields = flatten(&merged);
        self.enricher.enrich(&mut fields, &now);

        assemble(level, message.as_ref(), fields, &self.hostname, &now)
    }

    fn publish(&mut self, record: &GelfRecord) -> Result<()> {
        let payload = record.to_json()?;
        let publisher = self.publisher.as_mut().ok_or(LoggerError::NotConnected)?;
        publisher.push(&self.queue, &payload)
    }

    pub fn emergency(&mut self, message: impl AsRef<str>, context: Context) -> bool {
        self.log(LogLevel::Emergency, message, context)
    }

    pub fn alert(&mut self, message: impl AsRef<str>, context: Context) -> bool {
        self.log(LogLevel::Alert, message, context)
    }

    pub fn critical(&mut self, message: impl AsRef<str>, context: Context) -> bool {
        self.log(LogLevel::Critical, message, context)
    }

    pub fn error(&mut self, message: impl AsRef<str>, context: Context) -> bool {
        self.log(LogLevel::Error, message, context)
    }

    pub fn warning(&mut self, message: impl AsRef<str>, context: Context) -> bool {
        self.log(LogLevel::Warning, message, context)
    }

    pub fn notice(&mut self, message: impl AsRef<str>, context: Context) -> bool {
        self.log(LogLevel::Notice, message, context)
    }

    pub fn info(&mut self, message: impl AsRef<str>, context: Context) -> bool {
        self.log(LogLevel::Info, message, context)
    }

    pub fn debug(&mut self, message: impl AsRef<str>, context: Context) -> bool {
        self.log(LogLevel::Debug, message, context)
    }

    /// Set a default field, applied when a call's context lacks `key`
    ///
    /// `value` may be a producer; it then runs once per log call that uses
    /// it.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.defaults.set(key, value);
    }

    pub fn defaults(&self) -> &DefaultStore {
        &self.defaults
    }

    pub fn set_queue_name(&mut self, queue: impl Into<String>) {
        self.queue = queue.into();
    }

    pub fn queue_name(&self) -> &str {
        &self.queue
    }

    /// Set the level used when a call gives none
    ///
    /// # Errors
    ///
    /// Rejects levels outside 1-9.
    pub fn set_default_level(&mut self, level: SeverityLevel) -> Result<()> {
        validate_level(level)?;
        self.default_level = level;
        Ok(())
    }

    pub fn default_level(&self) -> SeverityLevel {
        self.default_level
    }

    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        self.hostname = hostname.into();
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Keep records in memory instead of pushing them
    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Most recent record built in dry-run mode
    ///
    /// Each dry-run call replaces it; earlier records are not kept.
    pub fn last_record(&self) -> Option<&GelfRecord> {
        self.last_record.as_ref()
    }

    /// Remove and return the most recent dry-run record
    pub fn take_last_record(&mut self) -> Option<GelfRecord> {
        self.last_record.take()
    }

    /// Queue server this logger publishes to, if connected
    pub fn target(&self) -> Option<&str> {
        self.publisher.as_ref().map(|publisher| publisher.target())
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Create a logger for another queue on the same server
    ///
    /// The fork gets its own connection and copies the hostname, default
    /// level, dry-run flag and metadata source. Defaults are not carried
    /// over.
    ///
    /// # Errors
    ///
    /// Fails if the new connection cannot be opened.
    pub fn fork(&self, queue: impl Into<String>) -> Result<Logger> {
        let queue = queue.into();
        let publisher = self
            .publisher
            .as_ref()
            .map(|publisher| publisher.fork())
            .transpose()?;

        tracing::info!(from = %self.queue, to = %queue, "forked logger");

        Ok(Logger {
            publisher,
            queue,
            hostname: self.hostname.clone(),
            default_level: self.default_level,
            dry_run: self.dry_run,
            defaults: DefaultStore::new(),
            enricher: self.enricher.clone(),
            last_record: None,
            metrics: LoggerMetrics::new(),
        })
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("target", &self.target())
            .field("queue", &self.queue)
            .field("hostname", &self.hostname)
            .field("default_level", &self.default_level)
            .field("dry_run", &self.dry_run)
            .field("defaults", &self.defaults.len())
            .finish_non_exhaustive()
    }
}

/// Machine hostname, or `localhost` if it cannot be determined
fn system_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "cannot determine hostname, using localhost");
            "localhost".to_string()
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Without an explicit publisher, `build` connects to the configured Redis
/// server; a failed connection is returned as an error and no logger is
/// created. A dry-run builder with neither a publisher nor a server set
/// does not connect at all.
///
/// # Example
/// ```
/// use radis_logger::prelude::*;
/// use radis_logger::queue::MemoryQueue;
///
/// let logger = Logger::builder()
///     .publisher(MemoryQueue::new())
///     .queue("app-logs")
///     .default_level(5)
///     .hostname("web-1")
///     .metadata(NoMetadata)
///     .build()
///     .unwrap();
/// assert_eq!(logger.queue_name(), "app-logs");
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    server_set: bool,
    publisher: Option<Box<dyn QueuePublisher>>,
    metadata: Option<Arc<dyn MetadataSource>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::from_config(LoggerConfig::default())
    }

    /// Start from an existing configuration
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            server_set: false,
            publisher: None,
            metadata: None,
        }
    }

    /// Queue server in `host:port` form
    #[must_use = "builder methods return a new value"]
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.config.server = server.into();
        self.server_set = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue(mut self, queue: impl Into<String>) -> Self {
        self.config.queue = queue.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn default_level(mut self, level: SeverityLevel) -> Self {
        self.config.default_level = level;
        self
    }

    /// Override the machine hostname
    #[must_use = "builder methods return a new value"]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.config.hostname = Some(hostname.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Use `publisher` instead of connecting to the configured server
    #[must_use = "builder methods return a new value"]
    pub fn publisher<P: QueuePublisher + 'static>(mut self, publisher: P) -> Self {
        self.publisher = Some(Box::new(publisher));
        self
    }

    /// Source for request/environment fields; defaults to [`ProcessMetadata`]
    #[must_use = "builder methods return a new value"]
    pub fn metadata<M: MetadataSource + 'static>(mut self, source: M) -> Self {
        self.metadata = Some(Arc::new(source));
        self
    }

    /// Build the logger
    ///
    /// # Errors
    ///
    /// Invalid configuration, or no connection to the queue server.
    pub fn build(self) -> Result<Logger> {
        let config = self.config;
        config.validate()?;

        let publisher = match self.publisher {
            Some(publisher) => Some(publisher),
            None if config.dry_run && !self.server_set => None,
            None => Some(Box::new(RedisQueue::connect(&config.server)?) as Box<dyn QueuePublisher>),
        };

        let metadata = self
            .metadata
            .unwrap_or_else(|| Arc::new(ProcessMetadata::new()) as Arc<dyn MetadataSource>);

        Ok(Logger {
            publisher,
            queue: config.queue,
            hostname: config.hostname.unwrap_or_else(system_hostname),
            default_level: config.default_level,
            dry_run: config.dry_run,
            defaults: DefaultStore::new(),
            enricher: MetadataEnricher::new(metadata),
            last_record: None,
            metrics: LoggerMetrics::new(),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
