//! # Radis Logger
//!
//! Formats log events as GELF messages and pushes them onto a Redis list,
//! a reliable queue that a separate collector drains into Graylog.
//!
//! ## Features
//!
//! - **Never blocks on the log server**: a call only has to reach the queue
//! - **Structured context**: nested maps and lists flatten into `_`-prefixed fields
//! - **Lazy defaults**: producers run at log time, only when their field is used
//! - **Request metadata**: HTTP/CGI attributes filled in when available
//! - **Dry-run mode**: keep the last record in memory for inspection
//!
//! ```
//! use radis_logger::prelude::*;
//!
//! let mut logger = Logger::builder().dry_run(true).build().unwrap();
//! logger.info("Hello, World!", context! { "user" => "alice" });
//!
//! let record = logger.last_record().unwrap();
//! assert_eq!(record.level(), Some(7));
//! ```

pub mod core;
pub mod macros;
pub mod queue;

pub mod prelude {
    pub use crate::context;
    pub use crate::core::{
        Context, ContextValue, FieldValue, GelfRecord, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, MetadataSource, NoMetadata, ProcessMetadata,
        QueuePublisher, Result, Severity, StaticMetadata,
    };
    pub use crate::queue::{MemoryQueue, RedisQueue};
}

pub use core::{
    Context, ContextValue, DefaultStore, FieldValue, FlatFields, GelfRecord, LogLevel, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, MetadataEnricher, MetadataSource,
    NoMetadata, ProcessMetadata, Producer, QueuePublisher, Result, Severity, SeverityLevel,
    StaticMetadata,
};
pub use queue::{MemoryQueue, RedisQueue};
