//! Core logger types and traits

pub mod config;
pub mod context;
pub mod defaults;
pub mod error;
pub mod flatten;
pub mod log_level;
pub mod logger;
pub mod metadata;
pub mod metrics;
pub mod publisher;
pub mod record;

pub use config::LoggerConfig;
pub use context::{Context, ContextValue, FieldValue, Producer};
pub use defaults::DefaultStore;
pub use error::{LoggerError, Result};
pub use flatten::{flatten, FlatFields};
pub use log_level::{resolve, LogLevel, Severity, SeverityLevel};
pub use logger::{Logger, LoggerBuilder};
pub use metadata::{MetadataEnricher, MetadataSource, NoMetadata, ProcessMetadata, StaticMetadata};
pub use metrics::LoggerMetrics;
pub use publisher::QueuePublisher;
pub use record::{assemble, GelfRecord};
