//! Environment and request metadata
//!
//! The enricher fills well-known GELF fields (`_http_method`,
//! `_client_addr`, ...) from a [`MetadataSource`]. It only fills gaps: a
//! field the caller or a default already set is never touched, and absent
//! or empty metadata leaves the field out.
//!
//! Field table:
//!
//! | field | metadata key |
//! | --- | --- |
//! | `_time_offset` | now − `REQUEST_TIME_FLOAT` |
//! | `_php_script` | `SCRIPT_FILENAME` |
//! | `_http_query` | `QUERY_STRING` |
//! | `_http_path` | `PATH_INFO` |
//! | `_http_addr` | `SERVER_ADDR` |
//! | `_http_vhost` | `SERVER_NAME` |
//! | `_http_proto` | `SERVER_PROTOCOL` |
//! | `_http_method` | `REQUEST_METHOD` |
//! | `_http_uri` | `REQUEST_URI` |
//! | `_http_referer` | `HTTP_REFERER` |
//! | `_http_host` | `HTTP_HOST` |
//! | `_http_useragent` | `HTTP_USER_AGENT` |
//! | `_http_connection` | `HTTP_CONNECTION` |
//! | `_http_user` | `REMOTE_USER` |
//! | `_client_addr` | `REMOTE_ADDR` |
//! | `_client_port` | `REMOTE_PORT` |
//! | `_session_id` | `SESSION_ID` |

use super::flatten::FlatFields;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const REQUEST_TIME_FLOAT: &str = "REQUEST_TIME_FLOAT";
pub const SCRIPT_FILENAME: &str = "SCRIPT_FILENAME";
pub const SESSION_ID: &str = "SESSION_ID";

pub const TIME_OFFSET_FIELD: &str = "_time_offset";

/// Fields copied verbatim from metadata, in the order they are applied
pub const METADATA_FIELDS: [(&str, &str); 16] = [
    ("_php_script", SCRIPT_FILENAME),
    ("_http_query", "QUERY_STRING"),
    ("_http_path", "PATH_INFO"),
    ("_http_addr", "SERVER_ADDR"),
    ("_http_vhost", "SERVER_NAME"),
    ("_http_proto", "SERVER_PROTOCOL"),
    ("_http_method", "REQUEST_METHOD"),
    ("_http_uri", "REQUEST_URI"),
    ("_http_referer", "HTTP_REFERER"),
    ("_http_host", "HTTP_HOST"),
    ("_http_useragent", "HTTP_USER_AGENT"),
    ("_http_connection", "HTTP_CONNECTION"),
    ("_http_user", "REMOTE_USER"),
    ("_client_addr", "REMOTE_ADDR"),
    ("_client_port", "REMOTE_PORT"),
    ("_session_id", SESSION_ID),
];

/// Read-only lookup of environment/request attributes
///
/// Absence is normal: outside a request usually only the script path is
/// known.
pub trait MetadataSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Source with nothing in it
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataSource for NoMetadata {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Fixed mapping, for embedding applications that already hold request
/// data and for tests
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    values: HashMap<String, String>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl MetadataSource for StaticMetadata {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Metadata from the running process
///
/// CGI-style variables (`REQUEST_METHOD`, `REMOTE_ADDR`, ...) are read from
/// the environment. `SCRIPT_FILENAME` falls back to the current executable
/// and `REQUEST_TIME_FLOAT` to the moment this source was created.
#[derive(Debug, Clone)]
pub struct ProcessMetadata {
    started_at: DateTime<Utc>,
}

impl ProcessMetadata {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }
}

impl Default for ProcessMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataSource for ProcessMetadata {
    fn get(&self, key: &str) -> Option<String> {
        if let Ok(value) = std::env::var(key) {
            return Some(value);
        }
        match key {
            SCRIPT_FILENAME => std::env::current_exe()
                .ok()
                .map(|path| path.display().to_string()),
            REQUEST_TIME_FLOAT => Some(format_seconds(&self.started_at)),
            _ => None,
        }
    }
}

/// Format a point in time as `<unix seconds>.<microseconds>`
pub fn format_seconds(at: &DateTime<Utc>) -> String {
    format!("{}.{:06}", at.timestamp(), at.timestamp_subsec_micros())
}

fn as_seconds(at: &DateTime<Utc>) -> f64 {
    at.timestamp() as f64 + f64::from(at.timestamp_subsec_micros()) / 1_000_000.0
}

/// Fills metadata fields that are still missing
#[derive(Clone)]
pub struct MetadataEnricher {
    source: Arc<dyn MetadataSource>,
}

impl MetadataEnricher {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> Arc<dyn MetadataSource> {
        Arc::clone(&self.source)
    }

    /// Add metadata fields absent from `fields`, using `now` for the
    /// time offset
    pub fn enrich(&self, fields: &mut FlatFields, now: &DateTime<Utc>) {
        Self::set_if_absent(fields, TIME_OFFSET_FIELD, self.time_offset(now));
        for (field, key) in METADATA_FIELDS {
            Self::set_if_absent(fields, field, self.source.get(key));
        }
    }

    /// Seconds elapsed since the request started, to six decimals
    ///
    /// `None` when the start time is missing or not a number.
    fn time_offset(&self, now: &DateTime<Utc>) -> Option<String> {
        let started: f64 = self.source.get(REQUEST_TIME_FLOAT)?.trim().parse().ok()?;
        let offset = as_seconds(now) - started;
        offset.is_finite().then(|| format!("{offset:.6}"))
    }

    fn set_if_absent(fields: &mut FlatFields, field: &str, value: Option<String>) {
        if fields.contains_key(field) {
            return;
        }
        match value {
            Some(value) if !value.is_empty() => fields.insert(field, value),
            _ => {}
        }
    }
}

impl fmt::Debug for MetadataEnricher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataEnricher").finish_non_exhaustive()
    }
}
