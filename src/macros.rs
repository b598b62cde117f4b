//! Logging macros for ergonomic log message formatting.
//!
//! The level macros format their message like `format!` and log it with
//! an empty context. [`context!`](crate::context) builds a context from
//! `key => value` pairs.
//!
//! # Examples
//!
//! ```
//! use radis_logger::prelude::*;
//! use radis_logger::{info, log};
//!
//! let mut logger = Logger::builder().dry_run(true).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With context fields
//! logger.info("User logged in", context! { "user_id" => 42, "action" => "login" });
//! ```

/// Build a [`Context`](crate::core::Context) from `key => value` pairs.
///
/// Values are anything convertible into a
/// [`ContextValue`](crate::core::ContextValue), including nested contexts.
///
/// ```
/// use radis_logger::context;
///
/// let ctx = context! {
///     "user" => "alice",
///     "request" => context! { "id" => 7 },
/// };
/// assert_eq!(ctx.len(), 2);
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::core::Context::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut context = $crate::core::Context::new();
        $( context.insert($key, $value); )+
        context
    }};
}

/// Log a message with automatic formatting.
///
/// ```
/// # use radis_logger::prelude::*;
/// # let mut logger = Logger::builder().dry_run(true).build().unwrap();
/// use radis_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, "error", "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), $crate::core::Context::new())
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Emergency, $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Alert, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use radis_logger::prelude::*;
/// # let mut logger = Logger::builder().dry_run(true).build().unwrap();
/// use radis_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Notice, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use radis_logger::prelude::*;
/// # let mut logger = Logger::builder().dry_run(true).build().unwrap();
/// use radis_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}
