//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Could not reach the queue server, or lost the connection mid-command
    #[error("cannot connect to {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: redis::RedisError,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The queue server answered with something we cannot parse
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The queue server refused the push
    #[error("Queue '{queue}' rejected push: {message}")]
    QueueRejected { queue: String, message: String },

    /// Publishing was attempted without a queue connection
    #[error("No queue connection available")]
    NotConnected,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create a connection error for `address`
    pub fn connection(address: impl Into<String>, source: redis::RedisError) -> Self {
        LoggerError::Connection {
            address: address.into(),
            source,
        }
    }

    /// Create a protocol error
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        LoggerError::Protocol(msg.into())
    }

    /// Create a rejected-push error
    pub fn rejected(queue: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::QueueRejected {
            queue: queue.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}
