//! Redis list publisher
//!
//! Pushes records with `LPUSH` through the `redis` crate's blocking
//! connection. A collector drains the other end of the list with
//! `RPOPLPUSH`, which gives the reliable-queue semantics.
//!
//! A connection that fails mid-command may still hold the reply to that
//! command, so it is dropped and the next push opens a fresh one. Only a
//! server-side rejection leaves the connection in place.

use crate::core::config::parse_server;
use crate::core::{LoggerError, QueuePublisher, Result};
use redis::{Client, Commands, Connection, RedisError};
use std::time::Duration;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Publisher that sends to a Redis server
///
/// # Example
///
/// ```no_run
/// use radis_logger::queue::RedisQueue;
/// use radis_logger::prelude::*;
///
/// let queue = RedisQueue::connect("localhost:6379")
///     .expect("Failed to connect to queue server");
///
/// let mut logger = Logger::builder().publisher(queue).build().unwrap();
/// logger.info("This record is pushed onto graylog-radis", Context::new());
/// ```
pub struct RedisQueue {
    client: Client,
    connection: Option<Connection>,
    address: String,
    timeout: Duration,
}

impl RedisQueue {
    /// Connect to `server` (`host:port`)
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Connection`] if the server cannot be reached.
    pub fn connect(server: &str) -> Result<Self> {
        Self::connect_with_timeout(server, IO_TIMEOUT)
    }

    /// Connect with a custom connect, read and write timeout
    pub fn connect_with_timeout(server: &str, timeout: Duration) -> Result<Self> {
        let (host, port) = parse_server(server)?;
        let address = format!("{}:{}", host, port);

        let client = Client::open(server_url(&host, port))
            .map_err(|e| LoggerError::config("server", e.to_string()))?;

        let mut queue = Self {
            client,
            connection: None,
            address,
            timeout,
        };
        queue.connection = Some(queue.open()?);
        tracing::info!(address = %queue.address, "connected to queue server");

        Ok(queue)
    }

    /// Whether a live connection is held
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn open(&self) -> Result<Connection> {
        let connection = self
            .client
            .get_connection_with_timeout(self.timeout)
            .map_err(|e| LoggerError::connection(&self.address, e))?;
        connection
            .set_read_timeout(Some(self.timeout))
            .and_then(|()| connection.set_write_timeout(Some(self.timeout)))
            .map_err(|e| LoggerError::connection(&self.address, e))?;
        Ok(connection)
    }
}

fn server_url(host: &str, port: u16) -> String {
    format!("redis://{}:{}/", host, port)
}

/// Sort a failed push into a rejection, a lost connection or a bad reply
fn push_error(queue: &str, address: &str, e: RedisError) -> LoggerError {
    if e.is_io_error() || e.is_connection_dropped() {
        return LoggerError::connection(address, e);
    }
    match e.code() {
        Some(code) => {
            let message = match e.detail() {
                Some(detail) => format!("{} {}", code, detail),
                None => code.to_string(),
            };
            LoggerError::rejected(queue, message)
        }
        None => LoggerError::protocol(e.to_string()),
    }
}

impl QueuePublisher for RedisQueue {
    fn push(&mut self, queue: &str, payload: &str) -> Result<()> {
        if self.connection.is_none() {
            self.connection = Some(self.open()?);
            tracing::info!(address = %self.address, "reconnected to queue server");
        }
        let Some(connection) = self.connection.as_mut() else {
            return Err(LoggerError::NotConnected);
        };

        let pushed: redis::RedisResult<i64> = connection.lpush(queue, payload);
        match pushed {
            Ok(length) => {
                tracing::debug!(queue, length, "record pushed");
                Ok(())
            }
            Err(e) => {
                let err = push_error(queue, &self.address, e);
                if !matches!(err, LoggerError::QueueRejected { .. }) {
                    tracing::warn!(address = %self.address, error = %err, "dropping queue connection");
                    self.connection = None;
                }
                Err(err)
            }
        }
    }

    fn fork(&self) -> Result<Box<dyn QueuePublisher>> {
        tracing::info!(address = %self.address, "opening forked queue connection");
        Ok(Box::new(Self {
            client: self.client.clone(),
            connection: Some(self.open()?),
            address: self.address.clone(),
            timeout: self.timeout,
        }))
    }

    fn target(&self) -> &str {
        &self.address
    }
}
