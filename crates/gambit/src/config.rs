//! Client configuration.

use gambit_transport::DEFAULT_MAX_FRAME_LEN;

/// Default relay server address.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";

/// Default number of outbound messages that can wait for the writer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Settings for one client connection.
///
/// Build one with [`GameClientBuilder`](crate::GameClientBuilder) or start
/// from `ClientConfig::default()` and override fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port` of the relay server.
    pub server_addr: String,

    /// Capacity of the outbound queue. When it is full, senders wait.
    pub queue_capacity: usize,

    /// Largest inbound frame accepted before the connection is dropped.
    pub max_frame_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}
