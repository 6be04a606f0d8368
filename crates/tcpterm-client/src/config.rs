//! Connection manager configuration.

use std::time::Duration;

/// Default time allowed for resolving and dialing a target.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Capacity of the single bounded read performed after each send.
///
/// Replies longer than this are truncated. There is no framing to detect it.
pub const REPLY_BUFFER_CAPACITY: usize = 280;

/// Connection manager configuration
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Timeout for resolving and dialing a target
    pub connect_timeout: Duration,
    /// Bytes read per reply, at least one
    pub reply_capacity: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self { connect_timeout: DEFAULT_CONNECT_TIMEOUT, reply_capacity: REPLY_BUFFER_CAPACITY }
    }
}
