//! Error types for the crate.
//!
//! The cache itself never fails: lookup misses and dangling references are
//! `Option::None`, the routine outcome of partial push-feed delivery. Errors
//! exist only at the transport seam, where subscription registration against
//! the feed can fail.

use thiserror::Error;

/// Errors raised by the feed transport seam.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Registering a subscription on a feed endpoint failed.
    #[error("failed to register on {endpoint}: {reason}")]
    Registration {
        /// Endpoint description supplied by the transport.
        endpoint: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// Tearing down an existing subscription failed.
    #[error("failed to unregister subscription {registration}: {reason}")]
    Unregistration {
        /// The registration handle that could not be released.
        registration: u64,
        /// Human-readable failure reason.
        reason: String,
    },

    /// The feed connection is gone and no further frames will arrive.
    #[error("feed connection closed: {0}")]
    Closed(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FeedError>;
