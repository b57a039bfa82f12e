//! Transport seam for match-details subscriptions.
//!
//! The cache consumes already-decoded dumps and updates; the transport layer
//! that produces them is an external collaborator behind [`GroupFeed`]. The
//! match-scoped store only needs three operations from it: register on the
//! market-groups endpoint of a match, register on one group's details
//! endpoint, and release a previous registration.
//!
//! Implementations must be `Send + Sync`; the store holds one behind an
//! `Arc` and may call it from any task.

use async_trait::async_trait;

use crate::domain::id::{GroupKey, MatchId};
use crate::error::Result;

/// Opaque handle identifying one live endpoint registration.
///
/// Returned by the transport on registration and passed back verbatim on
/// teardown. The store never interprets the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedRegistration(u64);

impl FeedRegistration {
    /// Wrap a transport-assigned registration id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying registration id.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// Subscription registry of the push feed, as seen by the match-details
/// store.
///
/// After a successful registration the transport starts delivering decoded
/// frames for that endpoint (a content dump first, then update batches) by
/// calling back into the store; delivery itself is outside this trait.
///
/// Once the underlying connection is gone for good, every operation returns
/// [`crate::error::FeedError::Closed`]; callers should stop retrying and
/// build a fresh transport.
#[async_trait]
pub trait GroupFeed: Send + Sync {
    /// Register on the market-groups endpoint of a match.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FeedError`] if the transport cannot establish
    /// the subscription.
    async fn register_market_groups(&self, match_id: &MatchId) -> Result<FeedRegistration>;

    /// Register on the detail endpoint of one market group.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FeedError`] if the transport cannot establish
    /// the subscription.
    async fn register_group_details(
        &self,
        match_id: &MatchId,
        group_key: &GroupKey,
    ) -> Result<FeedRegistration>;

    /// Release a previous registration. The transport stops delivering
    /// frames for it; releasing an already-released handle is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FeedError`] if the transport rejects the
    /// teardown.
    async fn unregister(&self, registration: FeedRegistration) -> Result<()>;
}
