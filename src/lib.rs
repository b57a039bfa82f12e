//! In-memory cache for a push-based sports odds feed.
//!
//! The feed delivers flat, normalized entity records (tournaments, matches,
//! markets, outcomes, offers) in content dumps followed by delta updates.
//! This crate keeps those records in per-type tables keyed by opaque string
//! ids, maintains the secondary indexes needed to join them, and serves two
//! kinds of reads:
//!
//! - synchronous queries that assemble fully joined, deterministically
//!   sorted match views ([`store::AggregatorStore::matches_for_list_type`]);
//! - per-id reactive subscriptions backed by [`tokio::sync::watch`], which
//!   replay the current value and then every change.
//!
//! Two store configurations share the same machinery: the whole-feed
//! [`store::AggregatorStore`] and the match-scoped
//! [`details::MatchDetailsStore`], which additionally manages its own feed
//! registrations through the [`feed::GroupFeed`] seam.
//!
//! Referential gaps never fail: the feed delivers partially and out of
//! order, so lookups that miss return `None` and joins skip dangling
//! references.

pub mod details;
pub mod domain;
pub mod error;
pub mod feed;
pub mod store;

pub use details::MatchDetailsStore;
pub use error::{FeedError, Result};
pub use feed::{FeedRegistration, GroupFeed};
pub use store::AggregatorStore;
