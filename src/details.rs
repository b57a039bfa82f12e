//! Match-scoped market-details store.
//!
//! One [`MatchDetailsStore`] lives for the duration of a match-details
//! screen. It subscribes to the market-groups endpoint of its match through
//! the [`GroupFeed`] seam, then to one detail endpoint per group, and keeps
//! a normalized market cache scoped to that match. Group membership keeps
//! feed insertion order; only outcomes are sorted.
//!
//! Re-delivery of the group list tears the per-group state down before
//! rebuilding it: stale detail registrations are released and the market
//! tables cleared before any new registration is made, so no frame from an
//! old registration can land in fresh tables.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::content::{
    BettingOfferRecord, ContentDump, ContentRecord, MarketGroupRecord, MarketRecord,
};
use crate::domain::id::{GroupKey, MarketId, MatchId, OfferId};
use crate::domain::update::{UpdateBatch, UpdateRecord};
use crate::domain::view::Market;
use crate::error::Result;
use crate::feed::{FeedRegistration, GroupFeed};
use crate::store::assembler;
use crate::store::{MarketTables, OrderedIdSet};

/// Group key of the bet-builder pseudo-group. It has its own screen and is
/// never part of the ordinary group list.
const BET_BUILDER_GROUP: &str = "Bet_Builder";

#[derive(Debug, Default)]
struct DetailsTables {
    groups: HashMap<GroupKey, MarketGroupRecord>,
    group_order: OrderedIdSet<GroupKey>,
    markets_for_group: HashMap<GroupKey, OrderedIdSet<MarketId>>,
    markets: MarketTables,
    loading: HashMap<GroupKey, watch::Sender<bool>>,
    groups_registration: Option<FeedRegistration>,
    detail_registrations: Vec<FeedRegistration>,
}

/// Cache of the market groups and markets of a single match.
#[derive(Clone)]
pub struct MatchDetailsStore {
    match_id: MatchId,
    feed: Arc<dyn GroupFeed>,
    inner: Arc<RwLock<DetailsTables>>,
    market_groups: Arc<watch::Sender<Vec<MarketGroupRecord>>>,
    total_markets: Arc<watch::Sender<usize>>,
}

impl MatchDetailsStore {
    /// Create an empty store for one match. No registration happens until
    /// [`connect`](Self::connect).
    #[must_use]
    pub fn new(match_id: MatchId, feed: Arc<dyn GroupFeed>) -> Self {
        let (market_groups, _) = watch::channel(Vec::new());
        let (total_markets, _) = watch::channel(0);
        Self {
            match_id,
            feed,
            inner: Arc::new(RwLock::new(DetailsTables::default())),
            market_groups: Arc::new(market_groups),
            total_markets: Arc::new(total_markets),
        }
    }

    /// The match this store is scoped to.
    #[must_use]
    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    /// Register on the market-groups endpoint of the match.
    ///
    /// Any previous session state is torn down first: old registrations are
    /// released and every table cleared before the new registration is made.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FeedError`] when the groups registration
    /// cannot be established. Failed teardown of stale registrations is
    /// logged, not propagated.
    pub async fn connect(&self) -> Result<()> {
        let stale = self.reset_session();
        self.release(stale).await;

        let handle = self.feed.register_market_groups(&self.match_id).await?;
        self.inner.write().groups_registration = Some(handle);
        debug!(match_id = %self.match_id, "registered for market groups");
        Ok(())
    }

    /// Release every live registration and clear the store.
    pub async fn disconnect(&self) {
        let stale = self.reset_session();
        self.release(stale).await;
    }

    /// Ingest a market-groups dump and re-subscribe to each group's detail
    /// endpoint.
    ///
    /// The group list is published before any detail data arrives, so the
    /// screen can render its group tabs immediately. The bet-builder
    /// pseudo-group is excluded.
    pub async fn store_market_groups(&self, dump: ContentDump) {
        let (stale, group_keys) = {
            let mut tables = self.inner.write();
            let stale = std::mem::take(&mut tables.detail_registrations);

            tables.groups.clear();
            tables.group_order = OrderedIdSet::new();
            tables.loading.clear();

            for record in dump.records {
                let ContentRecord::MarketGroup(group) = record else {
                    continue;
                };
                let Some(key) = group.group_key.clone() else {
                    continue;
                };
                if key.as_str() == BET_BUILDER_GROUP {
                    continue;
                }
                tables.group_order.insert(key.clone());
                tables.groups.insert(key.clone(), group);
                let (sender, _) = watch::channel(true);
                tables.loading.insert(key, sender);
            }

            // Stale detail frames must not land in the new session.
            tables.markets.clear();
            tables.markets_for_group.clear();

            let ordered: Vec<MarketGroupRecord> = tables
                .group_order
                .iter()
                .filter_map(|key| tables.groups.get(key).cloned())
                .collect();
            self.market_groups.send_replace(ordered);
            self.total_markets.send_replace(0);

            let keys: Vec<GroupKey> = tables.group_order.iter().cloned().collect();
            (stale, keys)
        };

        self.release(stale).await;

        let mut handles = Vec::with_capacity(group_keys.len());
        for key in &group_keys {
            match self.feed.register_group_details(&self.match_id, key).await {
                Ok(handle) => handles.push(handle),
                Err(error) => {
                    warn!(match_id = %self.match_id, group = %key, %error,
                        "group details registration failed");
                }
            }
        }
        self.inner.write().detail_registrations = handles;
    }

    /// Ingest the detail dump of one market group.
    ///
    /// Only market, outcome, offer, and relation records are meaningful in
    /// the group scope; anything else in the dump is ignored. Clears the
    /// group's loading flag and refreshes the total market count.
    pub fn store_group_details(&self, dump: ContentDump, group_key: &GroupKey) {
        let mut tables = self.inner.write();
        for record in dump.records {
            match record {
                ContentRecord::Market(market) => {
                    tables
                        .markets_for_group
                        .entry(group_key.clone())
                        .or_default()
                        .insert(market.id.clone());
                    tables.markets.upsert_market(market);
                }
                ContentRecord::BetOutcome(outcome) => {
                    tables.markets.upsert_bet_outcome(outcome);
                }
                ContentRecord::BettingOffer(offer) => {
                    tables.markets.upsert_offer(offer);
                }
                ContentRecord::MarketOutcomeRelation(relation) => {
                    tables.markets.upsert_relation(relation);
                }
                _ => {}
            }
        }

        if let Some(sender) = tables.loading.get(group_key) {
            sender.send_replace(false);
        }
        self.total_markets.send_replace(tables.markets.market_count());
    }

    /// Apply a batch of delta updates in arrival order.
    pub fn apply_updates(&self, batch: UpdateBatch) {
        for update in batch.updates {
            self.apply_update(update);
        }
    }

    /// Apply one delta update. Only markets and offers live in this scope;
    /// anything else is dropped.
    pub fn apply_update(&self, update: UpdateRecord) {
        // Overlays read the current row before replacing it, so concurrent
        // updates to the same id must serialize through the write lock.
        let tables = self.inner.write();
        match update {
            UpdateRecord::BettingOfferUpdate(update) => {
                if !tables.markets.apply_offer_update(&update) {
                    debug!(offer = %update.id, "offer update for unknown id dropped");
                }
            }
            UpdateRecord::MarketUpdate(update) => {
                if !tables.markets.apply_market_update(&update) {
                    debug!(market = %update.id, "market update for unknown id dropped");
                }
            }
            _ => {}
        }
    }

    /// Market groups in feed order, replayed to every new subscriber.
    #[must_use]
    pub fn market_groups_publisher(&self) -> watch::Receiver<Vec<MarketGroupRecord>> {
        self.market_groups.subscribe()
    }

    /// Total number of markets held across all groups.
    #[must_use]
    pub fn total_markets_publisher(&self) -> watch::Receiver<usize> {
        self.total_markets.subscribe()
    }

    /// Loading flag of one group: true from group registration until its
    /// first detail dump lands. `None` when the group is unknown.
    #[must_use]
    pub fn group_loading_publisher(&self, group_key: &GroupKey) -> Option<watch::Receiver<bool>> {
        self.inner
            .read()
            .loading
            .get(group_key)
            .map(watch::Sender::subscribe)
    }

    /// Live handle on one market. `None` when the id is unknown.
    #[must_use]
    pub fn market_publisher(&self, id: &MarketId) -> Option<watch::Receiver<MarketRecord>> {
        self.inner.read().markets.subscribe_market(id)
    }

    /// Live handle on one betting offer. `None` when the id is unknown.
    #[must_use]
    pub fn betting_offer_publisher(
        &self,
        id: &OfferId,
    ) -> Option<watch::Receiver<BettingOfferRecord>> {
        self.inner.read().markets.subscribe_offer(id)
    }

    /// Assembled markets of one group, in feed insertion order with sorted
    /// outcomes. No cross-market sort happens in the details scope.
    #[must_use]
    pub fn markets_for_group(&self, group_key: &GroupKey) -> Vec<Market> {
        let tables = self.inner.read();
        match tables.markets_for_group.get(group_key) {
            Some(market_ids) => assembler::assemble_markets(&tables.markets, market_ids),
            None => Vec::new(),
        }
    }

    /// Group keys currently known, in feed order.
    #[must_use]
    pub fn group_keys(&self) -> Vec<GroupKey> {
        self.inner.read().group_order.iter().cloned().collect()
    }

    /// Wipe all tables and publishers, returning the registrations that need
    /// releasing. Lock is dropped before any await.
    fn reset_session(&self) -> Vec<FeedRegistration> {
        let mut tables = self.inner.write();
        let mut stale: Vec<FeedRegistration> = tables.groups_registration.take().into_iter().collect();
        stale.extend(std::mem::take(&mut tables.detail_registrations));

        tables.groups.clear();
        tables.group_order = OrderedIdSet::new();
        tables.markets_for_group.clear();
        tables.markets.clear();
        tables.loading.clear();

        self.market_groups.send_replace(Vec::new());
        self.total_markets.send_replace(0);
        stale
    }

    async fn release(&self, registrations: Vec<FeedRegistration>) {
        for registration in registrations {
            if let Err(error) = self.feed.unregister(registration).await {
                warn!(match_id = %self.match_id, %error, "failed to release registration");
            }
        }
    }
}

impl std::fmt::Debug for MatchDetailsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchDetailsStore")
            .field("match_id", &self.match_id)
            .finish_non_exhaustive()
    }
}
