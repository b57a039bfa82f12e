//! Shared normalized tables for markets, outcomes, and offers.
//!
//! Both store configurations (the whole-feed aggregator and the match-scoped
//! details store) keep the same market-level machinery: per-id tables, the
//! market → outcome index derived from relation records, and per-id `watch`
//! channels so UI observers can follow one market or one price without
//! re-subscribing to the whole feed.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use tokio::sync::watch;

use crate::domain::content::{
    BetOutcomeRecord, BettingOfferRecord, MarketOutcomeRelationRecord, MarketRecord,
};
use crate::domain::id::{MarketId, OfferId, OutcomeId};
use crate::domain::update::{BettingOfferUpdate, MarketUpdate};

/// An insertion-ordered set of ids.
///
/// Buckets in secondary indexes must behave as sets (re-ingesting a relation
/// never duplicates an id) while keeping first-insertion order, so sorts
/// that tie-break on resolution order stay reproducible.
#[derive(Debug, Clone)]
pub struct OrderedIdSet<T> {
    order: Vec<T>,
    members: HashSet<T>,
}

impl<T> Default for OrderedIdSet<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> OrderedIdSet<T> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }

    /// Insert an id at the end unless already present. Returns true if the
    /// id was newly inserted.
    pub fn insert(&mut self, id: T) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Whether the id is in the set.
    #[must_use]
    pub fn contains(&self, id: &T) -> bool {
        self.members.contains(id)
    }

    /// Ids in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.order.iter()
    }

    /// Number of ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the set holds no ids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<'a, T: Clone + Eq + Hash> IntoIterator for &'a OrderedIdSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Normalized market/outcome/offer tables with per-id reactive channels.
///
/// Markets and offers live inside their `watch` senders: the channel's
/// current value is the authoritative row, so delta overlays are visible to
/// subscribers and to the assembler alike. Static outcome slots and relation
/// records are plain rows.
#[derive(Debug, Default)]
pub(crate) struct MarketTables {
    markets: HashMap<MarketId, watch::Sender<MarketRecord>>,
    bet_outcomes: HashMap<OutcomeId, BetOutcomeRecord>,
    offers: HashMap<OfferId, watch::Sender<BettingOfferRecord>>,
    offer_for_outcome: HashMap<OutcomeId, OfferId>,
    outcomes_for_market: HashMap<MarketId, OrderedIdSet<OutcomeId>>,
    relations: HashMap<String, MarketOutcomeRelationRecord>,
}

impl MarketTables {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a market row. An existing channel is pushed the new
    /// value so live observers survive re-ingestion.
    pub(crate) fn upsert_market(&mut self, record: MarketRecord) {
        match self.markets.get(&record.id) {
            Some(sender) => {
                sender.send_replace(record);
            }
            None => {
                let (sender, _) = watch::channel(record.clone());
                self.markets.insert(record.id, sender);
            }
        }
    }

    /// Current value of a market row.
    pub(crate) fn market(&self, id: &MarketId) -> Option<MarketRecord> {
        self.markets.get(id).map(|sender| sender.borrow().clone())
    }

    /// Live handle on one market. `None` when the id is unknown.
    pub(crate) fn subscribe_market(&self, id: &MarketId) -> Option<watch::Receiver<MarketRecord>> {
        self.markets.get(id).map(watch::Sender::subscribe)
    }

    /// Overlay a market delta onto the current row and notify observers.
    /// Returns false (no-op) when the id is unknown.
    pub(crate) fn apply_market_update(&self, update: &MarketUpdate) -> bool {
        let Some(sender) = self.markets.get(&update.id) else {
            return false;
        };
        let updated = update.apply(&sender.borrow());
        sender.send_replace(updated);
        true
    }

    /// Insert or replace a static outcome slot.
    pub(crate) fn upsert_bet_outcome(&mut self, record: BetOutcomeRecord) {
        self.bet_outcomes.insert(record.id.clone(), record);
    }

    pub(crate) fn bet_outcome(&self, id: &OutcomeId) -> Option<&BetOutcomeRecord> {
        self.bet_outcomes.get(id)
    }

    /// Insert or replace an offer row, indexing it by the outcome it prices.
    pub(crate) fn upsert_offer(&mut self, record: BettingOfferRecord) {
        if let Some(outcome_id) = &record.outcome_id {
            self.offer_for_outcome
                .insert(outcome_id.clone(), record.id.clone());
        }
        match self.offers.get(&record.id) {
            Some(sender) => {
                sender.send_replace(record);
            }
            None => {
                let (sender, _) = watch::channel(record.clone());
                self.offers.insert(record.id, sender);
            }
        }
    }

    /// Current value of the offer pricing an outcome, if both the index
    /// entry and the offer row exist.
    pub(crate) fn offer_for_outcome(&self, outcome_id: &OutcomeId) -> Option<BettingOfferRecord> {
        let offer_id = self.offer_for_outcome.get(outcome_id)?;
        self.offers
            .get(offer_id)
            .map(|sender| sender.borrow().clone())
    }

    /// Live handle on one offer. `None` when the id is unknown.
    pub(crate) fn subscribe_offer(
        &self,
        id: &OfferId,
    ) -> Option<watch::Receiver<BettingOfferRecord>> {
        self.offers.get(id).map(watch::Sender::subscribe)
    }

    /// Overlay an offer delta onto the current row and notify observers.
    /// Returns false (no-op) when the id is unknown.
    pub(crate) fn apply_offer_update(&self, update: &BettingOfferUpdate) -> bool {
        let Some(sender) = self.offers.get(&update.id) else {
            return false;
        };
        let updated = update.apply(&sender.borrow());
        sender.send_replace(updated);
        true
    }

    /// Record a market ↔ outcome relation and grow the derived index.
    pub(crate) fn upsert_relation(&mut self, record: MarketOutcomeRelationRecord) {
        if let (Some(market_id), Some(outcome_id)) = (&record.market_id, &record.outcome_id) {
            self.outcomes_for_market
                .entry(market_id.clone())
                .or_default()
                .insert(outcome_id.clone());
        }
        self.relations.insert(record.id.clone(), record);
    }

    /// Outcome ids linked to a market, in first-relation order.
    pub(crate) fn outcome_ids_for_market(&self, id: &MarketId) -> Option<&OrderedIdSet<OutcomeId>> {
        self.outcomes_for_market.get(id)
    }

    /// Number of market rows.
    pub(crate) fn market_count(&self) -> usize {
        self.markets.len()
    }

    /// Drop every row, index entry, and channel.
    pub(crate) fn clear(&mut self) {
        self.markets.clear();
        self.bet_outcomes.clear();
        self.offers.clear();
        self.offer_for_outcome.clear();
        self.outcomes_for_market.clear();
        self.relations.clear();
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn market(id: &str) -> MarketRecord {
        MarketRecord {
            id: MarketId::from(id),
            event_id: None,
            betting_type_id: None,
            short_name: None,
            param_float1: None,
            param_float2: None,
            param_float3: None,
            event_part_id: None,
            is_available: Some(true),
            is_closed: Some(false),
        }
    }

    fn offer(id: &str, outcome: &str) -> BettingOfferRecord {
        BettingOfferRecord {
            id: OfferId::from(id),
            outcome_id: Some(OutcomeId::from(outcome)),
            odds_value: Some(dec!(1.80)),
            status_id: None,
            is_live: None,
            is_available: Some(true),
        }
    }

    #[test]
    fn ordered_id_set_keeps_insertion_order_and_dedupes() {
        let mut set = OrderedIdSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));

        let ids: Vec<_> = set.iter().copied().collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn market_upsert_replaces_by_id() {
        let mut tables = MarketTables::new();
        tables.upsert_market(market("k-1"));

        let mut replacement = market("k-1");
        replacement.short_name = Some("1X2".to_string());
        tables.upsert_market(replacement);

        assert_eq!(tables.market_count(), 1);
        let row = tables.market(&MarketId::from("k-1")).unwrap();
        assert_eq!(row.short_name.as_deref(), Some("1X2"));
    }

    #[test]
    fn market_reingest_reaches_existing_subscribers() {
        let mut tables = MarketTables::new();
        tables.upsert_market(market("k-1"));
        let rx = tables.subscribe_market(&MarketId::from("k-1")).unwrap();

        let mut replacement = market("k-1");
        replacement.is_closed = Some(true);
        tables.upsert_market(replacement);

        assert_eq!(rx.borrow().is_closed, Some(true));
    }

    #[test]
    fn offer_update_is_noop_for_unknown_id() {
        let tables = MarketTables::new();
        let update = BettingOfferUpdate {
            id: OfferId::from("missing"),
            odds_value: Some(dec!(2.00)),
            status_id: None,
            is_live: None,
            is_available: None,
        };
        assert!(!tables.apply_offer_update(&update));
    }

    #[test]
    fn offer_lookup_goes_through_outcome_index() {
        let mut tables = MarketTables::new();
        tables.upsert_offer(offer("bo-1", "out-1"));

        let row = tables.offer_for_outcome(&OutcomeId::from("out-1")).unwrap();
        assert_eq!(row.id.as_str(), "bo-1");
        assert!(tables.offer_for_outcome(&OutcomeId::from("out-2")).is_none());
    }

    #[test]
    fn offer_update_visible_to_subscribers_and_lookups() {
        let mut tables = MarketTables::new();
        tables.upsert_offer(offer("bo-1", "out-1"));
        let rx = tables.subscribe_offer(&OfferId::from("bo-1")).unwrap();

        let update = BettingOfferUpdate {
            id: OfferId::from("bo-1"),
            odds_value: Some(dec!(1.95)),
            status_id: None,
            is_live: None,
            is_available: None,
        };
        assert!(tables.apply_offer_update(&update));

        assert_eq!(rx.borrow().odds_value, Some(dec!(1.95)));
        let row = tables.offer_for_outcome(&OutcomeId::from("out-1")).unwrap();
        assert_eq!(row.odds_value, Some(dec!(1.95)));
    }

    #[test]
    fn relations_build_ordered_outcome_index() {
        let mut tables = MarketTables::new();
        for (rel, outcome) in [("r-1", "out-b"), ("r-2", "out-a"), ("r-3", "out-b")] {
            tables.upsert_relation(MarketOutcomeRelationRecord {
                id: rel.to_string(),
                market_id: Some(MarketId::from("k-1")),
                outcome_id: Some(OutcomeId::from(outcome)),
            });
        }

        let ids: Vec<_> = tables
            .outcome_ids_for_market(&MarketId::from("k-1"))
            .unwrap()
            .iter()
            .map(OutcomeId::as_str)
            .collect();
        assert_eq!(ids, vec!["out-b", "out-a"]);
    }

    #[test]
    fn relation_without_both_ends_is_stored_but_not_indexed() {
        let mut tables = MarketTables::new();
        tables.upsert_relation(MarketOutcomeRelationRecord {
            id: "r-1".to_string(),
            market_id: Some(MarketId::from("k-1")),
            outcome_id: None,
        });

        assert!(tables.outcome_ids_for_market(&MarketId::from("k-1")).is_none());
    }

    #[test]
    fn clear_drops_all_rows() {
        let mut tables = MarketTables::new();
        tables.upsert_market(market("k-1"));
        tables.upsert_offer(offer("bo-1", "out-1"));
        tables.clear();

        assert_eq!(tables.market_count(), 0);
        assert!(tables.subscribe_offer(&OfferId::from("bo-1")).is_none());
    }
}
