//! Whole-feed aggregation store.
//!
//! One [`AggregatorStore`] lives for the whole app session. It ingests
//! content dumps tagged with the list they were requested for, applies delta
//! updates, and serves both synchronous joined queries and per-id reactive
//! subscriptions. All tables sit behind one lock; every operation is plain
//! in-memory work bounded by the size of a single feed payload.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::content::{
    BettingOfferRecord, CashoutRecord, ContentDump, ContentRecord, ListType, LocationRecord,
    MarketRecord, MatchInfoRecord, MatchRecord, TournamentRecord,
};
use crate::domain::id::{LocationId, MarketId, MatchId, OfferId};
use crate::domain::ordering::MainMarketOrder;
use crate::domain::update::{UpdateBatch, UpdateRecord};
use crate::domain::view::Match;

use super::assembler;
use super::tables::{MarketTables, OrderedIdSet};

#[derive(Debug, Default)]
struct AggregatorTables {
    matches_for_type: HashMap<ListType, OrderedIdSet<MatchId>>,
    matches: HashMap<MatchId, MatchRecord>,
    markets_for_match: HashMap<MatchId, OrderedIdSet<MarketId>>,
    markets: MarketTables,
    main_markets: HashMap<MarketId, MarketRecord>,
    main_market_order: MainMarketOrder,
    locations: HashMap<LocationId, LocationRecord>,
    tournaments: HashMap<String, TournamentRecord>,
    tournaments_for_location: HashMap<LocationId, OrderedIdSet<String>>,
    tournaments_for_category: HashMap<String, OrderedIdSet<String>>,
    popular_tournaments: HashMap<String, TournamentRecord>,
    outright_tournaments: HashMap<String, TournamentRecord>,
    match_infos: HashMap<String, MatchInfoRecord>,
    match_infos_for_match: HashMap<MatchId, OrderedIdSet<String>>,
    cashouts: HashMap<String, CashoutRecord>,
}

/// Process-local cache of the live odds feed.
///
/// Updates referencing unknown ids are no-ops and joins silently skip
/// missing entities; the feed delivers partially and out of order, and that
/// is routine, not an error.
#[derive(Debug)]
pub struct AggregatorStore {
    inner: RwLock<AggregatorTables>,
    /// Match ids that have at least one match-info record, in first-seen
    /// order.
    matches_with_info: watch::Sender<Vec<MatchId>>,
}

impl AggregatorStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (matches_with_info, _) = watch::channel(Vec::new());
        Self {
            inner: RwLock::new(AggregatorTables::default()),
            matches_with_info,
        }
    }

    /// Ingest a content dump in arrival order, indexing matches under
    /// `list_type`.
    ///
    /// With `should_clear`, the list-type index and the main-market tables
    /// are wiped first; shared entity tables survive so entities remain
    /// resolvable across list types.
    pub fn ingest(&self, dump: ContentDump, list_type: ListType, should_clear: bool) {
        let record_count = dump.len();
        let mut tables = self.inner.write();

        if should_clear {
            tables.matches_for_type.clear();
            tables.main_markets.clear();
            tables.main_market_order.clear();
        }

        for record in dump.records {
            self.ingest_record(&mut tables, record, list_type);
        }

        debug!(records = record_count, ?list_type, "processed content dump");
    }

    fn ingest_record(
        &self,
        tables: &mut AggregatorTables,
        record: ContentRecord,
        list_type: ListType,
    ) {
        match record {
            ContentRecord::Tournament(tournament) => {
                tables.tournaments.insert(tournament.id.clone(), tournament);
            }
            ContentRecord::Match(match_record) => {
                tables
                    .matches_for_type
                    .entry(list_type)
                    .or_default()
                    .insert(match_record.id.clone());
                tables.matches.insert(match_record.id.clone(), match_record);
            }
            ContentRecord::MatchInfo(info) => {
                self.store_match_info(tables, info);
            }
            ContentRecord::Market(market) => {
                if let Some(match_id) = &market.event_id {
                    tables
                        .markets_for_match
                        .entry(match_id.clone())
                        .or_default()
                        .insert(market.id.clone());
                }
                tables.markets.upsert_market(market);
            }
            ContentRecord::BetOutcome(outcome) => {
                tables.markets.upsert_bet_outcome(outcome);
            }
            ContentRecord::BettingOffer(offer) => {
                tables.markets.upsert_offer(offer);
            }
            ContentRecord::MainMarket(market) => {
                if let Some(betting_type_id) = &market.betting_type_id {
                    tables.main_market_order.insert(betting_type_id.clone());
                }
                tables.main_markets.insert(market.id.clone(), market);
            }
            ContentRecord::MarketOutcomeRelation(relation) => {
                tables.markets.upsert_relation(relation);
            }
            ContentRecord::Location(location) => {
                tables.locations.insert(location.id.clone(), location);
            }
            ContentRecord::Cashout(cashout) => {
                tables.cashouts.insert(cashout.id.clone(), cashout);
            }
            ContentRecord::MarketGroup(_) | ContentRecord::Unknown => {}
        }
    }

    fn store_match_info(&self, tables: &mut AggregatorTables, info: MatchInfoRecord) {
        let match_id = info.match_id.clone();
        tables.match_infos.insert(info.id.clone(), info.clone());

        if let Some(match_id) = match_id {
            tables
                .match_infos_for_match
                .entry(match_id.clone())
                .or_default()
                .insert(info.id);
            self.matches_with_info.send_if_modified(|list| {
                if list.contains(&match_id) {
                    false
                } else {
                    list.push(match_id);
                    true
                }
            });
        }
    }

    /// Apply a batch of delta updates in arrival order.
    pub fn apply_updates(&self, batch: UpdateBatch) {
        for update in batch.updates {
            self.apply_update(update);
        }
    }

    /// Apply one delta update. Unknown target ids are a no-op.
    pub fn apply_update(&self, update: UpdateRecord) {
        let mut tables = self.inner.write();
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
            UpdateRecord::MatchInfoUpdate(update) => {
                if let Some(current) = tables.match_infos.get(&update.id) {
                    let updated = update.apply(current);
                    tables.match_infos.insert(update.id.clone(), updated);
                }
            }
            UpdateRecord::FullMatchInfoUpdate(info) => {
                self.store_match_info(&mut tables, info);
            }
            UpdateRecord::CashoutCreate(cashout) | UpdateRecord::CashoutUpdate(cashout) => {
                tables.cashouts.insert(cashout.id.clone(), cashout);
            }
            UpdateRecord::CashoutDelete { id } => {
                tables.cashouts.remove(&id);
            }
            UpdateRecord::Unknown => {
                warn!("unknown update record dropped");
            }
        }
    }

    /// Live handle on one market: current value immediately, then every
    /// change. `None` when the id is unknown.
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

    /// Match ids ingested under a list type, in first-ingestion order.
    #[must_use]
    pub fn match_ids_for_list_type(&self, list_type: ListType) -> Vec<MatchId> {
        self.inner
            .read()
            .matches_for_type
            .get(&list_type)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Raw match records for a list type, unjoined, in list order.
    #[must_use]
    pub fn raw_matches_for_list_type(&self, list_type: ListType) -> Vec<MatchRecord> {
        let tables = self.inner.read();
        let Some(match_ids) = tables.matches_for_type.get(&list_type) else {
            return Vec::new();
        };
        match_ids
            .iter()
            .filter_map(|id| tables.matches.get(id).cloned())
            .collect()
    }

    /// Assemble the fully joined, sorted match views for a list type.
    ///
    /// Deterministic for a fixed store state: markets sort by main-market
    /// rank, outcomes by semantic rank, both stable.
    #[must_use]
    pub fn matches_for_list_type(&self, list_type: ListType) -> Vec<Match> {
        let tables = self.inner.read();
        let Some(match_ids) = tables.matches_for_type.get(&list_type) else {
            return Vec::new();
        };

        let mut matches = Vec::new();
        for match_id in match_ids {
            let Some(record) = tables.matches.get(match_id) else {
                continue;
            };

            let mut markets = match tables.markets_for_match.get(match_id) {
                Some(market_ids) => assembler::assemble_markets(&tables.markets, market_ids),
                None => Vec::new(),
            };
            assembler::sort_markets(&mut markets, &tables.main_market_order);

            let venue = record
                .venue_id
                .as_ref()
                .and_then(|id| tables.locations.get(id));
            matches.push(assembler::assemble_match(record, markets, venue));
        }
        matches
    }

    /// Look up a raw match record by id, regardless of list membership.
    #[must_use]
    pub fn raw_match(&self, id: &MatchId) -> Option<MatchRecord> {
        self.inner.read().matches.get(id).cloned()
    }

    /// Look up a location by id.
    #[must_use]
    pub fn location(&self, id: &LocationId) -> Option<LocationRecord> {
        self.inner.read().locations.get(id).cloned()
    }

    /// Look up a cashout by id.
    #[must_use]
    pub fn cashout(&self, id: &str) -> Option<CashoutRecord> {
        self.inner.read().cashouts.get(id).cloned()
    }

    /// Look up a main-market record by market id.
    #[must_use]
    pub fn main_market(&self, id: &MarketId) -> Option<MarketRecord> {
        self.inner.read().main_markets.get(id).cloned()
    }

    /// Replace the location table wholesale.
    pub fn store_locations(&self, locations: Vec<LocationRecord>) {
        let mut tables = self.inner.write();
        tables.locations.clear();
        for location in locations {
            tables.locations.insert(location.id.clone(), location);
        }
    }

    /// Replace the tournament table wholesale, rebuilding the venue and
    /// category indexes.
    pub fn store_tournaments(&self, tournaments: Vec<TournamentRecord>) {
        let mut tables = self.inner.write();
        tables.tournaments.clear();
        tables.tournaments_for_location.clear();
        tables.tournaments_for_category.clear();

        for tournament in tournaments {
            if let Some(venue_id) = &tournament.venue_id {
                tables
                    .tournaments_for_location
                    .entry(venue_id.clone())
                    .or_default()
                    .insert(tournament.id.clone());
            }
            if let Some(category_id) = &tournament.category_id {
                tables
                    .tournaments_for_category
                    .entry(category_id.clone())
                    .or_default()
                    .insert(tournament.id.clone());
            }
            tables.tournaments.insert(tournament.id.clone(), tournament);
        }
    }

    /// Replace the popular-tournaments bucket wholesale.
    pub fn store_popular_tournaments(&self, tournaments: Vec<TournamentRecord>) {
        let mut tables = self.inner.write();
        tables.popular_tournaments.clear();
        for tournament in tournaments {
            tables
                .popular_tournaments
                .insert(tournament.id.clone(), tournament);
        }
    }

    /// Replace the outright-tournaments bucket from a dump, keeping only its
    /// tournament records.
    pub fn ingest_outright_tournaments(&self, dump: ContentDump) {
        let mut tables = self.inner.write();
        tables.outright_tournaments.clear();
        for record in dump.records {
            if let ContentRecord::Tournament(tournament) = record {
                tables
                    .outright_tournaments
                    .insert(tournament.id.clone(), tournament);
            }
        }
    }

    /// Look up a tournament by id.
    #[must_use]
    pub fn tournament(&self, id: &str) -> Option<TournamentRecord> {
        self.inner.read().tournaments.get(id).cloned()
    }

    /// Tournament ids at a venue, in store order.
    #[must_use]
    pub fn tournament_ids_for_location(&self, venue_id: &LocationId) -> Vec<String> {
        self.inner
            .read()
            .tournaments_for_location
            .get(venue_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Tournament ids in a category, in store order.
    #[must_use]
    pub fn tournament_ids_for_category(&self, category_id: &str) -> Vec<String> {
        self.inner
            .read()
            .tournaments_for_category
            .get(category_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Live list of match ids that have match-info records.
    #[must_use]
    pub fn matches_with_info_publisher(&self) -> watch::Receiver<Vec<MatchId>> {
        self.matches_with_info.subscribe()
    }

    /// Whether any match-info record was seen for a match.
    #[must_use]
    pub fn has_match_info(&self, match_id: &MatchId) -> bool {
        self.matches_with_info.borrow().contains(match_id)
    }

    /// Look up a match-info record by id.
    #[must_use]
    pub fn match_info(&self, id: &str) -> Option<MatchInfoRecord> {
        self.inner.read().match_infos.get(id).cloned()
    }

    /// Match-info ids attached to a match, in first-seen order.
    #[must_use]
    pub fn match_info_ids_for_match(&self, match_id: &MatchId) -> Vec<String> {
        self.inner
            .read()
            .match_infos_for_match
            .get(match_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for AggregatorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::id::BettingTypeId;
    use crate::domain::update::BettingOfferUpdate;

    fn match_record(id: &str) -> MatchRecord {
        MatchRecord {
            id: MatchId::from(id),
            parent_id: None,
            parent_name: None,
            home_participant_id: None,
            home_participant_name: None,
            away_participant_id: None,
            away_participant_name: None,
            start_date: None,
            sport_id: None,
            short_sport_name: None,
            venue_id: None,
            number_of_markets: None,
            root_part_id: None,
        }
    }

    fn main_market(id: &str, betting_type: &str) -> MarketRecord {
        MarketRecord {
            id: MarketId::from(id),
            event_id: None,
            betting_type_id: Some(BettingTypeId::from(betting_type)),
            short_name: None,
            param_float1: None,
            param_float2: None,
            param_float3: None,
            event_part_id: None,
            is_available: None,
            is_closed: None,
        }
    }

    #[test]
    fn reingesting_a_match_does_not_duplicate_the_list() {
        let store = AggregatorStore::new();
        let dump = ContentDump::new(vec![ContentRecord::Match(match_record("m-1"))]);

        store.ingest(dump.clone(), ListType::PopularEvents, false);
        store.ingest(dump, ListType::PopularEvents, false);

        assert_eq!(
            store.match_ids_for_list_type(ListType::PopularEvents),
            vec![MatchId::from("m-1")]
        );
    }

    #[test]
    fn should_clear_wipes_list_index_but_keeps_entities() {
        let store = AggregatorStore::new();
        store.ingest(
            ContentDump::new(vec![
                ContentRecord::Match(match_record("m-1")),
                ContentRecord::MainMarket(main_market("k-main", "1x2")),
            ]),
            ListType::PopularEvents,
            false,
        );

        store.ingest(
            ContentDump::new(vec![ContentRecord::Match(match_record("m-2"))]),
            ListType::TodayEvents,
            true,
        );

        assert!(store
            .match_ids_for_list_type(ListType::PopularEvents)
            .is_empty());
        // Old match is still resolvable by id: entity tables survive a clear.
        assert!(store.raw_match(&MatchId::from("m-1")).is_some());
        assert_eq!(store.raw_matches_for_list_type(ListType::TodayEvents).len(), 1);
        assert!(store.main_market(&MarketId::from("k-main")).is_none());
    }

    #[test]
    fn update_for_unknown_offer_is_silent() {
        let store = AggregatorStore::new();
        store.apply_update(UpdateRecord::BettingOfferUpdate(BettingOfferUpdate {
            id: OfferId::from("missing"),
            odds_value: Some(dec!(2.00)),
            status_id: None,
            is_live: None,
            is_available: None,
        }));
        // Nothing to assert beyond "did not panic"; the store is unchanged.
        assert!(store
            .betting_offer_publisher(&OfferId::from("missing"))
            .is_none());
    }

    #[test]
    fn match_info_publisher_reports_first_seen_matches_once() {
        let store = AggregatorStore::new();
        let info = |id: &str| MatchInfoRecord {
            id: id.to_string(),
            match_id: Some(MatchId::from("m-1")),
            param_float1: Some(1.0),
            param_float2: None,
            param_event_part_name1: None,
        };

        store.ingest(
            ContentDump::new(vec![
                ContentRecord::MatchInfo(info("i-1")),
                ContentRecord::MatchInfo(info("i-2")),
            ]),
            ListType::AllLiveEvents,
            false,
        );

        let publisher = store.matches_with_info_publisher();
        assert_eq!(publisher.borrow().as_slice(), &[MatchId::from("m-1")]);
        assert!(store.has_match_info(&MatchId::from("m-1")));
        assert_eq!(
            store.match_info_ids_for_match(&MatchId::from("m-1")),
            vec!["i-1".to_string(), "i-2".to_string()]
        );
    }

    #[test]
    fn match_info_update_overlays_params() {
        let store = AggregatorStore::new();
        store.ingest(
            ContentDump::new(vec![ContentRecord::MatchInfo(MatchInfoRecord {
                id: "i-1".to_string(),
                match_id: Some(MatchId::from("m-1")),
                param_float1: Some(0.0),
                param_float2: Some(0.0),
                param_event_part_name1: Some("1st half".to_string()),
            })]),
            ListType::AllLiveEvents,
            false,
        );

        store.apply_update(UpdateRecord::MatchInfoUpdate(
            crate::domain::update::MatchInfoUpdate {
                id: "i-1".to_string(),
                param_float1: Some(2.0),
                param_float2: None,
                param_event_part_name1: None,
            },
        ));

        let info = store.match_info("i-1").unwrap();
        assert_eq!(info.param_float1, Some(2.0));
        assert_eq!(info.param_float2, Some(0.0));
        assert_eq!(info.param_event_part_name1.as_deref(), Some("1st half"));
    }

    #[test]
    fn cashout_updates_manage_the_table() {
        let store = AggregatorStore::new();
        let cashout = CashoutRecord {
            id: "c-1".to_string(),
            bet_id: Some("b-1".to_string()),
            amount: Some(dec!(12.50)),
        };

        store.apply_update(UpdateRecord::CashoutCreate(cashout.clone()));
        assert_eq!(store.cashout("c-1"), Some(cashout));

        store.apply_update(UpdateRecord::CashoutDelete {
            id: "c-1".to_string(),
        });
        assert!(store.cashout("c-1").is_none());
    }

    #[test]
    fn tournament_indexes_rebuild_on_store() {
        let store = AggregatorStore::new();
        let tournament = |id: &str, venue: &str| TournamentRecord {
            id: id.to_string(),
            venue_id: Some(LocationId::from(venue)),
            category_id: Some("soccer".to_string()),
            name: None,
        };

        store.store_tournaments(vec![tournament("t-1", "gb"), tournament("t-2", "gb")]);
        store.store_tournaments(vec![tournament("t-1", "gb")]);

        assert_eq!(
            store.tournament_ids_for_location(&LocationId::from("gb")),
            vec!["t-1".to_string()]
        );
        assert!(store.tournament("t-2").is_none());
        assert_eq!(store.tournament_ids_for_category("soccer").len(), 1);
    }
}
