//! Decoded content records delivered by the feed.
//!
//! A [`ContentDump`] is the initial payload of a subscription: an ordered
//! list of tagged [`ContentRecord`]s. The transport layer has already parsed
//! raw frames into these shapes; the store never sees bytes or JSON text.
//!
//! All records are plain value types. Fields the feed may omit are `Option`,
//! and a missing field is routine, not an error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{
    BettingTypeId, GroupKey, LocationId, MarketId, MatchId, OfferId, OutcomeId,
};

/// The list a content dump was requested for.
///
/// Match ids ingested from a dump are indexed under its list type so the
/// same store can serve several screens at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListType {
    PopularEvents,
    TodayEvents,
    Competitions,
    AllLiveEvents,
    FavoriteMatchEvents,
    FavoriteCompetitionEvents,
    Cashouts,
    MatchDetails,
    SuggestedMatches,
}

/// A tournament (competition) entity. Leaf record, no children tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRecord {
    pub id: String,
    pub venue_id: Option<LocationId>,
    pub category_id: Option<String>,
    pub name: Option<String>,
}

/// A match (event) entity. Markets are tracked in a secondary index,
/// never embedded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: MatchId,
    pub parent_id: Option<String>,
    pub parent_name: Option<String>,
    pub home_participant_id: Option<String>,
    pub home_participant_name: Option<String>,
    pub away_participant_id: Option<String>,
    pub away_participant_name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub sport_id: Option<String>,
    pub short_sport_name: Option<String>,
    pub venue_id: Option<LocationId>,
    pub number_of_markets: Option<u32>,
    pub root_part_id: Option<String>,
}

/// Live-data parameters attached to a match. Many-to-one with matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfoRecord {
    pub id: String,
    pub match_id: Option<MatchId>,
    pub param_float1: Option<f64>,
    pub param_float2: Option<f64>,
    pub param_event_part_name1: Option<String>,
}

/// A market entity. Its outcome set is derived from
/// [`MarketOutcomeRelationRecord`]s, never stored on the market itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    pub id: MarketId,
    pub event_id: Option<MatchId>,
    pub betting_type_id: Option<BettingTypeId>,
    pub short_name: Option<String>,
    pub param_float1: Option<f64>,
    pub param_float2: Option<f64>,
    pub param_float3: Option<f64>,
    pub event_part_id: Option<String>,
    pub is_available: Option<bool>,
    pub is_closed: Option<bool>,
}

/// The static description of an outcome slot within a market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetOutcomeRecord {
    pub id: OutcomeId,
    pub header_name: Option<String>,
    pub header_name_key: Option<String>,
    pub translated_name: Option<String>,
    pub param_float1: Option<f64>,
    pub param_float2: Option<f64>,
    pub param_float3: Option<f64>,
    pub param_boolean1: Option<bool>,
}

/// The dynamic price attached to an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingOfferRecord {
    pub id: OfferId,
    pub outcome_id: Option<OutcomeId>,
    pub odds_value: Option<Decimal>,
    pub status_id: Option<String>,
    pub is_live: Option<bool>,
    pub is_available: Option<bool>,
}

/// Join-table record materializing the market ↔ outcome many-to-many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOutcomeRelationRecord {
    pub id: String,
    pub market_id: Option<MarketId>,
    pub outcome_id: Option<OutcomeId>,
}

/// A market group within a match-details session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketGroupRecord {
    pub id: String,
    pub group_key: Option<GroupKey>,
    pub name: Option<String>,
    pub position: Option<u32>,
}

/// A venue/location entity. Simple id-keyed lookup, not deeply joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: LocationId,
    pub name: Option<String>,
    pub code: Option<String>,
}

/// A cashout entity. Simple id-keyed lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashoutRecord {
    pub id: String,
    pub bet_id: Option<String>,
    pub amount: Option<Decimal>,
}

/// Tagged union of every entity the feed can emit in a content dump.
///
/// `MainMarket` carries an ordinary market record; the variant itself is the
/// signal that the market's betting type belongs to the canonical sort order.
/// Unrecognized record types decode to `Unknown` and are skipped on ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentRecord {
    Tournament(TournamentRecord),
    Match(MatchRecord),
    MatchInfo(MatchInfoRecord),
    Market(MarketRecord),
    BetOutcome(BetOutcomeRecord),
    BettingOffer(BettingOfferRecord),
    MainMarket(MarketRecord),
    MarketOutcomeRelation(MarketOutcomeRelationRecord),
    MarketGroup(MarketGroupRecord),
    Location(LocationRecord),
    Cashout(CashoutRecord),
    Unknown,
}

/// An ordered batch of content records, as delivered by one subscription
/// payload. Record order matters: main-market order is first-seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDump {
    pub records: Vec<ContentRecord>,
}

impl ContentDump {
    /// Create a dump from records in arrival order.
    #[must_use]
    pub fn new(records: Vec<ContentRecord>) -> Self {
        Self { records }
    }

    /// Number of records in the dump.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dump carries no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
