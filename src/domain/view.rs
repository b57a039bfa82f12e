//! Denormalized, query-ready view types.
//!
//! These are what the assembler hands to UI consumers: a match with its
//! sorted markets, each with its sorted, priced outcomes. Views are plain
//! values rebuilt on every query; the normalized tables stay authoritative.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{BettingTypeId, LocationId, MarketId, MatchId, OfferId, OutcomeId};

/// Live status of a match.
///
/// The assembler always emits [`MatchStatus::Unknown`]; live status is owned
/// by a separate live-data subscription layered on top of this cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStatus {
    #[default]
    Unknown,
    Upcoming,
    Live,
    Ended,
}

/// A participant (home or away side) of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// A resolved venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub iso_code: String,
}

/// The price attached to an assembled outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingOffer {
    pub id: OfferId,
    pub decimal_odd: Decimal,
    pub status_id: String,
    pub is_live: bool,
    pub is_available: bool,
}

/// A fully resolved outcome: static slot description joined with its offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: OutcomeId,
    /// Semantic code ("home", "draw", "over", ...) driving sort order.
    pub code_name: String,
    pub type_name: String,
    pub translated_name: String,
    pub name_digit1: Option<f64>,
    pub name_digit2: Option<f64>,
    pub name_digit3: Option<f64>,
    pub param_boolean1: Option<bool>,
    pub market_name: String,
    pub market_id: MarketId,
    pub betting_offer: BettingOffer,
}

/// A fully resolved market with its outcomes sorted by semantic rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    pub betting_type_id: Option<BettingTypeId>,
    pub name: String,
    pub name_digit1: Option<f64>,
    pub name_digit2: Option<f64>,
    pub name_digit3: Option<f64>,
    pub event_part_id: Option<String>,
    pub outcomes: Vec<Outcome>,
}

/// A fully resolved match with markets sorted by main-market order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub competition_id: String,
    pub competition_name: String,
    pub home_participant: Participant,
    pub away_participant: Participant,
    pub date: DateTime<Utc>,
    pub sport_type: String,
    pub sport_code: String,
    pub venue: Option<Location>,
    /// Total declared by the feed; may exceed `markets.len()` when some
    /// markets have not been delivered yet.
    pub number_total_of_markets: u32,
    pub markets: Vec<Market>,
    pub root_part_id: String,
    pub status: MatchStatus,
}
