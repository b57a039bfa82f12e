//! Decoded delta updates delivered by the feed.
//!
//! An [`UpdateBatch`] targets individual entities by id and carries only the
//! fields that changed. Updates overlay onto the *current* stored value, so
//! successive updates compose; fields an update omits are carried over.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::content::{BettingOfferRecord, CashoutRecord, MarketRecord, MatchInfoRecord};
use super::id::{MarketId, OfferId};

/// Delta fields for a betting offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingOfferUpdate {
    pub id: OfferId,
    pub odds_value: Option<Decimal>,
    pub status_id: Option<String>,
    pub is_live: Option<bool>,
    pub is_available: Option<bool>,
}

impl BettingOfferUpdate {
    /// Overlay this delta onto the current offer value.
    #[must_use]
    pub fn apply(&self, current: &BettingOfferRecord) -> BettingOfferRecord {
        BettingOfferRecord {
            odds_value: self.odds_value.or(current.odds_value),
            status_id: self.status_id.clone().or_else(|| current.status_id.clone()),
            is_live: self.is_live.or(current.is_live),
            is_available: self.is_available.or(current.is_available),
            ..current.clone()
        }
    }
}

/// Delta fields for a market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketUpdate {
    pub id: MarketId,
    pub is_available: Option<bool>,
    pub is_closed: Option<bool>,
}

impl MarketUpdate {
    /// Overlay this delta onto the current market value.
    #[must_use]
    pub fn apply(&self, current: &MarketRecord) -> MarketRecord {
        MarketRecord {
            is_available: self.is_available.or(current.is_available),
            is_closed: self.is_closed.or(current.is_closed),
            ..current.clone()
        }
    }
}

/// Delta fields for a match-info record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfoUpdate {
    pub id: String,
    pub param_float1: Option<f64>,
    pub param_float2: Option<f64>,
    pub param_event_part_name1: Option<String>,
}

impl MatchInfoUpdate {
    /// Overlay this delta onto the current match-info value.
    #[must_use]
    pub fn apply(&self, current: &MatchInfoRecord) -> MatchInfoRecord {
        MatchInfoRecord {
            param_float1: self.param_float1.or(current.param_float1),
            param_float2: self.param_float2.or(current.param_float2),
            param_event_part_name1: self
                .param_event_part_name1
                .clone()
                .or_else(|| current.param_event_part_name1.clone()),
            ..current.clone()
        }
    }
}

/// Tagged union of incremental mutation commands.
///
/// Updates referencing ids the store has never seen are no-ops: the feed may
/// deliver a delta before the dump that introduces its entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UpdateRecord {
    BettingOfferUpdate(BettingOfferUpdate),
    MarketUpdate(MarketUpdate),
    MatchInfoUpdate(MatchInfoUpdate),
    FullMatchInfoUpdate(MatchInfoRecord),
    CashoutCreate(CashoutRecord),
    CashoutUpdate(CashoutRecord),
    CashoutDelete { id: String },
    Unknown,
}

/// An ordered batch of update records from one subscription frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBatch {
    pub updates: Vec<UpdateRecord>,
}

impl UpdateBatch {
    /// Create a batch from updates in arrival order.
    #[must_use]
    pub fn new(updates: Vec<UpdateRecord>) -> Self {
        Self { updates }
    }
}
