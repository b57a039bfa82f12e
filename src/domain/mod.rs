//! Feed-agnostic domain types: ids, decoded records, deltas, assembled
//! views, and sort-order rules.

pub mod content;
pub mod id;
pub mod ordering;
pub mod update;
pub mod view;

pub use content::{ContentDump, ContentRecord, ListType};
pub use id::{BettingTypeId, GroupKey, LocationId, MarketId, MatchId, OfferId, OutcomeId};
pub use update::{UpdateBatch, UpdateRecord};
