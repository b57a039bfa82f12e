//! Read-side join: normalized tables → denormalized, sorted views.
//!
//! Pure functions, recomputed on every query. Joins degrade silently:
//! any entity missing from its table simply drops out of the result, since
//! partial delivery is routine on a push feed.

use crate::domain::content::{LocationRecord, MarketRecord, MatchRecord};
use crate::domain::id::MarketId;
use crate::domain::ordering::{outcome_sort_rank, MainMarketOrder};
use crate::domain::view::{BettingOffer, Location, Market, Match, MatchStatus, Outcome, Participant};

use super::tables::MarketTables;

/// Resolve and sort the outcomes of one market, then build its view.
///
/// An outcome is included only when the static slot, the outcome → offer
/// index entry, and the offer row all resolve; anything dangling is dropped.
pub(crate) fn assemble_market(tables: &MarketTables, record: &MarketRecord) -> Market {
    let market_name = record.short_name.clone().unwrap_or_default();

    let mut outcomes: Vec<Outcome> = Vec::new();
    if let Some(outcome_ids) = tables.outcome_ids_for_market(&record.id) {
        for outcome_id in outcome_ids {
            let Some(slot) = tables.bet_outcome(outcome_id) else {
                continue;
            };
            let Some(offer) = tables.offer_for_outcome(outcome_id) else {
                continue;
            };

            outcomes.push(Outcome {
                id: slot.id.clone(),
                code_name: slot.header_name_key.clone().unwrap_or_default(),
                type_name: slot.header_name.clone().unwrap_or_default(),
                translated_name: slot.translated_name.clone().unwrap_or_default(),
                name_digit1: slot.param_float1,
                name_digit2: slot.param_float2,
                name_digit3: slot.param_float3,
                param_boolean1: slot.param_boolean1,
                market_name: market_name.clone(),
                market_id: record.id.clone(),
                betting_offer: BettingOffer {
                    id: offer.id.clone(),
                    decimal_odd: offer.odds_value.unwrap_or_default(),
                    status_id: offer.status_id.clone().unwrap_or_else(|| "1".to_string()),
                    is_live: offer.is_live.unwrap_or(false),
                    is_available: offer.is_available.unwrap_or(true),
                },
            });
        }
    }

    // Stable sort: ties keep first-relation order.
    outcomes.sort_by_key(|outcome| outcome_sort_rank(&outcome.code_name));

    Market {
        id: record.id.clone(),
        betting_type_id: record.betting_type_id.clone(),
        name: market_name,
        name_digit1: record.param_float1,
        name_digit2: record.param_float2,
        name_digit3: record.param_float3,
        event_part_id: record.event_part_id.clone(),
        outcomes,
    }
}

/// Resolve a list of market ids into sorted views, skipping unknown ids.
/// Markets keep the order of `market_ids`; no cross-market sort happens here.
pub(crate) fn assemble_markets<'a>(
    tables: &MarketTables,
    market_ids: impl IntoIterator<Item = &'a MarketId>,
) -> Vec<Market> {
    market_ids
        .into_iter()
        .filter_map(|id| tables.market(id))
        .map(|record| assemble_market(tables, &record))
        .collect()
}

/// Sort assembled markets by main-market rank, stable among ties.
pub(crate) fn sort_markets(markets: &mut [Market], order: &MainMarketOrder) {
    markets.sort_by_key(|market| order.rank(market.betting_type_id.as_ref()));
}

/// Build the final match view around its sorted markets.
///
/// Status is deliberately `Unknown`: live status belongs to a separate
/// live-data subscription, not to this cache.
pub(crate) fn assemble_match(
    record: &MatchRecord,
    markets: Vec<Market>,
    venue: Option<&LocationRecord>,
) -> Match {
    Match {
        id: record.id.clone(),
        competition_id: record.parent_id.clone().unwrap_or_default(),
        competition_name: record.parent_name.clone().unwrap_or_default(),
        home_participant: Participant {
            id: record.home_participant_id.clone().unwrap_or_default(),
            name: record.home_participant_name.clone().unwrap_or_default(),
        },
        away_participant: Participant {
            id: record.away_participant_id.clone().unwrap_or_default(),
            name: record.away_participant_name.clone().unwrap_or_default(),
        },
        // Missing start dates fall back to the Unix epoch.
        date: record.start_date.unwrap_or_default(),
        sport_type: record.sport_id.clone().unwrap_or_default(),
        sport_code: record.short_sport_name.clone().unwrap_or_default(),
        venue: venue.map(|location| Location {
            id: location.id.clone(),
            name: location.name.clone().unwrap_or_default(),
            iso_code: location.code.clone().unwrap_or_default(),
        }),
        number_total_of_markets: record.number_of_markets.unwrap_or(0),
        markets,
        root_part_id: record.root_part_id.clone().unwrap_or_default(),
        status: MatchStatus::Unknown,
    }
}
