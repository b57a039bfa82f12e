//! Sort-order rules for assembled markets and outcomes.
//!
//! Markets sort by the first-seen position of their betting type in the
//! main-market order; outcomes sort by a fixed semantic rank table keyed on
//! their code name. Both sorts are stable, so ties preserve table insertion
//! order and assembly is deterministic for a fixed store state.

use std::collections::HashMap;

use super::id::BettingTypeId;

/// Rank assigned to markets whose betting type never appeared in a
/// main-market record. Sorts after every ranked type.
pub const UNRANKED_MARKET: usize = 10_000;

/// Rank assigned to outcome codes missing from the semantic table.
pub const UNRANKED_OUTCOME: u32 = 1_000;

/// First-seen order of main-market betting types.
///
/// Insert-if-absent: re-ingesting a betting type never moves or duplicates
/// it, so the rank of a type is stable for the lifetime of the order.
#[derive(Debug, Clone, Default)]
pub struct MainMarketOrder {
    order: Vec<BettingTypeId>,
    positions: HashMap<BettingTypeId, usize>,
}

impl MainMarketOrder {
    /// Create an empty order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a betting type at the next position unless already present.
    pub fn insert(&mut self, betting_type_id: BettingTypeId) {
        if self.positions.contains_key(&betting_type_id) {
            return;
        }
        self.positions
            .insert(betting_type_id.clone(), self.order.len());
        self.order.push(betting_type_id);
    }

    /// Rank for a market's betting type: first-seen position, or
    /// [`UNRANKED_MARKET`] when the type is absent or was never registered.
    #[must_use]
    pub fn rank(&self, betting_type_id: Option<&BettingTypeId>) -> usize {
        betting_type_id
            .and_then(|id| self.positions.get(id).copied())
            .unwrap_or(UNRANKED_MARKET)
    }

    /// Number of registered betting types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no betting types were registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every registered betting type.
    pub fn clear(&mut self) {
        self.order.clear();
        self.positions.clear();
    }
}

/// Semantic rank of an outcome code within its market.
///
/// Known codes get a fixed small rank; composite `code-bool` forms interleave
/// between their base codes. Unknown codes get [`UNRANKED_OUTCOME`] and sort
/// last, stable among themselves.
#[must_use]
pub fn outcome_sort_rank(code: &str) -> u32 {
    match code.to_lowercase().as_str() {
        "yes" => 10,
        "no" => 20,

        "home" => 10,
        "draw" => 20,
        "none" => 21,
        "" => 22,
        "away" => 30,

        "home_draw" => 10,
        "home_away" => 20,
        "away_draw" => 30,

        "over" => 10,
        "under" => 20,

        "odd" => 10,
        "even" => 20,

        "exact" => 10,
        "range" => 20,
        "more_than" => 30,

        "in_90_minutes" => 10,
        "in_extra_time" => 20,
        "on_penalties" => 30,

        "home-true" => 10,
        "home-false" => 15,
        "-true" => 20,
        "-false" => 25,
        "away-true" => 30,
        "away-false" => 35,

        "home_draw-true" => 10,
        "home_draw-false" => 15,
        "home_away-true" => 20,
        "home_away-false" => 25,
        "away_draw-true" => 30,
        "away_draw-false" => 35,

        "over-true" => 10,
        "over-false" => 15,
        "under-true" => 20,
        "under-false" => 25,

        "odd-true" => 10,
        "odd-false" => 15,
        "even-true" => 20,
        "even-false" => 25,

        "yes-true" => 10,
        "yes-false" => 15,
        "no-true" => 20,
        "no-false" => 25,

        "true" => 10,
        "false" => 20,

        "h" => 10,
        "d" => 20,
        "a" => 30,

        _ => UNRANKED_OUTCOME,
    }
}
