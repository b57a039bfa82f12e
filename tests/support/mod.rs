//! Shared fixtures for integration tests: record builders and a recording
//! feed transport.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use oddsfeed::domain::content::{
    BetOutcomeRecord, BettingOfferRecord, ContentRecord, MarketGroupRecord,
    MarketOutcomeRelationRecord, MarketRecord, MatchRecord,
};
use oddsfeed::domain::id::{
    BettingTypeId, GroupKey, MarketId, MatchId, OfferId, OutcomeId,
};
use oddsfeed::error::Result;
use oddsfeed::feed::{FeedRegistration, GroupFeed};

static TRACING: Once = Once::new();

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn match_record(id: &str) -> ContentRecord {
    ContentRecord::Match(MatchRecord {
        id: MatchId::from(id),
        parent_id: Some("comp-1".to_string()),
        parent_name: Some("Premier League".to_string()),
        home_participant_id: Some("p-home".to_string()),
        home_participant_name: Some("Home FC".to_string()),
        away_participant_id: Some("p-away".to_string()),
        away_participant_name: Some("Away FC".to_string()),
        start_date: None,
        sport_id: Some("soccer".to_string()),
        short_sport_name: Some("SOC".to_string()),
        venue_id: None,
        number_of_markets: Some(3),
        root_part_id: None,
    })
}

pub fn market_record(id: &str, event: &str, betting_type: &str, name: &str) -> MarketRecord {
    MarketRecord {
        id: MarketId::from(id),
        event_id: Some(MatchId::from(event)),
        betting_type_id: Some(BettingTypeId::from(betting_type)),
        short_name: Some(name.to_string()),
        param_float1: None,
        param_float2: None,
        param_float3: None,
        event_part_id: None,
        is_available: Some(true),
        is_closed: Some(false),
    }
}

pub fn market(id: &str, event: &str, betting_type: &str, name: &str) -> ContentRecord {
    ContentRecord::Market(market_record(id, event, betting_type, name))
}

pub fn main_market(id: &str, event: &str, betting_type: &str, name: &str) -> ContentRecord {
    ContentRecord::MainMarket(market_record(id, event, betting_type, name))
}

pub fn slot(id: &str, code: &str) -> ContentRecord {
    ContentRecord::BetOutcome(BetOutcomeRecord {
        id: OutcomeId::from(id),
        header_name: Some(code.to_uppercase()),
        header_name_key: Some(code.to_string()),
        translated_name: Some(code.to_string()),
        param_float1: None,
        param_float2: None,
        param_float3: None,
        param_boolean1: None,
    })
}

pub fn offer(id: &str, outcome: &str, odds: Decimal) -> ContentRecord {
    ContentRecord::BettingOffer(BettingOfferRecord {
        id: OfferId::from(id),
        outcome_id: Some(OutcomeId::from(outcome)),
        odds_value: Some(odds),
        status_id: Some("1".to_string()),
        is_live: Some(false),
        is_available: Some(true),
    })
}

pub fn relation(market: &str, outcome: &str) -> ContentRecord {
    ContentRecord::MarketOutcomeRelation(MarketOutcomeRelationRecord {
        id: format!("rel-{market}-{outcome}"),
        market_id: Some(MarketId::from(market)),
        outcome_id: Some(OutcomeId::from(outcome)),
    })
}

pub fn group(key: &str, name: &str, position: u32) -> ContentRecord {
    ContentRecord::MarketGroup(MarketGroupRecord {
        id: format!("grp-{key}"),
        group_key: Some(GroupKey::from(key)),
        name: Some(name.to_string()),
        position: Some(position),
    })
}

/// What the store asked the transport to do, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    RegisterGroups(MatchId),
    RegisterDetails(MatchId, GroupKey),
    Unregister(u64),
}

/// Transport double that hands out sequential registrations and records
/// every call.
#[derive(Default)]
pub struct RecordingFeed {
    next: AtomicU64,
    events: Mutex<Vec<FeedEvent>>,
}

impl RecordingFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl GroupFeed for RecordingFeed {
    async fn register_market_groups(&self, match_id: &MatchId) -> Result<FeedRegistration> {
        self.events
            .lock()
            .push(FeedEvent::RegisterGroups(match_id.clone()));
        Ok(FeedRegistration::new(self.next.fetch_add(1, Ordering::SeqCst)))
    }

    async fn register_group_details(
        &self,
        match_id: &MatchId,
        group_key: &GroupKey,
    ) -> Result<FeedRegistration> {
        self.events
            .lock()
            .push(FeedEvent::RegisterDetails(match_id.clone(), group_key.clone()));
        Ok(FeedRegistration::new(self.next.fetch_add(1, Ordering::SeqCst)))
    }

    async fn unregister(&self, registration: FeedRegistration) -> Result<()> {
        self.events
            .lock()
            .push(FeedEvent::Unregister(registration.value()));
        Ok(())
    }
}
