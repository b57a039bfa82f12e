//! Store layer: normalized tables, the whole-feed aggregator, and the
//! read-side assembler.

pub(crate) mod assembler;
mod tables;

pub mod aggregator;

pub use aggregator::AggregatorStore;
pub use tables::OrderedIdSet;

pub(crate) use tables::MarketTables;
