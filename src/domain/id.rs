//! Identifier newtypes for feed entities.
//!
//! Every entity in the feed is addressed by an opaque string id. The inner
//! strings are private so all construction goes through the defined
//! constructors.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new id from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id! {
    /// Match (event) identifier.
    MatchId
}

string_id! {
    /// Market identifier.
    MarketId
}

string_id! {
    /// Static outcome-slot identifier. Doubles as the price lookup key:
    /// a betting offer prices the outcome carrying the same id.
    OutcomeId
}

string_id! {
    /// Betting offer identifier, the key for per-offer subscriptions.
    OfferId
}

string_id! {
    /// Betting-type identifier shared by markets of the same kind
    /// (e.g. 1X2, over/under). Ranks markets via the main-market order.
    BettingTypeId
}

string_id! {
    /// Market-group key within a match-details session.
    GroupKey
}

string_id! {
    /// Location (venue) identifier.
    LocationId
}
