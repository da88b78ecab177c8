//! Market identification and pool state types.
//!
//! A binary market holds two pools of unsold outcome shares. The pools are
//! share inventory owned by the AMM, not currency: buying YES drains the YES
//! pool and pays into the NO pool, and vice versa.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::CoreError;

/// Unique market identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketId(Uuid);

impl MarketId {
    /// Create a new random market ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MarketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MarketId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Resolved side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    /// Returns the other side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
        }
    }
}

/// AMM pool snapshot for one market.
///
/// Reconstructed from the persisted market row on every engine call; the
/// engine never keeps one around between calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Outstanding YES share inventory.
    pub yes_pool: f64,
    /// Outstanding NO share inventory.
    pub no_pool: f64,
}

impl MarketState {
    #[inline]
    pub fn new(yes_pool: f64, no_pool: f64) -> Self {
        Self { yes_pool, no_pool }
    }

    /// Constant-product invariant `yes_pool * no_pool`.
    #[inline]
    pub fn k(&self) -> f64 {
        self.yes_pool * self.no_pool
    }

    /// Sum of both pools.
    #[inline]
    pub fn total(&self) -> f64 {
        self.yes_pool + self.no_pool
    }

    /// Pool holding the inventory of `outcome` shares.
    #[inline]
    pub fn pool(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Yes => self.yes_pool,
            Outcome::No => self.no_pool,
        }
    }

    /// Whether a swap against this state is well defined.
    ///
    /// Both pools must be finite and strictly positive, otherwise `k` is zero
    /// and the swap math collapses.
    pub fn is_tradable(&self) -> bool {
        self.yes_pool.is_finite()
            && self.no_pool.is_finite()
            && self.yes_pool > 0.0
            && self.no_pool > 0.0
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yes={} no={}", self.yes_pool, self.no_pool)
    }
}
