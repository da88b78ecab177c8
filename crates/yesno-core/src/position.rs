//! Per-account holdings in a single market.

use serde::{Deserialize, Serialize};

use crate::Outcome;

/// An account's holdings in one market.
///
/// Owned and mutated by the caller's ledger; the engine only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub yes_shares: f64,
    pub no_shares: f64,
    pub lp_tokens: f64,
}

impl Position {
    /// Shares held on one side.
    #[inline]
    pub fn shares(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Yes => self.yes_shares,
            Outcome::No => self.no_shares,
        }
    }

    /// Mutable access to shares on one side.
    #[inline]
    pub fn shares_mut(&mut self, outcome: Outcome) -> &mut f64 {
        match outcome {
            Outcome::Yes => &mut self.yes_shares,
            Outcome::No => &mut self.no_shares,
        }
    }

    /// True when nothing is held.
    pub fn is_empty(&self) -> bool {
        self.yes_shares == 0.0 && self.no_shares == 0.0 && self.lp_tokens == 0.0
    }
}
