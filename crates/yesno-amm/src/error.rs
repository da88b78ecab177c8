//! Engine error types.

use thiserror::Error;
use yesno_core::MarketState;

/// Precondition failures reported by the engine.
///
/// The engine holds no state, so a failed call never leaves a partial update
/// behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmmError {
    #[error("Invalid amount: {0} (must be finite and > 0)")]
    InvalidAmount(f64),

    #[error("Invalid fee rate: {0} (must be in [0, 1))")]
    InvalidFeeRate(f64),

    #[error("Degenerate market: yes_pool={yes_pool}, no_pool={no_pool}")]
    DegenerateMarket { yes_pool: f64, no_pool: f64 },

    #[error("Insufficient LP supply: requested {requested}, available {available}")]
    InsufficientSupply { requested: f64, available: f64 },

    #[error("Invalid probability: {0} (must be in (0, 1))")]
    InvalidProbability(f64),
}

impl AmmError {
    /// Short stable label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InvalidFeeRate(_) => "invalid_fee_rate",
            Self::DegenerateMarket { .. } => "degenerate_market",
            Self::InsufficientSupply { .. } => "insufficient_supply",
            Self::InvalidProbability(_) => "invalid_probability",
        }
    }
}

pub type AmmResult<T> = Result<T, AmmError>;

/// Reject non-positive, NaN and infinite amounts.
pub(crate) fn validate_amount(amount: f64) -> AmmResult<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(AmmError::InvalidAmount(amount))
    }
}

pub(crate) fn ensure_tradable(state: &MarketState) -> AmmResult<()> {
    if state.is_tradable() {
        Ok(())
    } else {
        Err(AmmError::DegenerateMarket {
            yes_pool: state.yes_pool,
            no_pool: state.no_pool,
        })
    }
}
