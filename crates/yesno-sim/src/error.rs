//! Simulator error types.

use thiserror::Error;
use yesno_amm::AmmError;
use yesno_core::Outcome;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine error: {0}")]
    Engine(#[from] AmmError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] yesno_telemetry::TelemetryError),

    #[error("Unknown market: {0}")]
    UnknownMarket(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Market already exists: {0}")]
    DuplicateMarket(String),

    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("Market is already resolved: {0}")]
    MarketResolved(String),

    #[error("Market is not resolved yet: {0}")]
    MarketNotResolved(String),

    #[error("Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: f64, available: f64 },

    #[error("Insufficient {outcome} shares: need {needed}, have {available}")]
    InsufficientShares {
        outcome: Outcome,
        needed: f64,
        available: f64,
    },

    #[error("Insufficient LP tokens: need {needed}, have {available}")]
    InsufficientLpTokens { needed: f64, available: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Short stable label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Engine(e) => e.kind(),
            Self::Telemetry(_) => "telemetry",
            Self::UnknownMarket(_) => "unknown_market",
            Self::UnknownAccount(_) => "unknown_account",
            Self::DuplicateMarket(_) => "duplicate_market",
            Self::DuplicateAccount(_) => "duplicate_account",
            Self::MarketResolved(_) => "market_resolved",
            Self::MarketNotResolved(_) => "market_not_resolved",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::InsufficientShares { .. } => "insufficient_shares",
            Self::InsufficientLpTokens { .. } => "insufficient_lp_tokens",
            Self::Io(_) => "io",
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
