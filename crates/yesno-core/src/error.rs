//! Error types for yesno-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid trade kind: {0}")]
    InvalidTradeKind(String),

    #[error("Invalid liquidity action: {0}")]
    InvalidLiquidityAction(String),

    #[error("Invalid market id: {0}")]
    InvalidMarketId(#[from] uuid::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
