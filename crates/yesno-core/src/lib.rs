//! Core domain types for the yes/no prediction market simulator.
//!
//! This crate provides the vocabulary shared by the pricing engine and its callers:
//! - `MarketId`: Unique identifier for a binary market
//! - `MarketState`: The AMM pool snapshot (YES / NO share inventory)
//! - `Outcome`, `Position`: Resolution side and per-account holdings
//! - `TradeKind`, `LiquidityAction`: Closed sets of user actions

pub mod error;
pub mod market;
pub mod position;
pub mod trade;

pub use error::{CoreError, Result};
pub use market::{MarketId, MarketState, Outcome};
pub use position::Position;
pub use trade::{LiquidityAction, TradeKind};
