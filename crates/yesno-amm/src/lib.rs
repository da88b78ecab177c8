//! Constant-product AMM engine for binary (YES/NO) markets.
//!
//! Every function here is pure: it takes a [`MarketState`] snapshot by value,
//! validates its inputs, and returns the values the caller must commit. There
//! is no engine instance, no I/O and no shared state. Serializing updates per
//! market is the caller's job.
//!
//! # Pricing
//!
//! ```text
//! k         = yes_pool * no_pool
//! yes_price = no_pool  / (yes_pool + no_pool)
//! no_price  = yes_pool / (yes_pool + no_pool)
//! ```
//!
//! Buys pay (net of fee) into the opposite pool and take shares out of the
//! bought pool until `k` is restored. Sells do the reverse and charge the
//! fee on the USDC paid out.

pub mod error;
pub mod fee;
pub mod genesis;
pub mod liquidity;
pub mod price;
pub mod trade;
pub mod valuation;

pub use error::{AmmError, AmmResult};
pub use fee::FeeRate;
pub use genesis::{create_market, Genesis};
pub use liquidity::{add_liquidity, remove_liquidity, AddLiquidityResult, RemoveLiquidityResult};
pub use price::{get_prices, Prices};
pub use trade::{buy_no, buy_yes, execute_trade, sell_no, sell_yes, TradeResult};
pub use valuation::{lp_claim, position_value};

pub use yesno_core::{MarketState, Outcome, TradeKind};
