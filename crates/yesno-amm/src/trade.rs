//! Buy and sell operations against the constant-product pool.
//!
//! `k` is always taken from the pre-trade pools and the moved pool is
//! re-derived as `k / other`, so every swap lands back on the same
//! invariant (up to floating error). Fees never enter the pools.

use serde::{Deserialize, Serialize};
use tracing::trace;
use yesno_core::{MarketState, Outcome, TradeKind};

use crate::error::{ensure_tradable, validate_amount, AmmResult};
use crate::fee::FeeRate;
use crate::price::get_prices;

/// Outcome of a single trade.
///
/// The caller persists `new_yes_pool` / `new_no_pool` verbatim and applies
/// `shares_received` or `amount_received` to the trader's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeResult {
    pub new_yes_pool: f64,
    pub new_no_pool: f64,
    /// Shares paid out to the trader (buys only, 0 for sells).
    pub shares_received: f64,
    /// USDC paid out to the trader after fee (sells only, 0 for buys).
    pub amount_received: f64,
    pub new_yes_price: f64,
    pub new_no_price: f64,
    /// Fee charged, in USDC.
    pub fee: f64,
    pub new_k: f64,
}

impl TradeResult {
    fn from_pools(state: MarketState, shares_received: f64, amount_received: f64, fee: f64) -> Self {
        let prices = get_prices(state);
        Self {
            new_yes_pool: state.yes_pool,
            new_no_pool: state.no_pool,
            shares_received,
            amount_received,
            new_yes_price: prices.yes,
            new_no_price: prices.no,
            fee,
            new_k: state.k(),
        }
    }

    /// Pool state to commit.
    pub fn new_state(&self) -> MarketState {
        MarketState::new(self.new_yes_pool, self.new_no_pool)
    }

    /// Average USDC per share for this fill.
    ///
    /// `amount` is the input the trade was executed with (USDC for buys,
    /// shares for sells). Returns `None` when no shares changed hands.
    pub fn execution_price(&self, kind: TradeKind, amount: f64) -> Option<f64> {
        let (usdc, shares) = if kind.is_buy() {
            (amount, self.shares_received)
        } else {
            (self.amount_received, amount)
        };
        (shares > 0.0).then(|| usdc / shares)
    }
}

/// Buy YES shares with `usdc_amount`.
pub fn buy_yes(state: MarketState, usdc_amount: f64, fee: FeeRate) -> AmmResult<TradeResult> {
    buy(state, Outcome::Yes, usdc_amount, fee)
}

/// Buy NO shares with `usdc_amount`.
pub fn buy_no(state: MarketState, usdc_amount: f64, fee: FeeRate) -> AmmResult<TradeResult> {
    buy(state, Outcome::No, usdc_amount, fee)
}

/// Sell `shares` YES shares back to the pool.
///
/// The engine does not know who holds what: the caller must reject sells
/// larger than the seller's position.
pub fn sell_yes(state: MarketState, shares: f64, fee: FeeRate) -> AmmResult<TradeResult> {
    sell(state, Outcome::Yes, shares, fee)
}

/// Sell `shares` NO shares back to the pool.
pub fn sell_no(state: MarketState, shares: f64, fee: FeeRate) -> AmmResult<TradeResult> {
    sell(state, Outcome::No, shares, fee)
}

/// Dispatch a trade by kind. `amount` is USDC for buys and shares for sells.
pub fn execute_trade(
    state: MarketState,
    kind: TradeKind,
    amount: f64,
    fee: FeeRate,
) -> AmmResult<TradeResult> {
    trace!(%kind, amount, %state, %fee, "Executing trade");
    match kind {
        TradeKind::BuyYes => buy_yes(state, amount, fee),
        TradeKind::BuyNo => buy_no(state, amount, fee),
        TradeKind::SellYes => sell_yes(state, amount, fee),
        TradeKind::SellNo => sell_no(state, amount, fee),
    }
}

/// Payment (net of fee) enters the opposite pool; the bought pool shrinks
/// to `k / new_opposite` and the difference is paid out as shares.
fn buy(state: MarketState, outcome: Outcome, usdc_amount: f64, fee: FeeRate) -> AmmResult<TradeResult> {
    let usdc_amount = validate_amount(usdc_amount)?;
    ensure_tradable(&state)?;

    let k = state.k();
    let (fee_paid, net) = fee.split(usdc_amount);

    let new_state = match outcome {
        Outcome::Yes => {
            let new_no_pool = state.no_pool + net;
            MarketState::new(k / new_no_pool, new_no_pool)
        }
        Outcome::No => {
            let new_yes_pool = state.yes_pool + net;
            MarketState::new(new_yes_pool, k / new_yes_pool)
        }
    };
    let shares_received = state.pool(outcome) - new_state.pool(outcome);

    Ok(TradeResult::from_pools(new_state, shares_received, 0.0, fee_paid))
}

/// Returned shares re-enter their pool; the opposite pool shrinks to
/// `k / new_pool` and the difference, less fee, is paid out as USDC.
fn sell(state: MarketState, outcome: Outcome, shares: f64, fee: FeeRate) -> AmmResult<TradeResult> {
    let shares = validate_amount(shares)?;
    ensure_tradable(&state)?;

    let k = state.k();
    let new_state = match outcome {
        Outcome::Yes => {
            let new_yes_pool = state.yes_pool + shares;
            MarketState::new(new_yes_pool, k / new_yes_pool)
        }
        Outcome::No => {
            let new_no_pool = state.no_pool + shares;
            MarketState::new(k / new_no_pool, new_no_pool)
        }
    };
    let paid_from = outcome.opposite();
    let amount_before_fee = state.pool(paid_from) - new_state.pool(paid_from);
    let (fee_paid, amount_received) = fee.split(amount_before_fee);

    Ok(TradeResult::from_pools(new_state, 0.0, amount_received, fee_paid))
}
