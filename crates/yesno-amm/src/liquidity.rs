//! Liquidity provision and withdrawal.
//!
//! LP tokens are a proportional claim on both pools. Deposits are split
//! across the pools at the current ratio, so prices do not move; withdrawals
//! take the same fraction out of each pool.

use serde::{Deserialize, Serialize};
use yesno_core::{MarketState, Outcome};

use crate::error::{ensure_tradable, validate_amount, AmmError, AmmResult};
use crate::price::get_prices;

/// Result of a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AddLiquidityResult {
    pub new_yes_pool: f64,
    pub new_no_pool: f64,
    pub new_k: f64,
    pub lp_tokens_received: f64,
    pub new_total_lp_tokens: f64,
}

impl AddLiquidityResult {
    pub fn new_state(&self) -> MarketState {
        MarketState::new(self.new_yes_pool, self.new_no_pool)
    }
}

/// Result of a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemoveLiquidityResult {
    /// Sum of both withdrawals.
    pub usdc_received: f64,
    pub yes_withdrawn: f64,
    pub no_withdrawn: f64,
    pub new_yes_pool: f64,
    pub new_no_pool: f64,
    pub new_k: f64,
    pub new_total_lp_tokens: f64,
    /// Pre-withdrawal pool value of the burned share minus `usdc_received`.
    ///
    /// Both terms derive from the same ratio, so this is always ~0 for a
    /// proportional withdrawal. Kept as the reported figure; see
    /// `spot_value` for a price-aware valuation.
    pub impermanent_loss: f64,
    /// Withdrawn inventory marked at pre-withdrawal spot prices.
    pub spot_value: f64,
}

impl RemoveLiquidityResult {
    pub fn new_state(&self) -> MarketState {
        MarketState::new(self.new_yes_pool, self.new_no_pool)
    }

    /// Amount withdrawn from one side.
    pub fn withdrawn(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Yes => self.yes_withdrawn,
            Outcome::No => self.no_withdrawn,
        }
    }
}

/// Deposit `usdc_amount` into both pools at the current ratio.
///
/// Mints `usdc_amount / pool_total * total_lp_tokens` LP tokens. When the
/// supply is zero that formula mints nothing, so the first depositor is
/// minted 1:1 with the deposit instead.
pub fn add_liquidity(
    state: MarketState,
    usdc_amount: f64,
    total_lp_tokens: f64,
) -> AmmResult<AddLiquidityResult> {
    let usdc_amount = validate_amount(usdc_amount)?;
    ensure_tradable(&state)?;
    if !(total_lp_tokens.is_finite() && total_lp_tokens >= 0.0) {
        return Err(AmmError::InvalidAmount(total_lp_tokens));
    }

    let total_pool = state.total();
    let yes_amount = usdc_amount * (state.yes_pool / total_pool);
    let no_amount = usdc_amount * (state.no_pool / total_pool);

    let new_state = MarketState::new(state.yes_pool + yes_amount, state.no_pool + no_amount);

    let lp_tokens_received = if total_lp_tokens == 0.0 {
        usdc_amount
    } else {
        (usdc_amount / total_pool) * total_lp_tokens
    };

    Ok(AddLiquidityResult {
        new_yes_pool: new_state.yes_pool,
        new_no_pool: new_state.no_pool,
        new_k: new_state.k(),
        lp_tokens_received,
        new_total_lp_tokens: total_lp_tokens + lp_tokens_received,
    })
}

/// Burn `lp_tokens` and withdraw the same fraction of each pool.
pub fn remove_liquidity(
    state: MarketState,
    lp_tokens: f64,
    total_lp_tokens: f64,
) -> AmmResult<RemoveLiquidityResult> {
    let lp_tokens = validate_amount(lp_tokens)?;
    ensure_tradable(&state)?;
    if !(total_lp_tokens.is_finite() && total_lp_tokens > 0.0) || lp_tokens > total_lp_tokens {
        return Err(AmmError::InsufficientSupply {
            requested: lp_tokens,
            available: total_lp_tokens,
        });
    }

    let ratio = lp_tokens / total_lp_tokens;
    let yes_withdrawn = state.yes_pool * ratio;
    let no_withdrawn = state.no_pool * ratio;
    let usdc_received = yes_withdrawn + no_withdrawn;

    let new_state = MarketState::new(state.yes_pool - yes_withdrawn, state.no_pool - no_withdrawn);

    let initial_value = state.total() * ratio;
    let prices = get_prices(state);

    Ok(RemoveLiquidityResult {
        usdc_received,
        yes_withdrawn,
        no_withdrawn,
        new_yes_pool: new_state.yes_pool,
        new_no_pool: new_state.no_pool,
        new_k: new_state.k(),
        new_total_lp_tokens: total_lp_tokens - lp_tokens,
        impermanent_loss: initial_value - usdc_received,
        spot_value: yes_withdrawn * prices.yes + no_withdrawn * prices.no,
    })
}
