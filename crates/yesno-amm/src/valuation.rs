//! Position valuation.

use yesno_core::{MarketState, Outcome};

use crate::price::get_prices;

/// Value of a share position.
///
/// Resolved markets pay 1.0 per winning share and nothing for the losing
/// side. Unresolved markets are marked to market at current prices.
pub fn position_value(
    state: MarketState,
    yes_shares: f64,
    no_shares: f64,
    resolution: Option<Outcome>,
) -> f64 {
    match resolution {
        Some(Outcome::Yes) => yes_shares,
        Some(Outcome::No) => no_shares,
        None => {
            let prices = get_prices(state);
            yes_shares * prices.yes + no_shares * prices.no
        }
    }
}

/// Value of an LP balance.
///
/// Before resolution this is what a full withdrawal would pay out (the
/// holder's fraction of both pools). After resolution only the winning
/// pool's inventory redeems, at 1.0 per share.
pub fn lp_claim(
    state: MarketState,
    lp_tokens: f64,
    total_lp_tokens: f64,
    resolution: Option<Outcome>,
) -> f64 {
    if total_lp_tokens <= 0.0 || lp_tokens <= 0.0 {
        return 0.0;
    }
    let ratio = lp_tokens.min(total_lp_tokens) / total_lp_tokens;
    match resolution {
        Some(outcome) => state.pool(outcome) * ratio,
        None => state.total() * ratio,
    }
}
