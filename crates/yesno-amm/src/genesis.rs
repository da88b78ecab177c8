//! Initial pool for a new market.

use serde::{Deserialize, Serialize};
use yesno_core::MarketState;

use crate::error::{validate_amount, AmmError, AmmResult};

/// Pools and LP supply of a freshly created market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Genesis {
    pub state: MarketState,
    /// LP tokens minted to the creator (1:1 with the seed liquidity).
    pub lp_supply: f64,
}

/// Seed a market with `initial_liquidity` USDC at `initial_yes_probability`.
///
/// YES is priced by the NO pool's share of the total, so the probability is
/// placed on the NO side: `no_pool = L * p`, `yes_pool = L * (1 - p)`. The
/// opening YES price is then exactly `p`.
pub fn create_market(initial_liquidity: f64, initial_yes_probability: f64) -> AmmResult<Genesis> {
    let liquidity = validate_amount(initial_liquidity)?;
    let p = initial_yes_probability;
    if !(p.is_finite() && p > 0.0 && p < 1.0) {
        return Err(AmmError::InvalidProbability(p));
    }

    Ok(Genesis {
        state: MarketState::new(liquidity * (1.0 - p), liquidity * p),
        lp_supply: liquidity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get_prices;

    #[test]
    fn test_genesis_price_matches_probability() {
        let genesis = create_market(1000.0, 0.7).unwrap();
        let prices = get_prices(genesis.state);
        assert!((prices.yes - 0.7).abs() < 1e-12);
        assert!((prices.no - 0.3).abs() < 1e-12);
        assert!((genesis.state.total() - 1000.0).abs() < 1e-9);
        assert_eq!(genesis.lp_supply, 1000.0);
    }

    #[test]
    fn test_genesis_rejects_bad_input() {
        assert_eq!(create_market(0.0, 0.5), Err(AmmError::InvalidAmount(0.0)));
        assert_eq!(create_market(100.0, 0.0), Err(AmmError::InvalidProbability(0.0)));
        assert_eq!(create_market(100.0, 1.0), Err(AmmError::InvalidProbability(1.0)));
        assert!(create_market(100.0, f64::NAN).is_err());
    }
}
