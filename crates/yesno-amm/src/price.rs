//! Implied outcome prices.

use serde::{Deserialize, Serialize};
use yesno_core::{MarketState, Outcome};

/// YES/NO prices, read as implied probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prices {
    pub yes: f64,
    pub no: f64,
}

impl Prices {
    /// Price pair of an empty pool.
    pub const EVEN: Self = Self { yes: 0.5, no: 0.5 };

    #[inline]
    pub fn of(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Yes => self.yes,
            Outcome::No => self.no,
        }
    }
}

/// Current prices from the pool ratio.
///
/// A share is priced by the *other* pool's share of the total: a deep NO
/// pool means NO is cheap and YES is expensive. An empty market prices both
/// sides at 0.5 instead of failing.
pub fn get_prices(state: MarketState) -> Prices {
    let total = state.total();
    if total == 0.0 {
        return Prices::EVEN;
    }
    Prices {
        yes: state.no_pool / total,
        no: state.yes_pool / total,
    }
}
