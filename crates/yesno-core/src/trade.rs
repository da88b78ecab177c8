//! User actions against a market.
//!
//! Trade and liquidity actions arrive from the API layer as strings
//! (`"BUY_YES"`, `"add"`, ...). They are parsed once into closed enums and
//! dispatched by exhaustive match from then on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CoreError, Outcome};

/// Trade direction and side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeKind {
    /// Pay USDC, receive YES shares.
    BuyYes,
    /// Pay USDC, receive NO shares.
    BuyNo,
    /// Return YES shares, receive USDC.
    SellYes,
    /// Return NO shares, receive USDC.
    SellNo,
}

impl TradeKind {
    pub const ALL: [TradeKind; 4] = [Self::BuyYes, Self::BuyNo, Self::SellYes, Self::SellNo];

    /// Side of the market the shares belong to.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::BuyYes | Self::SellYes => Outcome::Yes,
            Self::BuyNo | Self::SellNo => Outcome::No,
        }
    }

    /// True for buys (amount is USDC), false for sells (amount is shares).
    pub fn is_buy(&self) -> bool {
        matches!(self, Self::BuyYes | Self::BuyNo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuyYes => "BUY_YES",
            Self::BuyNo => "BUY_NO",
            Self::SellYes => "SELL_YES",
            Self::SellNo => "SELL_NO",
        }
    }
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY_YES" => Ok(Self::BuyYes),
            "BUY_NO" => Ok(Self::BuyNo),
            "SELL_YES" => Ok(Self::SellYes),
            "SELL_NO" => Ok(Self::SellNo),
            other => Err(CoreError::InvalidTradeKind(other.to_string())),
        }
    }
}

/// Liquidity provision direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityAction {
    Add,
    Remove,
}

impl fmt::Display for LiquidityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

impl FromStr for LiquidityAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(CoreError::InvalidLiquidityAction(other.to_string())),
        }
    }
}
