//! Trading fee rate.
//!
//! Fees are charged additively outside the invariant swap: on buys the fee
//! is taken from the USDC paid in before it reaches the pool, on sells it is
//! taken from the USDC paid out after the swap.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AmmError, AmmResult};

/// Basis points per unit.
const BPS_PER_UNIT: i64 = 10_000;

/// Validated fee rate in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FeeRate(f64);

impl FeeRate {
    pub const ZERO: Self = Self(0.0);

    /// 2% policy default.
    pub const DEFAULT: Self = Self(0.02);

    pub fn new(rate: f64) -> AmmResult<Self> {
        if rate.is_finite() && (0.0..1.0).contains(&rate) {
            Ok(Self(rate))
        } else {
            Err(AmmError::InvalidFeeRate(rate))
        }
    }

    /// Build from basis points (`200` → 2%).
    ///
    /// # Example
    /// ```
    /// use rust_decimal_macros::dec;
    /// use yesno_amm::FeeRate;
    ///
    /// let fee = FeeRate::from_bps(dec!(200)).unwrap();
    /// assert_eq!(fee, FeeRate::DEFAULT);
    /// ```
    pub fn from_bps(bps: Decimal) -> AmmResult<Self> {
        let rate = (bps / Decimal::from(BPS_PER_UNIT))
            .to_f64()
            .ok_or(AmmError::InvalidFeeRate(f64::NAN))?;
        Self::new(rate)
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.0
    }

    /// Split a gross amount into `(fee, net)`.
    #[inline]
    pub fn split(&self, gross: f64) -> (f64, f64) {
        let fee = gross * self.0;
        (fee, gross - fee)
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for FeeRate {
    type Error = AmmError;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<FeeRate> for f64 {
    fn from(fee: FeeRate) -> Self {
        fee.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_rate_bounds() {
        assert!(FeeRate::new(0.0).is_ok());
        assert!(FeeRate::new(0.999).is_ok());
        assert_eq!(FeeRate::new(1.0), Err(AmmError::InvalidFeeRate(1.0)));
        assert_eq!(FeeRate::new(-0.01), Err(AmmError::InvalidFeeRate(-0.01)));
        assert!(FeeRate::new(f64::NAN).is_err());
    }

    #[test]
    fn test_fee_rate_from_bps() {
        assert_eq!(FeeRate::from_bps(dec!(200)).unwrap().rate(), 0.02);
        assert_eq!(FeeRate::from_bps(dec!(0)).unwrap(), FeeRate::ZERO);
        assert!(FeeRate::from_bps(dec!(10000)).is_err());
        assert!(FeeRate::from_bps(dec!(-5)).is_err());
    }

    #[test]
    fn test_fee_split() {
        let (fee, net) = FeeRate::DEFAULT.split(100.0);
        assert_eq!(fee, 2.0);
        assert_eq!(net, 98.0);
    }

    #[test]
    fn test_fee_rate_deserialize_validates() {
        let fee: FeeRate = serde_json::from_str("0.05").unwrap();
        assert_eq!(fee.rate(), 0.05);
        assert!(serde_json::from_str::<FeeRate>("1.5").is_err());
    }
}
