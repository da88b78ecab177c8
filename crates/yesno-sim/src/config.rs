//! Scenario configuration.

use crate::error::{SimError, SimResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use yesno_amm::FeeRate;
use yesno_core::{LiquidityAction, Outcome, TradeKind};

/// Account seeded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub name: String,
    /// Starting USDC balance.
    #[serde(default = "default_balance")]
    pub balance: f64,
}

fn default_balance() -> f64 {
    1000.0
}

/// Market created at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Short name steps refer to (e.g. "rain-tomorrow").
    pub name: String,
    pub question: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Account that seeds the pool and receives the initial LP tokens.
    pub creator: String,
    /// Seed liquidity in USDC, paid by the creator.
    pub initial_liquidity: f64,
    /// Opening YES price, in (0, 1). Default: 0.5.
    #[serde(default = "default_initial_yes_probability")]
    pub initial_yes_probability: f64,
}

fn default_initial_yes_probability() -> f64 {
    0.5
}

/// One scripted action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Buy or sell shares. `amount` is USDC for buys and shares for sells.
    Trade {
        account: String,
        market: String,
        kind: TradeKind,
        amount: f64,
    },
    /// Deposit USDC (`add`) or burn LP tokens (`remove`).
    Liquidity {
        account: String,
        market: String,
        action: LiquidityAction,
        amount: f64,
    },
    /// Settle a market.
    Resolve { market: String, outcome: Outcome },
    /// Pay out winning shares and settled LP claims for one account.
    Redeem { account: String, market: String },
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log level when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Trading fee in basis points. Default: 200 (2%).
    #[serde(default = "default_fee_bps")]
    pub fee_bps: Decimal,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    #[serde(default)]
    pub markets: Vec<MarketConfig>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_fee_bps() -> Decimal {
    Decimal::new(200, 0)
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fee_bps: default_fee_bps(),
            telemetry: TelemetryConfig::default(),
            accounts: Vec::new(),
            markets: Vec::new(),
            steps: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Load from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> SimResult<Self> {
        toml::from_str(content).map_err(|e| SimError::Config(format!("Failed to parse config: {e}")))
    }

    /// Validated fee rate.
    pub fn fee_rate(&self) -> SimResult<FeeRate> {
        FeeRate::from_bps(self.fee_bps)
            .map_err(|e| SimError::Config(format!("fee_bps={}: {e}", self.fee_bps)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.fee_bps, dec!(200));
        assert_eq!(config.fee_rate().unwrap(), FeeRate::DEFAULT);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.steps.is_empty());
    }

    #[test]
    fn test_parse_scenario() {
        let toml_str = r#"
fee_bps = 100

[[accounts]]
name = "alice"
balance = 500.0

[[accounts]]
name = "bob"

[[markets]]
name = "rain"
question = "Will it rain tomorrow?"
creator = "alice"
initial_liquidity = 200.0
initial_yes_probability = 0.3

[[steps]]
step = "trade"
account = "bob"
market = "rain"
kind = "BUY_YES"
amount = 25.0

[[steps]]
step = "liquidity"
account = "bob"
market = "rain"
action = "add"
amount = 50.0

[[steps]]
step = "resolve"
market = "rain"
outcome = "yes"

[[steps]]
step = "redeem"
account = "bob"
market = "rain"
"#;
        let config = SimConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.fee_rate().unwrap().rate(), 0.01);
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[1].balance, 1000.0);
        assert_eq!(config.markets[0].initial_yes_probability, 0.3);
        assert_eq!(config.steps.len(), 4);
        assert!(matches!(
            &config.steps[0],
            Step::Trade { kind: TradeKind::BuyYes, amount, .. } if *amount == 25.0
        ));
        assert!(matches!(
            &config.steps[1],
            Step::Liquidity { action: LiquidityAction::Add, .. }
        ));
        assert!(matches!(
            &config.steps[2],
            Step::Resolve { outcome: Outcome::Yes, .. }
        ));
        assert!(matches!(&config.steps[3], Step::Redeem { .. }));
    }

    #[test]
    fn test_unknown_trade_kind_rejected() {
        let toml_str = r#"
[[steps]]
step = "trade"
account = "bob"
market = "rain"
kind = "SHORT_YES"
amount = 1.0
"#;
        assert!(matches!(
            SimConfig::from_toml(toml_str),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_fee_rejected() {
        let config = SimConfig {
            fee_bps: dec!(10000),
            ..Default::default()
        };
        assert!(matches!(config.fee_rate(), Err(SimError::Config(_))));
    }
}
