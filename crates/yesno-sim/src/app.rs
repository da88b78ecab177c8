//! Scenario runner.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use yesno_amm::{AddLiquidityResult, RemoveLiquidityResult};
use yesno_core::{LiquidityAction, Outcome};
use yesno_telemetry::Metrics;

use crate::book::{AccountSnapshot, MarketBook, MarketSnapshot, TradeRecord};
use crate::config::{SimConfig, Step};
use crate::error::SimResult;

/// What a successful step produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepDetail {
    Trade(TradeRecord),
    AddLiquidity(AddLiquidityResult),
    RemoveLiquidity(RemoveLiquidityResult),
    Resolved { outcome: Outcome },
    Redeemed { payout: f64 },
}

/// Result of one scripted step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub index: usize,
    pub step: Step,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<StepDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final state after all steps ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimReport {
    pub fee_rate: f64,
    pub executed: usize,
    pub rejected: usize,
    pub markets: Vec<MarketSnapshot>,
    pub accounts: Vec<AccountSnapshot>,
    pub steps: Vec<StepOutcome>,
}

/// Drives a [`MarketBook`] through a scripted scenario.
pub struct Simulator {
    config: SimConfig,
    book: MarketBook,
}

impl Simulator {
    /// Open the configured accounts and create the configured markets.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let fee = config.fee_rate()?;
        let book = MarketBook::new(fee);

        for account in &config.accounts {
            book.open_account(&account.name, account.balance)?;
        }
        for market in &config.markets {
            book.create_market(market)?;
        }

        info!(
            fee = %fee,
            accounts = config.accounts.len(),
            markets = config.markets.len(),
            steps = config.steps.len(),
            "Simulator initialized"
        );
        Ok(Self { config, book })
    }

    pub fn book(&self) -> &MarketBook {
        &self.book
    }

    /// Apply a single step.
    pub fn apply(&self, step: &Step) -> SimResult<StepDetail> {
        match step {
            Step::Trade {
                account,
                market,
                kind,
                amount,
            } => self
                .book
                .trade(account, market, *kind, *amount)
                .map(StepDetail::Trade),
            Step::Liquidity {
                account,
                market,
                action: LiquidityAction::Add,
                amount,
            } => self
                .book
                .add_liquidity(account, market, *amount)
                .map(StepDetail::AddLiquidity),
            Step::Liquidity {
                account,
                market,
                action: LiquidityAction::Remove,
                amount,
            } => self
                .book
                .remove_liquidity(account, market, *amount)
                .map(StepDetail::RemoveLiquidity),
            Step::Resolve { market, outcome } => self
                .book
                .resolve(market, *outcome)
                .map(|_| StepDetail::Resolved { outcome: *outcome }),
            Step::Redeem { account, market } => self
                .book
                .redeem(account, market)
                .map(|payout| StepDetail::Redeemed { payout }),
        }
    }

    /// Run every step in order. Failed steps are recorded and skipped.
    pub fn run(&self) -> SimResult<SimReport> {
        let mut steps = Vec::with_capacity(self.config.steps.len());
        let mut rejected = 0;

        for (index, step) in self.config.steps.iter().enumerate() {
            match self.apply(step) {
                Ok(detail) => steps.push(StepOutcome {
                    index,
                    step: step.clone(),
                    ok: true,
                    detail: Some(detail),
                    error: None,
                }),
                Err(e) => {
                    warn!(index, reason = e.kind(), error = %e, "Step rejected");
                    Metrics::rejected(e.kind());
                    rejected += 1;
                    steps.push(StepOutcome {
                        index,
                        step: step.clone(),
                        ok: false,
                        detail: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let markets = self
            .config
            .markets
            .iter()
            .map(|m| self.book.market_snapshot(&m.name))
            .collect::<SimResult<Vec<_>>>()?;
        let accounts = self
            .config
            .accounts
            .iter()
            .map(|a| self.book.account_snapshot(&a.name))
            .collect::<SimResult<Vec<_>>>()?;

        info!(
            executed = steps.len() - rejected,
            rejected,
            "Scenario complete"
        );
        Ok(SimReport {
            fee_rate: self.book.fee().rate(),
            executed: steps.len() - rejected,
            rejected,
            markets,
            accounts,
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
fee_bps = 200

[[accounts]]
name = "maker"
balance = 2000.0

[[accounts]]
name = "alice"
balance = 100.0

[[markets]]
name = "rain"
question = "Will it rain tomorrow?"
creator = "maker"
initial_liquidity = 1000.0

[[steps]]
step = "trade"
account = "alice"
market = "rain"
kind = "BUY_YES"
amount = 60.0

[[steps]]
step = "trade"
account = "alice"
market = "rain"
kind = "BUY_NO"
amount = 60.0

[[steps]]
step = "resolve"
market = "rain"
outcome = "yes"

[[steps]]
step = "redeem"
account = "alice"
market = "rain"
"#;

    #[test]
    fn test_run_continues_past_rejected_step() {
        let config = SimConfig::from_toml(SCENARIO).unwrap();
        let sim = Simulator::new(config).unwrap();
        let report = sim.run().unwrap();

        assert_eq!(report.steps.len(), 4);
        assert_eq!(report.executed, 3);
        assert_eq!(report.rejected, 1);

        // Second buy exceeds the remaining balance.
        let failed = &report.steps[1];
        assert!(!failed.ok);
        assert!(failed.error.as_deref().unwrap().contains("Insufficient balance"));

        let Some(StepDetail::Trade(bought)) = &report.steps[0].detail else {
            panic!("expected a trade detail");
        };
        let Some(StepDetail::Redeemed { payout }) = report.steps[3].detail else {
            panic!("expected a redemption");
        };
        assert_eq!(payout, bought.shares_change);

        let alice = report.accounts.iter().find(|a| a.name == "alice").unwrap();
        assert!((alice.balance - (40.0 + payout)).abs() < 1e-9);
        assert_eq!(report.markets[0].resolution, Some(Outcome::Yes));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let config = SimConfig::from_toml(SCENARIO).unwrap();
        let report = Simulator::new(config).unwrap().run().unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["steps"][0]["detail"]["type"], "trade");
        assert_eq!(json["steps"][0]["step"]["kind"], "BUY_YES");
        assert_eq!(json["steps"][2]["detail"]["outcome"], "yes");
        assert!(json["steps"][1].get("detail").is_none());
    }

    #[test]
    fn test_new_rejects_creator_without_funds() {
        let mut config = SimConfig::from_toml(SCENARIO).unwrap();
        config.markets[0].initial_liquidity = 5000.0;
        assert!(Simulator::new(config).is_err());
    }
}
