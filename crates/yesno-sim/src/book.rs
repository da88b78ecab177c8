//! In-memory market and account ledger.
//!
//! Each market and each account sits behind its own mutex. A mutating call
//! holds the market lock across read, engine call and commit, so at most one
//! update per market is in flight. Lock order is market then account;
//! read-only account valuation releases the account before touching markets.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use yesno_amm::{
    add_liquidity, create_market, execute_trade, get_prices, lp_claim, position_value,
    remove_liquidity, AddLiquidityResult, FeeRate, RemoveLiquidityResult,
};
use yesno_core::{MarketId, MarketState, Outcome, Position, TradeKind};
use yesno_telemetry::Metrics;

use crate::config::MarketConfig;
use crate::error::{SimError, SimResult};

/// Stored market row.
#[derive(Debug, Clone)]
pub struct MarketRecord {
    pub id: MarketId,
    pub name: String,
    pub question: String,
    pub description: Option<String>,
    pub creator: String,
    pub state: MarketState,
    pub lp_supply: f64,
    pub resolution: Option<Outcome>,
    pub created_at: DateTime<Utc>,
}

/// Stored account row.
#[derive(Debug, Clone, Default)]
pub struct Account {
    pub balance: f64,
    /// Positions keyed by market name.
    pub positions: HashMap<String, Position>,
}

/// One executed trade, as a trade-history row would record it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: Uuid,
    pub market_id: MarketId,
    pub market: String,
    pub account: String,
    pub kind: TradeKind,
    /// USDC for buys, shares for sells.
    pub amount: f64,
    /// Signed change of the account's shares on the traded side.
    pub shares_change: f64,
    /// USDC paid (buys) or received (sells).
    pub usdc_change: f64,
    /// Average USDC per share.
    pub price_at_trade: Option<f64>,
    pub fee: f64,
    pub yes_pool_before: f64,
    pub no_pool_before: f64,
    pub yes_pool_after: f64,
    pub no_pool_after: f64,
    pub created_at: DateTime<Utc>,
}

/// Read-only market view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: MarketId,
    pub name: String,
    pub question: String,
    pub yes_pool: f64,
    pub no_pool: f64,
    pub k: f64,
    pub yes_price: f64,
    pub no_price: f64,
    pub lp_supply: f64,
    pub resolution: Option<Outcome>,
}

impl From<&MarketRecord> for MarketSnapshot {
    fn from(m: &MarketRecord) -> Self {
        let prices = get_prices(m.state);
        Self {
            id: m.id,
            name: m.name.clone(),
            question: m.question.clone(),
            yes_pool: m.state.yes_pool,
            no_pool: m.state.no_pool,
            k: m.state.k(),
            yes_price: prices.yes,
            no_price: prices.no,
            lp_supply: m.lp_supply,
            resolution: m.resolution,
        }
    }
}

/// A position with its current value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSnapshot {
    #[serde(flatten)]
    pub position: Position,
    /// Shares marked to market (or settled) plus the LP claim.
    pub value: f64,
}

/// Read-only account view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub name: String,
    pub balance: f64,
    pub positions: BTreeMap<String, PositionSnapshot>,
    /// Balance plus the value of every position.
    pub total_value: f64,
}

/// Relative gap between a holder's LP balance and the market supply that is
/// treated as float drift rather than a real difference.
const LP_DUST: f64 = 1e-9;

/// LP tokens to burn against `supply` when a holder redeems `requested`.
///
/// Repeated mint and burn can leave the supply an ulp away from the sum of
/// the balances. A request within `LP_DUST` of the supply burns all of it.
fn lp_burn(requested: f64, supply: f64) -> f64 {
    if (requested - supply).abs() <= LP_DUST * supply.abs().max(1.0) {
        supply
    } else {
        requested
    }
}

type MarketEntry = Arc<Mutex<MarketRecord>>;
type AccountEntry = Arc<Mutex<Account>>;

/// Markets and accounts for one simulation run.
pub struct MarketBook {
    markets: DashMap<String, MarketEntry>,
    accounts: DashMap<String, AccountEntry>,
    fee: FeeRate,
}

impl MarketBook {
    pub fn new(fee: FeeRate) -> Self {
        Self {
            markets: DashMap::new(),
            accounts: DashMap::new(),
            fee,
        }
    }

    pub fn fee(&self) -> FeeRate {
        self.fee
    }

    fn market(&self, name: &str) -> SimResult<MarketEntry> {
        self.markets
            .get(name)
            .map(|entry| entry.clone())
            .ok_or_else(|| SimError::UnknownMarket(name.to_string()))
    }

    fn account(&self, name: &str) -> SimResult<AccountEntry> {
        self.accounts
            .get(name)
            .map(|entry| entry.clone())
            .ok_or_else(|| SimError::UnknownAccount(name.to_string()))
    }

    /// Open an account with a starting balance.
    pub fn open_account(&self, name: &str, balance: f64) -> SimResult<()> {
        if !(balance.is_finite() && balance >= 0.0) {
            return Err(SimError::Config(format!(
                "account {name}: invalid balance {balance}"
            )));
        }
        match self.accounts.entry(name.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(SimError::DuplicateAccount(name.to_string()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(Account {
                    balance,
                    positions: HashMap::new(),
                })));
                debug!(account = %name, balance, "Account opened");
                Ok(())
            }
        }
    }

    /// Create a market seeded by its creator.
    ///
    /// The creator pays the seed liquidity and receives the genesis LP supply.
    pub fn create_market(&self, config: &MarketConfig) -> SimResult<MarketSnapshot> {
        let genesis = create_market(config.initial_liquidity, config.initial_yes_probability)?;
        let creator = self.account(&config.creator)?;

        let dashmap::mapref::entry::Entry::Vacant(slot) = self.markets.entry(config.name.clone())
        else {
            return Err(SimError::DuplicateMarket(config.name.clone()));
        };

        let mut acct = creator.lock();
        let acct = &mut *acct;
        if acct.balance < config.initial_liquidity {
            return Err(SimError::InsufficientBalance {
                needed: config.initial_liquidity,
                available: acct.balance,
            });
        }

        let record = MarketRecord {
            id: MarketId::new(),
            name: config.name.clone(),
            question: config.question.clone(),
            description: config.description.clone(),
            creator: config.creator.clone(),
            state: genesis.state,
            lp_supply: genesis.lp_supply,
            resolution: None,
            created_at: Utc::now(),
        };

        acct.balance -= config.initial_liquidity;
        acct.positions
            .entry(config.name.clone())
            .or_default()
            .lp_tokens += genesis.lp_supply;

        let snapshot = MarketSnapshot::from(&record);
        slot.insert(Arc::new(Mutex::new(record)));

        Metrics::yes_price(&config.name, snapshot.yes_price);
        Metrics::liquidity(&config.name, "add", snapshot.lp_supply);
        info!(
            market = %config.name,
            id = %snapshot.id,
            yes_price = snapshot.yes_price,
            liquidity = config.initial_liquidity,
            "Market created"
        );
        Ok(snapshot)
    }

    /// Execute a trade for `account`.
    pub fn trade(
        &self,
        account: &str,
        market: &str,
        kind: TradeKind,
        amount: f64,
    ) -> SimResult<TradeRecord> {
        let market_entry = self.market(market)?;
        let mut m = market_entry.lock();
        if m.resolution.is_some() {
            return Err(SimError::MarketResolved(market.to_string()));
        }

        let account_entry = self.account(account)?;
        let mut acct = account_entry.lock();
        let acct = &mut *acct;

        let outcome = kind.outcome();
        if kind.is_buy() {
            if acct.balance < amount {
                return Err(SimError::InsufficientBalance {
                    needed: amount,
                    available: acct.balance,
                });
            }
        } else {
            let held = acct
                .positions
                .get(market)
                .map(|p| p.shares(outcome))
                .unwrap_or(0.0);
            if held < amount {
                return Err(SimError::InsufficientShares {
                    outcome,
                    needed: amount,
                    available: held,
                });
            }
        }

        let before = m.state;
        let result = execute_trade(before, kind, amount, self.fee)?;
        m.state = result.new_state();

        let position = acct.positions.entry(market.to_string()).or_default();
        let (shares_change, usdc_change) = if kind.is_buy() {
            acct.balance -= amount;
            *position.shares_mut(outcome) += result.shares_received;
            (result.shares_received, -amount)
        } else {
            *position.shares_mut(outcome) -= amount;
            acct.balance += result.amount_received;
            (-amount, result.amount_received)
        };

        let record = TradeRecord {
            id: Uuid::new_v4(),
            market_id: m.id,
            market: market.to_string(),
            account: account.to_string(),
            kind,
            amount,
            shares_change,
            usdc_change,
            price_at_trade: result.execution_price(kind, amount),
            fee: result.fee,
            yes_pool_before: before.yes_pool,
            no_pool_before: before.no_pool,
            yes_pool_after: result.new_yes_pool,
            no_pool_after: result.new_no_pool,
            created_at: Utc::now(),
        };

        Metrics::trade(market, kind.as_str(), usdc_change.abs(), result.fee);
        Metrics::yes_price(market, result.new_yes_price);
        debug!(
            market = %market,
            account = %account,
            %kind,
            amount,
            shares_change,
            usdc_change,
            fee = result.fee,
            yes_price = result.new_yes_price,
            "Trade executed"
        );
        Ok(record)
    }

    /// Deposit `amount` USDC from `account` into the pool.
    pub fn add_liquidity(
        &self,
        account: &str,
        market: &str,
        amount: f64,
    ) -> SimResult<AddLiquidityResult> {
        let market_entry = self.market(market)?;
        let mut m = market_entry.lock();
        if m.resolution.is_some() {
            return Err(SimError::MarketResolved(market.to_string()));
        }

        let account_entry = self.account(account)?;
        let mut acct = account_entry.lock();
        let acct = &mut *acct;
        if acct.balance < amount {
            return Err(SimError::InsufficientBalance {
                needed: amount,
                available: acct.balance,
            });
        }

        let result = add_liquidity(m.state, amount, m.lp_supply)?;
        m.state = result.new_state();
        m.lp_supply = result.new_total_lp_tokens;

        acct.balance -= amount;
        acct.positions
            .entry(market.to_string())
            .or_default()
            .lp_tokens += result.lp_tokens_received;

        Metrics::liquidity(market, "add", m.lp_supply);
        debug!(
            market = %market,
            account = %account,
            amount,
            minted = result.lp_tokens_received,
            lp_supply = m.lp_supply,
            "Liquidity added"
        );
        Ok(result)
    }

    /// Burn `lp_tokens` of `account` and pay out the withdrawal.
    pub fn remove_liquidity(
        &self,
        account: &str,
        market: &str,
        lp_tokens: f64,
    ) -> SimResult<RemoveLiquidityResult> {
        let market_entry = self.market(market)?;
        let mut m = market_entry.lock();
        if m.resolution.is_some() {
            return Err(SimError::MarketResolved(market.to_string()));
        }

        let account_entry = self.account(account)?;
        let mut acct = account_entry.lock();
        let acct = &mut *acct;
        let held = acct
            .positions
            .get(market)
            .map(|p| p.lp_tokens)
            .unwrap_or(0.0);
        if held < lp_tokens {
            return Err(SimError::InsufficientLpTokens {
                needed: lp_tokens,
                available: held,
            });
        }

        let result = remove_liquidity(m.state, lp_burn(lp_tokens, m.lp_supply), m.lp_supply)?;
        m.state = result.new_state();
        m.lp_supply = result.new_total_lp_tokens;

        acct.balance += result.usdc_received;
        acct.positions
            .entry(market.to_string())
            .or_default()
            .lp_tokens -= lp_tokens;

        Metrics::liquidity(market, "remove", m.lp_supply);
        debug!(
            market = %market,
            account = %account,
            lp_tokens,
            usdc_received = result.usdc_received,
            impermanent_loss = result.impermanent_loss,
            "Liquidity removed"
        );
        Ok(result)
    }

    /// Settle a market. Trading and liquidity changes stop; redemption opens.
    pub fn resolve(&self, market: &str, outcome: Outcome) -> SimResult<MarketSnapshot> {
        let market_entry = self.market(market)?;
        let mut m = market_entry.lock();
        if m.resolution.is_some() {
            return Err(SimError::MarketResolved(market.to_string()));
        }
        m.resolution = Some(outcome);
        info!(market = %market, %outcome, "Market resolved");
        Ok(MarketSnapshot::from(&*m))
    }

    /// Redeem `account`'s holdings in a resolved market.
    ///
    /// Winning shares pay 1.0 each and losing shares are cleared. LP tokens
    /// are burned against the pools and the winning side of the withdrawal
    /// is paid out. Returns the USDC paid.
    pub fn redeem(&self, account: &str, market: &str) -> SimResult<f64> {
        let market_entry = self.market(market)?;
        let mut m = market_entry.lock();
        let Some(outcome) = m.resolution else {
            return Err(SimError::MarketNotResolved(market.to_string()));
        };

        let account_entry = self.account(account)?;
        let mut acct = account_entry.lock();
        let acct = &mut *acct;
        let Some(position) = acct.positions.get_mut(market) else {
            return Ok(0.0);
        };

        // Burn LP first so a failure leaves the position untouched.
        let burn = lp_burn(position.lp_tokens, m.lp_supply);
        let withdrawal = if position.lp_tokens > 0.0 && burn > 0.0 {
            Some(remove_liquidity(m.state, burn, m.lp_supply)?)
        } else {
            None
        };

        let mut payout = position_value(
            m.state,
            position.yes_shares,
            position.no_shares,
            Some(outcome),
        );
        if let Some(result) = withdrawal {
            payout += result.withdrawn(outcome);
            m.state = result.new_state();
            m.lp_supply = result.new_total_lp_tokens;
        }
        position.yes_shares = 0.0;
        position.no_shares = 0.0;
        position.lp_tokens = 0.0;

        acct.balance += payout;
        info!(market = %market, account = %account, payout, "Position redeemed");
        Ok(payout)
    }

    /// Current view of one market.
    pub fn market_snapshot(&self, market: &str) -> SimResult<MarketSnapshot> {
        let entry = self.market(market)?;
        let guard = entry.lock();
        Ok(MarketSnapshot::from(&*guard))
    }

    /// Current view of one account, with every position valued.
    pub fn account_snapshot(&self, account: &str) -> SimResult<AccountSnapshot> {
        let (balance, positions) = {
            let entry = self.account(account)?;
            let guard = entry.lock();
            (guard.balance, guard.positions.clone())
        };

        let mut valued = BTreeMap::new();
        let mut total_value = balance;
        for (market, position) in positions {
            let entry = self.market(&market)?;
            let value = {
                let m = entry.lock();
                position_value(m.state, position.yes_shares, position.no_shares, m.resolution)
                    + lp_claim(m.state, position.lp_tokens, m.lp_supply, m.resolution)
            };
            total_value += value;
            valued.insert(market, PositionSnapshot { position, value });
        }

        Ok(AccountSnapshot {
            name: account.to_string(),
            balance,
            positions: valued,
            total_value,
        })
    }
}
