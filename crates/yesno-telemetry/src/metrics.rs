//! Prometheus metrics for the market simulator.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration failure
//! means a duplicate metric name, which is a programming error that should
//! crash at first use rather than silently drop data.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_int_counter_vec, CounterVec, Encoder,
    GaugeVec, IntCounterVec, TextEncoder,
};

use crate::error::TelemetryResult;

/// Executed trades.
/// Labels: market, kind (BUY_YES/BUY_NO/SELL_YES/SELL_NO)
pub static TRADES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "yesno_trades_total",
        "Total executed trades",
        &["market", "kind"]
    )
    .unwrap()
});

/// Traded notional in USDC (paid in for buys, paid out for sells).
pub static TRADE_VOLUME_USDC: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "yesno_trade_volume_usdc",
        "Traded notional in USDC",
        &["market", "kind"]
    )
    .unwrap()
});

/// Fees charged in USDC.
pub static FEES_USDC: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!("yesno_fees_usdc", "Fees charged in USDC", &["market"]).unwrap()
});

/// Liquidity deposits and withdrawals.
/// Labels: market, action (add/remove)
pub static LIQUIDITY_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "yesno_liquidity_events_total",
        "Total liquidity deposits and withdrawals",
        &["market", "action"]
    )
    .unwrap()
});

/// Rejected operations by reason.
pub static REJECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "yesno_rejections_total",
        "Total rejected operations",
        &["reason"]
    )
    .unwrap()
});

/// Current YES price (implied probability).
pub static YES_PRICE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("yesno_yes_price", "Current YES price", &["market"]).unwrap()
});

/// Current LP token supply.
pub static LP_SUPPLY: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("yesno_lp_supply", "Current LP token supply", &["market"]).unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record an executed trade.
    pub fn trade(market: &str, kind: &str, volume_usdc: f64, fee_usdc: f64) {
        TRADES_TOTAL.with_label_values(&[market, kind]).inc();
        TRADE_VOLUME_USDC
            .with_label_values(&[market, kind])
            .inc_by(volume_usdc.max(0.0));
        FEES_USDC.with_label_values(&[market]).inc_by(fee_usdc.max(0.0));
    }

    /// Record a liquidity deposit or withdrawal.
    pub fn liquidity(market: &str, action: &str, lp_supply: f64) {
        LIQUIDITY_EVENTS_TOTAL
            .with_label_values(&[market, action])
            .inc();
        LP_SUPPLY.with_label_values(&[market]).set(lp_supply);
    }

    /// Record a rejected operation.
    pub fn rejected(reason: &str) {
        REJECTIONS_TOTAL.with_label_values(&[reason]).inc();
    }

    /// Publish the current YES price.
    pub fn yes_price(market: &str, price: f64) {
        YES_PRICE.with_label_values(&[market]).set(price);
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}
