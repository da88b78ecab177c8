//! Prometheus metrics and structured logging for the yes/no market simulator.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Prometheus counters for trades, fees, liquidity events and rejections

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
