//! Scenario runner for the yes/no AMM engine.
//!
//! Plays the part of the API and storage layer around the engine:
//! - `MarketBook`: in-memory markets and accounts, one writer per market
//! - `Simulator`: applies scripted steps and builds a report
//! - `SimConfig`: TOML scenario definition

pub mod app;
pub mod book;
pub mod config;
pub mod error;

pub use app::{SimReport, Simulator, StepDetail, StepOutcome};
pub use book::{AccountSnapshot, MarketBook, MarketSnapshot, TradeRecord};
pub use config::{AccountConfig, MarketConfig, SimConfig, Step};
pub use error::{SimError, SimResult};
