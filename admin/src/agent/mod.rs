//! Read-only view of the trading agent's live telemetry.
//!
//! The trading logic itself runs elsewhere; this service only reads what it
//! publishes and never writes back.

pub mod state_file;

#[cfg(test)]
pub mod mock;

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

pub use state_file::StateFileAgent;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent telemetry unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },
    #[error("agent telemetry is malformed: {reason}")]
    Malformed { reason: String },
    #[error("agent telemetry is missing field `{0}`")]
    MissingField(&'static str),
}

pub type AgentResult<T> = Result<T, AgentError>;

/// Holdings of a single asset, e.g. `BTC 0.50000000`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub amount: Decimal,
}

/// Buy-back order waiting to fill while the agent is out of BTC.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenBuyBack {
    pub amount: Decimal,
    pub price: Decimal,
    pub percentage: Decimal,
}

/// Point-in-time copy of the agent fields shown on the status page.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub version: String,
    pub state: String,
    pub price: Decimal,
    pub initial_investment: Decimal,
    pub balance: Decimal,
    pub profit_pct: Decimal,
    pub balances: Vec<AssetBalance>,
    pub target_price: Decimal,
    pub buy_back_price: Decimal,
    pub sell_confidence: Decimal,
    pub tweets_enabled: bool,
    pub development_mode: bool,
    /// Present only when the agent reported it is not holding.
    pub open_buy_back: Option<OpenBuyBack>,
}

/// Telemetry the admin surface can read from the agent.
///
/// Every getter is a fresh read; implementations must not serve values
/// cached from an earlier request.
pub trait Agent: Send + Sync {
    /// Last traded BTC price in USD.
    fn current_price(&self) -> AgentResult<Decimal>;
    /// Total holdings expressed in BTC.
    fn current_balance(&self) -> AgentResult<Decimal>;
    /// Profit since start, in percent.
    fn current_profit(&self) -> AgentResult<Decimal>;
    /// Starting balance in BTC.
    fn initial_investment(&self) -> AgentResult<Decimal>;
    fn version(&self) -> AgentResult<String>;
    /// Human description of what the agent is currently doing.
    fn state_description(&self) -> AgentResult<String>;
    fn asset_balances(&self) -> AgentResult<Vec<AssetBalance>>;
    fn target_price(&self) -> AgentResult<Decimal>;
    fn buy_back_price(&self) -> AgentResult<Decimal>;
    /// Confidence in the next sell, in percent.
    fn sell_confidence(&self) -> AgentResult<Decimal>;
    /// True while the agent holds BTC; false while waiting to buy back.
    fn is_holding(&self) -> AgentResult<bool>;
    fn open_buy_back_amount(&self) -> AgentResult<Decimal>;
    fn open_buy_back_price(&self) -> AgentResult<Decimal>;
    fn open_buy_back_percentage(&self) -> AgentResult<Decimal>;
    fn tweets_enabled(&self) -> AgentResult<bool>;
    fn development_mode(&self) -> AgentResult<bool>;
    /// Order log as the agent formats it (trusted markup).
    fn order_history(&self) -> AgentResult<String>;

    /// Every status field, taken from one read of the agent's state.
    ///
    /// The default goes through the getters, reading the holding flag once
    /// to decide whether the open buy-back fields are read at all.
    /// Implementations backed by a single document should override this so
    /// all fields come from the same version of it.
    fn snapshot(&self) -> AgentResult<TelemetrySnapshot> {
        let open_buy_back = if self.is_holding()? {
            None
        } else {
            Some(OpenBuyBack {
                amount: self.open_buy_back_amount()?,
                price: self.open_buy_back_price()?,
                percentage: self.open_buy_back_percentage()?,
            })
        };

        Ok(TelemetrySnapshot {
            version: self.version()?,
            state: self.state_description()?,
            price: self.current_price()?,
            initial_investment: self.initial_investment()?,
            balance: self.current_balance()?,
            profit_pct: self.current_profit()?,
            balances: self.asset_balances()?,
            target_price: self.target_price()?,
            buy_back_price: self.buy_back_price()?,
            sell_confidence: self.sell_confidence()?,
            tweets_enabled: self.tweets_enabled()?,
            development_mode: self.development_mode()?,
            open_buy_back,
        })
    }
}
