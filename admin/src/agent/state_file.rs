use std::fs;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;
use serde::Deserialize;

use super::{Agent, AgentError, AgentResult, AssetBalance, OpenBuyBack, TelemetrySnapshot};

/// Telemetry document the agent rewrites after every cycle.
#[derive(Debug, Clone, Deserialize)]
struct StateDocument {
    version: String,
    state: String,
    price: Decimal,
    balance: Decimal,
    profit_pct: Decimal,
    initial_investment: Decimal,
    #[serde(default)]
    balances: Vec<AssetBalance>,
    target_price: Decimal,
    buy_back_price: Decimal,
    sell_confidence: Decimal,
    holding: bool,
    #[serde(default)]
    open_buy_back: Option<OpenBuyBack>,
    #[serde(default)]
    tweets_enabled: bool,
    #[serde(default)]
    development_mode: bool,
    #[serde(default)]
    order_history: String,
}

/// Reads agent telemetry from the JSON file the agent publishes.
///
/// The file is re-read on every call so a value is never older than the
/// request asking for it. `snapshot` reads it once for all fields.
#[derive(Debug)]
pub struct StateFileAgent {
    path: PathBuf,
    #[cfg(test)]
    loads: AtomicUsize,
}

impl StateFileAgent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            #[cfg(test)]
            loads: AtomicUsize::new(0),
        }
    }

    fn load(&self) -> AgentResult<StateDocument> {
        #[cfg(test)]
        self.loads.fetch_add(1, Ordering::SeqCst);

        let raw = fs::read_to_string(&self.path).map_err(|e| AgentError::Unavailable {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| AgentError::Malformed {
            reason: e.to_string(),
        })
    }

    fn open_buy_back(&self) -> AgentResult<OpenBuyBack> {
        self.load()?
            .open_buy_back
            .ok_or(AgentError::MissingField("open_buy_back"))
    }
}

impl Agent for StateFileAgent {
    fn current_price(&self) -> AgentResult<Decimal> {
        Ok(self.load()?.price)
    }

    fn current_balance(&self) -> AgentResult<Decimal> {
        Ok(self.load()?.balance)
    }

    fn current_profit(&self) -> AgentResult<Decimal> {
        Ok(self.load()?.profit_pct)
    }

    fn initial_investment(&self) -> AgentResult<Decimal> {
        Ok(self.load()?.initial_investment)
    }

    fn version(&self) -> AgentResult<String> {
        Ok(self.load()?.version)
    }

    fn state_description(&self) -> AgentResult<String> {
        Ok(self.load()?.state)
    }

    fn asset_balances(&self) -> AgentResult<Vec<AssetBalance>> {
        Ok(self.load()?.balances)
    }

    fn target_price(&self) -> AgentResult<Decimal> {
        Ok(self.load()?.target_price)
    }

    fn buy_back_price(&self) -> AgentResult<Decimal> {
        Ok(self.load()?.buy_back_price)
    }

    fn sell_confidence(&self) -> AgentResult<Decimal> {
        Ok(self.load()?.sell_confidence)
    }

    fn is_holding(&self) -> AgentResult<bool> {
        Ok(self.load()?.holding)
    }

    fn open_buy_back_amount(&self) -> AgentResult<Decimal> {
        Ok(self.open_buy_back()?.amount)
    }

    fn open_buy_back_price(&self) -> AgentResult<Decimal> {
        Ok(self.open_buy_back()?.price)
    }

    fn open_buy_back_percentage(&self) -> AgentResult<Decimal> {
        Ok(self.open_buy_back()?.percentage)
    }

    fn tweets_enabled(&self) -> AgentResult<bool> {
        Ok(self.load()?.tweets_enabled)
    }

    fn development_mode(&self) -> AgentResult<bool> {
        Ok(self.load()?.development_mode)
    }

    fn order_history(&self) -> AgentResult<String> {
        Ok(self.load()?.order_history)
    }

    fn snapshot(&self) -> AgentResult<TelemetrySnapshot> {
        let doc = self.load()?;
        let open_buy_back = if doc.holding {
            None
        } else {
            Some(
                doc.open_buy_back
                    .ok_or(AgentError::MissingField("open_buy_back"))?,
            )
        };

        Ok(TelemetrySnapshot {
            version: doc.version,
            state: doc.state,
            price: doc.price,
            initial_investment: doc.initial_investment,
            balance: doc.balance,
            profit_pct: doc.profit_pct,
            balances: doc.balances,
            target_price: doc.target_price,
            buy_back_price: doc.buy_back_price,
            sell_confidence: doc.sell_confidence,
            tweets_enabled: doc.tweets_enabled,
            development_mode: doc.development_mode,
            open_buy_back,
        })
    }
}
