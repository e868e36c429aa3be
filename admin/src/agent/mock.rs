//! In-memory agent for exercising the admin surface without a trading process.

use std::sync::Mutex;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{Agent, AgentError, AgentResult, AssetBalance};

#[derive(Debug, Clone)]
pub struct Telemetry {
    pub price: Decimal,
    pub balance: Decimal,
    pub profit_pct: Decimal,
    pub initial_investment: Decimal,
    pub version: String,
    pub state: String,
    pub balances: Vec<AssetBalance>,
    pub target_price: Decimal,
    pub buy_back_price: Decimal,
    pub sell_confidence: Decimal,
    pub holding: bool,
    pub open_buy_back_amount: Decimal,
    pub open_buy_back_price: Decimal,
    pub open_buy_back_percentage: Decimal,
    pub tweets_enabled: bool,
    pub development_mode: bool,
    pub order_history: String,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            price: dec!(50000.00),
            balance: dec!(0.5),
            profit_pct: dec!(25.0),
            initial_investment: dec!(0.4),
            version: "2.4.1".to_string(),
            state: "Holding, waiting to sell".to_string(),
            balances: vec![AssetBalance {
                asset: "BTC".to_string(),
                amount: dec!(0.5),
            }],
            target_price: dec!(52000.00),
            buy_back_price: dec!(48500.00),
            sell_confidence: dec!(61.5),
            holding: true,
            open_buy_back_amount: dec!(0.4),
            open_buy_back_price: dec!(48500.00),
            open_buy_back_percentage: dec!(3.09),
            tweets_enabled: true,
            development_mode: false,
            order_history: "<br>BUY 0.5 BTC @ $40000.00".to_string(),
        }
    }
}

/// Agent whose telemetry is fixed by the test; can be switched into a failing state.
#[derive(Debug, Default)]
pub struct FixedAgent {
    telemetry: Mutex<Telemetry>,
    failing: Mutex<bool>,
}

impl FixedAgent {
    pub fn new(telemetry: Telemetry) -> Self {
        Self {
            telemetry: Mutex::new(telemetry),
            failing: Mutex::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn update(&self, f: impl FnOnce(&mut Telemetry)) {
        f(&mut self.telemetry.lock().unwrap());
    }

    fn read<T>(&self, f: impl FnOnce(&Telemetry) -> T) -> AgentResult<T> {
        if *self.failing.lock().unwrap() {
            return Err(AgentError::Malformed {
                reason: "agent offline".to_string(),
            });
        }
        Ok(f(&self.telemetry.lock().unwrap()))
    }
}

impl Agent for FixedAgent {
    fn current_price(&self) -> AgentResult<Decimal> {
        self.read(|t| t.price)
    }

    fn current_balance(&self) -> AgentResult<Decimal> {
        self.read(|t| t.balance)
    }

    fn current_profit(&self) -> AgentResult<Decimal> {
        self.read(|t| t.profit_pct)
    }

    fn initial_investment(&self) -> AgentResult<Decimal> {
        self.read(|t| t.initial_investment)
    }

    fn version(&self) -> AgentResult<String> {
        self.read(|t| t.version.clone())
    }

    fn state_description(&self) -> AgentResult<String> {
        self.read(|t| t.state.clone())
    }

    fn asset_balances(&self) -> AgentResult<Vec<AssetBalance>> {
        self.read(|t| t.balances.clone())
    }

    fn target_price(&self) -> AgentResult<Decimal> {
        self.read(|t| t.target_price)
    }

    fn buy_back_price(&self) -> AgentResult<Decimal> {
        self.read(|t| t.buy_back_price)
    }

    fn sell_confidence(&self) -> AgentResult<Decimal> {
        self.read(|t| t.sell_confidence)
    }

    fn is_holding(&self) -> AgentResult<bool> {
        self.read(|t| t.holding)
    }

    fn open_buy_back_amount(&self) -> AgentResult<Decimal> {
        self.read(|t| t.open_buy_back_amount)
    }

    fn open_buy_back_price(&self) -> AgentResult<Decimal> {
        self.read(|t| t.open_buy_back_price)
    }

    fn open_buy_back_percentage(&self) -> AgentResult<Decimal> {
        self.read(|t| t.open_buy_back_percentage)
    }

    fn tweets_enabled(&self) -> AgentResult<bool> {
        self.read(|t| t.tweets_enabled)
    }

    fn development_mode(&self) -> AgentResult<bool> {
        self.read(|t| t.development_mode)
    }

    fn order_history(&self) -> AgentResult<String> {
        self.read(|t| t.order_history.clone())
    }
}
