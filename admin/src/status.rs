//! Status page assembly.
//!
//! Every render reads the agent fresh, derives the money figures, and records
//! its own load time in a rolling window that the page then reports.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::agent::{Agent, AgentError, AgentResult, TelemetrySnapshot};
use crate::metrics::RollingMetric;
use crate::page::{escape, PageShell};

/// Values derived from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Figures {
    /// balance * price, USD
    pub portfolio_value: Decimal,
    /// balance - initial investment, BTC, 8 dp
    pub balance_diff: Decimal,
    /// balance_diff * price, USD, 2 dp
    pub balance_diff_usd: Decimal,
    /// price - open buy-back price, USD
    pub open_price_diff: Option<Decimal>,
}

impl Figures {
    /// Fails instead of panicking when telemetry values are too large to
    /// combine.
    pub fn derive(snapshot: &TelemetrySnapshot) -> AgentResult<Self> {
        let portfolio_value = snapshot
            .balance
            .checked_mul(snapshot.price)
            .ok_or_else(|| overflow("portfolio value"))?;
        let balance_diff = snapshot
            .balance
            .checked_sub(snapshot.initial_investment)
            .ok_or_else(|| overflow("balance difference"))?;
        let balance_diff = round(balance_diff, 8);
        let balance_diff_usd = balance_diff
            .checked_mul(snapshot.price)
            .ok_or_else(|| overflow("USD difference"))?;
        let open_price_diff = match &snapshot.open_buy_back {
            Some(open) => Some(
                snapshot
                    .price
                    .checked_sub(open.price)
                    .ok_or_else(|| overflow("open buy-back difference"))?,
            ),
            None => None,
        };

        Ok(Self {
            portfolio_value,
            balance_diff,
            balance_diff_usd: round(balance_diff_usd, 2),
            open_price_diff,
        })
    }
}

fn overflow(figure: &str) -> AgentError {
    AgentError::Malformed {
        reason: format!("{figure} overflow"),
    }
}

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed-point rendering with exactly `dp` fractional digits.
fn fixed(value: Decimal, dp: u32) -> String {
    format!("{:.*}", dp as usize, round(value, dp))
}

fn usd(value: Decimal) -> String {
    fixed(value, 2)
}

fn btc(value: Decimal) -> String {
    fixed(value, 8)
}

/// Lay out the status report body. Pure: equal inputs give equal output.
pub fn render_report(snapshot: &TelemetrySnapshot, figures: &Figures) -> String {
    let mut out = String::with_capacity(1024);

    let _ = write!(out, "<m>Version&nbsp;{}</m><br>", escape(&snapshot.version));
    if snapshot.development_mode {
        out.push_str("<br>### DEVELOPMENT MODE ###");
    }

    out.push_str("<br>--- Status report ---");
    let _ = write!(out, "<br>Status: {}", escape(&snapshot.state));
    let _ = write!(
        out,
        "<br>Investment: {} BTC",
        btc(snapshot.initial_investment)
    );
    let _ = write!(
        out,
        "<br>Portfolio ≈ {} BTC (${})",
        btc(snapshot.balance),
        usd(figures.portfolio_value)
    );
    for balance in &snapshot.balances {
        let _ = write!(
            out,
            "<br>{}: {}",
            escape(&balance.asset),
            balance.amount.normalize()
        );
    }
    let _ = write!(
        out,
        "<br>Profit: {}% ({} BTC ≈ ${})",
        fixed(snapshot.profit_pct, 2),
        btc(figures.balance_diff),
        usd(figures.balance_diff_usd)
    );
    if !snapshot.tweets_enabled {
        out.push_str("<br>Tweeting: DISABLED");
    }

    out.push_str("<br><br>--- Market ---");
    let _ = write!(out, "<br>BTC Price: ${}", usd(snapshot.price));
    let _ = write!(out, "<br>Target: ${}", usd(snapshot.target_price));
    let _ = write!(out, "<br>Buy back: ${}", usd(snapshot.buy_back_price));
    let _ = write!(
        out,
        "<br>Sell confidence: {}%",
        fixed(snapshot.sell_confidence, 2)
    );

    if let (Some(open), Some(diff)) = (&snapshot.open_buy_back, figures.open_price_diff) {
        out.push_str("<br><br>--- Open buy back ---");
        let _ = write!(
            out,
            "<br>Amount: {} BTC @ ${}",
            btc(open.amount),
            usd(open.price)
        );
        let _ = write!(
            out,
            "<br>Difference: ${} ({}%)",
            usd(diff),
            fixed(open.percentage, 2)
        );
    }

    out
}

fn format_load_time(average: Option<f64>) -> String {
    match average {
        Some(secs) => format!("{secs:.4}s"),
        None => "n/a".to_string(),
    }
}

fn format_uptime(uptime: Duration) -> String {
    let total = uptime.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
}

/// Builds the status page and keeps the rolling average of its own load time.
pub struct StatusAssembler {
    agent: Arc<dyn Agent>,
    shell: PageShell,
    started_at: DateTime<Utc>,
    load_times: Mutex<RollingMetric>,
}

impl StatusAssembler {
    pub fn new(agent: Arc<dyn Agent>, shell: PageShell) -> Self {
        Self {
            agent,
            shell,
            started_at: Utc::now(),
            load_times: Mutex::new(RollingMetric::default()),
        }
    }

    pub fn shell(&self) -> &PageShell {
        &self.shell
    }

    /// Render the full status page.
    ///
    /// A telemetry failure aborts the render; nothing partial is returned and
    /// no load time is recorded.
    pub fn render(&self) -> AgentResult<String> {
        let started = Instant::now();

        let snapshot = self.agent.snapshot()?;
        let figures = Figures::derive(&snapshot)?;
        let mut body = render_report(&snapshot, &figures);

        let elapsed = started.elapsed().as_secs_f64();
        let average = self.record_load_time(elapsed);

        let _ = write!(
            body,
            "<g><br><br>Avg load time: {}<br>Uptime: {}</g>",
            format_load_time(average),
            format_uptime(Utc::now() - self.started_at)
        );

        Ok(self.shell.wrap(&body))
    }

    /// Push one sample and read the average under the same lock.
    fn record_load_time(&self, secs: f64) -> Option<f64> {
        let mut load_times = self
            .load_times
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        load_times.push(secs);
        load_times.average()
    }
}
