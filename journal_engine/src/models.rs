/// models.rs — Journal record types
///
/// A `Trade` is one buy/sell round-trip with a realised profit. Trades belong
/// to at most one `Dashboard` (an "account" grouping) via `dashboard_id`;
/// unassigned trades are allowed. `TimeFrame` selects the calendar window the
/// aggregator filters on before computing stats.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub id: Uuid,
    pub symbol: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub fees: f64,
    pub is_short: bool,
    /// Realised profit after fees, signed. Supplied directly or derived via
    /// [`Trade::net_profit`].
    pub profit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_entry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_id: Option<Uuid>,
}

impl Trade {
    /// Profit after fees for a round-trip. Shorts gain when price falls.
    pub fn net_profit(
        entry_price: f64,
        exit_price: f64,
        size: f64,
        fees: f64,
        is_short: bool,
    ) -> f64 {
        if is_short {
            (entry_price - exit_price) * size - fees
        } else {
            (exit_price - entry_price) * size - fees
        }
    }

    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }
}

/// Builder used by the CLI and CSV importer, where most fields arrive as
/// optional flags/columns.
#[derive(Debug, Clone, Default)]
pub struct TradeDraft {
    pub symbol: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,
    pub fees: f64,
    pub is_short: bool,
    /// When `None`, profit is derived from the prices.
    pub profit: Option<f64>,
    pub notes: Option<String>,
    pub journal_entry: Option<String>,
    pub dashboard_id: Option<Uuid>,
}

impl TradeDraft {
    pub fn build(self, now: DateTime<Utc>) -> Trade {
        let entry_time = self.entry_time.unwrap_or(now);
        let exit_time = self.exit_time.unwrap_or(entry_time);
        let profit = self.profit.unwrap_or_else(|| {
            Trade::net_profit(
                self.entry_price,
                self.exit_price,
                self.size,
                self.fees,
                self.is_short,
            )
        });
        Trade {
            id: Uuid::new_v4(),
            symbol: self.symbol,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            size: self.size,
            entry_time,
            exit_time,
            fees: self.fees,
            is_short: self.is_short,
            profit,
            notes: self.notes,
            journal_entry: self.journal_entry,
            dashboard_id: self.dashboard_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Dashboard {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
        }
    }
}

/// Calendar granularity for stat filtering. `All` disables filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Day => "day",
            TimeFrame::Week => "week",
            TimeFrame::Month => "month",
            TimeFrame::Year => "year",
            TimeFrame::All => "all",
        }
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(TimeFrame::Day),
            "week" => Ok(TimeFrame::Week),
            "month" => Ok(TimeFrame::Month),
            "year" => Ok(TimeFrame::Year),
            "all" => Ok(TimeFrame::All),
            other => Err(format!("unknown timeframe '{other}' (day|week|month|year|all)")),
        }
    }
}

/// One point on the cumulative-profit chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TradePoint {
    pub timestamp: DateTime<Utc>,
    pub profit: f64,
}
