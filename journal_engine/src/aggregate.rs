/// aggregate.rs — Trade statistics
///
/// ─────────────────────────────────────────────────────────────────────────
/// MATHEMATICAL SPECIFICATION
/// ─────────────────────────────────────────────────────────────────────────
///
/// TOTAL PROFIT
///   P_total = Σ profit_i            (0 for the empty set)
///
/// BEST / WORST DAY
///   Group trades by the UTC calendar day of exit_time, sum profit per day:
///   best  = max_d(Σ_{i ∈ d} profit_i)
///   worst = min_d(Σ_{i ∈ d} profit_i)
///   Both 0 when there are no trades.
///
/// WIN RATE
///   W = count(profit_i > 0) / N × 100        (0 when N = 0)
///
/// RISK / REWARD RATIO
///   R:R = mean(profit | profit > 0) / |mean(profit | profit < 0)|
///   0 when there are no losers (division guard) and 0 when there are no
///   winners.
///
/// CUMULATIVE SERIES
///   Sort by exit_time ascending; emit a zero anchor one day before the first
///   exit, then one running-total point per trade. Fewer than two points get
///   a final point at `now` carrying the last total, so a chart always has at
///   least two points.
/// ─────────────────────────────────────────────────────────────────────────
///
/// Every function here is pure and total: defined for the empty set via the
/// zero defaults above, deterministic in `(trades, time_frame, now)`.
use ahash::AHashMap;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::models::{TimeFrame, Trade, TradePoint};

/// Keep trades whose `exit_time` falls inside the calendar period containing
/// `now`, for the given granularity. Periods are UTC; weeks are ISO-8601
/// (Monday start). `All` keeps everything.
pub fn filter_by_time_frame(
    trades: &[Trade],
    time_frame: TimeFrame,
    now: DateTime<Utc>,
) -> Vec<Trade> {
    trades
        .iter()
        .filter(|t| in_time_frame(t.exit_time, time_frame, now))
        .cloned()
        .collect()
}

fn in_time_frame(at: DateTime<Utc>, time_frame: TimeFrame, now: DateTime<Utc>) -> bool {
    match time_frame {
        TimeFrame::Day => at.date_naive() == now.date_naive(),
        TimeFrame::Week => at.iso_week() == now.iso_week(),
        TimeFrame::Month => at.year() == now.year() && at.month() == now.month(),
        TimeFrame::Year => at.year() == now.year(),
        TimeFrame::All => true,
    }
}

/// Sum of realised profit; 0 for an empty set. Order independent.
pub fn total_profit(trades: &[Trade]) -> f64 {
    trades.iter().map(|t| t.profit).sum()
}

/// Per-day profit sums keyed by the UTC calendar day of `exit_time`.
pub fn profit_by_day(trades: &[Trade]) -> AHashMap<NaiveDate, f64> {
    let mut days: AHashMap<NaiveDate, f64> = AHashMap::new();
    for trade in trades {
        *days.entry(trade.exit_time.date_naive()).or_insert(0.0) += trade.profit;
    }
    days
}

/// Largest per-day profit sum; 0 when there are no trades.
pub fn best_day(trades: &[Trade]) -> f64 {
    profit_by_day(trades)
        .values()
        .copied()
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// Smallest per-day profit sum; 0 when there are no trades.
pub fn worst_day(trades: &[Trade]) -> f64 {
    profit_by_day(trades)
        .values()
        .copied()
        .reduce(f64::min)
        .unwrap_or(0.0)
}

/// Percentage of trades with positive profit; 0 for an empty set.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64 * 100.0
}

/// Average winning profit over the magnitude of the average losing profit.
/// 0 when there are no losers, and 0 when there are no winners either.
pub fn risk_reward_ratio(trades: &[Trade]) -> f64 {
    let winners: Vec<f64> = trades.iter().map(|t| t.profit).filter(|&p| p > 0.0).collect();
    let losers: Vec<f64> = trades.iter().map(|t| t.profit).filter(|&p| p < 0.0).collect();

    let avg_win = match mean(&winners) {
        Some(m) => m,
        None => return 0.0,
    };
    let avg_loss = match mean(&losers) {
        Some(m) => m.abs(),
        None => return 0.0,
    };
    avg_win / avg_loss
}

/// Cumulative-profit chart series.
///
/// `placeholder` marks the fixed illustrative series returned for an empty
/// trade set, so the presentation layer can label it as an empty state
/// instead of real data.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeSeries {
    pub points: Vec<TradePoint>,
    pub placeholder: bool,
}

impl CumulativeSeries {
    pub fn last_profit(&self) -> f64 {
        self.points.last().map(|p| p.profit).unwrap_or(0.0)
    }
}

/// Running cumulative profit over the trades, ordered by `exit_time`.
pub fn cumulative_series(trades: &[Trade], now: DateTime<Utc>) -> CumulativeSeries {
    if trades.is_empty() {
        // Illustrative upward ramp so an empty journal still renders a chart.
        let points = (0..7)
            .map(|i| TradePoint {
                timestamp: now + Duration::days(i),
                profit: i as f64 * 50.0,
            })
            .collect();
        return CumulativeSeries { points, placeholder: true };
    }

    let mut sorted: Vec<&Trade> = trades.iter().collect();
    sorted.sort_by_key(|t| t.exit_time);

    let mut points = Vec::with_capacity(sorted.len() + 2);
    points.push(TradePoint {
        timestamp: sorted[0].exit_time - Duration::days(1),
        profit: 0.0,
    });

    let mut running = 0.0;
    for trade in &sorted {
        running += trade.profit;
        points.push(TradePoint {
            timestamp: trade.exit_time,
            profit: running,
        });
    }

    if points.len() < 2 {
        points.push(TradePoint { timestamp: now, profit: running });
    }

    CumulativeSeries { points, placeholder: false }
}

/// Dashboard stat summary for one time frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub time_frame: TimeFrame,
    pub n_trades: usize,
    pub total_profit: f64,
    pub best_day: f64,
    pub worst_day: f64,
    pub win_rate: f64,
    pub risk_reward: f64,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "════════════════════════════════════════════")?;
        writeln!(f, "  TRADEVAULT — JOURNAL SUMMARY ({})", self.time_frame)?;
        writeln!(f, "════════════════════════════════════════════")?;
        writeln!(f, "  Trades       : {}", self.n_trades)?;
        writeln!(f, "  Total Profit : ${:.2}", self.total_profit)?;
        writeln!(f, "  Best Day     : ${:.2}", self.best_day)?;
        writeln!(f, "  Worst Day    : ${:.2}", self.worst_day)?;
        writeln!(f, "  Win Rate     : {:.1}%", self.win_rate)?;
        writeln!(f, "  R:R          : {:.2}", self.risk_reward)?;
        writeln!(f, "════════════════════════════════════════════")
    }
}

/// Filter by time frame and compute every stat in one pass over the subset.
pub fn summarize(trades: &[Trade], time_frame: TimeFrame, now: DateTime<Utc>) -> Summary {
    let subset = filter_by_time_frame(trades, time_frame, now);
    Summary {
        time_frame,
        n_trades: subset.len(),
        total_profit: total_profit(&subset),
        best_day: best_day(&subset),
        worst_day: worst_day(&subset),
        win_rate: win_rate(&subset),
        risk_reward: risk_reward_ratio(&subset),
    }
}

fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}
