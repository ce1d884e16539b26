/// main.rs — TradeVault CLI entry point
///
/// Command-line front-end over the journal engine: manage dashboards and
/// trades in the persisted store, print stat summaries, export the
/// cumulative-profit series, and render the monthly journal calendar.
///
/// Usage:
///   cargo run --bin journal -- dashboard new "Futures"
///   cargo run --bin journal -- trade add --symbol NQ --entry-price 100 --exit-price 105 --size 2
///   cargo run --bin journal -- stats --timeframe week
///   cargo run --bin journal -- --help
mod render;

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use journal_engine::aggregate;
use journal_engine::calendar;
use journal_engine::config::AppConfig;
use journal_engine::csv_io;
use journal_engine::store::JournalStore;
use journal_engine::{Dashboard, TimeFrame, Trade, TradeDraft};

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "TradeVault - trading journal over a local persisted store")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage dashboards (named trade groupings)
    Dashboard {
        #[command(subcommand)]
        action: DashboardAction,
    },

    /// Manage trades
    Trade {
        #[command(subcommand)]
        action: TradeAction,
    },

    /// Print the stat summary for a time frame
    Stats {
        /// Restrict to one dashboard
        #[arg(short, long)]
        dashboard: Option<Uuid>,

        /// day | week | month | year | all (default from config)
        #[arg(short, long)]
        timeframe: Option<TimeFrame>,
    },

    /// Export the cumulative-profit series as JSON
    Series {
        /// Restrict to one dashboard
        #[arg(short, long)]
        dashboard: Option<Uuid>,

        /// day | week | month | year | all (default from config)
        #[arg(short, long)]
        timeframe: Option<TimeFrame>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Render the monthly journal calendar and listing
    Journal {
        /// Restrict to one dashboard
        #[arg(short, long)]
        dashboard: Option<Uuid>,

        /// Month to show as YYYY-MM (default: the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Import trades from a CSV file
    Import {
        /// CSV file path
        file: PathBuf,

        /// Assign imported trades to this dashboard
        #[arg(short, long)]
        dashboard: Option<Uuid>,
    },

    /// Export trades to a CSV file
    Export {
        /// CSV file path
        file: PathBuf,

        /// Restrict to one dashboard
        #[arg(short, long)]
        dashboard: Option<Uuid>,
    },
}

#[derive(Subcommand)]
enum DashboardAction {
    /// Create a dashboard
    New { name: String },
    /// List dashboards
    List,
    /// Rename a dashboard
    Rename { id: Uuid, name: String },
    /// Delete a dashboard and its trades
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum TradeAction {
    /// Record a trade
    Add {
        #[arg(long)]
        symbol: String,

        #[arg(long, default_value_t = 0.0)]
        entry_price: f64,

        #[arg(long, default_value_t = 0.0)]
        exit_price: f64,

        #[arg(long, default_value_t = 1.0)]
        size: f64,

        /// RFC 3339, defaults to now
        #[arg(long)]
        entry_time: Option<DateTime<Utc>>,

        /// RFC 3339, defaults to entry time
        #[arg(long)]
        exit_time: Option<DateTime<Utc>>,

        #[arg(long, default_value_t = 0.0)]
        fees: f64,

        /// Mark the trade as a short
        #[arg(long)]
        short: bool,

        /// Realised profit; derived from the prices when omitted
        #[arg(long)]
        profit: Option<f64>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        journal: Option<String>,

        #[arg(long)]
        dashboard: Option<Uuid>,
    },
    /// List trades, newest exit first
    List {
        #[arg(short, long)]
        dashboard: Option<Uuid>,
    },
    /// Delete a trade
    Delete { id: Uuid },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;
    let mut store = JournalStore::open(&config.store_path)?;
    let now = Utc::now();

    match cli.command {
        Commands::Dashboard { action } => run_dashboard(&mut store, action, now),
        Commands::Trade { action } => run_trade(&mut store, &config, action, now),
        Commands::Stats { dashboard, timeframe } => {
            let trades = select_trades(&store, dashboard)?;
            let tf = timeframe.unwrap_or(config.default_time_frame);
            print!("{}", aggregate::summarize(&trades, tf, now));
            Ok(())
        }
        Commands::Series { dashboard, timeframe, out } => {
            run_series(&store, &config, dashboard, timeframe, out, now)
        }
        Commands::Journal { dashboard, month } => {
            run_journal(&store, &config, dashboard, month, now)
        }
        Commands::Import { file, dashboard } => {
            if let Some(id) = dashboard {
                store.dashboard(id)?;
            }
            let trades = csv_io::import_trades(&file, dashboard, now)?;
            let count = trades.len();
            for trade in trades {
                store.insert_trade(trade)?;
            }
            info!(count, file = %file.display(), "trades imported");
            println!("Imported {count} trades");
            Ok(())
        }
        Commands::Export { file, dashboard } => {
            let trades = select_trades(&store, dashboard)?;
            csv_io::export_trades(&file, &trades)?;
            println!("Exported {} trades to {}", trades.len(), file.display());
            Ok(())
        }
    }
}

fn run_dashboard(store: &mut JournalStore, action: DashboardAction, now: DateTime<Utc>) -> Result<()> {
    match action {
        DashboardAction::New { name } => {
            let dashboard = Dashboard::new(name, now);
            println!("{}  {}", dashboard.id, dashboard.name);
            store.insert_dashboard(dashboard)?;
        }
        DashboardAction::List => {
            for dashboard in store.dashboards() {
                let n_trades = store.trades_for(dashboard.id).len();
                println!(
                    "{}  {:<20} {} trades (created {})",
                    dashboard.id,
                    dashboard.name,
                    n_trades,
                    dashboard.created_at.format("%Y-%m-%d"),
                );
            }
        }
        DashboardAction::Rename { id, name } => {
            store.rename_dashboard(id, name)?;
            println!("Renamed {id}");
        }
        DashboardAction::Delete { id } => {
            let cascaded = store.delete_dashboard(id)?;
            println!("Deleted dashboard {id} and {cascaded} trades");
        }
    }
    Ok(())
}

fn run_trade(
    store: &mut JournalStore,
    config: &AppConfig,
    action: TradeAction,
    now: DateTime<Utc>,
) -> Result<()> {
    match action {
        TradeAction::Add {
            symbol,
            entry_price,
            exit_price,
            size,
            entry_time,
            exit_time,
            fees,
            short,
            profit,
            notes,
            journal,
            dashboard,
        } => {
            let trade = TradeDraft {
                symbol,
                entry_price,
                exit_price,
                size,
                entry_time,
                exit_time,
                fees,
                is_short: short,
                profit,
                notes,
                journal_entry: journal,
                dashboard_id: dashboard,
            }
            .build(now);
            println!("{}  {}", trade.id, render::trade_row(&trade, &config.currency));
            store.insert_trade(trade)?;
        }
        TradeAction::List { dashboard } => {
            let mut trades = select_trades(store, dashboard)?;
            trades.sort_by_key(|t| std::cmp::Reverse(t.exit_time));
            for trade in &trades {
                println!("{}  {}", trade.id, render::trade_row(trade, &config.currency));
            }
        }
        TradeAction::Delete { id } => {
            store.delete_trade(id)?;
            println!("Deleted trade {id}");
        }
    }
    Ok(())
}

fn run_series(
    store: &JournalStore,
    config: &AppConfig,
    dashboard: Option<Uuid>,
    timeframe: Option<TimeFrame>,
    out: Option<PathBuf>,
    now: DateTime<Utc>,
) -> Result<()> {
    let trades = select_trades(store, dashboard)?;
    let tf = timeframe.unwrap_or(config.default_time_frame);
    let subset = aggregate::filter_by_time_frame(&trades, tf, now);
    let series = aggregate::cumulative_series(&subset, now);
    if series.placeholder {
        info!("no trades in range; emitting placeholder series");
    }

    let payload = serde_json::json!({
        "timeframe": tf,
        "placeholder": series.placeholder,
        "points": series.points,
    });
    let raw = serde_json::to_string_pretty(&payload)?;
    match out {
        Some(path) => {
            fs::write(&path, raw).with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote series to {}", path.display());
        }
        None => println!("{raw}"),
    }
    Ok(())
}

fn run_journal(
    store: &JournalStore,
    config: &AppConfig,
    dashboard: Option<Uuid>,
    month: Option<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    let (year, month) = match month {
        Some(raw) => parse_year_month(&raw)?,
        None => calendar::year_month(now),
    };
    let trades = select_trades(store, dashboard)?;

    let grid = calendar::month_grid(year, month);
    let profits = calendar::daily_profits(&trades, year, month);
    print!("{}", render::calendar(year, month, &grid, &profits));

    let listing = calendar::trades_in_month(&trades, year, month);
    let month_total: f64 = listing.iter().map(|t| t.profit).sum();
    println!();
    for trade in &listing {
        println!("{}", render::trade_row(trade, &config.currency));
    }
    println!(
        "\n{} trades, {}",
        listing.len(),
        render::money(month_total, &config.currency)
    );
    Ok(())
}

/// All trades, or one dashboard's trades after checking the id exists.
fn select_trades(store: &JournalStore, dashboard: Option<Uuid>) -> Result<Vec<Trade>> {
    match dashboard {
        Some(id) => {
            store.dashboard(id)?;
            Ok(store.trades_for(id))
        }
        None => Ok(store.trades().to_vec()),
    }
}

fn parse_year_month(raw: &str) -> Result<(i32, u32)> {
    let (y, m) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("expected YYYY-MM, got '{raw}'"))?;
    let year: i32 = y.parse().with_context(|| format!("bad year in '{raw}'"))?;
    let month: u32 = m.parse().with_context(|| format!("bad month in '{raw}'"))?;
    if !(1..=12).contains(&month) {
        return Err(anyhow!("month out of range in '{raw}'"));
    }
    Ok((year, month))
}
