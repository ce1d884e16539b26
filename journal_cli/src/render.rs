/// render.rs — Terminal rendering of journal output
///
/// Text versions of the app's dashboard widgets: signed money amounts, the
/// trade listing rows, and the month calendar with per-day profit markers.
use ahash::AHashMap;
use chrono::{Datelike, NaiveDate};

use journal_engine::Trade;

const DAYS_OF_WEEK: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// `+$120.50` / `-$30.00` with the configured currency symbol.
pub fn money(amount: f64, currency: &str) -> String {
    if amount < 0.0 {
        format!("-{currency}{:.2}", amount.abs())
    } else {
        format!("+{currency}{:.2}", amount)
    }
}

/// One listing line per trade: exit date, symbol, direction, size, profit.
pub fn trade_row(trade: &Trade, currency: &str) -> String {
    let direction = if trade.is_short { "SHORT" } else { "LONG" };
    let mut row = format!(
        "{}  {:<10} {:<5} {:>10.2} @ {:>10.2} -> {:>10.2}  {}",
        trade.exit_time.format("%Y-%m-%d %H:%M"),
        trade.symbol,
        direction,
        trade.size,
        trade.entry_price,
        trade.exit_price,
        money(trade.profit, currency),
    );
    if let Some(notes) = &trade.notes {
        row.push_str(&format!("  ({notes})"));
    }
    row
}

/// Month calendar: day numbers with a `+`/`-` marker on days that traded.
pub fn calendar(
    year: i32,
    month: u32,
    grid: &[[Option<NaiveDate>; 7]],
    daily_profits: &AHashMap<NaiveDate, f64>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:^35}\n", month_title(year, month)));
    for label in DAYS_OF_WEEK {
        out.push_str(&format!("{label:>4} "));
    }
    out.push('\n');

    for week in grid {
        for cell in week {
            match cell {
                Some(date) => {
                    let marker = match daily_profits.get(date) {
                        Some(p) if *p > 0.0 => '+',
                        Some(p) if *p < 0.0 => '-',
                        _ => ' ',
                    };
                    out.push_str(&format!("{:>3}{} ", date.day(), marker));
                }
                None => out.push_str("     "),
            }
        }
        out.push('\n');
    }
    out
}

fn month_title(year: i32, month: u32) -> String {
    let name = match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "?",
    };
    format!("{name} {year}")
}
