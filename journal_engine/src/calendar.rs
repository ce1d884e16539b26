/// calendar.rs — Monthly journal bucketing
///
/// Backs the journal's month view: per-day profit dots on a calendar grid
/// plus the month's trade list. The grid is laid out Sunday-first with
/// `None` padding before the first and after the last day of the month, one
/// row per week.
use ahash::AHashMap;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::models::Trade;

/// Trades whose `exit_time` falls in the given UTC month, newest exit first.
pub fn trades_in_month(trades: &[Trade], year: i32, month: u32) -> Vec<Trade> {
    let mut subset: Vec<Trade> = trades
        .iter()
        .filter(|t| t.exit_time.year() == year && t.exit_time.month() == month)
        .cloned()
        .collect();
    subset.sort_by_key(|t| std::cmp::Reverse(t.exit_time));
    subset
}

/// Per-day profit sums for the month, keyed by UTC calendar day. Days with
/// no trades are absent from the map.
pub fn daily_profits(trades: &[Trade], year: i32, month: u32) -> AHashMap<NaiveDate, f64> {
    let mut days: AHashMap<NaiveDate, f64> = AHashMap::new();
    for trade in trades {
        if trade.exit_time.year() == year && trade.exit_time.month() == month {
            *days.entry(trade.exit_time.date_naive()).or_insert(0.0) += trade.profit;
        }
    }
    days
}

/// The month as Sunday-first week rows. Cells outside the month are `None`.
pub fn month_grid(year: i32, month: u32) -> Vec<[Option<NaiveDate>; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let mut weeks = Vec::new();
    let mut current: [Option<NaiveDate>; 7] = [None; 7];
    let mut day = first;
    while day.month() == month {
        let slot = day.weekday().num_days_from_sunday() as usize;
        current[slot] = Some(day);
        if day.weekday() == Weekday::Sat {
            weeks.push(current);
            current = [None; 7];
        }
        day += Duration::days(1);
    }
    if current.iter().any(Option::is_some) {
        weeks.push(current);
    }
    weeks
}

/// Year/month of a reference instant, the default journal page.
pub fn year_month(at: DateTime<Utc>) -> (i32, u32) {
    (at.year(), at.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn trade(exit: DateTime<Utc>, profit: f64) -> Trade {
        Trade {
            id: Uuid::new_v4(),
            symbol: "ES".into(),
            entry_price: 0.0,
            exit_price: 0.0,
            size: 1.0,
            entry_time: exit,
            exit_time: exit,
            fees: 0.0,
            is_short: false,
            profit,
            notes: None,
            journal_entry: None,
            dashboard_id: None,
        }
    }

    #[test]
    fn daily_profits_sums_per_day_within_month() {
        let trades = vec![
            trade(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(), 100.0),
            trade(Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap(), -30.0),
            trade(Utc.with_ymd_and_hms(2024, 3, 2, 11, 0, 0).unwrap(), 50.0),
            trade(Utc.with_ymd_and_hms(2024, 4, 2, 11, 0, 0).unwrap(), 999.0),
        ];
        let profits = daily_profits(&trades, 2024, 3);
        assert_eq!(profits.len(), 2);
        assert_eq!(profits[&NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()], 70.0);
        assert_eq!(profits[&NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()], 50.0);
    }

    #[test]
    fn trades_in_month_sorted_newest_first() {
        let older = trade(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(), 1.0);
        let newer = trade(Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap(), 2.0);
        let listing = trades_in_month(&[older.clone(), newer.clone()], 2024, 3);
        assert_eq!(listing[0].id, newer.id);
        assert_eq!(listing[1].id, older.id);
    }

    #[test]
    fn march_2024_grid_shape() {
        // 2024-03-01 is a Friday; 31 days ⇒ 6 week rows
        let grid = month_grid(2024, 3);
        assert_eq!(grid.len(), 6);
        // Leading padding: Sun..Thu empty in the first row
        assert!(grid[0][..5].iter().all(Option::is_none));
        assert_eq!(grid[0][5], NaiveDate::from_ymd_opt(2024, 3, 1));
        // Last day lands on a Sunday in the final row
        assert_eq!(grid[5][0], NaiveDate::from_ymd_opt(2024, 3, 31));
        assert!(grid[5][1..].iter().all(Option::is_none));
        // Every day of the month appears exactly once
        let count = grid.iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(count, 31);
    }

    #[test]
    fn grid_rejects_invalid_month() {
        assert!(month_grid(2024, 13).is_empty());
    }
}
