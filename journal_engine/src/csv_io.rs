/// csv_io.rs — Trade import/export in CSV format
///
/// Headered layout:
///   symbol,entry_price,exit_price,size,entry_time,exit_time,fees,is_short,profit,notes
/// Timestamps are RFC 3339. A blank `profit` column derives the value from
/// the prices; a blank `notes` column means no note. Rows that fail to parse
/// are skipped with a warning rather than aborting the whole import.
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{Reader, StringRecord, Writer};
use tracing::warn;
use uuid::Uuid;

use crate::models::{Trade, TradeDraft};

pub const CSV_HEADER: [&str; 10] = [
    "symbol",
    "entry_price",
    "exit_price",
    "size",
    "entry_time",
    "exit_time",
    "fees",
    "is_short",
    "profit",
    "notes",
];

/// Read trades from a CSV file, assigning them to `dashboard_id` when given.
pub fn import_trades(
    path: &Path,
    dashboard_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Vec<Trade>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = Reader::from_reader(file);
    let mut trades = Vec::new();

    for (line, result) in reader.records().enumerate() {
        // A ragged row (wrong field count) surfaces as an Err from the
        // records iterator; treat it like any other unparseable row.
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line + 2, error = %e, "skipping malformed CSV row");
                continue;
            }
        };
        match parse_record(&record, dashboard_id, now) {
            Ok(trade) => trades.push(trade),
            Err(e) => warn!(line = line + 2, error = %e, "skipping unparseable CSV row"),
        }
    }
    Ok(trades)
}

fn parse_record(
    record: &StringRecord,
    dashboard_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Trade> {
    if record.len() < 8 {
        anyhow::bail!("expected at least 8 columns, got {}", record.len());
    }

    let entry_time: DateTime<Utc> = record[4].parse().context("entry_time")?;
    let exit_time: DateTime<Utc> = record[5].parse().context("exit_time")?;
    let profit = match record.get(8).map(str::trim) {
        Some("") | None => None,
        Some(raw) => Some(raw.parse::<f64>().context("profit")?),
    };
    let notes = match record.get(9).map(str::trim) {
        Some("") | None => None,
        Some(raw) => Some(raw.to_owned()),
    };

    Ok(TradeDraft {
        symbol: record[0].trim().to_owned(),
        entry_price: record[1].trim().parse().context("entry_price")?,
        exit_price: record[2].trim().parse().context("exit_price")?,
        size: record[3].trim().parse().context("size")?,
        entry_time: Some(entry_time),
        exit_time: Some(exit_time),
        fees: record[6].trim().parse().context("fees")?,
        is_short: record[7].trim().parse().context("is_short")?,
        profit,
        notes,
        journal_entry: None,
        dashboard_id,
    }
    .build(now))
}

/// Write trades to a CSV file with the standard header.
pub fn export_trades(path: &Path, trades: &[Trade]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(CSV_HEADER)?;

    for trade in trades {
        writer.write_record([
            trade.symbol.clone(),
            trade.entry_price.to_string(),
            trade.exit_price.to_string(),
            trade.size.to_string(),
            trade.entry_time.to_rfc3339(),
            trade.exit_time.to_rfc3339(),
            trade.fees.to_string(),
            trade.is_short.to_string(),
            trade.profit.to_string(),
            trade.notes.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeDraft;
    use chrono::TimeZone;
    use std::io::Write as _;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn roundtrip_preserves_trades() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        let trades = vec![
            TradeDraft {
                symbol: "AAPL".into(),
                entry_price: 100.0,
                exit_price: 110.0,
                size: 3.0,
                entry_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
                exit_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap()),
                fees: 2.0,
                notes: Some("breakout".into()),
                ..Default::default()
            }
            .build(now()),
            TradeDraft {
                symbol: "TSLA".into(),
                entry_price: 200.0,
                exit_price: 190.0,
                size: 1.0,
                entry_time: Some(Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap()),
                exit_time: Some(Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap()),
                is_short: true,
                ..Default::default()
            }
            .build(now()),
        ];

        export_trades(&path, &trades).unwrap();
        let imported = import_trades(&path, None, now()).unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].symbol, "AAPL");
        assert_eq!(imported[0].profit, trades[0].profit);
        assert_eq!(imported[0].notes.as_deref(), Some("breakout"));
        assert!(imported[1].is_short);
        // Short: (200 - 190) * 1 - 0
        assert_eq!(imported[1].profit, 10.0);
    }

    #[test]
    fn blank_profit_column_derives_from_prices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", CSV_HEADER.join(",")).unwrap();
        writeln!(
            file,
            "NQ,100,105,2,2024-03-01T09:30:00Z,2024-03-01T10:00:00Z,1.5,false,,"
        )
        .unwrap();

        let imported = import_trades(&path, None, now()).unwrap();
        assert_eq!(imported.len(), 1);
        // (105 - 100) * 2 - 1.5
        assert_eq!(imported[0].profit, 8.5);
    }

    #[test]
    fn bad_rows_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", CSV_HEADER.join(",")).unwrap();
        writeln!(
            file,
            "ES,100,101,1,2024-03-01T09:30:00Z,2024-03-01T10:00:00Z,0,false,50,"
        )
        .unwrap();
        writeln!(
            file,
            "ES,not-a-price,101,1,2024-03-01T09:30:00Z,2024-03-01T10:00:00Z,0,false,50,"
        )
        .unwrap();
        // Ragged row: wrong field count entirely
        writeln!(file, "ES,100,101,1").unwrap();
        writeln!(
            file,
            "NQ,100,101,1,2024-03-02T09:30:00Z,2024-03-02T10:00:00Z,0,false,25,"
        )
        .unwrap();

        let imported = import_trades(&path, None, now()).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].profit, 50.0);
        // The good row after the ragged one still imports
        assert_eq!(imported[1].profit, 25.0);
    }

    #[test]
    fn importer_tags_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", CSV_HEADER.join(",")).unwrap();
        writeln!(
            file,
            "CL,70,71,1,2024-03-01T09:30:00Z,2024-03-01T10:00:00Z,0,false,,"
        )
        .unwrap();

        let dashboard_id = Uuid::new_v4();
        let imported = import_trades(&path, Some(dashboard_id), now()).unwrap();
        assert_eq!(imported[0].dashboard_id, Some(dashboard_id));
    }
}
