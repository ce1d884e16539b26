/// store.rs — Persisted journal store
///
/// Single-writer JSON file holding every dashboard and trade. The whole
/// document is loaded on open and rewritten after each mutation; writes go
/// through a temp file in the same directory followed by a rename, so a
/// crash mid-write never leaves a torn store behind.
///
/// Cascade rule: deleting a dashboard deletes its trades. The aggregator
/// only ever consumes query results; it never writes.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Dashboard, Trade};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("store is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("no dashboard with id {0}")]
    UnknownDashboard(Uuid),
    #[error("no trade with id {0}")]
    UnknownTrade(Uuid),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// On-disk document. Trades reference dashboards by id rather than nesting
/// under them, which keeps unassigned trades representable.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    dashboards: Vec<Dashboard>,
    trades: Vec<Trade>,
}

#[derive(Debug)]
pub struct JournalStore {
    path: PathBuf,
    doc: Document,
}

impl JournalStore {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist yet.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "creating new journal store");
                Document::default()
            }
            Err(e) => return Err(e.into()),
        };
        debug!(
            path = %path.display(),
            dashboards = doc.dashboards.len(),
            trades = doc.trades.len(),
            "journal store opened"
        );
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ── Dashboards ────────────────────────────────────────────────────────

    pub fn dashboards(&self) -> &[Dashboard] {
        &self.doc.dashboards
    }

    pub fn dashboard(&self, id: Uuid) -> StoreResult<&Dashboard> {
        self.doc
            .dashboards
            .iter()
            .find(|d| d.id == id)
            .ok_or(StoreError::UnknownDashboard(id))
    }

    pub fn insert_dashboard(&mut self, dashboard: Dashboard) -> StoreResult<()> {
        self.doc.dashboards.push(dashboard);
        self.persist()
    }

    pub fn rename_dashboard(&mut self, id: Uuid, name: impl Into<String>) -> StoreResult<()> {
        let dashboard = self
            .doc
            .dashboards
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::UnknownDashboard(id))?;
        dashboard.name = name.into();
        self.persist()
    }

    /// Delete a dashboard and every trade assigned to it.
    pub fn delete_dashboard(&mut self, id: Uuid) -> StoreResult<usize> {
        let before = self.doc.dashboards.len();
        self.doc.dashboards.retain(|d| d.id != id);
        if self.doc.dashboards.len() == before {
            return Err(StoreError::UnknownDashboard(id));
        }
        let trades_before = self.doc.trades.len();
        self.doc.trades.retain(|t| t.dashboard_id != Some(id));
        let cascaded = trades_before - self.doc.trades.len();
        info!(%id, cascaded, "dashboard deleted");
        self.persist()?;
        Ok(cascaded)
    }

    // ── Trades ────────────────────────────────────────────────────────────

    pub fn trades(&self) -> &[Trade] {
        &self.doc.trades
    }

    /// Trades assigned to one dashboard.
    pub fn trades_for(&self, dashboard_id: Uuid) -> Vec<Trade> {
        self.doc
            .trades
            .iter()
            .filter(|t| t.dashboard_id == Some(dashboard_id))
            .cloned()
            .collect()
    }

    /// All trades ordered by `exit_time`.
    pub fn trades_sorted_by_exit(&self, descending: bool) -> Vec<Trade> {
        let mut trades = self.doc.trades.clone();
        trades.sort_by_key(|t| t.exit_time);
        if descending {
            trades.reverse();
        }
        trades
    }

    pub fn insert_trade(&mut self, trade: Trade) -> StoreResult<()> {
        // Reject dangling dashboard references up front
        if let Some(dashboard_id) = trade.dashboard_id {
            self.dashboard(dashboard_id)?;
        }
        self.doc.trades.push(trade);
        self.persist()
    }

    pub fn update_trade(&mut self, trade: Trade) -> StoreResult<()> {
        let slot = self
            .doc
            .trades
            .iter_mut()
            .find(|t| t.id == trade.id)
            .ok_or(StoreError::UnknownTrade(trade.id))?;
        *slot = trade;
        self.persist()
    }

    pub fn delete_trade(&mut self, id: Uuid) -> StoreResult<()> {
        let before = self.doc.trades.len();
        self.doc.trades.retain(|t| t.id != id);
        if self.doc.trades.len() == before {
            return Err(StoreError::UnknownTrade(id));
        }
        self.persist()
    }

    // ── Persistence ───────────────────────────────────────────────────────

    fn persist(&self) -> StoreResult<()> {
        let raw = serde_json::to_string_pretty(&self.doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeDraft;
    use chrono::{TimeZone, Utc};

    fn temp_store() -> (tempfile::TempDir, JournalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JournalStore::open(dir.path().join("journal.json")).unwrap();
        (dir, store)
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn roundtrip_through_reopen() {
        let (dir, mut store) = temp_store();
        let dashboard = Dashboard::new("Futures", now());
        let dashboard_id = dashboard.id;
        store.insert_dashboard(dashboard).unwrap();
        store
            .insert_trade(
                TradeDraft {
                    symbol: "NQ".into(),
                    profit: Some(250.0),
                    dashboard_id: Some(dashboard_id),
                    ..Default::default()
                }
                .build(now()),
            )
            .unwrap();

        let reopened = JournalStore::open(dir.path().join("journal.json")).unwrap();
        assert_eq!(reopened.dashboards().len(), 1);
        assert_eq!(reopened.dashboards()[0].name, "Futures");
        assert_eq!(reopened.trades().len(), 1);
        assert_eq!(reopened.trades()[0].profit, 250.0);
    }

    #[test]
    fn delete_dashboard_cascades_to_its_trades_only() {
        let (_dir, mut store) = temp_store();
        let kept = Dashboard::new("Kept", now());
        let doomed = Dashboard::new("Doomed", now());
        let kept_id = kept.id;
        let doomed_id = doomed.id;
        store.insert_dashboard(kept).unwrap();
        store.insert_dashboard(doomed).unwrap();

        for (dash, profit) in [(Some(kept_id), 1.0), (Some(doomed_id), 2.0), (None, 3.0)] {
            store
                .insert_trade(
                    TradeDraft {
                        symbol: "ES".into(),
                        profit: Some(profit),
                        dashboard_id: dash,
                        ..Default::default()
                    }
                    .build(now()),
                )
                .unwrap();
        }

        let cascaded = store.delete_dashboard(doomed_id).unwrap();
        assert_eq!(cascaded, 1);
        assert_eq!(store.dashboards().len(), 1);
        // The kept dashboard's trade and the unassigned trade survive
        assert_eq!(store.trades().len(), 2);
        assert!(store.trades().iter().all(|t| t.dashboard_id != Some(doomed_id)));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let (_dir, mut store) = temp_store();
        let ghost = Uuid::new_v4();
        assert!(matches!(
            store.delete_dashboard(ghost),
            Err(StoreError::UnknownDashboard(_))
        ));
        assert!(matches!(store.delete_trade(ghost), Err(StoreError::UnknownTrade(_))));
        // Inserting a trade referencing a missing dashboard fails too
        let orphan = TradeDraft {
            symbol: "CL".into(),
            dashboard_id: Some(ghost),
            ..Default::default()
        }
        .build(now());
        assert!(store.insert_trade(orphan).is_err());
    }

    #[test]
    fn trades_sorted_by_exit_orders_both_ways() {
        let (_dir, mut store) = temp_store();
        let early = TradeDraft {
            symbol: "A".into(),
            exit_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        }
        .build(now());
        let late = TradeDraft {
            symbol: "B".into(),
            exit_time: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        }
        .build(now());
        store.insert_trade(late.clone()).unwrap();
        store.insert_trade(early.clone()).unwrap();

        let asc = store.trades_sorted_by_exit(false);
        assert_eq!(asc[0].id, early.id);
        let desc = store.trades_sorted_by_exit(true);
        assert_eq!(desc[0].id, late.id);
    }

    #[test]
    fn update_trade_replaces_in_place() {
        let (_dir, mut store) = temp_store();
        let mut trade = TradeDraft {
            symbol: "GC".into(),
            profit: Some(10.0),
            ..Default::default()
        }
        .build(now());
        store.insert_trade(trade.clone()).unwrap();

        trade.notes = Some("took profit early".into());
        trade.profit = 8.0;
        store.update_trade(trade.clone()).unwrap();

        assert_eq!(store.trades().len(), 1);
        assert_eq!(store.trades()[0].profit, 8.0);
        assert_eq!(store.trades()[0].notes.as_deref(), Some("took profit early"));
    }
}
