/// Scan history store
///
/// Owns the `scanHistory` key. The whole history is one JSON array,
/// newest first, never longer than `HISTORY_CAP`. Every mutation rewrites
/// the full value.
///
/// Writes made through this store (or any clone of it) are published to
/// subscribers immediately. Writes from another process only show up on
/// the next `load`.

use crate::db::{Database, ScanRecord};
use crate::error::{Result, ScanError};
use std::sync::Arc;
use tokio::sync::watch;

pub const HISTORY_KEY: &str = "scanHistory";
pub const HISTORY_CAP: usize = 50;

#[derive(Clone)]
pub struct HistoryStore {
    db: Arc<Database>,
    updates: Arc<watch::Sender<Vec<ScanRecord>>>,
}

impl HistoryStore {
    pub fn new(db: Arc<Database>) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            db,
            updates: Arc::new(updates),
        }
    }

    /// Record a scan. Storage failures are logged and swallowed.
    ///
    /// The record is returned even when it could not be saved.
    pub async fn append(&self, kind: &str, payload: &str) -> ScanRecord {
        let (record, saved) = self.append_inner(kind, payload).await;
        if let Err(e) = saved {
            log::error!("Error saving to history: {}", e);
        }
        record
    }

    /// Same as `append`, but the storage failure is returned
    pub async fn try_append(&self, kind: &str, payload: &str) -> Result<ScanRecord> {
        let (record, saved) = self.append_inner(kind, payload).await;
        saved.map(|_| record)
    }

    // Unlocked read-modify-write. A clear that lands between the read and
    // the write is overwritten, and an append racing a clear can be wiped.
    async fn append_inner(&self, kind: &str, payload: &str) -> (ScanRecord, Result<()>) {
        let mut history = match self.read_raw().await {
            Ok(Some(raw)) => match parse_history(&raw) {
                Ok(history) => history,
                Err(e) => {
                    log::warn!("Starting from empty history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            // storage didn't answer, so what's stored is unknown: don't overwrite it
            Err(e) => return (ScanRecord::now(kind, payload), Err(e)),
        };

        let record = ScanRecord::now(kind, payload);
        history.insert(0, record.clone());
        history.truncate(HISTORY_CAP);

        let saved = self.write(&history).await;
        if saved.is_ok() {
            self.publish(history);
        }

        (record, saved)
    }

    /// Current history, newest first. Missing or unreadable data reads as empty.
    pub async fn load(&self) -> Vec<ScanRecord> {
        match self.try_load().await {
            Ok(history) => {
                self.publish(history.clone());
                history
            }
            Err(e) => {
                log::error!("Error loading history: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_load(&self) -> Result<Vec<ScanRecord>> {
        match self.read_raw().await? {
            Some(raw) => parse_history(&raw),
            None => Ok(Vec::new()),
        }
    }

    async fn read_raw(&self) -> Result<Option<String>> {
        self.db
            .get_item(HISTORY_KEY)
            .await
            .map_err(|e| ScanError::read(HISTORY_KEY, e))
    }

    /// Reset to an empty history. Failures are logged and swallowed.
    pub async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            log::error!("Error clearing history: {}", e);
        }
    }

    pub async fn try_clear(&self) -> Result<()> {
        self.write(&[]).await?;
        self.publish(Vec::new());
        Ok(())
    }

    /// Receiver that sees every history this store writes or loads
    pub fn subscribe(&self) -> watch::Receiver<Vec<ScanRecord>> {
        self.updates.subscribe()
    }

    async fn write(&self, history: &[ScanRecord]) -> Result<()> {
        let raw = serde_json::to_string(history).map_err(|e| ScanError::write(HISTORY_KEY, e))?;
        self.db
            .set_item(HISTORY_KEY, &raw)
            .await
            .map_err(|e| ScanError::write(HISTORY_KEY, e))
    }

    fn publish(&self, history: Vec<ScanRecord>) {
        self.updates.send_if_modified(|current| {
            if *current == history {
                false
            } else {
                *current = history;
                true
            }
        });
    }
}

/// Parse a stored history value.
///
/// The value must be a JSON array. Entries that don't parse as a scan are
/// skipped one by one so a single bad record can't hide the rest.
fn parse_history(raw: &str) -> Result<Vec<ScanRecord>> {
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(|e| ScanError::read(HISTORY_KEY, e))?;

    let history = entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping unreadable scan at position {}: {}", position, e);
                None
            }
        })
        .collect();

    Ok(history)
}
