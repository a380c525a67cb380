/// History reader
///
/// Backs the history screen: load, clear, open a row, and keep the list
/// fresh either by polling or by subscribing to the store.

use crate::core::history::HistoryStore;
use crate::core::link::is_link;
use crate::db::ScanRecord;
use crate::error::{Result, ScanError};
use crate::platform::BrowserOpener;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// How often the history screen re-reads storage
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// One history row, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub key: String,
    pub kind: String,
    pub payload: String,
    pub time_label: String,
    pub is_link: bool,
}

impl From<&ScanRecord> for DisplayItem {
    fn from(record: &ScanRecord) -> Self {
        Self {
            key: record.list_key(),
            kind: record.kind.clone(),
            payload: record.payload.clone(),
            time_label: record.local_time_label(),
            is_link: is_link(&record.payload),
        }
    }
}

pub struct HistoryReader {
    store: HistoryStore,
    browser: Arc<dyn BrowserOpener>,
}

impl HistoryReader {
    pub fn new(store: HistoryStore, browser: Arc<dyn BrowserOpener>) -> Self {
        Self { store, browser }
    }

    /// Stored history, newest first. Empty on any read problem.
    pub async fn load(&self) -> Vec<ScanRecord> {
        self.store.load().await
    }

    pub async fn display_items(&self) -> Vec<DisplayItem> {
        self.load().await.iter().map(DisplayItem::from).collect()
    }

    /// Wipe the history. The caller should drop its displayed list
    /// whether or not the write landed.
    pub async fn clear(&self) {
        self.store.clear().await;
    }

    /// Open the row at `index` if it is a link.
    ///
    /// Returns whether anything was opened.
    pub async fn activate(&self, index: usize) -> Result<bool> {
        let history = self.load().await;
        let record = history.get(index).ok_or(ScanError::ScanNotFound(index))?;
        self.activate_record(record)
    }

    pub fn activate_record(&self, record: &ScanRecord) -> Result<bool> {
        if !is_link(&record.payload) {
            return Ok(false);
        }

        self.browser.open(record.payload.trim())?;
        Ok(true)
    }

    /// Push-based alternative to `poll`
    pub fn watch(&self) -> watch::Receiver<Vec<ScanRecord>> {
        self.store.subscribe()
    }

    /// Re-read storage every `interval`, starting right away.
    ///
    /// Picks up writes from other processes within one interval. The timer
    /// stops when the returned handle is stopped or dropped.
    pub fn poll<F>(&self, interval: Duration, mut on_update: F) -> PollHandle
    where
        F: FnMut(Vec<ScanRecord>) + Send + 'static,
    {
        let store = self.store.clone();
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => on_update(store.load().await),
                    _ = cancelled.cancelled() => {
                        log::debug!("history polling stopped");
                        break;
                    }
                }
            }
        });

        PollHandle { token, task }
    }
}

/// Owns a running poll loop
pub struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Cancel the timer and wait for the loop to exit
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Err(e) = (&mut self.task).await {
            log::error!("history polling task failed: {}", e);
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::platform::testing::{recording_platform, RecordingPlatform};
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    async fn setup(fail_browser: bool) -> (HistoryReader, HistoryStore, Arc<RecordingPlatform>) {
        let db = Arc::new(Database::new_test().await.unwrap());
        let store = HistoryStore::new(db);
        let (platform, events) = recording_platform(fail_browser);
        let reader = HistoryReader::new(store.clone(), platform.browser);
        (reader, store, events)
    }

    #[tokio::test]
    async fn test_display_items() {
        let (reader, store, _events) = setup(false).await;
        store.append("qr", "plain text").await;
        store.append("qr", "https://x.com").await;

        let items = reader.display_items().await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_link);
        assert!(!items[1].is_link);
        assert_eq!(items[1].payload, "plain text");
        assert!(!items[0].key.is_empty());
    }

    #[tokio::test]
    async fn test_activate_opens_links_only() {
        let (reader, store, events) = setup(false).await;
        store.append("qr", "not a url").await;
        store.append("qr", "http://x.com").await;

        assert!(reader.activate(0).await.unwrap());
        assert!(!reader.activate(1).await.unwrap());
        assert!(matches!(reader.activate(2).await, Err(ScanError::ScanNotFound(2))));

        assert_eq!(events.events(), vec!["open:http://x.com"]);
    }

    #[tokio::test]
    async fn test_activate_opens_trimmed_url() {
        let (reader, store, events) = setup(false).await;
        store.append("qr", "  https://x.com\n").await;

        assert!(reader.activate(0).await.unwrap());
        assert_eq!(events.events(), vec!["open:https://x.com"]);
    }

    #[tokio::test]
    async fn test_activate_reports_browser_failure() {
        let (reader, store, _events) = setup(true).await;
        store.append("qr", "https://x.com").await;

        assert!(matches!(reader.activate(0).await, Err(ScanError::Browser(_))));
    }

    #[tokio::test]
    async fn test_clear() {
        let (reader, store, _events) = setup(false).await;
        store.append("qr", "a").await;

        reader.clear().await;
        reader.clear().await;

        assert!(reader.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_poll_picks_up_new_scans() {
        let (reader, store, _events) = setup(false).await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = reader.poll(Duration::from_millis(20), move |history| {
            let _ = tx.send(history.len());
        });

        // first tick fires immediately
        let first = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(first, Some(0));

        store.append("qr", "later").await;

        let seen = timeout(Duration::from_secs(1), async {
            while let Some(len) = rx.recv().await {
                if len == 1 {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap();
        assert!(seen);

        handle.stop().await;

        // the callback (and its sender) is dropped once the loop exits
        let closed = timeout(Duration::from_secs(1), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_polling() {
        let (reader, _store, _events) = setup(false).await;
        let (tx, mut rx) = mpsc::unbounded_channel::<usize>();

        {
            let _handle = reader.poll(Duration::from_millis(10), move |history| {
                let _ = tx.send(history.len());
            });
        }

        let closed = timeout(Duration::from_secs(1), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }

    #[tokio::test]
    async fn test_watch_sees_scans_without_polling() {
        let (reader, store, _events) = setup(false).await;
        let mut updates = reader.watch();

        store.append("qr", "pushed").await;

        timeout(Duration::from_secs(1), updates.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updates.borrow()[0].payload, "pushed");
    }
}
