// Records scans coming off the camera
//
// One decode event goes: cooldown check, haptics, save to history, then
// either open the URL or show the text. After that the scanner stays quiet
// for COOLDOWN so one physical code doesn't get saved ten times.

use crate::core::history::HistoryStore;
use crate::core::link::PayloadAction;
use crate::db::ScanRecord;
use crate::platform::Platform;
use crate::settings::SettingsStore;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const COOLDOWN: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CooldownState {
    Idle,
    Busy,
    QuietUntil(Instant),
}

/// Gate that lets one scan through at a time, then stays closed for a window
pub struct Cooldown {
    window: Duration,
    state: Mutex<CooldownState>,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: Mutex::new(CooldownState::Idle),
        }
    }

    /// Try to claim the scanner. False while a scan is being handled or
    /// the quiet window hasn't passed.
    pub fn try_begin_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        match *state {
            CooldownState::Busy => false,
            CooldownState::QuietUntil(until) if now < until => false,
            _ => {
                *state = CooldownState::Busy;
                true
            }
        }
    }

    /// Release the scanner. The quiet window starts at `now`.
    pub fn finish_at(&self, now: Instant) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        *state = CooldownState::QuietUntil(now + self.window);
    }

    pub fn is_active_at(&self, now: Instant) -> bool {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        match *state {
            CooldownState::Idle => false,
            CooldownState::Busy => true,
            CooldownState::QuietUntil(until) => now < until,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Instant::now())
    }
}

/// Releases a claimed `Cooldown` when dropped, even if the scan flow
/// holding it is cancelled part way through.
pub struct CooldownGuard<'a> {
    cooldown: &'a Cooldown,
}

impl<'a> CooldownGuard<'a> {
    pub fn new(cooldown: &'a Cooldown) -> Self {
        Self { cooldown }
    }
}

impl Drop for CooldownGuard<'_> {
    fn drop(&mut self) {
        self.cooldown.finish_at(Instant::now());
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(COOLDOWN)
    }
}

/// What happened to one decode event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Dropped by the cooldown
    Suppressed,
    Handled {
        record: ScanRecord,
        action: PayloadAction,
    },
}

pub struct Recorder {
    store: HistoryStore,
    settings: SettingsStore,
    platform: Platform,
    cooldown: Cooldown,
}

impl Recorder {
    pub fn new(store: HistoryStore, settings: SettingsStore, platform: Platform) -> Self {
        Self {
            store,
            settings,
            platform,
            cooldown: Cooldown::default(),
        }
    }

    pub fn with_cooldown(mut self, window: Duration) -> Self {
        self.cooldown = Cooldown::new(window);
        self
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    /// Full camera flow for one decoded barcode
    pub async fn handle_scan(&self, kind: &str, payload: &str) -> ScanOutcome {
        if !self.cooldown.try_begin_at(Instant::now()) {
            log::debug!("scan of {} ignored, cooling down", kind);
            return ScanOutcome::Suppressed;
        }
        let _claimed = CooldownGuard::new(&self.cooldown);

        if self.settings.load().await.haptic_enabled {
            self.platform.haptics.success();
        }

        let record = self.record_scan(kind, payload).await;

        let action = PayloadAction::classify(payload);
        self.dispatch(kind, &action);

        ScanOutcome::Handled { record, action }
    }

    /// Save a scan to history. Never fails; storage errors only get logged.
    pub async fn record_scan(&self, kind: &str, payload: &str) -> ScanRecord {
        self.store.append(kind, payload).await
    }

    fn dispatch(&self, kind: &str, action: &PayloadAction) {
        match action {
            PayloadAction::OpenUrl(url) => {
                if let Err(e) = self.platform.browser.open(url) {
                    log::error!("Error opening {}: {}", url, e);
                }
            }
            PayloadAction::ShowText(text) => self.platform.notifier.show_text(kind, text),
        }
    }
}
