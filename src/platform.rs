/// Device collaborators
///
/// The scan flow talks to the outside world through three narrow traits:
/// opening a URL, haptic feedback, and showing a plain-text result.
/// The CLI wires console versions; tests wire recording fakes.

use crate::error::Result;
use std::sync::Arc;

/// Opens a URL in a browser view
pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Fire-and-forget haptic feedback
pub trait Haptics: Send + Sync {
    /// Played after a successful scan
    fn success(&self);
    /// Played when a switch is flipped on
    fn selection(&self);
}

/// Surfaces a non-URL payload to the user
pub trait Notifier: Send + Sync {
    fn show_text(&self, kind: &str, payload: &str);
}

/// The collaborators a scan flow needs, bundled
#[derive(Clone)]
pub struct Platform {
    pub browser: Arc<dyn BrowserOpener>,
    pub haptics: Arc<dyn Haptics>,
    pub notifier: Arc<dyn Notifier>,
}

impl Platform {
    /// Terminal-backed collaborators used by the CLI
    pub fn console() -> Self {
        Self {
            browser: Arc::new(ConsoleBrowser),
            haptics: Arc::new(SilentHaptics),
            notifier: Arc::new(ConsoleNotifier),
        }
    }
}

/// Prints the URL instead of launching anything
pub struct ConsoleBrowser;

impl BrowserOpener for ConsoleBrowser {
    fn open(&self, url: &str) -> Result<()> {
        println!("Opening {}", url);
        Ok(())
    }
}

/// Terminals can't vibrate. Logs at debug so the call is still visible.
pub struct SilentHaptics;

impl Haptics for SilentHaptics {
    fn success(&self) {
        log::debug!("haptic: success");
    }

    fn selection(&self) {
        log::debug!("haptic: selection");
    }
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_text(&self, kind: &str, payload: &str) {
        println!(
            "Bar code with type {} and data {} has been scanned!",
            kind, payload
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::ScanError;
    use std::sync::Mutex;

    /// Records every collaborator call in order
    #[derive(Default)]
    pub struct RecordingPlatform {
        pub events: Mutex<Vec<String>>,
        pub fail_browser: bool,
    }

    impl RecordingPlatform {
        pub fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl BrowserOpener for RecordingPlatform {
        fn open(&self, url: &str) -> Result<()> {
            self.push(format!("open:{}", url));
            if self.fail_browser {
                return Err(ScanError::Browser(url.to_string()));
            }
            Ok(())
        }
    }

    impl Haptics for RecordingPlatform {
        fn success(&self) {
            self.push("haptic:success".to_string());
        }

        fn selection(&self) {
            self.push("haptic:selection".to_string());
        }
    }

    impl Notifier for RecordingPlatform {
        fn show_text(&self, kind: &str, payload: &str) {
            self.push(format!("text:{}:{}", kind, payload));
        }
    }

    /// A `Platform` whose three collaborators all feed one recorder
    pub fn recording_platform(fail_browser: bool) -> (Platform, Arc<RecordingPlatform>) {
        let recorder = Arc::new(RecordingPlatform {
            fail_browser,
            ..Default::default()
        });

        let platform = Platform {
            browser: recorder.clone(),
            haptics: recorder.clone(),
            notifier: recorder.clone(),
        };

        (platform, recorder)
    }
}
