/// Core functionality modules
///
/// Contains the scan history store, the scan recorder that feeds it,
/// the reader behind the history screen, and payload classification.

pub mod history;
pub mod link;
pub mod recorder;
pub mod retriever;
pub mod searcher;

pub use history::{HistoryStore, HISTORY_CAP, HISTORY_KEY};
pub use link::{is_link, PayloadAction};
pub use recorder::{Cooldown, CooldownGuard, Recorder, ScanOutcome, COOLDOWN};
pub use retriever::{DisplayItem, HistoryReader, PollHandle, POLL_INTERVAL};
pub use searcher::Searcher;
