/// scan-recall library
///
/// Bounded, persistent history of barcode and QR scans.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod logging;
pub mod platform;
pub mod settings;

// Re-exports for convenience
pub use config::Config;
pub use db::{Database, ScanRecord};
pub use error::{Result, ScanError};
