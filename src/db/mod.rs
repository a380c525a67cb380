/// Database module for scan-recall
///
/// Persistent key-value storage on SQLite via sqlx. Callers store whole
/// serialized values under string keys.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::Database;
pub use models::*;
