/// Key-value operations on the storage table
///
/// Each function is a single statement, so individual calls are atomic.
/// Nothing here spans more than one call.

use crate::db::models::StoredItem;
use crate::db::Database;
use crate::error::Result;

impl Database {
    /// Read the value stored under `key`
    ///
    /// # Returns
    /// * `Ok(None)` - Nothing has been stored under this key
    /// * `Ok(Some(value))` - The raw stored string
    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Store `value` under `key`, replacing any previous value
    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Delete the value stored under `key`
    pub async fn remove_item(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Fetch the full row for `key`
    pub async fn get_stored_item(&self, key: &str) -> Result<Option<StoredItem>> {
        let item = sqlx::query_as::<_, StoredItem>("SELECT * FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        Ok(item)
    }

    /// All keys currently stored, sorted
    pub async fn keys(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(self.pool())
            .await?;

        Ok(rows.into_iter().map(|(key,)| key).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_item() {
        let db = Database::new_test().await.unwrap();
        assert_eq!(db.get_item("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_item_replaces_value() {
        let db = Database::new_test().await.unwrap();

        db.set_item("scanHistory", "[1]").await.unwrap();
        db.set_item("scanHistory", "[2]").await.unwrap();

        assert_eq!(db.get_item("scanHistory").await.unwrap().as_deref(), Some("[2]"));
        assert_eq!(db.stats().await.unwrap().total_items, 1);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let db = Database::new_test().await.unwrap();

        db.set_item("settings", "{}").await.unwrap();
        db.remove_item("settings").await.unwrap();
        db.remove_item("settings").await.unwrap();

        assert_eq!(db.get_item("settings").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keys_and_stored_item() {
        let db = Database::new_test().await.unwrap();

        db.set_item("settings", "{}").await.unwrap();
        db.set_item("scanHistory", "[]").await.unwrap();

        assert_eq!(db.keys().await.unwrap(), vec!["scanHistory", "settings"]);

        let item = db.get_stored_item("settings").await.unwrap().unwrap();
        assert_eq!(item.value, "{}");
        assert!(!item.updated_at.is_empty());
    }

    #[tokio::test]
    async fn test_closed_pool_rejects_writes() {
        let db = Database::new_test().await.unwrap();
        db.close().await;

        tokio_test::assert_err!(db.set_item("scanHistory", "[]").await);
        tokio_test::assert_err!(db.get_item("scanHistory").await);
    }
}
