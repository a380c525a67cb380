/// User preferences
///
/// Three switches persisted as one JSON value. Only `haptic_enabled`
/// changes behavior today. `sound_enabled` and `auto_open_links` are stored
/// and shown but nothing reads them yet.

use crate::db::Database;
use crate::error::{Result, ScanError};
use crate::platform::Haptics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub haptic_enabled: bool,
    pub sound_enabled: bool,
    pub auto_open_links: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            haptic_enabled: true,
            sound_enabled: true,
            auto_open_links: true,
        }
    }
}

impl Settings {
    pub fn get(&self, name: SettingName) -> bool {
        match name {
            SettingName::HapticEnabled => self.haptic_enabled,
            SettingName::SoundEnabled => self.sound_enabled,
            SettingName::AutoOpenLinks => self.auto_open_links,
        }
    }

    pub fn set(&mut self, name: SettingName, value: bool) {
        match name {
            SettingName::HapticEnabled => self.haptic_enabled = value,
            SettingName::SoundEnabled => self.sound_enabled = value,
            SettingName::AutoOpenLinks => self.auto_open_links = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingName {
    HapticEnabled,
    SoundEnabled,
    AutoOpenLinks,
}

impl SettingName {
    pub const ALL: [SettingName; 3] = [
        SettingName::HapticEnabled,
        SettingName::SoundEnabled,
        SettingName::AutoOpenLinks,
    ];
}

impl fmt::Display for SettingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SettingName::HapticEnabled => "haptics",
            SettingName::SoundEnabled => "sound",
            SettingName::AutoOpenLinks => "auto-open-links",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SettingName {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "haptics" | "haptic" | "hapticenabled" => Ok(SettingName::HapticEnabled),
            "sound" | "soundenabled" => Ok(SettingName::SoundEnabled),
            "auto-open-links" | "autoopenlinks" => Ok(SettingName::AutoOpenLinks),
            other => Err(ScanError::InvalidSetting(other.to_string())),
        }
    }
}

/// Parse a CLI switch value
pub fn parse_switch(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(ScanError::InvalidSetting(other.to_string())),
    }
}

/// Loads and saves `Settings` under a single key
#[derive(Clone)]
pub struct SettingsStore {
    db: Arc<Database>,
}

impl SettingsStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Current settings. Missing or unreadable values fall back to defaults.
    pub async fn load(&self) -> Settings {
        match self.try_load().await {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Error loading settings: {}", e);
                Settings::default()
            }
        }
    }

    pub async fn try_load(&self) -> Result<Settings> {
        let raw = self
            .db
            .get_item(SETTINGS_KEY)
            .await
            .map_err(|e| ScanError::read(SETTINGS_KEY, e))?;

        match raw {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| ScanError::read(SETTINGS_KEY, e)),
            None => Ok(Settings::default()),
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.db
            .set_item(SETTINGS_KEY, &raw)
            .await
            .map_err(|e| ScanError::write(SETTINGS_KEY, e))
    }

    pub async fn set(&self, name: SettingName, value: bool) -> Result<Settings> {
        let mut settings = self.load().await;
        settings.set(name, value);
        self.save(&settings).await?;
        Ok(settings)
    }

    /// Forget saved preferences. The next `load` returns the defaults.
    pub async fn reset(&self) -> Result<Settings> {
        self.db
            .remove_item(SETTINGS_KEY)
            .await
            .map_err(|e| ScanError::write(SETTINGS_KEY, e))?;
        Ok(Settings::default())
    }

    /// Flip one switch. Turning haptics on plays a selection tick.
    pub async fn toggle(&self, name: SettingName, haptics: &dyn Haptics) -> Result<Settings> {
        let mut settings = self.load().await;
        let enabled = !settings.get(name);
        settings.set(name, enabled);

        if name == SettingName::HapticEnabled && enabled {
            haptics.selection();
        }

        self.save(&settings).await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::recording_platform;

    async fn create_test_store() -> (SettingsStore, Arc<Database>) {
        let db = Arc::new(Database::new_test().await.unwrap());
        (SettingsStore::new(Arc::clone(&db)), db)
    }

    #[tokio::test]
    async fn test_defaults_when_missing() {
        let (store, _db) = create_test_store().await;
        assert_eq!(store.load().await, Settings::default());
    }

    #[tokio::test]
    async fn test_defaults_when_malformed() {
        let (store, db) = create_test_store().await;
        db.set_item(SETTINGS_KEY, "{not json").await.unwrap();

        assert!(store.try_load().await.is_err());
        assert_eq!(store.load().await, Settings::default());
    }

    #[tokio::test]
    async fn test_partial_value_fills_defaults() {
        let (store, db) = create_test_store().await;
        db.set_item(SETTINGS_KEY, r#"{"soundEnabled":false}"#)
            .await
            .unwrap();

        let settings = store.load().await;
        assert!(settings.haptic_enabled);
        assert!(!settings.sound_enabled);
        assert!(settings.auto_open_links);
    }

    #[tokio::test]
    async fn test_set_persists() {
        let (store, _db) = create_test_store().await;

        store.set(SettingName::AutoOpenLinks, false).await.unwrap();

        assert!(!store.load().await.auto_open_links);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let (store, db) = create_test_store().await;
        store.set(SettingName::SoundEnabled, false).await.unwrap();

        let settings = store.reset().await.unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(store.load().await, Settings::default());
        assert_eq!(db.get_item(SETTINGS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_toggle_haptics_plays_selection_only_when_enabling() {
        let (store, _db) = create_test_store().await;
        let (platform, events) = recording_platform(false);

        let off = store
            .toggle(SettingName::HapticEnabled, platform.haptics.as_ref())
            .await
            .unwrap();
        assert!(!off.haptic_enabled);
        assert!(events.events().is_empty());

        let on = store
            .toggle(SettingName::HapticEnabled, platform.haptics.as_ref())
            .await
            .unwrap();
        assert!(on.haptic_enabled);
        assert_eq!(events.events(), vec!["haptic:selection"]);
    }

    #[test]
    fn test_setting_name_parsing() {
        assert_eq!("haptics".parse::<SettingName>().unwrap(), SettingName::HapticEnabled);
        assert_eq!("hapticEnabled".parse::<SettingName>().unwrap(), SettingName::HapticEnabled);
        assert_eq!("Sound".parse::<SettingName>().unwrap(), SettingName::SoundEnabled);
        assert!("volume".parse::<SettingName>().is_err());

        for name in SettingName::ALL {
            assert_eq!(name.to_string().parse::<SettingName>().unwrap(), name);
        }
    }

    #[test]
    fn test_parse_switch() {
        assert!(parse_switch("on").unwrap());
        assert!(!parse_switch("OFF").unwrap());
        assert!(parse_switch("maybe").is_err());
    }
}
