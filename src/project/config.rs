//! Project configuration as an immutable value.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::watch;

use super::feed::FEED_FILE;

/// A project's configuration document.
///
/// The backend owns the schema; this type only knows the handful of keys the
/// client itself reads. Updates produce a new value instead of mutating.
///
/// # Example
/// ```
/// use vogon_client::project::ProjectConfig;
///
/// let config = ProjectConfig::default()
///     .with_field("data_file", "feed.csv")
///     .with_field("trix_url", "https://docs.google.com/spreadsheets/d/abc/edit");
/// assert_eq!(
///     config.data_file_uri().as_deref(),
///     Some("https://docs.google.com/spreadsheets/d/abc/edit")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectConfig(Map<String, Value>);

impl ProjectConfig {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`; `None` when absent, empty or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Copy of this config with `key` set to `value`.
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = self.0.clone();
        map.insert(key.into(), value.into());
        Self(map)
    }

    /// Copy of this config without `key`.
    pub fn without_field(&self, key: &str) -> Self {
        let mut map = self.0.clone();
        map.remove(key);
        Self(map)
    }

    pub fn video_title(&self) -> &str {
        self.get_str("video_title").unwrap_or_default()
    }

    pub fn video_description(&self) -> &str {
        self.get_str("video_description").unwrap_or_default()
    }

    /// Where the feed comes from: the spreadsheet URL when the feed was
    /// imported from one, otherwise the configured data file.
    pub fn data_file_uri(&self) -> Option<String> {
        let data_file = self.get_str("data_file");
        match (data_file, self.get_str("trix_url")) {
            (Some(FEED_FILE), Some(trix_url)) => Some(trix_url.to_string()),
            (data_file, _) => data_file.map(str::to_string),
        }
    }

    /// The spreadsheet URL, when it can be embedded (https only).
    pub fn feed_sheet_url(&self) -> Option<&str> {
        self.get_str("sheets_url")
            .filter(|url| url.starts_with("https://"))
    }
}

/// The current configuration of an open project.
///
/// Every update installs a new value; consumers hold `Arc` snapshots or
/// [`watch`] receivers and re-read after each change.
#[derive(Debug)]
pub struct ConfigState {
    tx: watch::Sender<Arc<ProjectConfig>>,
}

impl ConfigState {
    pub fn new(config: ProjectConfig) -> Self {
        let (tx, _) = watch::channel(Arc::new(config));
        Self { tx }
    }

    pub fn current(&self) -> Arc<ProjectConfig> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ProjectConfig>> {
        self.tx.subscribe()
    }

    /// Install the config computed by `f` from the current one.
    ///
    /// Concurrent updates are serialized: each `f` sees the result of the
    /// previous one. `f` runs under the state's lock and must not call back
    /// into this state.
    pub fn update(&self, f: impl FnOnce(&ProjectConfig) -> ProjectConfig) -> Arc<ProjectConfig> {
        let mut installed = None;
        self.tx.send_modify(|config| {
            let next = Arc::new(f(config));
            *config = next.clone();
            installed = Some(next);
        });
        installed.unwrap_or_else(|| self.current())
    }

    pub fn replace(&self, config: ProjectConfig) -> Arc<ProjectConfig> {
        self.update(|_| config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> ProjectConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn with_field_leaves_original_untouched() {
        let original = config(json!({"video_title": "Old"}));
        let updated = original.with_field("video_title", "New");
        assert_eq!(original.video_title(), "Old");
        assert_eq!(updated.video_title(), "New");
    }

    #[test]
    fn data_file_uri_prefers_trix_url_only_for_imported_feed() {
        let imported = config(json!({"data_file": "feed.csv", "trix_url": "https://sheet"}));
        assert_eq!(imported.data_file_uri().as_deref(), Some("https://sheet"));

        let local = config(json!({"data_file": "rows.csv", "trix_url": "https://sheet"}));
        assert_eq!(local.data_file_uri().as_deref(), Some("rows.csv"));

        let no_sheet = config(json!({"data_file": "feed.csv", "trix_url": ""}));
        assert_eq!(no_sheet.data_file_uri().as_deref(), Some("feed.csv"));
    }

    #[test]
    fn feed_sheet_url_requires_https() {
        assert_eq!(
            config(json!({"sheets_url": "https://docs.google.com/x"})).feed_sheet_url(),
            Some("https://docs.google.com/x")
        );
        assert!(config(json!({"sheets_url": "http://docs.google.com/x"}))
            .feed_sheet_url()
            .is_none());
    }

    #[test]
    fn non_object_config_is_rejected() {
        assert!(serde_json::from_value::<ProjectConfig>(json!([1, 2])).is_err());
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let state = ConfigState::new(config(json!({"count": 0})));
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        state.update(|current| {
                            let count = current.get("count").and_then(Value::as_u64).unwrap();
                            current.with_field("count", count + 1)
                        });
                    }
                });
            }
        });
        assert_eq!(state.current().get("count"), Some(&json!(800)));
    }

    #[tokio::test]
    async fn update_notifies_subscribers_with_new_value() {
        let state = ConfigState::new(config(json!({"video_title": "A"})));
        let mut rx = state.subscribe();
        let before = state.current();

        state.update(|current| current.with_field("video_title", "B"));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().video_title(), "B");
        assert_eq!(before.video_title(), "A");
    }
}
