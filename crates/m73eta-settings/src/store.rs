//! Settings persistence and change notification.

use crate::{Result, Settings, SettingsError};
use directories::ProjectDirs;
use m73eta_types::PrintMode;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// File name of the settings file inside the configuration directory.
const SETTINGS_FILE: &str = "settings.json";

/// Handle of a registered change callback.
pub type SubscriptionId = Uuid;

type Callback = Arc<dyn Fn(&Settings) + Send + Sync>;

/// Loads, stores and publishes changes to [`Settings`].
///
/// Settings are stored as JSON. A missing file means defaults; the file
/// is only written once something changes. Registered callbacks are
/// invoked after every change that was persisted successfully, outside of
/// any internal lock, so a callback may read or update the store again.
///
/// Delivery is serialized: one thread publishes at a time and always hands
/// out the settings current at that moment. Changes made while a publish
/// is running, from a callback or another thread, are coalesced into
/// another round, so the last values every callback sees are the stored
/// ones.
pub struct SettingsStore {
    /// Location of the settings file.
    path: PathBuf,
    /// Current settings.
    settings: RwLock<Settings>,
    /// Registered change callbacks, in registration order.
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
    /// Set while some thread delivers changes to the callbacks.
    publishing: AtomicBool,
    /// Set when a change has not been delivered yet.
    pending: AtomicBool,
}

impl SettingsStore {
    /// Opens the settings stored at `path`, or defaults if there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let settings = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| SettingsError::ReadFile {
                path: path.clone(),
                source: e,
            })?;
            serde_json::from_str(&content).map_err(|e| SettingsError::ParseJson {
                path: path.clone(),
                source: e,
            })?
        } else {
            debug!(path = %path.display(), "No settings file, using defaults");
            Settings::default()
        };

        Ok(Self {
            path,
            settings: RwLock::new(settings),
            subscribers: Mutex::new(Vec::new()),
            publishing: AtomicBool::new(false),
            pending: AtomicBool::new(false),
        })
    }

    /// Returns the default location of the settings file.
    ///
    /// Uses the `directories` crate to find the appropriate location:
    /// - Linux: `~/.config/m73eta/settings.json`
    /// - macOS: `~/Library/Application Support/m73eta/settings.json`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\m73eta\config\settings.json`
    ///
    /// Falls back to `~/.m73eta/settings.json` if the platform-specific
    /// location cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "m73eta")
            .map_or_else(dirs_fallback, |proj_dirs| {
                proj_dirs.config_dir().to_path_buf()
            })
            .join(SETTINGS_FILE)
    }

    /// Opens the settings at the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed.
    pub fn with_default_path() -> Result<Self> {
        Self::open(Self::default_path())
    }

    /// Returns the path of the settings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of the current settings.
    #[must_use]
    pub fn settings(&self) -> Settings {
        *self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if silent-mode remaining times are honoured.
    #[must_use]
    pub fn silent_mode_enabled(&self) -> bool {
        self.settings().silent_mode_enabled
    }

    /// Returns the print mode selected by the current settings.
    #[must_use]
    pub fn print_mode(&self) -> PrintMode {
        self.settings().print_mode()
    }

    /// Turns silent mode on or off.
    ///
    /// Returns whether the value changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written to disk.
    pub fn set_silent_mode_enabled(&self, enabled: bool) -> Result<bool> {
        self.update(|settings| settings.silent_mode_enabled = enabled)
    }

    /// Applies `change`, persists the result and notifies subscribers.
    ///
    /// Nothing is written or published if `change` leaves the settings as
    /// they were. Returns whether they changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written to disk; the
    /// in-memory settings are left untouched in that case.
    pub fn update(&self, change: impl FnOnce(&mut Settings)) -> Result<bool> {
        let updated = {
            let mut current = self.settings.write().unwrap_or_else(PoisonError::into_inner);
            let mut updated = *current;
            change(&mut updated);
            if updated == *current {
                return Ok(false);
            }

            self.save(&updated)?;
            *current = updated;
            updated
        };

        info!(silent_mode_enabled = updated.silent_mode_enabled, "Settings changed");
        self.publish();
        Ok(true)
    }

    /// Registers a callback invoked with the current settings after changes.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    /// Removes a callback.
    ///
    /// Returns false if it was not registered, e.g. because it was already
    /// removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(subscriber, _)| *subscriber != id);
        subscribers.len() != before
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn publish(&self) {
        self.pending.store(true, Ordering::SeqCst);

        // Whoever holds `publishing` delivers; everyone else leaves their
        // change to it through `pending`.
        while self
            .publishing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let publishing = ClearOnDrop(&self.publishing);
            while self.pending.swap(false, Ordering::SeqCst) {
                let current = self.settings();
                for callback in self.callbacks() {
                    callback(&current);
                }
            }

            drop(publishing);
            if !self.pending.load(Ordering::SeqCst) {
                break;
            }
        }
    }

    fn callbacks(&self) -> Vec<Callback> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let missing_parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && !p.exists());
        if let Some(parent) = missing_parent {
            fs::create_dir_all(parent).map_err(|e| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json).map_err(|e| SettingsError::WriteFile {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.path)
            .field("settings", &self.settings())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Releases the publishing flag, also when a callback panics.
struct ClearOnDrop<'a>(&'a AtomicBool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Fallback for determining the configuration directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".m73eta")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SettingsStore {
        SettingsStore::open(dir.path().join("settings.json")).unwrap()
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        assert_eq!(store.settings(), Settings::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        assert!(store.set_silent_mode_enabled(true).unwrap());
        assert!(store.silent_mode_enabled());
        assert_eq!(store.print_mode(), PrintMode::Silent);

        let reopened = SettingsStore::open(store.path()).unwrap();
        assert!(reopened.silent_mode_enabled());
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::open(temp_dir.path().join("nested/dir/settings.json")).unwrap();

        store.set_silent_mode_enabled(true).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_hand_edited_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{ "silent_mode_enabled": "on" }"#).unwrap();

        let store = SettingsStore::open(&path).unwrap();
        assert!(store.silent_mode_enabled());
    }

    #[test]
    fn test_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            SettingsStore::open(&path),
            Err(SettingsError::ParseJson { .. })
        ));
    }

    #[test]
    fn test_subscribers_notified_on_change_only() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        store.subscribe(move |settings| {
            assert!(settings.silent_mode_enabled);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.set_silent_mode_enabled(true).unwrap());
        assert!(!store.set_silent_mode_enabled(true).unwrap());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.subscriber_count(), 1);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        assert_eq!(store.subscriber_count(), 0);

        store.set_silent_mode_enabled(true).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_may_read_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(store(&temp_dir));
        let seen = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&store);
        let seen_in_callback = Arc::clone(&seen);
        store.subscribe(move |_| {
            if inner.silent_mode_enabled() {
                seen_in_callback.fetch_add(1, Ordering::SeqCst);
            }
        });

        store.set_silent_mode_enabled(true).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_update_delivers_latest() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(store(&temp_dir));
        let last_seen = Arc::new(Mutex::new(Vec::new()));

        // Turns silent mode straight back off
        let inner = Arc::clone(&store);
        store.subscribe(move |settings| {
            if settings.silent_mode_enabled {
                inner.set_silent_mode_enabled(false).unwrap();
            }
        });
        let seen = Arc::clone(&last_seen);
        store.subscribe(move |settings| {
            seen.lock().unwrap().push(settings.silent_mode_enabled);
        });

        store.set_silent_mode_enabled(true).unwrap();

        assert!(!store.silent_mode_enabled());
        assert_eq!(last_seen.lock().unwrap().last(), Some(&false));
    }

    #[test]
    fn test_concurrent_updates_end_on_stored_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(store(&temp_dir));
        let last_seen = Arc::new(AtomicBool::new(false));

        let seen = Arc::clone(&last_seen);
        store.subscribe(move |settings| {
            seen.store(settings.silent_mode_enabled, Ordering::SeqCst);
        });

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..50 {
                        store.set_silent_mode_enabled((i + n) % 2 == 0).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            last_seen.load(Ordering::SeqCst),
            store.silent_mode_enabled()
        );
    }

    #[test]
    fn test_default_path() {
        let path = SettingsStore::default_path();
        assert!(path.ends_with("settings.json"));
        assert!(path.to_string_lossy().contains("m73eta"));
    }
}
