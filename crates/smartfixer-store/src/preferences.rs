//! Key-value user preferences.
//!
//! The profile is a single JSON object (`name`, `email`, `notifications`,
//! `dark_mode`) kept next to the database. Missing files and missing keys
//! fall back to defaults. Saves replace the whole file through a temporary
//! file and a rename, so readers never observe a partial write.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use crate::database::default_data_dir;
use crate::error::Result;
use crate::models::UserProfile;

/// File name of the preference file inside the data directory.
pub const PREFERENCES_FILE: &str = "user_preferences.json";

pub struct PreferenceStore {
    path: PathBuf,
    current: watch::Sender<UserProfile>,
    // Held across write, rename and publish so the file and `current` agree.
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    /// Open the preference file in the platform data directory.
    pub fn new() -> Result<Self> {
        Self::open_in_dir(&default_data_dir()?)
    }

    pub fn open_in_dir(dir: &Path) -> Result<Self> {
        Self::open_at(dir.join(PREFERENCES_FILE))
    }

    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let profile = read_profile(&path)?;
        tracing::debug!(path = %path.display(), "preferences loaded");

        let (current, _) = watch::channel(profile);
        Ok(Self {
            path,
            current,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last saved profile (or defaults).
    pub fn load(&self) -> UserProfile {
        self.current.borrow().clone()
    }

    /// Replace the stored profile and notify subscribers.
    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write(profile)
    }

    /// Read-modify-write under the write lock, so concurrent edits to
    /// different fields are not lost. Returns the saved profile.
    pub fn update(&self, edit: impl FnOnce(&mut UserProfile)) -> Result<UserProfile> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut profile = self.load();
        edit(&mut profile);
        self.write(&profile)?;
        Ok(profile)
    }

    fn write(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(profile)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        self.current.send_replace(profile.clone());
        tracing::info!("profile saved");
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<UserProfile> {
        self.current.subscribe()
    }
}

fn read_profile(path: &Path) -> Result<UserProfile> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UserProfile::default()),
        Err(e) => Err(e.into()),
    }
}
