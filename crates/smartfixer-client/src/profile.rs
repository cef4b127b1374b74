use std::sync::Arc;

use smartfixer_store::{PreferenceStore, UserProfile};
use tokio::sync::watch;

use crate::error::ClientError;

/// Profile screen backed by the preference file.
#[derive(Clone)]
pub struct ProfileSettings {
    prefs: Arc<PreferenceStore>,
}

impl ProfileSettings {
    pub fn new(prefs: PreferenceStore) -> Self {
        Self {
            prefs: Arc::new(prefs),
        }
    }

    pub fn current(&self) -> UserProfile {
        self.prefs.load()
    }

    pub fn subscribe(&self) -> watch::Receiver<UserProfile> {
        self.prefs.subscribe()
    }

    pub async fn save(&self, profile: UserProfile) -> Result<(), ClientError> {
        let prefs = Arc::clone(&self.prefs);
        tokio::task::spawn_blocking(move || prefs.save(&profile)).await??;
        Ok(())
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<(), ClientError> {
        self.update(move |p| p.dark_mode_enabled = enabled).await
    }

    pub async fn set_notifications(&self, enabled: bool) -> Result<(), ClientError> {
        self.update(move |p| p.notifications_enabled = enabled).await
    }

    async fn update(
        &self,
        edit: impl FnOnce(&mut UserProfile) + Send + 'static,
    ) -> Result<(), ClientError> {
        let prefs = Arc::clone(&self.prefs);
        tokio::task::spawn_blocking(move || prefs.update(edit)).await??;
        Ok(())
    }
}
