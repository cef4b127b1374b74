//! Application state shared by every screen.
//!
//! [`AppState`] owns the database, the preference file and the diagnosis
//! client, and hands out the per-screen services built on top of them.
//! Dropping it (or calling [`AppState::close`]) closes the database, which
//! ends every outstanding live query.

use std::sync::Arc;

use smartfixer_net::{DiagnosisApi, HttpDiagnosisClient};
use smartfixer_store::database::default_data_dir;
use smartfixer_store::{Database, PreferenceStore, SharedDatabase};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::diagnosis::DiagnosisMachine;
use crate::error::ClientError;
use crate::experts::ExpertDirectory;
use crate::history::PastFixHistory;
use crate::profile::ProfileSettings;

pub struct AppState {
    /// Shared SQLite handle. Other holders keep it open until they drop.
    pub database: SharedDatabase,

    pub diagnosis: DiagnosisMachine,

    pub experts: ExpertDirectory,

    pub history: PastFixHistory,

    pub profile: ProfileSettings,
}

impl AppState {
    /// Open storage under the configured data directory, seed the expert
    /// directory on first run and connect the HTTP diagnosis client.
    pub fn open(config: &ClientConfig) -> Result<Self, ClientError> {
        let data_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };
        info!(data_dir = %data_dir.display(), api = %config.api_base_url, "opening app state");

        let database = Database::open_in_dir(&data_dir)?;
        match database.seed_sample_experts() {
            Ok(0) => {}
            Ok(n) => info!(count = n, "seeded sample experts"),
            Err(e) => warn!(error = %e, "failed to seed sample experts"),
        }

        let api = HttpDiagnosisClient::new(&config.client_settings())?;
        let preferences = PreferenceStore::open_in_dir(&data_dir)?;

        Ok(Self::with_parts(database, Arc::new(api), preferences))
    }

    /// Assemble state from already opened parts.
    pub fn with_parts(
        database: Database,
        api: Arc<dyn DiagnosisApi>,
        preferences: PreferenceStore,
    ) -> Self {
        let database = database.into_shared();
        Self {
            diagnosis: DiagnosisMachine::new(api, Arc::clone(&database)),
            experts: ExpertDirectory::new(Arc::clone(&database)),
            history: PastFixHistory::new(Arc::clone(&database)),
            profile: ProfileSettings::new(preferences),
            database,
        }
    }

    /// Cancel any running diagnosis and release storage.
    pub fn close(self) {
        self.diagnosis.cancel();
        info!("app state closed");
    }
}
