//! Expert directory: live listings plus the registration flow.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smartfixer_shared::Category;
use smartfixer_store::database::lock;
use smartfixer_store::{Expert, LiveQuery, SharedDatabase};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::ClientError;

/// Rating given to newly registered experts.
const NEW_EXPERT_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "camelCase")]
pub enum RegistrationState {
    Idle,
    Saving,
    Success,
    Error(String),
}

/// Raw form input. Numeric fields stay text until [`Self::into_expert`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpertRegistration {
    pub name: String,
    pub category: String,
    pub phone: String,
    pub email: String,
    pub hourly_rate: String,
    pub description: String,
    pub availability: String,
    pub years_experience: String,
    pub certifications: String,
    pub service_area: String,
}

impl ExpertRegistration {
    /// Validate and convert. Name, phone and email are required; unparseable
    /// numbers fall back to zero.
    pub fn into_expert(self) -> Result<Expert, ClientError> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(ClientError::InvalidRegistration(missing));
        }

        Ok(Expert {
            id: None,
            name: self.name.trim().to_string(),
            category: Category::from_label(&self.category).as_str().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            hourly_rate: self.hourly_rate.trim().parse().unwrap_or(0.0),
            description: self.description.trim().to_string(),
            availability: self.availability.trim().to_string(),
            rating: NEW_EXPERT_RATING,
            years_experience: self.years_experience.trim().parse().unwrap_or(0),
            certifications: self.certifications.trim().to_string(),
            service_area: self.service_area.trim().to_string(),
            ..Expert::default()
        })
    }
}

#[derive(Clone)]
pub struct ExpertDirectory {
    db: SharedDatabase,
    state: Arc<watch::Sender<RegistrationState>>,
}

impl ExpertDirectory {
    pub fn new(db: SharedDatabase) -> Self {
        let (state, _) = watch::channel(RegistrationState::Idle);
        Self {
            db,
            state: Arc::new(state),
        }
    }

    pub fn all(&self) -> Result<LiveQuery<Expert>, ClientError> {
        Ok(LiveQuery::experts(&self.db)?)
    }

    pub fn by_category(&self, category: Category) -> Result<LiveQuery<Expert>, ClientError> {
        Ok(LiveQuery::experts_by_category(&self.db, category.as_str())?)
    }

    pub fn registration_state(&self) -> RegistrationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RegistrationState> {
        self.state.subscribe()
    }

    /// Validate the form and add the expert. Validation failures leave the
    /// registration state untouched.
    pub async fn register(&self, form: ExpertRegistration) -> Result<i64, ClientError> {
        let expert = form.into_expert()?;
        self.state.send_replace(RegistrationState::Saving);

        let db = Arc::clone(&self.db);
        let saved = tokio::task::spawn_blocking(move || lock(&db)?.insert_expert(&expert))
            .await
            .map_err(ClientError::from)
            .and_then(|res| res.map_err(ClientError::from));

        match &saved {
            Ok(id) => {
                info!(id, "expert registered");
                self.state.send_replace(RegistrationState::Success);
            }
            Err(e) => {
                warn!(error = %e, "expert registration failed");
                self.state.send_replace(RegistrationState::Error(e.to_string()));
            }
        }
        saved
    }

    pub fn reset(&self) {
        self.state.send_replace(RegistrationState::Idle);
    }

    /// Insert the bundled sample experts into an empty directory.
    pub async fn seed_samples(&self) -> Result<usize, ClientError> {
        let db = Arc::clone(&self.db);
        let inserted = tokio::task::spawn_blocking(move || lock(&db)?.seed_sample_experts()).await??;
        Ok(inserted)
    }
}
