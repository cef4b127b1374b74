//! Domain model structs persisted in the local database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartfixer_shared::constants::DEFAULT_FIX_STATUS;
use smartfixer_shared::DiagnosisResult;

// ---------------------------------------------------------------------------
// Past fix
// ---------------------------------------------------------------------------

/// A stored diagnosis outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PastFix {
    /// Surrogate key assigned by SQLite.
    pub id: i64,
    pub title: String,
    pub difficulty: String,
    pub estimated_time: String,
    pub tools: Vec<String>,
    pub steps: Vec<String>,
    pub category: String,
    /// When the diagnosis was saved.
    pub date: DateTime<Utc>,
    pub status: String,
    pub video_links: Vec<String>,
}

/// A past fix that has not been inserted yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPastFix {
    pub title: String,
    pub difficulty: String,
    pub estimated_time: String,
    pub tools: Vec<String>,
    pub steps: Vec<String>,
    pub category: String,
    pub date: DateTime<Utc>,
    pub status: String,
    pub video_links: Vec<String>,
}

impl NewPastFix {
    /// Record derived from a fresh diagnosis, dated now.
    pub fn from_result(result: &DiagnosisResult) -> Self {
        Self {
            title: result.title.clone(),
            difficulty: result.difficulty.clone(),
            estimated_time: result.estimated_time.clone(),
            tools: result.tools.clone(),
            steps: result.steps.clone(),
            category: result.category.clone(),
            date: Utc::now(),
            status: DEFAULT_FIX_STATUS.to_string(),
            video_links: Vec::new(),
        }
    }

    pub fn dated(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }
}

// ---------------------------------------------------------------------------
// Expert
// ---------------------------------------------------------------------------

/// A service professional listed in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expert {
    /// `None` until inserted; an explicit id makes insert replace that row.
    pub id: Option<i64>,
    pub name: String,
    pub category: String,
    pub phone: String,
    pub email: String,
    pub hourly_rate: f64,
    pub description: String,
    pub availability: String,
    /// 0.0 to 5.0.
    pub rating: f64,
    pub years_experience: u32,
    pub certifications: String,
    pub service_area: String,
    pub created_at: DateTime<Utc>,
}

impl Default for Expert {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            category: smartfixer_shared::constants::DEFAULT_CATEGORY.to_string(),
            phone: String::new(),
            email: String::new(),
            hourly_rate: 0.0,
            description: String::new(),
            availability: String::new(),
            rating: 0.0,
            years_experience: 0,
            certifications: String::new(),
            service_area: String::new(),
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// User profile
// ---------------------------------------------------------------------------

/// Per-installation user settings, persisted by [`crate::PreferenceStore`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(rename = "notifications")]
    pub notifications_enabled: bool,
    #[serde(rename = "dark_mode")]
    pub dark_mode_enabled: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            notifications_enabled: true,
            dark_mode_enabled: false,
        }
    }
}
