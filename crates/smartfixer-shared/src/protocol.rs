//! Wire model for the `/diagnose` endpoint.
//!
//! Field names follow the backend's snake_case JSON. Unknown response fields
//! are ignored so the server can grow the reply without breaking clients.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CATEGORY;
use crate::image::PreparedImage;

/// Body of `POST /diagnose`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRequest {
    /// Free-text description of the problem. Must be non-empty.
    pub description: String,
    /// Optional photo. Data and media type travel together or not at all.
    #[serde(flatten)]
    pub image: Option<ImageAttachment>,
}

/// Inline base64 image carried by a [`DiagnosisRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    #[serde(rename = "image_base64")]
    pub data: String,
    #[serde(rename = "image_media_type")]
    pub media_type: String,
}

impl DiagnosisRequest {
    pub fn text(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }
}

impl From<PreparedImage> for ImageAttachment {
    fn from(prepared: PreparedImage) -> Self {
        Self {
            data: prepared.base64,
            media_type: prepared.media_type.to_string(),
        }
    }
}

/// Structured repair plan returned by the diagnosis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub title: String,
    /// `Easy`, `Medium` or `Hard` in practice, kept as text.
    pub difficulty: String,
    pub estimated_time: String,
    pub tools: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}
