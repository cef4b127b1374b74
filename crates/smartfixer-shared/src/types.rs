use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SharedError;

/// Coarse service classification shared by diagnoses and the expert directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Plumbing,
    Electrical,
    Hvac,
    Roofing,
    General,
    Locksmith,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Plumbing,
        Category::Electrical,
        Category::Hvac,
        Category::Roofing,
        Category::General,
        Category::Locksmith,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
            Self::Hvac => "hvac",
            Self::Roofing => "roofing",
            Self::General => "general",
            Self::Locksmith => "locksmith",
        }
    }

    /// Map a server-supplied label onto a known category, falling back to
    /// [`Category::General`] for anything unrecognised.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::General)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| SharedError::UnknownCategory(s.to_string()))
    }
}
