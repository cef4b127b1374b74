use thiserror::Error;

/// Failures surfaced by the diagnosis client. `Display` is meant for users.
#[derive(Error, Debug)]
pub enum NetError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("The diagnosis service did not respond in time")]
    Timeout,

    #[error("Could not reach the diagnosis service: {0}")]
    Transport(reqwest::Error),

    #[error("Diagnosis service responded {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Malformed response from the diagnosis service: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for NetError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NetError::Timeout
        } else {
            NetError::Transport(e)
        }
    }
}
