use smartfixer_net::NetError;
use smartfixer_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Please describe the problem first")]
    EmptyDescription,

    #[error("A diagnosis is already in progress")]
    Busy,

    #[error("Missing required fields: {}", .0.join(", "))]
    InvalidRegistration(Vec<&'static str>),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Network error: {0}")]
    Net(#[from] NetError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ClientError {
    fn from(e: tokio::task::JoinError) -> Self {
        ClientError::Task(e.to_string())
    }
}
