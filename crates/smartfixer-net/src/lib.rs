// HTTP client for the SmartFixer diagnosis backend.

pub mod client;
pub mod error;

pub use client::{ClientSettings, DiagnosisApi, HttpDiagnosisClient};
pub use error::NetError;
