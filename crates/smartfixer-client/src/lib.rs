pub mod config;
pub mod diagnosis;
pub mod error;
pub mod experts;
pub mod history;
pub mod profile;
pub mod state;

use tracing_subscriber::{fmt, EnvFilter};

pub use config::ClientConfig;
pub use diagnosis::{DiagnosisMachine, DiagnosisState};
pub use error::ClientError;
pub use experts::{ExpertDirectory, ExpertRegistration, RegistrationState};
pub use history::PastFixHistory;
pub use profile::ProfileSettings;
pub use state::AppState;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "smartfixer_client=debug,smartfixer_net=debug,smartfixer_store=info,smartfixer_shared=info,warn",
        )
    });

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    if installed.is_ok() {
        tracing::info!("Starting {} core", smartfixer_shared::constants::APP_NAME);
    }
}
