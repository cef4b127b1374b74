use std::sync::Arc;

use smartfixer_store::database::lock;
use smartfixer_store::{LiveQuery, PastFix, SharedDatabase};

use crate::error::ClientError;

/// Read side of the diagnosis history. Records are written by
/// [`crate::DiagnosisMachine`].
#[derive(Clone)]
pub struct PastFixHistory {
    db: SharedDatabase,
}

impl PastFixHistory {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Newest first, refreshed whenever a diagnosis is saved.
    pub fn live(&self) -> Result<LiveQuery<PastFix>, ClientError> {
        Ok(LiveQuery::past_fixes(&self.db)?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<PastFix>, ClientError> {
        let db = Arc::clone(&self.db);
        let fix = tokio::task::spawn_blocking(move || lock(&db)?.get_past_fix(id)).await??;
        Ok(fix)
    }
}
