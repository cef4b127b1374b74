//! Reactive listings.
//!
//! A [`LiveQuery`] yields the current rows on its first `next()` and then one
//! fresh snapshot after each write to its table. It holds only a weak handle,
//! so dropping the last [`SharedDatabase`] ends the subscription with
//! [`StoreError::Closed`].

use std::sync::{Arc, Weak};

use futures::Stream;
use tokio::sync::watch;

use crate::database::{lock, Database, Revisions, SharedDatabase, Table};
use crate::error::{Result, StoreError};
use crate::models::{Expert, PastFix};

type QueryFn<T> = Arc<dyn Fn(&Database) -> Result<Vec<T>> + Send + Sync>;

pub struct LiveQuery<T> {
    db: Weak<std::sync::Mutex<Database>>,
    changes: watch::Receiver<Revisions>,
    table: Table,
    seen: Option<u64>,
    query: QueryFn<T>,
}

impl LiveQuery<PastFix> {
    /// Every past fix, newest first.
    pub fn past_fixes(db: &SharedDatabase) -> Result<Self> {
        Self::new(db, Table::PastFixes, |db| db.list_past_fixes())
    }
}

impl LiveQuery<Expert> {
    /// The whole directory, best rated first.
    pub fn experts(db: &SharedDatabase) -> Result<Self> {
        Self::new(db, Table::Experts, |db| db.list_experts())
    }

    pub fn experts_by_category(db: &SharedDatabase, category: impl Into<String>) -> Result<Self> {
        let category = category.into();
        Self::new(db, Table::Experts, move |db| {
            db.list_experts_by_category(&category)
        })
    }
}

impl<T: Send + 'static> LiveQuery<T> {
    pub fn new<F>(db: &SharedDatabase, table: Table, query: F) -> Result<Self>
    where
        F: Fn(&Database) -> Result<Vec<T>> + Send + Sync + 'static,
    {
        let changes = lock(db)?.subscribe_changes();
        Ok(Self {
            db: Arc::downgrade(db),
            changes,
            table,
            seen: None,
            query: Arc::new(query),
        })
    }

    /// Wait for the next snapshot.
    pub async fn next(&mut self) -> Result<Vec<T>> {
        if let Some(seen) = self.seen {
            loop {
                self.changes
                    .changed()
                    .await
                    .map_err(|_| StoreError::Closed)?;
                if self.changes.borrow().get(self.table) != seen {
                    break;
                }
            }
        }

        // Record the revision before querying so a write that lands during
        // the query still wakes the next call.
        self.seen = Some(self.changes.borrow_and_update().get(self.table));
        self.fetch().await
    }

    /// Run the query now without waiting for a change.
    pub async fn fetch(&self) -> Result<Vec<T>> {
        let db = self.db.upgrade().ok_or(StoreError::Closed)?;
        let query = Arc::clone(&self.query);

        tokio::task::spawn_blocking(move || {
            let guard = lock(&db)?;
            query(&guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Adapt into a stream that ends when the database closes.
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<T>>> {
        futures::stream::unfold(Some(self), |state| async move {
            let mut live = state?;
            match live.next().await {
                Err(StoreError::Closed) => None,
                other => Some((other, Some(live))),
            }
        })
    }
}
