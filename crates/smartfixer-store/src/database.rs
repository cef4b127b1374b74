//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation. It also owns the revision
//! channel that [`crate::LiveQuery`] subscribers listen on, so dropping the
//! handle closes every open subscription.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use directories::ProjectDirs;
use rusqlite::Connection;
use tokio::sync::watch;

use crate::error::{Result, StoreError};
use crate::migrations;

/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE: &str = "smartfixer.db";

/// Handle shared between the view-models and live queries.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Tables that carry a change revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    PastFixes,
    Experts,
}

/// Monotonic write counters, one per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Revisions {
    pub past_fixes: u64,
    pub experts: u64,
}

impl Revisions {
    pub fn get(&self, table: Table) -> u64 {
        match table {
            Table::PastFixes => self.past_fixes,
            Table::Experts => self.experts,
        }
    }
}

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
    revisions: watch::Sender<Revisions>,
}

/// Platform data directory for SmartFixer files.
///
/// - Linux:   `~/.local/share/smartfixer`
/// - macOS:   `~/Library/Application Support/com.smartfixer.smartfixer`
/// - Windows: `{FOLDERID_RoamingAppData}\smartfixer\smartfixer\data`
pub fn default_data_dir() -> Result<PathBuf> {
    let project_dirs =
        ProjectDirs::from("com", "smartfixer", "smartfixer").ok_or(StoreError::NoDataDir)?;
    Ok(project_dirs.data_dir().to_path_buf())
}

impl Database {
    /// Open (or create) the default application database.
    pub fn new() -> Result<Self> {
        let data_dir = default_data_dir()?;
        Self::open_in_dir(&data_dir)
    }

    /// Open (or create) `smartfixer.db` inside `dir`, creating the directory.
    pub fn open_in_dir(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Self::open_at(&dir.join(DATABASE_FILE))
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening database");

        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "journal mode set");

        Self::from_connection(conn)
    }

    /// Open a private in-memory database. Contents vanish on drop.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run_migrations(&conn)?;

        let (revisions, _) = watch::channel(Revisions::default());
        Ok(Self { conn, revisions })
    }

    /// Move the handle behind the shared mutex the async layers use.
    pub fn into_shared(self) -> SharedDatabase {
        Arc::new(Mutex::new(self))
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed CRUD helpers, but direct access is
    /// occasionally needed for transactions or ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// Current schema version recorded in the file.
    pub fn schema_version(&self) -> Result<u32> {
        migrations::schema_version(&self.conn)
    }

    /// Receive a notification after every write.
    pub fn subscribe_changes(&self) -> watch::Receiver<Revisions> {
        self.revisions.subscribe()
    }

    pub(crate) fn touch(&self, table: Table) {
        self.revisions.send_modify(|r| match table {
            Table::PastFixes => r.past_fixes += 1,
            Table::Experts => r.experts += 1,
        });
    }
}

/// Lock a shared handle, mapping poisoning to [`StoreError::LockPoisoned`].
pub fn lock(db: &SharedDatabase) -> Result<MutexGuard<'_, Database>> {
    db.lock().map_err(|_| StoreError::LockPoisoned)
}
