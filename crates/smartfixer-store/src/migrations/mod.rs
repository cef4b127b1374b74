//! Database migration runner.
//!
//! Migrations are executed in order on every [`crate::Database`] open. The
//! applied version lives in `PRAGMA user_version`; each step runs in its own
//! transaction together with the version bump so a failed step leaves the
//! file at the previous version.

pub mod v001_initial;
pub mod v002_video_links;
pub mod v003_experts;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version. Bump this and add a new migration module whenever
/// the schema changes.
pub const CURRENT_VERSION: u32 = 3;

type Step = fn(&Connection) -> std::result::Result<(), rusqlite::Error>;

const STEPS: [(u32, &str, Step); 3] = [
    (1, "v001_initial", v001_initial::up),
    (2, "v002_video_links", v002_video_links::up),
    (3, "v003_experts", v003_experts::up),
];

pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Run all pending migrations against the open connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    migrate_to(conn, CURRENT_VERSION)
}

/// Apply migrations up to and including `target`.
///
/// Fails if the file is already past `CURRENT_VERSION` or past `target`.
pub fn migrate_to(conn: &Connection, target: u32) -> Result<()> {
    let current = schema_version(conn)?;

    tracing::info!(
        current_version = current,
        target_version = target,
        "checking database migrations"
    );

    if current > CURRENT_VERSION {
        return Err(StoreError::SchemaTooNew {
            found: current,
            supported: CURRENT_VERSION,
        });
    }
    if target > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "unknown target version {target}"
        )));
    }
    if current > target {
        return Err(StoreError::Migration(format!(
            "cannot downgrade from version {current} to {target}"
        )));
    }

    for (version, name, up) in STEPS {
        if version <= current || version > target {
            continue;
        }
        tracing::info!(migration = name, "applying migration");

        let tx = conn.unchecked_transaction()?;
        up(&tx).map_err(|e| StoreError::Migration(format!("{name}: {e}")))?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn test_fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
        assert!(column_names(&conn, "past_fixes").contains(&"videoLinksJson".to_string()));
        assert_eq!(column_names(&conn, "experts").len(), 13);
    }

    #[test]
    fn test_video_links_backfilled_for_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v1.db");

        {
            let conn = Connection::open(&path).unwrap();
            migrate_to(&conn, 1).unwrap();
            conn.execute(
                "INSERT INTO past_fixes (title, difficulty, estimatedTime, toolsJson, stepsJson, category, date, status)
                 VALUES ('Squeaky Hinge', 'Easy', '5 minutes', '[\"oil\"]', '[\"Apply oil\"]', 'general', 1000, 'Completed')",
                [],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO past_fixes (title, difficulty, estimatedTime, toolsJson, stepsJson, date)
                 VALUES ('Tripped Breaker', 'Medium', '15 minutes', '[]', '[]', 2000)",
                [],
            )
            .unwrap();
            assert!(!column_names(&conn, "past_fixes").contains(&"videoLinksJson".to_string()));
        }

        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.schema_version().unwrap(), 3);

        let fixes = db.list_past_fixes().unwrap();
        assert_eq!(fixes.len(), 2);

        let breaker = &fixes[0];
        assert_eq!(breaker.title, "Tripped Breaker");
        assert_eq!(breaker.category, "general");
        assert_eq!(breaker.status, "Completed");
        assert!(breaker.video_links.is_empty());

        let hinge = &fixes[1];
        assert_eq!(hinge.title, "Squeaky Hinge");
        assert_eq!(hinge.difficulty, "Easy");
        assert_eq!(hinge.estimated_time, "5 minutes");
        assert_eq!(hinge.tools, vec!["oil".to_string()]);
        assert_eq!(hinge.steps, vec!["Apply oil".to_string()]);
        assert_eq!(hinge.date.timestamp_millis(), 1000);

        let raw: Vec<String> = {
            let mut stmt = db.conn().prepare("SELECT videoLinksJson FROM past_fixes").unwrap();
            let rows = stmt.query_map([], |row| row.get(0)).unwrap();
            rows.collect::<std::result::Result<_, _>>().unwrap()
        };
        assert_eq!(raw, vec!["[]".to_string(), "[]".to_string()]);
    }

    #[test]
    fn test_experts_table_added_on_top_of_version_two() {
        let conn = Connection::open_in_memory().unwrap();
        migrate_to(&conn, 2).unwrap();
        assert!(column_names(&conn, "experts").is_empty());

        migrate_to(&conn, 3).unwrap();
        assert!(column_names(&conn, "experts").contains(&"yearsExperience".to_string()));
    }

    #[test]
    fn test_refuses_newer_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", 9).unwrap();
        }

        let err = Database::open_at(&path).err().unwrap();
        assert!(matches!(
            err,
            StoreError::SchemaTooNew { found: 9, supported: 3 }
        ));
    }

    #[test]
    fn test_refuses_explicit_downgrade() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert!(matches!(migrate_to(&conn, 1), Err(StoreError::Migration(_))));
    }
}
