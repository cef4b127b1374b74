//! v001 -- Initial schema creation.
//!
//! Creates the `past_fixes` table. Column names are camelCase to stay
//! compatible with files written by earlier app builds.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS past_fixes (
    id            INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    title         TEXT NOT NULL,
    difficulty    TEXT NOT NULL,
    estimatedTime TEXT NOT NULL,
    toolsJson     TEXT NOT NULL,                   -- JSON array of strings
    stepsJson     TEXT NOT NULL,                   -- JSON array of strings
    category      TEXT NOT NULL DEFAULT 'general',
    date          INTEGER NOT NULL,                -- epoch milliseconds
    status        TEXT NOT NULL DEFAULT 'Completed'
);

CREATE INDEX IF NOT EXISTS idx_past_fixes_date ON past_fixes(date DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
