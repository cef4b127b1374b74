use rusqlite::Connection;

// Existing rows pick up the default, so no backfill statement is needed.
const UP_SQL: &str = r#"
ALTER TABLE past_fixes ADD COLUMN videoLinksJson TEXT NOT NULL DEFAULT '[]';
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
