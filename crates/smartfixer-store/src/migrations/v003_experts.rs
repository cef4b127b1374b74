use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS experts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name            TEXT NOT NULL,
    category        TEXT NOT NULL,
    phone           TEXT NOT NULL,
    email           TEXT NOT NULL,
    hourlyRate      REAL NOT NULL,
    description     TEXT NOT NULL,
    availability    TEXT NOT NULL,
    rating          REAL NOT NULL,
    yearsExperience INTEGER NOT NULL,
    certifications  TEXT NOT NULL,
    serviceArea     TEXT NOT NULL,
    createdAt       INTEGER NOT NULL               -- epoch milliseconds
);

CREATE INDEX IF NOT EXISTS idx_experts_category_rating ON experts(category, rating DESC);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
