use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use crate::database::{Database, Table};
use crate::error::Result;
use crate::models::{NewPastFix, PastFix};

const SELECT_COLUMNS: &str = "SELECT id, title, difficulty, estimatedTime, toolsJson, stepsJson,
        category, date, status, videoLinksJson
 FROM past_fixes";

impl Database {
    /// Append a past fix and return its new id.
    pub fn insert_past_fix(&self, fix: &NewPastFix) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO past_fixes
                (title, difficulty, estimatedTime, toolsJson, stepsJson, category, date, status, videoLinksJson)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                fix.title,
                fix.difficulty,
                fix.estimated_time,
                serde_json::to_string(&fix.tools)?,
                serde_json::to_string(&fix.steps)?,
                fix.category,
                fix.date.timestamp_millis(),
                fix.status,
                serde_json::to_string(&fix.video_links)?,
            ],
        )?;
        let id = self.conn().last_insert_rowid();
        self.touch(Table::PastFixes);

        tracing::debug!(id, title = %fix.title, category = %fix.category, "past fix saved");
        Ok(id)
    }

    /// All past fixes, newest first.
    pub fn list_past_fixes(&self) -> Result<Vec<PastFix>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC, id DESC"))?;
        let rows = stmt.query_map([], row_to_past_fix)?;

        let mut fixes = Vec::new();
        for row in rows {
            fixes.push(row?);
        }
        Ok(fixes)
    }

    pub fn get_past_fix(&self, id: i64) -> Result<Option<PastFix>> {
        let fix = self
            .conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_past_fix,
            )
            .optional()?;
        Ok(fix)
    }

    pub fn count_past_fixes(&self) -> Result<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM past_fixes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn row_to_past_fix(row: &rusqlite::Row<'_>) -> rusqlite::Result<PastFix> {
    let tools_json: String = row.get(4)?;
    let steps_json: String = row.get(5)?;
    let date_ms: i64 = row.get(7)?;
    let video_json: String = row.get(9)?;

    Ok(PastFix {
        id: row.get(0)?,
        title: row.get(1)?,
        difficulty: row.get(2)?,
        estimated_time: row.get(3)?,
        tools: json_list(4, &tools_json)?,
        steps: json_list(5, &steps_json)?,
        category: row.get(6)?,
        date: millis_to_utc(7, date_ms)?,
        status: row.get(8)?,
        video_links: json_list(9, &video_json)?,
    })
}

pub(crate) fn json_list(idx: usize, raw: &str) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub(crate) fn millis_to_utc(idx: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use smartfixer_shared::DiagnosisResult;

    fn result(title: &str, category: &str) -> DiagnosisResult {
        DiagnosisResult {
            title: title.to_string(),
            difficulty: "Easy".to_string(),
            estimated_time: "30-45 minutes".to_string(),
            tools: vec!["wrench".to_string(), "plumber's tape".to_string()],
            steps: vec!["Turn off water".to_string(), "Replace washer".to_string()],
            category: category.to_string(),
        }
    }

    #[test]
    fn test_insert_then_get_by_id() {
        let db = Database::open_in_memory().unwrap();
        let new = NewPastFix::from_result(&result("Leaky Kitchen Faucet", "plumbing"));

        let id = db.insert_past_fix(&new).unwrap();
        let fix = db.get_past_fix(id).unwrap().expect("row exists");

        assert_eq!(fix.id, id);
        assert_eq!(fix.title, "Leaky Kitchen Faucet");
        assert_eq!(fix.tools, new.tools);
        assert_eq!(fix.steps, new.steps);
        assert_eq!(fix.status, "Completed");
        assert!(fix.video_links.is_empty());
        assert_eq!(fix.date.timestamp_millis(), new.date.timestamp_millis());
    }

    #[test]
    fn test_missing_id_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_past_fix(42).unwrap().is_none());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_past_fix(&NewPastFix::from_result(&result("A", "general"))).unwrap();
        let b = db.insert_past_fix(&NewPastFix::from_result(&result("B", "general"))).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_listing_is_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let base = Utc::now();

        for (title, offset) in [("middle", 10), ("oldest", 0), ("newest", 20)] {
            let fix = NewPastFix::from_result(&result(title, "general"))
                .dated(base + Duration::minutes(offset));
            db.insert_past_fix(&fix).unwrap();
        }

        let titles: Vec<_> = db
            .list_past_fixes()
            .unwrap()
            .into_iter()
            .map(|f| f.title)
            .collect();
        assert_eq!(titles, vec!["newest", "middle", "oldest"]);

        let later = NewPastFix::from_result(&result("latest", "hvac"))
            .dated(base + Duration::minutes(30));
        db.insert_past_fix(&later).unwrap();
        assert_eq!(db.list_past_fixes().unwrap()[0].title, "latest");
        assert_eq!(db.count_past_fixes().unwrap(), 4);
    }

    #[test]
    fn test_insert_bumps_revision() {
        let db = Database::open_in_memory().unwrap();
        let rx = db.subscribe_changes();
        db.insert_past_fix(&NewPastFix::from_result(&result("A", "general"))).unwrap();
        assert_eq!(rx.borrow().past_fixes, 1);
        assert_eq!(rx.borrow().experts, 0);
    }
}
