use rusqlite::{params, Connection, OptionalExtension};

use crate::database::{Database, Table};
use crate::error::{Result, StoreError};
use crate::models::Expert;
use crate::past_fixes::millis_to_utc;

const SELECT_COLUMNS: &str = "SELECT id, name, category, phone, email, hourlyRate, description,
        availability, rating, yearsExperience, certifications, serviceArea, createdAt
 FROM experts";

impl Database {
    /// Insert an expert, replacing any row that already has the same id.
    /// Returns the row id.
    pub fn insert_expert(&self, expert: &Expert) -> Result<i64> {
        let id = insert_expert_row(self.conn(), expert)?;
        self.touch(Table::Experts);

        tracing::debug!(id, name = %expert.name, category = %expert.category, "expert saved");
        Ok(id)
    }

    /// Overwrite every column of an existing expert. Returns `false` when no
    /// row has that id.
    pub fn update_expert(&self, expert: &Expert) -> Result<bool> {
        let id = expert.id.ok_or(StoreError::MissingId)?;
        let affected = self.conn().execute(
            "UPDATE experts SET
                name = ?2, category = ?3, phone = ?4, email = ?5, hourlyRate = ?6,
                description = ?7, availability = ?8, rating = ?9, yearsExperience = ?10,
                certifications = ?11, serviceArea = ?12, createdAt = ?13
             WHERE id = ?1",
            params![
                id,
                expert.name,
                expert.category,
                expert.phone,
                expert.email,
                expert.hourly_rate,
                expert.description,
                expert.availability,
                expert.rating,
                expert.years_experience,
                expert.certifications,
                expert.service_area,
                expert.created_at.timestamp_millis(),
            ],
        )?;
        if affected > 0 {
            self.touch(Table::Experts);
        }
        Ok(affected > 0)
    }

    pub fn delete_expert(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM experts WHERE id = ?1", params![id])?;
        if affected > 0 {
            self.touch(Table::Experts);
        }
        Ok(affected > 0)
    }

    pub fn get_expert(&self, id: i64) -> Result<Option<Expert>> {
        let expert = self
            .conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_expert,
            )
            .optional()?;
        Ok(expert)
    }

    /// All experts, best rated first.
    pub fn list_experts(&self) -> Result<Vec<Expert>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY rating DESC, id ASC"))?;
        let rows = stmt.query_map([], row_to_expert)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn list_experts_by_category(&self, category: &str) -> Result<Vec<Expert>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT_COLUMNS} WHERE category = ?1 ORDER BY rating DESC, id ASC"
        ))?;
        let rows = stmt.query_map(params![category], row_to_expert)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn count_experts(&self) -> Result<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM experts", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Single INSERT used by both registration and seeding. A `None` id lets
/// SQLite assign one.
pub(crate) fn insert_expert_row(conn: &Connection, expert: &Expert) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT OR REPLACE INTO experts
            (id, name, category, phone, email, hourlyRate, description, availability,
             rating, yearsExperience, certifications, serviceArea, createdAt)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            expert.id,
            expert.name,
            expert.category,
            expert.phone,
            expert.email,
            expert.hourly_rate,
            expert.description,
            expert.availability,
            expert.rating,
            expert.years_experience,
            expert.certifications,
            expert.service_area,
            expert.created_at.timestamp_millis(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn row_to_expert(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expert> {
    let created_ms: i64 = row.get(12)?;

    Ok(Expert {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        category: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        hourly_rate: row.get(5)?,
        description: row.get(6)?,
        availability: row.get(7)?,
        rating: row.get(8)?,
        years_experience: row.get(9)?,
        certifications: row.get(10)?,
        service_area: row.get(11)?,
        created_at: millis_to_utc(12, created_ms)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expert(name: &str, category: &str, rating: f64) -> Expert {
        Expert {
            name: name.to_string(),
            category: category.to_string(),
            phone: "(555) 000-0000".to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            hourly_rate: 80.0,
            rating,
            years_experience: 5,
            ..Expert::default()
        }
    }

    #[test]
    fn test_insert_assigns_id_and_round_trips() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_expert(&expert("Pat Pipes", "plumbing", 4.2)).unwrap();

        let stored = db.get_expert(id).unwrap().unwrap();
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.name, "Pat Pipes");
        assert_eq!(stored.years_experience, 5);
        assert_eq!(stored.hourly_rate, 80.0);
    }

    #[test]
    fn test_insert_with_existing_id_replaces() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_expert(&expert("Old Name", "roofing", 3.0)).unwrap();

        let mut replacement = expert("New Name", "roofing", 4.0);
        replacement.id = Some(id);
        assert_eq!(db.insert_expert(&replacement).unwrap(), id);

        assert_eq!(db.count_experts().unwrap(), 1);
        assert_eq!(db.get_expert(id).unwrap().unwrap().name, "New Name");
    }

    #[test]
    fn test_listing_orders_by_rating() {
        let db = Database::open_in_memory().unwrap();
        db.insert_expert(&expert("Mid", "hvac", 4.5)).unwrap();
        db.insert_expert(&expert("Top", "electrical", 4.9)).unwrap();
        db.insert_expert(&expert("Low", "hvac", 3.1)).unwrap();

        let names: Vec<_> = db.list_experts().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Top", "Mid", "Low"]);

        let hvac: Vec<_> = db
            .list_experts_by_category("hvac")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(hvac, vec!["Mid", "Low"]);
        assert!(db.list_experts_by_category("locksmith").unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_expert(&expert("Sam Sparks", "electrical", 4.0)).unwrap();

        let mut changed = db.get_expert(id).unwrap().unwrap();
        changed.hourly_rate = 120.0;
        assert!(db.update_expert(&changed).unwrap());
        assert_eq!(db.get_expert(id).unwrap().unwrap().hourly_rate, 120.0);

        assert!(db.delete_expert(id).unwrap());
        assert!(!db.delete_expert(id).unwrap());
        assert_eq!(db.count_experts().unwrap(), 0);
    }

    #[test]
    fn test_update_requires_id() {
        let db = Database::open_in_memory().unwrap();
        let err = db.update_expert(&expert("Nobody", "general", 1.0)).unwrap_err();
        assert!(matches!(err, StoreError::MissingId));
    }

    #[test]
    fn test_update_unknown_id_is_false() {
        let db = Database::open_in_memory().unwrap();
        let mut ghost = expert("Ghost", "general", 1.0);
        ghost.id = Some(999);
        assert!(!db.update_expert(&ghost).unwrap());
    }
}
