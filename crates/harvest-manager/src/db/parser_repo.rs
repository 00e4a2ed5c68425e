//! Parser repository — CRUD operations for the `parsers` table.

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use super::{harvest_job_repo, query_one, Database, DatabaseError};
use crate::models::{Parser, SaveError, ValidationErrors};

fn from_row(row: &Row<'_>) -> Result<Parser, rusqlite::Error> {
    Ok(Parser {
        id: row.get("id")?,
        name: row.get("name")?,
        strategy: row.get("strategy")?,
        content: row.get("content")?,
        data_type: row.get("data_type")?,
        source_id: row.get("source_id")?,
        allow_full_and_flush: row.get("allow_full_and_flush")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// All parsers, ordered by name.
pub fn all(db: &Database) -> Result<Vec<Parser>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM parsers ORDER BY name COLLATE NOCASE, id")?;
        let rows = stmt
            .query_map([], from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn find(db: &Database, id: &str) -> Result<Option<Parser>, DatabaseError> {
    db.with_conn(|conn| query_one(conn, "SELECT * FROM parsers WHERE id = ?1", params![id], from_row))
}

fn name_taken(conn: &Connection, name: &str, except_id: &str) -> Result<bool, DatabaseError> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM parsers WHERE name = ?1 COLLATE NOCASE AND id != ?2)",
        params![name, except_id],
        |r| r.get(0),
    )?;
    Ok(taken)
}

/// Validates and persists `parser`, inserting or updating by id.
///
/// On success `updated_at` is refreshed. On validation failure nothing is
/// written and the field errors are returned.
pub fn save(db: &Database, parser: &mut Parser) -> Result<(), SaveError> {
    let now = Utc::now();
    let result = db.with_conn(|conn| {
        let mut errors = parser.validate();
        if errors.on("name").is_empty() && name_taken(conn, &parser.name, &parser.id)? {
            errors.add("name", "has already been taken");
        }
        if !errors.is_empty() {
            return Ok(errors);
        }

        conn.execute(
            "INSERT INTO parsers (id, name, strategy, content, data_type, source_id,
             allow_full_and_flush, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
               name = excluded.name,
               strategy = excluded.strategy,
               content = excluded.content,
               data_type = excluded.data_type,
               source_id = excluded.source_id,
               allow_full_and_flush = excluded.allow_full_and_flush,
               updated_at = excluded.updated_at",
            params![
                parser.id,
                parser.name,
                parser.strategy,
                parser.content,
                parser.data_type,
                parser.source_id,
                parser.allow_full_and_flush,
                parser.created_at,
                now,
            ],
        )?;
        Ok(ValidationErrors::new())
    });

    // The unique index still guards a name taken between the check and the write.
    let errors = match result {
        Err(err) if err.violates("parsers", "name") => {
            let mut errors = ValidationErrors::new();
            errors.add("name", "has already been taken");
            errors
        }
        other => other?,
    };

    if !errors.is_empty() {
        log::debug!("Parser {} failed validation: {:?}", parser.id, errors);
        return Err(SaveError::Invalid(errors));
    }
    parser.updated_at = now;
    Ok(())
}

/// Deletes a parser and, through the foreign key, its harvest jobs.
/// Returns whether a row was removed.
pub fn destroy(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM parsers WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}

/// Whether the parser has any harvest job that has not reached a final status.
pub fn running_jobs(db: &Database, parser_id: &str) -> Result<bool, DatabaseError> {
    Ok(harvest_job_repo::count_running_for_parser(db, parser_id)? > 0)
}
