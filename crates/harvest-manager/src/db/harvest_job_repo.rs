//! Harvest job repository — CRUD operations for the `harvest_jobs` table.

use rusqlite::{params, Row};

use super::{query_one, Database, DatabaseError};
use crate::models::{HarvestJob, JobStatus};

fn from_row(row: &Row<'_>) -> Result<HarvestJob, rusqlite::Error> {
    Ok(HarvestJob {
        id: row.get("id")?,
        parser_id: row.get("parser_id")?,
        user_id: row.get("user_id")?,
        environment: row.get("environment")?,
        mode: row.get("mode")?,
        status: row.get("status")?,
        limit: row.get("limit")?,
        records_count: row.get("records_count")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert(db: &Database, job: &HarvestJob) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO harvest_jobs (id, parser_id, user_id, environment, mode, status,
             \"limit\", records_count, start_time, end_time, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                job.id,
                job.parser_id,
                job.user_id,
                job.environment,
                job.mode,
                job.status,
                job.limit,
                job.records_count,
                job.start_time,
                job.end_time,
                job.created_at,
                job.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Overwrites the mutable fields of an existing job.
pub fn update(db: &Database, job: &HarvestJob) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE harvest_jobs SET environment=?2, mode=?3, status=?4, \"limit\"=?5,
             records_count=?6, start_time=?7, end_time=?8, updated_at=?9
             WHERE id=?1",
            params![
                job.id,
                job.environment,
                job.mode,
                job.status,
                job.limit,
                job.records_count,
                job.start_time,
                job.end_time,
                job.updated_at,
            ],
        )?;
        Ok(())
    })
}

pub fn find(db: &Database, id: &str) -> Result<Option<HarvestJob>, DatabaseError> {
    db.with_conn(|conn| {
        query_one(
            conn,
            "SELECT * FROM harvest_jobs WHERE id = ?1",
            params![id],
            from_row,
        )
    })
}

/// A parser's jobs, newest first.
pub fn for_parser(db: &Database, parser_id: &str) -> Result<Vec<HarvestJob>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM harvest_jobs WHERE parser_id = ?1 ORDER BY created_at DESC, id",
        )?;
        let rows = stmt
            .query_map(params![parser_id], from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn count_running_for_parser(db: &Database, parser_id: &str) -> Result<u64, DatabaseError> {
    let [ready, active, paused] = JobStatus::RUNNING;
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM harvest_jobs WHERE parser_id = ?1 AND status IN (?2, ?3, ?4)",
            params![parser_id, ready, active, paused],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{parser_repo, user_repo};
    use crate::models::{Environment, HarvestMode, Parser, ParserAttributes, User};
    use chrono::{Duration, Utc};

    struct Fixture {
        db: Database,
        parser: Parser,
        user: User,
    }

    fn fixture() -> Fixture {
        let db = Database::open_in_memory().expect("Failed to create test database");
        let mut parser = Parser::from_attributes(ParserAttributes::named("Tepapa"));
        parser_repo::save(&db, &mut parser).unwrap();
        let user = User::new("Admin", "admin@example.com");
        user_repo::insert(&db, &user).unwrap();
        Fixture { db, parser, user }
    }

    #[test]
    fn test_insert_and_find() {
        let f = fixture();
        let mut job = HarvestJob::from_parser(&f.parser, &f.user);
        job.environment = Environment::Production;
        job.mode = HarvestMode::Incremental;
        job.limit = Some(50);
        insert(&f.db, &job).unwrap();

        let found = find(&f.db, &job.id).unwrap().unwrap();
        assert_eq!(found.parser_id, f.parser.id);
        assert_eq!(found.user_id, f.user.id);
        assert_eq!(found.environment, Environment::Production);
        assert_eq!(found.mode, HarvestMode::Incremental);
        assert_eq!(found.status, JobStatus::Ready);
        assert_eq!(found.limit, Some(50));
    }

    #[test]
    fn test_find_nonexistent() {
        let f = fixture();
        assert!(find(&f.db, "missing").unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let f = fixture();
        let mut job = HarvestJob::from_parser(&f.parser, &f.user);
        insert(&f.db, &job).unwrap();

        job.status = JobStatus::Finished;
        job.records_count = 1200;
        job.end_time = Some(Utc::now());
        update(&f.db, &job).unwrap();

        let found = find(&f.db, &job.id).unwrap().unwrap();
        assert_eq!(found.status, JobStatus::Finished);
        assert_eq!(found.records_count, 1200);
        assert!(found.end_time.is_some());
    }

    #[test]
    fn test_for_parser_newest_first() {
        let f = fixture();
        let mut older = HarvestJob::from_parser(&f.parser, &f.user);
        older.created_at = Utc::now() - Duration::hours(1);
        insert(&f.db, &older).unwrap();
        let newer = HarvestJob::from_parser(&f.parser, &f.user);
        insert(&f.db, &newer).unwrap();

        let ids: Vec<String> = for_parser(&f.db, &f.parser.id)
            .unwrap()
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, [newer.id, older.id]);
    }

    #[test]
    fn test_count_running_for_parser() {
        let f = fixture();
        for status in [
            JobStatus::Ready,
            JobStatus::Active,
            JobStatus::Paused,
            JobStatus::Stopped,
            JobStatus::Finished,
            JobStatus::Failed,
        ] {
            let mut job = HarvestJob::from_parser(&f.parser, &f.user);
            job.status = status;
            insert(&f.db, &job).unwrap();
        }

        assert_eq!(count_running_for_parser(&f.db, &f.parser.id).unwrap(), 3);
        assert_eq!(count_running_for_parser(&f.db, "other").unwrap(), 0);
    }

    #[test]
    fn test_insert_requires_existing_parser() {
        let f = fixture();
        let mut orphan = HarvestJob::from_parser(&f.parser, &f.user);
        orphan.parser_id = "missing".to_string();
        assert!(insert(&f.db, &orphan).is_err());
    }
}
