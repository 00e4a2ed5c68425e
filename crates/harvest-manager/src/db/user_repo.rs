//! User repository.

use rusqlite::{params, Row};

use super::{query_one, Database, DatabaseError};
use crate::models::{SaveError, User};

fn from_row(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        authentication_token: row.get("authentication_token")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert(db: &Database, user: &User) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO users (id, name, email, authentication_token, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id,
                user.name,
                user.email,
                user.authentication_token,
                user.created_at,
            ],
        )?;
        Ok(())
    })
}

/// Validates and inserts a new user; the email must be unused.
pub fn create(db: &Database, user: &User) -> Result<(), SaveError> {
    let mut errors = user.validate();
    if errors.on("email").is_empty() && find_by_email(db, &user.email)?.is_some() {
        errors.add("email", "has already been taken");
    }
    if !errors.is_empty() {
        return Err(SaveError::Invalid(errors));
    }
    insert(db, user)?;
    Ok(())
}

pub fn find(db: &Database, id: &str) -> Result<Option<User>, DatabaseError> {
    db.with_conn(|conn| query_one(conn, "SELECT * FROM users WHERE id = ?1", params![id], from_row))
}

pub fn find_by_email(db: &Database, email: &str) -> Result<Option<User>, DatabaseError> {
    db.with_conn(|conn| {
        query_one(
            conn,
            "SELECT * FROM users WHERE email = ?1 COLLATE NOCASE",
            params![email],
            from_row,
        )
    })
}

pub fn find_by_token(db: &Database, token: &str) -> Result<Option<User>, DatabaseError> {
    db.with_conn(|conn| {
        query_one(
            conn,
            "SELECT * FROM users WHERE authentication_token = ?1",
            params![token],
            from_row,
        )
    })
}

pub fn all(db: &Database) -> Result<Vec<User>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY created_at, id")?;
        let rows = stmt
            .query_map([], from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    #[test]
    fn test_create_and_lookup() {
        let db = test_db();
        let user = User::new("Admin", "admin@example.com");
        create(&db, &user).unwrap();

        assert_eq!(find(&db, &user.id).unwrap().unwrap().email, "admin@example.com");
        let by_token = find_by_token(&db, &user.authentication_token)
            .unwrap()
            .unwrap();
        assert_eq!(by_token.id, user.id);
        assert!(find_by_token(&db, "bogus").unwrap().is_none());
    }

    #[test]
    fn test_create_rejects_duplicate_email() {
        let db = test_db();
        create(&db, &User::new("Admin", "admin@example.com")).unwrap();

        match create(&db, &User::new("Other", "ADMIN@example.com")) {
            Err(SaveError::Invalid(errors)) => {
                assert_eq!(errors.on("email"), ["has already been taken"])
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(all(&db).unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_user() {
        let db = test_db();
        assert!(matches!(
            create(&db, &User::new("", "not-an-email")),
            Err(SaveError::Invalid(_))
        ));
    }
}
