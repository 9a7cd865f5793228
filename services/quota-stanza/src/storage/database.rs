use std::path::Path;

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use super::error::StorageError;

/// Number of limit columns following `device` and `usr_id` in a limits row.
pub const LIMIT_FIELD_COUNT: usize = 10;

const LIMITS_LEADING_COLUMNS: usize = 2;

/// A row of the `users` table. The id is kept as stored so it can be
/// matched against `limits.usr_id` whatever its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Value,
    pub name: String,
}

/// One row of the `limits` table with every value rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitRow {
    pub device: String,
    pub fields: [String; LIMIT_FIELD_COUNT],
}

pub struct QuotaDatabase {
    conn: Connection,
}

impl QuotaDatabase {
    /// Opens an existing quota database without creating it.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let unavailable = |source| StorageError::Unavailable {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(unavailable)?;

        // sqlite opens lazily; touch the schema so a non-database file fails here.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(unavailable)?;

        debug!(path = %path.display(), "opened quota database");

        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, uname
            FROM users
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    pub fn find_user_id(&self, name: &str) -> Result<Option<Value>, StorageError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id
            FROM users
            WHERE uname = ?1
            "#,
        )?;

        let id = stmt
            .query_row(params![name], |row| row.get::<_, Value>(0))
            .optional()?;

        Ok(id)
    }

    /// Returns every limits row of a user, one per device, in store order.
    pub fn limits_for_user(&self, usr_id: &Value) -> Result<Vec<LimitRow>, StorageError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT *
            FROM limits
            WHERE usr_id = ?1
            "#,
        )?;

        let expected = LIMITS_LEADING_COLUMNS + LIMIT_FIELD_COUNT;
        let columns = stmt.column_count();
        if columns < expected {
            return Err(StorageError::MalformedLimits { columns, expected });
        }

        let rows = stmt.query_map(params![usr_id], |row| {
            let mut fields: [String; LIMIT_FIELD_COUNT] = Default::default();
            for (offset, field) in fields.iter_mut().enumerate() {
                *field = render_value(row.get_ref(LIMITS_LEADING_COLUMNS + offset)?);
            }

            Ok(LimitRow {
                device: render_value(row.get_ref(0)?),
                fields,
            })
        })?;

        let mut limits = Vec::new();
        for row in rows {
            limits.push(row?);
        }
        Ok(limits)
    }
}

/// Renders a stored value the way the quota administration tooling prints it.
pub fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "None".to_string(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => render_real(value),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Shortest round-trip digits; positional for exponents in `-4..16`,
/// otherwise `<mantissa>e<sign><at least two digits>`.
fn render_real(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if (-4..16).contains(&exponent) {
        let positional = format!("{value}");
        if positional.contains('.') {
            positional
        } else {
            format!("{positional}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::init_database;

    fn seeded() -> QuotaDatabase {
        let conn = Connection::open_in_memory().unwrap();
        init_database(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO users (id, uname) VALUES (1, 'alice'), (2, 'bob');
            INSERT INTO limits VALUES ('diskA', 1, 10, 20, 'G', 5, 'D', 100, 200, 'K', 2, 'D');
            INSERT INTO limits VALUES ('diskB', 1, 1.5, 2.5, 'T', 7, 'D', NULL, 0, 'M', 1, 'W');
            "#,
        )
        .unwrap();
        QuotaDatabase::from_connection(conn)
    }

    #[test]
    fn test_list_users() {
        let db = seeded();
        let users = db.list_users().unwrap();
        assert_eq!(
            users,
            vec![
                User { id: Value::Integer(1), name: "alice".into() },
                User { id: Value::Integer(2), name: "bob".into() },
            ]
        );
    }

    #[test]
    fn test_find_user_id() {
        let db = seeded();
        assert_eq!(db.find_user_id("bob").unwrap(), Some(Value::Integer(2)));
        assert_eq!(db.find_user_id("mallory").unwrap(), None);
    }

    #[test]
    fn test_limits_for_user_renders_values() {
        let db = seeded();
        let rows = db.limits_for_user(&Value::Integer(1)).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].device, "diskA");
        assert_eq!(
            rows[0].fields,
            ["10", "20", "G", "5", "D", "100", "200", "K", "2", "D"].map(String::from)
        );

        assert_eq!(rows[1].device, "diskB");
        assert_eq!(
            rows[1].fields,
            ["1.5", "2.5", "T", "7", "D", "None", "0", "M", "1", "W"].map(String::from)
        );
    }

    #[test]
    fn test_limits_for_user_without_rows() {
        let db = seeded();
        assert!(db.limits_for_user(&Value::Integer(2)).unwrap().is_empty());
    }

    #[test]
    fn test_limits_table_too_narrow() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE limits (device TEXT, usr_id INTEGER, block_soft INTEGER);
            "#,
        )
        .unwrap();
        let db = QuotaDatabase::from_connection(conn);

        match db.limits_for_user(&Value::Integer(1)) {
            Err(StorageError::MalformedLimits { columns, expected }) => {
                assert_eq!(columns, 3);
                assert_eq!(expected, 12);
            }
            other => panic!("expected malformed limits error, got {other:?}"),
        }
    }

    #[test]
    fn test_open_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        let err = QuotaDatabase::open(&path).err().expect("open should fail");
        assert!(matches!(err, StorageError::Unavailable { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_open_rejects_non_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        std::fs::write(&path, "this is not a sqlite database, just some text").unwrap();

        let err = QuotaDatabase::open(&path).err().expect("open should fail");
        assert!(matches!(err, StorageError::Unavailable { .. }));
    }

    #[test]
    fn test_text_ids_pass_through() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE users (id TEXT, uname TEXT);
            CREATE TABLE limits (
                device TEXT, usr_id TEXT,
                f0, f1, f2, f3, f4, f5, f6, f7, f8, f9
            );
            INSERT INTO users VALUES ('u-01', 'dave');
            INSERT INTO limits VALUES ('sdc', 'u-01', 4, 8, 'G', 3, 'D', 40, 80, 'K', 3, 'D');
            "#,
        )
        .unwrap();
        let db = QuotaDatabase::from_connection(conn);

        let id = db.find_user_id("dave").unwrap().expect("dave should exist");
        assert_eq!(id, Value::Text("u-01".into()));
        assert_eq!(db.list_users().unwrap()[0].id, id);

        let rows = db.limits_for_user(&id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].device, "sdc");
        assert_eq!(rows[0].fields[0], "4");
    }

    #[test]
    fn test_render_real() {
        assert_eq!(render_real(10.0), "10.0");
        assert_eq!(render_real(2.25), "2.25");
        assert_eq!(render_real(-4.0), "-4.0");
        assert_eq!(render_real(0.0), "0.0");
        assert_eq!(render_real(0.0001), "0.0001");
        assert_eq!(render_real(1e15), "1000000000000000.0");
    }

    #[test]
    fn test_render_real_exponent_form() {
        assert_eq!(render_real(1e16), "1e+16");
        assert_eq!(render_real(1e-5), "1e-05");
        assert_eq!(render_real(-2.5e-7), "-2.5e-07");
        assert_eq!(render_real(1.2345678901234568e17), "1.2345678901234568e+17");
        assert_eq!(render_real(3e100), "3e+100");
        assert_eq!(render_real(f64::INFINITY), "inf");
        assert_eq!(render_real(f64::NEG_INFINITY), "-inf");
    }
}
