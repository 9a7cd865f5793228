pub mod database;
pub mod error;
pub mod schema;

pub use database::{LimitRow, QuotaDatabase, User, LIMIT_FIELD_COUNT};
pub use error::StorageError;

pub const QUOTA_DB_FILENAME: &str = "myquotas.db";
