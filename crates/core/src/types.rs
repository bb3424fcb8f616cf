/// Primary key of every table (`BIGSERIAL`).
pub type DbId = i64;

/// `TIMESTAMPTZ` columns, read back in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
