/// Primary keys are PostgreSQL BIGSERIAL; the in-memory store allocates the same way.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar day an inspection took place (no time-of-day, no zone).
pub type InspectionDate = chrono::NaiveDate;
