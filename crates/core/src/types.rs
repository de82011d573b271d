/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Stable surrogate identifier for a stored record.
pub type RecordId = uuid::Uuid;
