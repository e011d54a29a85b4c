/// Primary keys (`BIGSERIAL`).
pub type DbId = i64;

/// Ids of the `*_statuses` lookup tables (`SMALLINT`).
pub type StatusId = i16;

pub type Timestamp = chrono::DateTime<chrono::Utc>;
