//! Shared primitive type aliases.

pub type DbId = i64;
pub type Timestamp = chrono::DateTime<chrono::Utc>;
