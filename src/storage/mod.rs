pub mod memory;
pub mod postgres;
pub mod sqlite;
pub mod timeout;
pub mod trait_def;

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;
pub use sqlite::SqliteStorage;
pub use timeout::TimeoutStorage;
pub use trait_def::{Storage, StorageError, StorageResult};

/// Current time as epoch milliseconds, the persisted timestamp unit.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
