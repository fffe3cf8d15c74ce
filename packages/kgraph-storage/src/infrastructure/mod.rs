//! Infrastructure layer - Storage adapters

mod json_file;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use json_file::JsonFileGraphStore;
pub use memory::InMemoryGraphStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteGraphStore;
