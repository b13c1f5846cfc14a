pub mod loader;
pub mod record;

pub use loader::{load_dataset, parse_dataset};
pub use record::{Dataset, EventRecord, ProcessStatsRecord, StartRecord};
