pub mod snapshot;
pub mod stack;

pub use snapshot::Snapshot;
pub use stack::{HistoryManager, DEFAULT_MAX_SIZE};
