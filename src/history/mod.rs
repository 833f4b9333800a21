mod entry;
mod error;
mod store;

pub use entry::HistoryEntry;
pub use entry::ScrollPosition;
pub use error::Error;
pub use store::HistoryStore;
