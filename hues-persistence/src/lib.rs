pub mod connection;
pub mod entities;
pub mod repositories;
pub mod store;

pub use repositories::SnapshotRepository;
pub use store::{MemorySnapshotStore, SnapshotStore, should_persist};
