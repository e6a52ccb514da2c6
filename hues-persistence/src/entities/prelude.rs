pub use super::game_snapshots::Entity as GameSnapshots;
