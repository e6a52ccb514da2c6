pub mod prelude;

pub mod game_snapshots;
