pub mod coordinates;
pub mod export;
pub mod game_events;
pub mod game_state;
pub mod scoring;
pub mod word_pool;

// Re-export main components
pub use coordinates::*;
pub use export::*;
pub use game_events::*;
pub use game_state::*;
pub use scoring::*;
pub use word_pool::*;
