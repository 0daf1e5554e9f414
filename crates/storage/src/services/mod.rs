pub mod achievements;
pub mod clock;
pub mod engine;
pub mod leaderboard;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::GameEngine;
