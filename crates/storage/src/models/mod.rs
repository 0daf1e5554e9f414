mod achievement;
mod game_settings;
mod player;
mod tag;

pub use achievement::{Achievement, AchievementKind};
pub use game_settings::GameSettings;
pub use player::Player;
pub use tag::Tag;
