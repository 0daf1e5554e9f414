pub mod achievement;
pub mod player;
pub mod settings;
pub mod tag;

pub use achievement::AchievementRepository;
pub use player::PlayerRepository;
pub use settings::SettingsRepository;
pub use tag::TagRepository;
