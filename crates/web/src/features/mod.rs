pub mod achievements;
pub mod game;
pub mod leaderboard;
pub mod players;
pub mod tags;
