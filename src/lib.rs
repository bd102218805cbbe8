pub mod collision;
pub mod compute;
pub mod display;
pub mod driver;
pub mod entities;
pub mod input;
pub mod leaderboard;
pub mod sound;
pub mod tuning;
