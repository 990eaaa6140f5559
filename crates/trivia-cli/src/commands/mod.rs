pub mod bank;
pub mod config;
pub mod play;
