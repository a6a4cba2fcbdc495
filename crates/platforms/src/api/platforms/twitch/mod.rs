mod builder;
pub mod models;

pub use builder::{Twitch, TwitchCredentials};
