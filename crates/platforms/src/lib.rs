pub mod api;
pub mod media;

pub use api::error::PlatformError;
pub use api::platform_api::PlatformApi;
pub use api::platforms::twitch::{Twitch, TwitchCredentials};
pub use api::{ProxyConfig, create_client};
pub use media::{Game, LiveStream, PreviewSize};
