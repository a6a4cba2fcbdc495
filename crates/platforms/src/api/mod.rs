mod default;
pub mod api_client;
pub mod error;
pub mod platform_api;
pub mod platforms;

pub use default::{ProxyConfig, create_client};
