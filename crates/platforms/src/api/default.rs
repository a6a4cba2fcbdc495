use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use rustls::{ClientConfig, crypto::ring};
use rustls_platform_verifier::BuilderVerifierExt;
use tracing::warn;

use super::error::PlatformError;

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Builds the shared HTTP client used for both API calls and image downloads.
///
/// The timeout bounds every request, so a hung download can no longer stall
/// the crawl loop forever.
pub fn create_client(
    proxy_config: Option<ProxyConfig>,
    timeout: Duration,
) -> Result<Client, PlatformError> {
    let provider = Arc::new(ring::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| PlatformError::ClientBuild(e.to_string()))?
        .with_platform_verifier()
        .map_err(|e| PlatformError::ClientBuild(e.to_string()))?
        .with_no_client_auth();

    let mut builder = Client::builder()
        .use_preconfigured_tls(tls_config)
        .user_agent(DEFAULT_UA)
        .timeout(timeout);

    if let Some(config) = proxy_config {
        match reqwest::Proxy::all(&config.url) {
            Ok(mut proxy) => {
                if let (Some(username), Some(password)) = (config.username, config.password) {
                    proxy = proxy.basic_auth(&username, &password);
                }
                builder = builder.proxy(proxy);
            }
            Err(e) => {
                warn!(proxy = %config.url, error = %e, "Failed to configure proxy, continuing without it");
            }
        }
    }

    Ok(builder.build()?)
}
