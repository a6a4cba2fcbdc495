use std::str::FromStr;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use tracing::debug;

use super::error::PlatformError;

/// Base HTTP access shared by every platform implementation.
///
/// Each instance carries its own default headers and query parameters, which
/// are attached to every request it builds. Platform clients wrap one of these
/// and only add their endpoint-specific logic on top.
///
/// # Example Usage
///
/// ```rust,no_run
/// use preview_platforms::api::api_client::ApiClient;
/// use reqwest::Client;
///
/// # fn demo() -> Result<(), preview_platforms::PlatformError> {
/// let mut api = ApiClient::new("Platform", "https://api.example.com", Client::new());
/// api.add_header("Client-Id", "abc123")?;
/// api.add_param("lang", "en");
///
/// // headers and params are attached automatically
/// let request = api.get("/games/top");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    // name of the platform, e.g., "Twitch"
    pub platform_name: String,
    // base url every relative path is joined onto
    pub base_url: String,
    pub client: Client,
    platform_headers: HeaderMap,
    pub platform_params: FxHashMap<String, String>,
}

impl ApiClient {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        platform_name: S1,
        base_url: S2,
        client: Client,
    ) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );

        Self {
            platform_name: platform_name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            platform_headers: default_headers,
            platform_params: FxHashMap::default(),
        }
    }

    pub fn add_header<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<(), PlatformError> {
        let name = HeaderName::from_str(key.as_ref())
            .map_err(|e| PlatformError::InvalidHeader(e.to_string()))?;
        let value = HeaderValue::from_str(value.as_ref())
            .map_err(|e| PlatformError::InvalidHeader(e.to_string()))?;
        self.platform_headers.insert(name, value);
        Ok(())
    }

    pub fn add_param<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.platform_params.insert(key.into(), value.into());
    }

    /// Resolves `path` against the base url. Absolute urls pass through.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    /// Create a request with the platform headers and params pre-configured.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!(platform = %self.platform_name, %method, %url, "Building request");

        let builder = self
            .client
            .request(method, url)
            .headers(self.platform_headers.clone());

        if self.platform_params.is_empty() {
            builder
        } else {
            builder.query(&self.platform_params)
        }
    }
}
