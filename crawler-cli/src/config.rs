use std::path::{Path, PathBuf};
use std::time::Duration;

use preview_crawler::{CrawlerConfig, FileNaming};
use preview_platforms::{Game, PreviewSize, ProxyConfig, TwitchCredentials};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Written on first start; the crawler exits until credentials are filled in.
const DEFAULT_CONFIG: &str = r#"# Preview crawler configuration

# Twitch application credentials, see https://dev.twitch.tv/console/apps
# Either client_secret or access_token is required next to client_id.
client_id = ""
client_secret = ""
# access_token = ""

# Seconds between two crawling passes
poll_delay = 300

# Seconds between two image downloads
image_delay = 0.8

# Preview image size: small, medium or large
preview_size = "medium"

# timestamp: keep every download, overwrite: keep only the latest per stream
file_naming = "timestamp"

output_dir = "images"

# Number of top games (1 to 100) to crawl when no games are listed below
top_games_limit = 20

# HTTP request timeout in seconds
request_timeout = 30

# Games to crawl. Filled in automatically from the top games on first run,
# so later runs crawl the same games.
# [[games]]
# id = "29595"
# name = "Dota 2"
"#;

/// Largest page Helix returns for `games/top`.
const MAX_TOP_GAMES: usize = 100;

const SAVED_HEADER: &str = "# Preview crawler configuration\n\n";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Twitch application client id
    pub client_id: String,

    /// Client secret for the app access token flow
    pub client_secret: Option<String>,

    /// Pre-issued access token, skips the token flow
    pub access_token: Option<String>,

    /// Seconds between two passes over all games
    pub poll_delay: u64,

    /// Seconds between two image downloads
    pub image_delay: f64,

    pub preview_size: PreviewSize,

    pub file_naming: FileNaming,

    pub output_dir: PathBuf,

    /// How many top games to resolve when `games` is empty
    pub top_games_limit: usize,

    /// HTTP request timeout in seconds
    pub request_timeout: u64,

    /// Proxy URL (supports http, https, socks5)
    pub proxy: Option<String>,

    pub proxy_username: Option<String>,

    pub proxy_password: Option<String>,

    /// Games to crawl, in order
    pub games: Vec<Game>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            access_token: None,
            poll_delay: 300,
            image_delay: 0.8,
            preview_size: PreviewSize::Medium,
            file_naming: FileNaming::Timestamp,
            output_dir: PathBuf::from("images"),
            top_games_limit: 20,
            request_timeout: 30,
            proxy: None,
            proxy_username: None,
            proxy_password: None,
            games: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration, creating a template file when none exists.
    ///
    /// Returns [`AppError::MissingCredentials`] both for a freshly created
    /// file and for one whose credentials are still empty.
    pub fn load_or_create(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, DEFAULT_CONFIG)?;
            return Err(AppError::MissingCredentials(path.to_path_buf()));
        }

        let config = Self::load(path)?;
        if !config.credentials().is_complete() {
            return Err(AppError::MissingCredentials(path.to_path_buf()));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, format!("{SAVED_HEADER}{toml_string}"))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), AppError> {
        if !self.image_delay.is_finite() || self.image_delay < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "image_delay must be a non-negative number, got {}",
                self.image_delay
            )));
        }
        if !(1..=MAX_TOP_GAMES).contains(&self.top_games_limit) {
            return Err(AppError::InvalidInput(format!(
                "top_games_limit must be between 1 and {MAX_TOP_GAMES}, got {}",
                self.top_games_limit
            )));
        }
        if let Some(game) = self
            .games
            .iter()
            .find(|g| g.id.trim().is_empty() || g.name.trim().is_empty())
        {
            return Err(AppError::InvalidInput(format!(
                "every configured game needs an id and a name, got {game:?}"
            )));
        }
        Ok(())
    }

    pub fn credentials(&self) -> TwitchCredentials {
        TwitchCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            access_token: self.access_token.clone(),
        }
    }

    pub fn proxy_config(&self) -> Option<ProxyConfig> {
        self.proxy.as_ref().map(|url| ProxyConfig {
            url: url.clone(),
            username: self.proxy_username.clone(),
            password: self.proxy_password.clone(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn crawler_config(&self) -> Result<CrawlerConfig, AppError> {
        let image_delay = Duration::try_from_secs_f64(self.image_delay)
            .map_err(|e| AppError::InvalidInput(format!("image_delay: {e}")))?;

        Ok(CrawlerConfig::default()
            .with_poll_delay(Duration::from_secs(self.poll_delay))
            .with_image_delay(image_delay)
            .with_preview_size(self.preview_size)
            .with_file_naming(self.file_naming)
            .with_output_dir(self.output_dir.clone()))
    }
}
