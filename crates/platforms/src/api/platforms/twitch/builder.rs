use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::api::api_client::ApiClient;
use crate::api::error::PlatformError;
use crate::api::platform_api::PlatformApi;
use crate::api::platforms::twitch::models::{
    HelixError, HelixGame, HelixResponse, HelixStream, TokenResponse,
};
use crate::media::{Game, LiveStream};

/// Application credentials for the Helix API.
///
/// Either a pre-issued `access_token` or a `client_secret` (for the
/// client-credentials flow) must accompany the `client_id`.
#[derive(Debug, Clone, Default)]
pub struct TwitchCredentials {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
}

impl TwitchCredentials {
    pub fn is_complete(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        !self.client_id.trim().is_empty()
            && (present(&self.client_secret) || present(&self.access_token))
    }
}

pub struct Twitch {
    api: ApiClient,
    credentials: TwitchCredentials,
    authenticated: bool,
}

impl Twitch {
    const HELIX_URL: &str = "https://api.twitch.tv/helix";
    const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
    /// Helix caps `first` at 100 for both endpoints we use.
    const MAX_PAGE_SIZE: usize = 100;

    pub fn new(client: Client, credentials: TwitchCredentials) -> Result<Self, PlatformError> {
        let mut api = ApiClient::new("Twitch", Self::HELIX_URL, client);
        api.add_header("Client-Id", credentials.client_id.trim())?;

        let mut authenticated = false;
        if let Some(token) = credentials
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            api.add_header(
                reqwest::header::AUTHORIZATION.as_str(),
                format!("Bearer {token}"),
            )?;
            authenticated = true;
        }

        Ok(Self {
            api,
            credentials,
            authenticated,
        })
    }

    /// Obtains an app access token through the client-credentials flow.
    ///
    /// No-op when a token was configured up front. The token is not refreshed
    /// on expiry; once Helix rejects it, requests fail with `AuthError`.
    pub async fn authenticate(&mut self) -> Result<(), PlatformError> {
        if self.authenticated {
            return Ok(());
        }

        let secret = self
            .credentials
            .client_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                PlatformError::AuthError(
                    "no access token configured and no client secret to request one".to_string(),
                )
            })?;

        let request = self.api.post(Self::TOKEN_URL).query(&[
            ("client_id", self.credentials.client_id.trim()),
            ("client_secret", secret),
            ("grant_type", "client_credentials"),
        ]);
        let token: TokenResponse = Self::send_json(request).await?;
        info!(
            expires_in = token.expires_in,
            token_type = %token.token_type,
            "Obtained Twitch app access token"
        );

        self.api.add_header(
            reqwest::header::AUTHORIZATION.as_str(),
            format!("Bearer {}", token.access_token),
        )?;
        self.authenticated = true;
        Ok(())
    }

    // Bodies are never logged: the token endpoint answers with the secret token.
    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, PlatformError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Received response");

        if !status.is_success() {
            return Err(error_from_response(status, body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn top_games_request(&self, limit: usize) -> RequestBuilder {
        let first = limit.clamp(1, Self::MAX_PAGE_SIZE).to_string();
        self.api.get("games/top").query(&[("first", first.as_str())])
    }

    fn live_streams_request(&self, game_id: &str) -> Result<RequestBuilder, PlatformError> {
        if game_id.trim().is_empty() {
            return Err(PlatformError::ValidationError(
                "game id must not be empty".to_string(),
            ));
        }

        let first = Self::MAX_PAGE_SIZE.to_string();
        Ok(self
            .api
            .get("streams")
            .query(&[("game_id", game_id), ("first", first.as_str())]))
    }

    pub async fn get_top_games(&self, limit: usize) -> Result<Vec<Game>, PlatformError> {
        let response: HelixResponse<HelixGame> =
            Self::send_json(self.top_games_request(limit)).await?;

        let games: Vec<Game> = response.data.into_iter().map(Game::from).collect();
        debug!(
            "Found the following games: {}",
            games
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(games)
    }

    pub async fn get_live_streams(&self, game_id: &str) -> Result<Vec<LiveStream>, PlatformError> {
        let response: HelixResponse<HelixStream> =
            Self::send_json(self.live_streams_request(game_id)?).await?;
        Ok(live_only(response.data))
    }
}

/// Maps a non-2xx response to an error, preferring the Helix `message`.
fn error_from_response(status: StatusCode, body: String) -> PlatformError {
    let message = serde_json::from_str::<HelixError>(&body)
        .map(|e| {
            if e.message.is_empty() {
                e.error
            } else {
                e.message
            }
        })
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PlatformError::AuthError(message),
        _ => PlatformError::ApiError {
            status: status.as_u16(),
            message,
        },
    }
}

/// Helix reports `type = ""` for streams that went offline mid-listing.
fn live_only(streams: Vec<HelixStream>) -> Vec<LiveStream> {
    streams
        .into_iter()
        .filter(|s| s.stream_type == "live")
        .map(LiveStream::from)
        .collect()
}

#[async_trait]
impl PlatformApi for Twitch {
    fn platform_name(&self) -> &str {
        &self.api.platform_name
    }

    async fn top_games(&self, limit: usize) -> Result<Vec<Game>, PlatformError> {
        self.get_top_games(limit).await
    }

    async fn live_streams(&self, game: &Game) -> Result<Vec<LiveStream>, PlatformError> {
        self.get_live_streams(&game.id).await
    }
}
