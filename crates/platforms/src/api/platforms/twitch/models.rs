use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::media::{Game, LiveStream, PreviewSize};

/// Envelope shared by every Helix endpoint.
#[derive(Debug, Deserialize)]
pub struct HelixResponse<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct HelixGame {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub box_art_url: String,
    #[serde(default)]
    pub igdb_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HelixStream {
    pub id: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub game_id: String,
    pub game_name: String,
    #[serde(rename = "type")]
    pub stream_type: String,
    pub title: String,
    pub viewer_count: u64,
    pub started_at: String,
    // e.g. https://static-cdn.jtvnw.net/previews-ttv/live_user_foo-{width}x{height}.jpg
    pub thumbnail_url: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub token_type: String,
}

/// Error body returned by Helix and the id endpoint on 4xx.
#[derive(Debug, Deserialize)]
pub struct HelixError {
    #[serde(default)]
    pub error: String,
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

/// Expands a Helix thumbnail template into one url per preview size.
pub fn preview_from_template(template: &str) -> FxHashMap<String, String> {
    PreviewSize::ALL
        .iter()
        .map(|size| {
            let (width, height) = size.dimensions();
            let url = template
                .replace("{width}", &width.to_string())
                .replace("{height}", &height.to_string());
            (size.as_str().to_string(), url)
        })
        .collect()
}

impl From<HelixGame> for Game {
    fn from(game: HelixGame) -> Self {
        Game::new(game.id, game.name)
    }
}

impl From<HelixStream> for LiveStream {
    fn from(stream: HelixStream) -> Self {
        LiveStream {
            preview: preview_from_template(&stream.thumbnail_url),
            id: stream.id,
            user_login: stream.user_login,
            viewer_count: stream.viewer_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP_GAMES: &str = r#"{
        "data": [
            {"id": "29595", "name": "Dota 2", "box_art_url": "https://static-cdn.jtvnw.net/ttv-boxart/29595-{width}x{height}.jpg", "igdb_id": "2963"},
            {"id": "21779", "name": "League of Legends", "box_art_url": "", "igdb_id": "115"}
        ],
        "pagination": {"cursor": "eyJiIjpudWxsLCJhIjp7Ik8iOjIwfX0"}
    }"#;

    const STREAMS: &str = r#"{
        "data": [{
            "id": "40952121085",
            "user_id": "101051819",
            "user_login": "afro",
            "user_name": "Afro",
            "game_id": "32982",
            "game_name": "Grand Theft Auto V",
            "type": "live",
            "title": "Jacob: Digital Den Laptops & Routers",
            "tags": ["English"],
            "viewer_count": 1490,
            "started_at": "2021-03-10T03:18:11Z",
            "language": "en",
            "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_afro-{width}x{height}.jpg",
            "is_mature": false
        }],
        "pagination": {}
    }"#;

    #[test]
    fn test_parse_top_games() {
        let response: HelixResponse<HelixGame> = serde_json::from_str(TOP_GAMES).unwrap();
        let games: Vec<Game> = response.data.into_iter().map(Game::from).collect();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0], Game::new("29595", "Dota 2"));
        assert_eq!(games[1].name, "League of Legends");
    }

    #[test]
    fn test_parse_streams_builds_preview_map() {
        let response: HelixResponse<HelixStream> = serde_json::from_str(STREAMS).unwrap();
        let stream = LiveStream::from(response.data.into_iter().next().unwrap());

        assert_eq!(stream.user_login, "afro");
        assert_eq!(stream.viewer_count, 1490);
        assert_eq!(
            stream.preview_url(PreviewSize::Medium),
            Some("https://static-cdn.jtvnw.net/previews-ttv/live_user_afro-320x180.jpg")
        );
        assert_eq!(
            stream.preview_url(PreviewSize::Small),
            Some("https://static-cdn.jtvnw.net/previews-ttv/live_user_afro-80x45.jpg")
        );
        assert_eq!(
            stream.preview_url(PreviewSize::Large),
            Some("https://static-cdn.jtvnw.net/previews-ttv/live_user_afro-640x360.jpg")
        );
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error":"Unauthorized","status":401,"message":"Invalid OAuth token"}"#;
        let error: HelixError = serde_json::from_str(body).unwrap();
        assert_eq!(error.status, 401);
        assert_eq!(error.message, "Invalid OAuth token");
    }
}
