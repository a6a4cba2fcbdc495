use preview_platforms::{Game, PlatformApi};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::error::CrawlError;

/// Where a [`GameList`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSource {
    /// Taken verbatim from configuration
    Configured,
    /// Fetched from the platform's top games
    TopGames,
}

/// Ordered list of games, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameList {
    games: Vec<Game>,
}

impl GameList {
    /// Builds the list in first-seen order. When an id repeats, the entry
    /// keeps its position and takes the later name.
    pub fn from_entries<I: IntoIterator<Item = Game>>(entries: I) -> Self {
        let mut games: Vec<Game> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();

        for game in entries {
            match index.get(&game.id) {
                Some(&pos) => games[pos].name = game.name,
                None => {
                    index.insert(game.id.clone(), games.len());
                    games.push(game);
                }
            }
        }

        Self { games }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Game> {
        self.games.iter()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn as_slice(&self) -> &[Game] {
        &self.games
    }

    pub fn into_vec(self) -> Vec<Game> {
        self.games
    }
}

impl<'a> IntoIterator for &'a GameList {
    type Item = &'a Game;
    type IntoIter = std::slice::Iter<'a, Game>;

    fn into_iter(self) -> Self::IntoIter {
        self.games.iter()
    }
}

/// Resolves the games to crawl, once, before the loop starts.
///
/// A non-empty configured list is adopted as-is (it is not checked against
/// the platform). Otherwise the platform's current top games are used.
pub async fn resolve_games(
    api: &dyn PlatformApi,
    configured: Option<Vec<Game>>,
    top_games_limit: usize,
) -> Result<(GameList, GameSource), CrawlError> {
    if let Some(configured) = configured.filter(|games| !games.is_empty()) {
        let games = GameList::from_entries(configured);
        debug!(count = games.len(), "Using configured games");
        return Ok((games, GameSource::Configured));
    }

    info!(
        platform = api.platform_name(),
        "Loading top games, since no games have been configured"
    );
    let games = GameList::from_entries(api.top_games(top_games_limit).await?);
    info!(
        "Found the following games: {}",
        games
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok((games, GameSource::TopGames))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use preview_platforms::{LiveStream, PlatformError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TopGamesApi {
        top: Vec<Game>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlatformApi for TopGamesApi {
        fn platform_name(&self) -> &str {
            "Fake"
        }

        async fn top_games(&self, limit: usize) -> Result<Vec<Game>, PlatformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.top.iter().take(limit).cloned().collect())
        }

        async fn live_streams(&self, _game: &Game) -> Result<Vec<LiveStream>, PlatformError> {
            Ok(vec![])
        }
    }

    fn api(top: Vec<Game>) -> TopGamesApi {
        TopGamesApi {
            top,
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_duplicate_ids_collapse_to_one_entry() {
        let games = GameList::from_entries([
            Game::new("29595", "Dota 2"),
            Game::new("21779", "League of Legends"),
            Game::new("29595", "DOTA 2"),
        ]);

        assert_eq!(games.len(), 2);
        assert_eq!(games.iter().filter(|g| g.id == "29595").count(), 1);
        // first position kept, last name wins
        assert_eq!(games.as_slice()[0], Game::new("29595", "DOTA 2"));
        assert_eq!(games.as_slice()[1].id, "21779");
    }

    #[tokio::test]
    async fn test_configured_games_skip_the_api() {
        let api = api(vec![Game::new("1", "Top")]);
        let configured = vec![Game::new("29595", "Dota 2"), Game::new("404", "Gone Game")];

        let (games, source) = resolve_games(&api, Some(configured.clone()), 20)
            .await
            .unwrap();

        assert_eq!(source, GameSource::Configured);
        assert_eq!(games.into_vec(), configured);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_or_empty_config_uses_top_games() {
        let api = api(vec![
            Game::new("1", "A"),
            Game::new("2", "B"),
            Game::new("1", "A again"),
        ]);

        let (games, source) = resolve_games(&api, Some(vec![]), 20).await.unwrap();
        assert_eq!(source, GameSource::TopGames);
        assert_eq!(
            games.into_vec(),
            vec![Game::new("1", "A again"), Game::new("2", "B")]
        );

        let (games, _) = resolve_games(&api, None, 1).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }
}
