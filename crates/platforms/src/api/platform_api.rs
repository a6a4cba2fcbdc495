use async_trait::async_trait;

use super::error::PlatformError;
use crate::media::{Game, LiveStream};

/// The two capabilities the crawler needs from a streaming platform.
///
/// Pagination, rate limiting and retries are the implementor's business; the
/// crawler calls each method once per use and treats any error as fatal.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    fn platform_name(&self) -> &str;

    /// Games ordered by current viewership, at most `limit` of them.
    async fn top_games(&self, limit: usize) -> Result<Vec<Game>, PlatformError>;

    /// Streams currently live for `game`, in the order the platform returns them.
    async fn live_streams(&self, game: &Game) -> Result<Vec<LiveStream>, PlatformError>;
}
