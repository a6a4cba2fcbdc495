use std::path::PathBuf;
use std::sync::Arc;

use preview_platforms::{Game, LiveStream, PlatformApi};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::CrawlerConfig;
use crate::downloader::{ImageDownloader, ImageFetcher};
use crate::error::CrawlError;
use crate::games::GameList;

/// Outcome of one full pass over the game list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub games: usize,
    pub streams: usize,
    pub images: usize,
}

/// Totals over the lifetime of [`Crawler::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub passes: usize,
    pub images: usize,
}

impl CrawlStats {
    fn record(&mut self, pass: &PassSummary) {
        self.passes += 1;
        self.images += pass.images;
    }
}

/// Polls the platform for live streams of a fixed game list and saves each
/// stream's preview image.
///
/// Everything happens sequentially on the calling task. The cancellation
/// token is only looked at before a pass starts, so a stop request waits for
/// the running pass and its poll delay to finish.
pub struct Crawler {
    api: Arc<dyn PlatformApi>,
    downloader: ImageDownloader,
    games: GameList,
    config: CrawlerConfig,
}

impl Crawler {
    pub fn new(
        api: Arc<dyn PlatformApi>,
        fetcher: Arc<dyn ImageFetcher>,
        games: GameList,
        config: CrawlerConfig,
    ) -> Self {
        let downloader =
            ImageDownloader::new(fetcher, config.output_dir.clone(), config.file_naming);
        Self {
            api,
            downloader,
            games,
            config,
        }
    }

    /// Crawls until `token` is found cancelled at the top of an iteration.
    ///
    /// Any error ends the crawl immediately and is returned as-is.
    pub async fn run(&self, token: &CancellationToken) -> Result<CrawlStats, CrawlError> {
        let mut stats = CrawlStats::default();

        while !token.is_cancelled() {
            info!("Downloading images!");
            let summary = self.crawl_pass().await?;
            stats.record(&summary);

            info!(
                games = summary.games,
                streams = summary.streams,
                images = summary.images,
                "Downloaded images! Sleeping for {:?}",
                self.config.poll_delay
            );
            sleep(self.config.poll_delay).await;
        }

        info!(
            passes = stats.passes,
            images = stats.images,
            "Crawler stopped"
        );
        Ok(stats)
    }

    /// One pass: every game in list order, every stream in platform order,
    /// with `image_delay` after each image.
    pub async fn crawl_pass(&self) -> Result<PassSummary, CrawlError> {
        let mut summary = PassSummary::default();

        for game in &self.games {
            let streams = self.api.live_streams(game).await?;
            debug!(game = %game, streams = streams.len(), "Fetched live streams");
            summary.games += 1;
            summary.streams += streams.len();

            for stream in &streams {
                self.process_stream(game, stream).await?;
                summary.images += 1;
                sleep(self.config.image_delay).await;
            }
        }

        Ok(summary)
    }

    /// Downloads the configured preview of a single stream.
    ///
    /// A stream without that preview size is an error, never skipped.
    pub async fn process_stream(
        &self,
        game: &Game,
        stream: &LiveStream,
    ) -> Result<PathBuf, CrawlError> {
        let size = self.config.preview_size;
        let url = stream
            .preview_url(size)
            .ok_or_else(|| CrawlError::MissingPreviewSize {
                stream: stream.id.clone(),
                size,
            })?;

        debug!(game = %game.name, stream = %stream.user_login, url, "Downloading preview");
        self.downloader.download(url, &game.name).await
    }
}
