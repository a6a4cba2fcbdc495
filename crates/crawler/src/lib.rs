//! Crawl loop and image downloader for live stream preview thumbnails.
//!
//! A [`Crawler`] walks a fixed [`GameList`], asks the platform for the live
//! streams of each game and stores every stream's preview image under
//! `<output_dir>/<slug(game name)>/`. It runs until its cancellation token is
//! observed at the top of a pass.

pub mod config;
pub mod crawler;
pub mod downloader;
pub mod error;
pub mod games;
pub mod slug;

pub use config::{CrawlerConfig, FileNaming};
pub use crawler::{CrawlStats, Crawler, PassSummary};
pub use downloader::{ImageDownloader, ImageFetcher};
pub use error::CrawlError;
pub use games::{GameList, GameSource, resolve_games};
pub use slug::slugify;

pub use tokio_util::sync::CancellationToken;
