use preview_platforms::{PlatformError, PreviewSize};
use thiserror::Error;

/// Every failure inside a pass ends the crawl; nothing here is retried.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stream {stream} has no '{size}' preview")]
    MissingPreviewSize { stream: String, size: PreviewSize },

    #[error("Unexpected image url, no '{marker}' segment: {url}")]
    UnexpectedImageUrl { url: String, marker: &'static str },
}
