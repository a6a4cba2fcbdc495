use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tracing::debug;

use crate::config::FileNaming;
use crate::error::CrawlError;
use crate::slug::slugify;

/// Preview urls carry the stream-specific part right after this marker,
/// e.g. `https://static-cdn.jtvnw.net/previews-ttv/live_user_foo-320x180.jpg`.
const URL_MARKER: &str = "ttv/";
const IMAGE_EXT: &str = ".jpg";

/// Fetches the raw bytes behind an image url.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, CrawlError>;
}

#[async_trait]
impl ImageFetcher for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<Bytes, CrawlError> {
        let response = self.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }
        Ok(response.bytes().await?)
    }
}

/// Derives the file name for `url` under the given naming policy.
///
/// `timestamp` is the unix time in seconds and is only used by
/// [`FileNaming::Timestamp`].
pub fn image_file_name(
    url: &str,
    naming: FileNaming,
    timestamp: i64,
) -> Result<String, CrawlError> {
    let (_, tail) = url
        .split_once(URL_MARKER)
        .ok_or_else(|| CrawlError::UnexpectedImageUrl {
            url: url.to_string(),
            marker: URL_MARKER,
        })?;
    let stem = tail.split(IMAGE_EXT).next().unwrap_or_default();

    // a stem with separators would escape the game directory
    let stem = slugify(stem);

    Ok(match naming {
        FileNaming::Timestamp => format!("{stem}_{timestamp}{IMAGE_EXT}"),
        FileNaming::Overwrite => format!("{stem}{IMAGE_EXT}"),
    })
}

/// Stores preview images under `<output_dir>/<slug(game name)>/`.
///
/// Only meant for the crawl loop: file names rely on the preview url layout.
#[derive(Clone)]
pub struct ImageDownloader {
    fetcher: Arc<dyn ImageFetcher>,
    output_dir: PathBuf,
    naming: FileNaming,
}

impl ImageDownloader {
    pub fn new<P: Into<PathBuf>>(
        fetcher: Arc<dyn ImageFetcher>,
        output_dir: P,
        naming: FileNaming,
    ) -> Self {
        Self {
            fetcher,
            output_dir: output_dir.into(),
            naming,
        }
    }

    pub fn game_dir(&self, game_name: &str) -> PathBuf {
        self.output_dir.join(slugify(game_name))
    }

    /// Downloads `url` and writes it into the game's directory, returning the
    /// written path. An existing file with the same name is replaced.
    pub async fn download(&self, url: &str, game_name: &str) -> Result<PathBuf, CrawlError> {
        let dir = self.game_dir(game_name);
        let file_name = image_file_name(url, self.naming, Utc::now().timestamp())?;
        let path = dir.join(file_name);

        tokio::fs::create_dir_all(&dir).await?;

        let body = self.fetcher.fetch(url).await?;
        tokio::fs::write(&path, &body).await?;

        debug!(url, path = %path.display(), bytes = body.len(), "Saved preview image");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    const URL: &str = "https://static-cdn.jtvnw.net/previews-ttv/live_user_abc123-320x180.jpg";

    #[derive(Default)]
    struct StaticFetcher {
        requested: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ImageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Bytes, CrawlError> {
            self.requested.lock().push(url.to_string());
            if self.fail {
                return Err(CrawlError::Fetch {
                    url: url.to_string(),
                    reason: "HTTP 404 Not Found".to_string(),
                });
            }
            Ok(Bytes::from_static(b"\xff\xd8\xff\xe0jpeg"))
        }
    }

    #[test]
    fn test_file_name_with_timestamp() {
        let name = image_file_name(URL, FileNaming::Timestamp, 1_700_000_000).unwrap();
        assert_eq!(name, "live_user_abc123-320x180_1700000000.jpg");
    }

    #[test]
    fn test_file_name_overwrite() {
        let name = image_file_name("https://cdn.example/ttv/abc123.jpg", FileNaming::Overwrite, 0)
            .unwrap();
        assert_eq!(name, "abc123.jpg");
    }

    #[test]
    fn test_file_name_strips_query_after_extension() {
        let name = image_file_name(
            "https://cdn.example/previews-ttv/abc123.jpg?t=5",
            FileNaming::Overwrite,
            0,
        )
        .unwrap();
        assert_eq!(name, "abc123.jpg");
    }

    #[test]
    fn test_file_name_requires_marker() {
        let result = image_file_name("https://cdn.example/other/abc.jpg", FileNaming::Overwrite, 0);
        assert!(matches!(result, Err(CrawlError::UnexpectedImageUrl { .. })));
    }

    #[test]
    fn test_file_name_cannot_escape_directory() {
        let name =
            image_file_name("https://cdn.example/ttv/../../etc/x.jpg", FileNaming::Overwrite, 0)
                .unwrap();
        assert!(!name.contains('/'));
    }

    #[tokio::test]
    async fn test_download_writes_file_under_game_slug() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(StaticFetcher::default());
        let downloader = ImageDownloader::new(
            fetcher.clone(),
            tmp.path().join("images"),
            FileNaming::Overwrite,
        );

        let path = downloader.download(URL, "Player's Unknown").await.unwrap();

        assert_eq!(
            path,
            tmp.path()
                .join("images")
                .join("Players_Unknown")
                .join("live_user_abc123-320x180.jpg")
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"\xff\xd8\xff\xe0jpeg");
        assert_eq!(fetcher.requested.lock().as_slice(), [URL.to_string()]);
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let downloader = ImageDownloader::new(
            Arc::new(StaticFetcher::default()),
            tmp.path(),
            FileNaming::Overwrite,
        );

        let dir = downloader.game_dir("Dota 2");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("live_user_abc123-320x180.jpg"), b"stale data").unwrap();

        let path = downloader.download(URL, "Dota 2").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"\xff\xd8\xff\xe0jpeg");
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_download_propagates_fetch_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let downloader = ImageDownloader::new(
            Arc::new(StaticFetcher {
                fail: true,
                ..Default::default()
            }),
            tmp.path(),
            FileNaming::Timestamp,
        );

        let result = downloader.download(URL, "Dota 2").await;
        assert!(matches!(result, Err(CrawlError::Fetch { .. })));
        // the directory exists, but nothing was written into it
        assert_eq!(std::fs::read_dir(tmp.path().join("Dota_2")).unwrap().count(), 0);
    }
}
