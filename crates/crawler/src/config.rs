use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use preview_platforms::PreviewSize;
use serde::{Deserialize, Serialize};

/// How repeated downloads of the same stream are named.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileNaming {
    /// `<name>_<unix seconds>.jpg`, every pass keeps its own file.
    #[default]
    Timestamp,
    /// `<name>.jpg`, a later pass replaces the earlier file.
    Overwrite,
}

impl FileNaming {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileNaming::Timestamp => "timestamp",
            FileNaming::Overwrite => "overwrite",
        }
    }
}

impl Display for FileNaming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileNaming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "timestamp" => Ok(FileNaming::Timestamp),
            "overwrite" => Ok(FileNaming::Overwrite),
            other => Err(format!(
                "unknown file naming policy '{other}', expected timestamp or overwrite"
            )),
        }
    }
}

/// Runtime settings of one crawler instance.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Pause after every full pass over the game list
    pub poll_delay: Duration,

    /// Pause after every downloaded image
    pub image_delay: Duration,

    /// Which preview variant to download
    pub preview_size: PreviewSize,

    pub file_naming: FileNaming,

    /// Root of the `<slug>/<file>` tree
    pub output_dir: PathBuf,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            poll_delay: Duration::from_secs(300),
            image_delay: Duration::from_millis(800),
            preview_size: PreviewSize::Medium,
            file_naming: FileNaming::Timestamp,
            output_dir: PathBuf::from("images"),
        }
    }
}

impl CrawlerConfig {
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn with_image_delay(mut self, delay: Duration) -> Self {
        self.image_delay = delay;
        self
    }

    pub fn with_preview_size(mut self, size: PreviewSize) -> Self {
        self.preview_size = size;
        self
    }

    pub fn with_file_naming(mut self, naming: FileNaming) -> Self {
        self.file_naming = naming;
        self
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }
}

impl Display for CrawlerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Crawler config: poll_delay={:?}, image_delay={:?}, preview_size={}, file_naming={}, output_dir={}",
            self.poll_delay,
            self.image_delay,
            self.preview_size,
            self.file_naming,
            self.output_dir.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_settings() {
        let config = CrawlerConfig::default();
        assert_eq!(config.poll_delay, Duration::from_secs(300));
        assert_eq!(config.image_delay, Duration::from_millis(800));
        assert_eq!(config.preview_size, PreviewSize::Medium);
        assert_eq!(config.file_naming, FileNaming::Timestamp);
        assert_eq!(config.output_dir, PathBuf::from("images"));
    }

    #[test]
    fn test_file_naming_parse() {
        assert_eq!("Overwrite".parse::<FileNaming>(), Ok(FileNaming::Overwrite));
        assert_eq!("timestamp".parse::<FileNaming>(), Ok(FileNaming::Timestamp));
        assert!("random".parse::<FileNaming>().is_err());
    }
}
