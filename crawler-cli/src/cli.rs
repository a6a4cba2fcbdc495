use clap::Parser;
use preview_crawler::FileNaming;
use preview_platforms::PreviewSize;
use std::path::PathBuf;

/// Define CLI arguments
#[derive(Parser, Debug)]
#[command(
    name = "preview-crawler",
    version,
    about = "Periodically downloads live stream preview images of the top games",
    long_about = "Polls the Twitch API for the live streams of a list of games and stores\n\
                  every stream's preview image under <output-dir>/<game>/.\n\
                  \n\
                  The first start writes a config file and exits; fill in the credentials\n\
                  and start again. Press Ctrl-C to stop after the current pass."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Pause between two passes, overrides the config. Examples: "300", "5m"
    #[arg(long)]
    pub poll_delay: Option<String>,

    /// Pause between two image downloads, overrides the config. Examples: "0.8", "2s"
    #[arg(long)]
    pub image_delay: Option<String>,

    /// Preview image size (small, medium or large), overrides the config
    #[arg(long)]
    pub preview_size: Option<PreviewSize>,

    /// File naming policy (timestamp or overwrite), overrides the config
    #[arg(long)]
    pub file_naming: Option<FileNaming>,

    /// Directory where images are saved, overrides the config
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Proxy URL (supports http, https, socks5), overrides the config
    #[arg(long)]
    pub proxy: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["preview-crawler"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(!args.verbose);
        assert!(args.preview_size.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::try_parse_from([
            "preview-crawler",
            "--config",
            "crawler.toml",
            "--poll-delay",
            "5m",
            "--preview-size",
            "large",
            "--file-naming",
            "overwrite",
            "-o",
            "out",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("crawler.toml"));
        assert_eq!(args.poll_delay.as_deref(), Some("5m"));
        assert_eq!(args.preview_size, Some(PreviewSize::Large));
        assert_eq!(args.file_naming, Some(FileNaming::Overwrite));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_invalid_preview_size_and_conflicting_flags() {
        assert!(CliArgs::try_parse_from(["preview-crawler", "--preview-size", "huge"]).is_err());
        assert!(CliArgs::try_parse_from(["preview-crawler", "-v", "-q"]).is_err());
    }
}
