use std::sync::Arc;

use clap::Parser;
use preview_crawler::{CancellationToken, Crawler, CrawlerConfig, GameSource, resolve_games};
use preview_platforms::{PlatformApi, ProxyConfig, Twitch, create_client};
use tracing::{error, info, warn};
use tracing_subscriber::{
    filter::{Directive, EnvFilter},
    fmt,
    prelude::*,
};

mod cli;
mod config;
mod error;
mod utils;

use cli::CliArgs;
use config::AppConfig;
use error::AppError;
use utils::{format_duration, parse_delay};

/// Exit code used when a second Ctrl-C aborts the running pass.
const FORCED_EXIT_CODE: i32 = 130;

fn main() {
    if let Err(e) = bootstrap() {
        error!(error = ?e, "Application failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn bootstrap() -> Result<(), AppError> {
    let args = CliArgs::parse();

    init_logging(args.verbose, args.quiet)?;

    info!("==================================================================");
    info!("Preview Crawler - live stream preview image downloader");
    info!("==================================================================");

    // A missing or incomplete config ends here, before any request is made
    let mut config = AppConfig::load_or_create(&args.config)?;

    let crawler_config = apply_overrides(config.crawler_config()?, &args)?;
    info!("{crawler_config}");
    info!(
        "Pausing {} between images and {} between passes",
        format_duration(crawler_config.image_delay),
        format_duration(crawler_config.poll_delay)
    );

    let proxy = match args.proxy.clone() {
        Some(url) => Some(ProxyConfig {
            url,
            username: config.proxy_username.clone(),
            password: config.proxy_password.clone(),
        }),
        None => config.proxy_config(),
    };
    let client = create_client(proxy, config.request_timeout())?;

    let mut twitch = Twitch::new(client.clone(), config.credentials())?;
    twitch.authenticate().await?;
    let api: Arc<dyn PlatformApi> = Arc::new(twitch);

    let (games, source) = resolve_games(
        api.as_ref(),
        Some(config.games.clone()),
        config.top_games_limit,
    )
    .await?;

    // Persist auto-resolved games so every later run crawls the same list
    if source == GameSource::TopGames {
        config.games = games.as_slice().to_vec();
        config.save(&args.config)?;
        info!(
            count = games.len(),
            path = %args.config.display(),
            "Saved top games to the configuration"
        );
    }
    if games.is_empty() {
        warn!("No games to crawl, every pass will be empty");
    }

    let token = CancellationToken::new();
    spawn_shutdown_listener(token.clone());

    info!(games = games.len(), "Start crawling data");
    let crawler = Crawler::new(api, Arc::new(client), games, crawler_config);
    let stats = crawler.run(&token).await?;

    info!(
        passes = stats.passes,
        images = stats.images,
        "Finished crawling"
    );
    Ok(())
}

fn apply_overrides(mut config: CrawlerConfig, args: &CliArgs) -> Result<CrawlerConfig, AppError> {
    if let Some(delay) = args.poll_delay.as_deref() {
        config = config.with_poll_delay(parse_delay(delay)?);
    }
    if let Some(delay) = args.image_delay.as_deref() {
        config = config.with_image_delay(parse_delay(delay)?);
    }
    if let Some(size) = args.preview_size {
        config = config.with_preview_size(size);
    }
    if let Some(naming) = args.file_naming {
        config = config.with_file_naming(naming);
    }
    if let Some(dir) = args.output_dir.clone() {
        config = config.with_output_dir(dir);
    }
    Ok(config)
}

/// First Ctrl-C stops the crawler after its current pass, the second one
/// exits immediately.
fn spawn_shutdown_listener(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Unable to listen for Ctrl-C, stop the process to quit");
            return;
        }
        warn!("Stop requested, finishing the current pass first (press Ctrl-C again to quit now)");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Forced exit");
            std::process::exit(FORCED_EXIT_CODE);
        }
    });
}

/// `-q`/`-v` win over `RUST_LOG`; an unset or invalid `RUST_LOG` means info.
fn log_filter(verbose: bool, quiet: bool, rust_log: Option<&str>) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        rust_log
            .filter(|value| !value.trim().is_empty())
            .and_then(|value| EnvFilter::try_new(value).ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    }
}

fn init_logging(verbose: bool, quiet: bool) -> Result<(), AppError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(verbose, quiet, rust_log.as_deref());

    // http internals are noisy at debug level
    let filter = ["hyper=warn", "hyper_util=warn", "reqwest=warn", "rustls=warn"]
        .into_iter()
        .try_fold(filter, |filter, directive| {
            directive
                .parse::<Directive>()
                .map(|d| filter.add_directive(d))
                .map_err(|e| AppError::Initialization(format!("{directive}: {e}")))
        })?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .try_init()
        .map_err(|e| AppError::Initialization(e.to_string()))?;

    Ok(())
}
