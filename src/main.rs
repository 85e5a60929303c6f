//! mediarchive-rs: archive the media a Twitter account posts.
//!
//! Each run walks the account's timeline newest-first until it reaches a file
//! already in the destination directory, then downloads everything newer in
//! chronological order, one request per second. Authentication is OAuth 1.0a
//! user context, obtained once through the PIN flow.

#![warn(clippy::all)]

mod archive;
mod cli;
mod config;
mod console;
mod download;
mod shutdown;
mod twitter;
mod types;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use reqwest::Client;
use tracing_subscriber::EnvFilter;

use archive::{ArchiveError, ArchiveOptions, DestinationLayout, ResumeGate};
use cli::{CollectArgs, Command};
use config::{AppConfig, CollectConfig};
use console::{Console, StdConsole};
use download::Downloader;
use twitter::{oauth, TwitterClient};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Whole-request timeout for API calls. Downloads only bound the connect
/// phase since media bodies can be large.
const API_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

fn api_client() -> anyhow::Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(API_TIMEOUT)
        .build()?)
}

fn download_client() -> anyhow::Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// Run the out-of-band PIN flow and print the resulting access token pair.
async fn run_auth_twitter(config_path: &Path) -> anyhow::Result<()> {
    let app_config = AppConfig::load(config_path)?;
    let consumer = app_config.twitter.consumer_credentials()?;
    let http = api_client()?;

    let request_token = oauth::request_token(&http, &consumer)
        .await
        .context("get request token")?;
    let url = oauth::authorization_url(&request_token)?;
    println!("Open this URL and authorize the app: {url}");

    let pin = tokio::task::spawn_blocking(|| {
        print!("Enter the PIN: ");
        io::stdout().flush()?;
        let mut pin = String::new();
        io::stdin().read_line(&mut pin)?;
        Ok::<String, io::Error>(pin.trim().to_string())
    })
    .await??;
    if pin.is_empty() {
        anyhow::bail!("No PIN entered");
    }

    let grant = oauth::access_token(&http, &consumer, request_token, &pin)
        .await
        .context("get access token")?;
    if let Some(name) = &grant.screen_name {
        tracing::info!("Authorized as @{}", name);
    }
    println!("access_key: {}", grant.token.key);
    println!("access_secret: {}", grant.token.secret);
    println!(
        "Add these under `twitter:` in {} to enable collect-twitter",
        config_path.display()
    );
    Ok(())
}

/// Archive new media from one account's timeline.
async fn run_collect_twitter(config_path: &Path, args: CollectArgs) -> anyhow::Result<()> {
    let app_config = AppConfig::load(config_path)?;
    let collect = CollectConfig::from_args(args)?;
    tracing::debug!(?collect, "Starting collect-twitter");

    let credentials = app_config.twitter.user_credentials()?;
    let twitter = TwitterClient::new(api_client()?, credentials)?;
    let cancel = shutdown::install_signal_handler()?;

    let user_id = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ArchiveError::Cancelled.into()),
        id = twitter.find_user_id(&collect.screen_name) => {
            id.with_context(|| format!("look up @{}", collect.screen_name))?
        }
    };
    tracing::info!("Archiving media from @{} into {}", collect.screen_name, collect.dest_dir.display());

    let console: Arc<dyn Console> = Arc::new(StdConsole);
    let layout = DestinationLayout::new(collect.dest_dir.clone());
    let gate = ResumeGate::new(layout.clone());
    let downloader = Downloader::new(download_client()?, layout, collect.overwrite, Arc::clone(&console));
    let options = ArchiveOptions {
        dry_run: collect.dry_run,
        ..ArchiveOptions::default()
    };

    let timeline = twitter.media_timeline(user_id);
    let summary = archive::archive_media(
        &timeline,
        &gate,
        &downloader,
        console.as_ref(),
        &options,
        &cancel,
    )
    .await?;
    tracing::debug!(?summary, "collect-twitter finished");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .with_writer(io::stderr)
        .init();

    let config_path = config::resolve_config_path(cli.config.as_deref())?;
    let result = match cli.command {
        Command::AuthTwitter => run_auth_twitter(&config_path).await,
        Command::CollectTwitter(args) => run_collect_twitter(&config_path, args).await,
    };

    if let Some(code) = result.as_ref().err().and_then(shutdown::interrupted_exit_code) {
        tracing::info!("Interrupted; files downloaded so far are kept");
        std::process::exit(code);
    }
    result
}
