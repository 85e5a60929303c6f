use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::cli::CollectArgs;
use crate::twitter::oauth::{OAuthCredentials, Token};

const DEFAULT_CONFIG_FILE: &str = "settings.yml";

/// Contents of the YAML settings file.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub twitter: TwitterConfig,
}

#[derive(Default, Deserialize)]
pub struct TwitterConfig {
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub access_secret: Option<String>,
}

impl std::fmt::Debug for TwitterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterConfig")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_key", &self.access_key)
            .field("access_secret", &self.access_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("open config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parse config {}", path.display()))
    }

    fn parse(contents: &str) -> anyhow::Result<Self> {
        // An empty file deserializes to unit, not an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

impl TwitterConfig {
    /// Application credentials, enough to run the PIN authorization flow.
    pub fn consumer_credentials(&self) -> anyhow::Result<OAuthCredentials> {
        if self.consumer_key.is_empty() || self.consumer_secret.is_empty() {
            anyhow::bail!("twitter.consumer_key and twitter.consumer_secret must be set");
        }
        Ok(OAuthCredentials::consumer(
            &self.consumer_key,
            &self.consumer_secret,
        ))
    }

    /// Application plus user credentials for API calls on the user's behalf.
    pub fn user_credentials(&self) -> anyhow::Result<OAuthCredentials> {
        let consumer = self.consumer_credentials()?;
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        match (non_empty(&self.access_key), non_empty(&self.access_secret)) {
            (Some(key), Some(secret)) => Ok(consumer.with_token(Token { key, secret })),
            _ => anyhow::bail!(
                "twitter.access_key and twitter.access_secret are not set; \
                 run `mediarchive-rs auth-twitter` to obtain them"
            ),
        }
    }
}

/// Resolved `collect-twitter` arguments.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub screen_name: String,
    pub dest_dir: PathBuf,
    pub overwrite: bool,
    pub dry_run: bool,
}

impl CollectConfig {
    pub fn from_args(args: CollectArgs) -> anyhow::Result<Self> {
        let screen_name = args.screen_name.trim().trim_start_matches('@').to_string();
        if screen_name.is_empty() {
            anyhow::bail!("--screen-name must not be empty");
        }
        Ok(Self {
            screen_name,
            dest_dir: expand_tilde(&args.dest_dir),
            overwrite: args.overwrite,
            dry_run: args.dry_run,
        })
    }
}

/// `--config` when given, else `settings.yml` beside the executable.
pub fn resolve_config_path(arg: Option<&str>) -> anyhow::Result<PathBuf> {
    match arg {
        Some(path) => Ok(expand_tilde(path)),
        None => default_config_path(),
    }
}

fn default_config_path() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("locate executable")?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(DEFAULT_CONFIG_FILE))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
