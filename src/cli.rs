use clap::{Args, Parser, Subcommand};

use crate::types::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "mediarchive-rs",
    version,
    about = "Archive media posted by a Twitter account"
)]
pub struct Cli {
    /// Settings file (default: settings.yml next to the executable)
    #[arg(long, global = true, env = "MEDIARCHIVE_CONFIG")]
    pub config: Option<String>,

    /// Log level
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authorize with a Twitter account by PIN and print the access token pair
    AuthTwitter,

    /// Download media an account has posted since the last run, oldest first
    CollectTwitter(CollectArgs),
}

#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Account screen name (a leading @ is ignored)
    #[arg(long)]
    pub screen_name: String,

    /// Local directory for downloads
    #[arg(long, default_value = ".")]
    pub dest_dir: String,

    /// Download again even when the file already exists
    #[arg(long)]
    pub overwrite: bool,

    /// List what would be downloaded without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
