use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "assetkv",
    about = "Serve a directory of assets as a read-only key-value namespace",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// List keys in byte order, one page at a time
    List(ListArgs),
    /// Print the value stored under a key
    Get(GetArgs),
    /// Print the static content manifest (path -> no-cache key)
    Manifest(ManifestArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub bind: Option<String>,
    /// Directory to serve (overrides the config file)
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Render every listed key with the no-cache marker
    #[arg(long)]
    pub no_cache_keys: bool,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    #[arg(long)]
    pub prefix: Option<String>,
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    /// Resume after the page that returned this cursor
    #[arg(long)]
    pub cursor: Option<String>,
    /// Follow cursors until the listing is complete
    #[arg(long)]
    pub all: bool,
    #[arg(long)]
    pub no_cache_keys: bool,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
    /// The key is percent-encoded, as it would appear in a request URL
    #[arg(long)]
    pub url_encoded: bool,
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Args)]
pub struct ManifestArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}
