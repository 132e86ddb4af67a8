use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use percent_encoding::percent_decode_str;

use assetkv_core::{build_manifest, KeyCodec, KeyEncoding, ListOptions, ListPage, ListQueryProcessor};
use assetkv_server::{AssetKvServer, ServerConfig};
use assetkv_store::{BlobResponse, BlobStore, FsBlobStore};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::List(args) => cmd_list(args, cli.format).await,
        Command::Get(args) => cmd_get(args, cli.format).await,
        Command::Manifest(args) => cmd_manifest(args).await,
    }
}

fn encoding(no_cache_keys: bool) -> KeyEncoding {
    if no_cache_keys {
        KeyEncoding::NoCache
    } else {
        KeyEncoding::Escaped
    }
}

fn open_store(root: &Path) -> anyhow::Result<Arc<dyn BlobStore>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    Ok(Arc::new(FsBlobStore::new(root)))
}

pub(crate) fn server_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address: {bind}"))?;
    }
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if args.no_cache_keys {
        config.key_encoding = KeyEncoding::NoCache;
    }
    Ok(config)
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args)?;
    if !config.root.is_dir() {
        bail!("{} is not a directory", config.root.display());
    }
    println!(
        "{} Serving {} on {}",
        "✓".green().bold(),
        config.root.display().to_string().bold(),
        format!("http://{}", config.bind_addr).cyan()
    );
    AssetKvServer::new(config).serve().await?;
    Ok(())
}

pub(crate) async fn list_pages(
    lister: &ListQueryProcessor,
    mut options: ListOptions,
    all: bool,
) -> anyhow::Result<Vec<ListPage>> {
    let mut pages = Vec::new();
    loop {
        let page = lister.list(&options).await?;
        let cursor = page.cursor.clone();
        pages.push(page);
        match cursor {
            Some(cursor) if all => options = options.with_cursor(cursor),
            _ => return Ok(pages),
        }
    }
}

async fn cmd_list(args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(&args.root)?;
    let lister = ListQueryProcessor::new(store, KeyCodec::new(encoding(args.no_cache_keys)));

    let mut options = ListOptions::default();
    options.prefix = args.prefix;
    options.cursor = args.cursor;
    if let Some(limit) = args.limit {
        options.limit = limit;
    }
    options.validate()?;

    let pages = list_pages(&lister, options, args.all).await?;
    let mut out = std::io::stdout().lock();
    for page in &pages {
        match format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(page)?)?,
            OutputFormat::Text => {
                for name in page.names() {
                    writeln!(out, "{name}")?;
                }
            }
        }
    }
    if format == OutputFormat::Text {
        if let Some(cursor) = pages.last().and_then(|p| p.cursor.as_deref()) {
            eprintln!("{} {}", "more keys; cursor:".dimmed(), cursor.yellow());
        }
    }
    Ok(())
}

/// Turns a key given on the command line into a store path.
pub(crate) fn key_path(key: &str, url_encoded: bool) -> anyhow::Result<String> {
    let key = if url_encoded {
        percent_decode_str(key)
            .decode_utf8()
            .with_context(|| format!("key is not valid percent-encoded UTF-8: {key}"))?
            .into_owned()
    } else {
        key.to_string()
    };
    let path = KeyCodec::default().decode(&key);
    if path.is_empty() {
        bail!("empty key; use `assetkv list` to list keys");
    }
    Ok(path)
}

pub(crate) async fn fetch_key(
    store: &dyn BlobStore,
    key: &str,
    url_encoded: bool,
) -> anyhow::Result<BlobResponse> {
    let path = key_path(key, url_encoded)?;
    let response = store.fetch(&path).await?;
    if response.is_not_found() {
        bail!("key not found: {key}");
    }
    Ok(response)
}

async fn cmd_get(args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(&args.root)?;
    match fetch_key(store.as_ref(), &args.key, args.url_encoded).await? {
        BlobResponse::Blob(blob) => {
            let mut out = std::io::stdout().lock();
            out.write_all(&blob.data)?;
            out.flush()?;
        }
        BlobResponse::Directory(entries) => match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&entries)?),
            OutputFormat::Text => {
                for entry in entries {
                    println!("{:<16} {}", entry.kind.to_string().dimmed(), entry.name);
                }
            }
        },
        BlobResponse::NotFound => bail!("key not found: {}", args.key),
    }
    Ok(())
}

async fn cmd_manifest(args: ManifestArgs) -> anyhow::Result<()> {
    let store = open_store(&args.root)?;
    let manifest = build_manifest(store.as_ref()).await?;
    println!("{}", manifest.to_json()?);
    Ok(())
}
