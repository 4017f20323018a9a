//! Facebox similarity CLI.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use facebox_client::{FaceboxClient, FaceboxConfig};

/// Look up similar faces in a facebox gallery.
#[derive(Parser)]
#[command(name = "facebox", version)]
struct Cli {
    /// Facebox base address (overrides FACEBOX_ADDR).
    #[arg(long, global = true)]
    addr: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// One flat list of matches across all detected faces.
    Similar {
        #[command(flatten)]
        source: SourceArgs,

        /// Look up by gallery ID instead of submitting an image.
        #[arg(long, conflicts_with_all = ["file", "url", "base64", "base64_file"])]
        id: Option<String>,
    },
    /// One list of matches per detected face.
    Similars {
        #[command(flatten)]
        source: SourceArgs,

        /// Maximum matches per face (values below 1 use the server default of 5).
        #[arg(long, default_value = "5", allow_negative_numbers = true)]
        limit: i32,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Image file to upload.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Absolute URL the server should fetch the image from.
    #[arg(long)]
    url: Option<String>,

    /// Base64 encoded image.
    #[arg(long)]
    base64: Option<String>,

    /// Image file to send Base64 encoded.
    #[arg(long)]
    base64_file: Option<PathBuf>,
}

enum Source {
    File(PathBuf),
    Url(String),
    Base64(String),
}

impl SourceArgs {
    fn resolve(self) -> anyhow::Result<Source> {
        let mut sources = Vec::new();
        if let Some(path) = self.file {
            sources.push(Source::File(path));
        }
        if let Some(url) = self.url {
            sources.push(Source::Url(url));
        }
        if let Some(data) = self.base64 {
            sources.push(Source::Base64(data));
        }
        if let Some(path) = self.base64_file {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            sources.push(Source::Base64(STANDARD.encode(bytes)));
        }

        match sources.len() {
            1 => Ok(sources.remove(0)),
            0 => bail!("one of --file, --url, --base64 or --base64-file is required"),
            _ => bail!("only one of --file, --url, --base64 or --base64-file may be given"),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("facebox=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[allow(deprecated)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = FaceboxConfig::from_env();
    if let Some(addr) = cli.addr {
        config.addr = addr;
    }
    info!("Using facebox at {}", config.addr);
    let client = FaceboxClient::new(config)?;

    let output = match cli.command {
        Command::Similar { id: Some(id), .. } => {
            serde_json::to_string_pretty(&client.similar_id(&id).await?)?
        }
        Command::Similar { source, id: None } => {
            let results = match source.resolve()? {
                Source::File(path) => {
                    let file = open_image(&path).await?;
                    client.similar(file).await?
                }
                Source::Url(url) => client.similar_url(&url).await?,
                Source::Base64(data) => client.similar_base64(&data).await?,
            };
            serde_json::to_string_pretty(&results)?
        }
        Command::Similars { source, limit } => {
            let faces = match source.resolve()? {
                Source::File(path) => {
                    let file = open_image(&path).await?;
                    client.similars(file, limit).await?
                }
                Source::Url(url) => client.similars_url(&url, limit).await?,
                Source::Base64(data) => client.similars_base64(&data, limit).await?,
            };
            info!("Facebox detected {} faces", faces.len());
            serde_json::to_string_pretty(&faces)?
        }
    };

    println!("{}", output);
    Ok(())
}

async fn open_image(path: &Path) -> anyhow::Result<tokio::fs::File> {
    tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))
}
