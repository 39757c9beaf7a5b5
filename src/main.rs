use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use raster_probe::config::ConfigFile;
use raster_probe::document::RasterDocument;
use raster_probe::fetch::RemoteFetcher;
use raster_probe::probe::probe;
use raster_probe::raster;
use raster_probe::s3::ObjectLocation;

const DEFAULT_CONFIG: &str = "raster-probe.toml";

/// Fetch a raster from an S3 compatible store and print its metadata and band statistics
#[derive(Parser, Debug)]
#[command(name = "raster-probe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file [default: ./raster-probe.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Object store host, e.g. localhost:9000
    #[arg(long, env = "MINIO_HOST")]
    host: Option<String>,

    #[arg(long, env = "MINIO_BUCKET_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    #[arg(long, env = "MINIO_BUCKET_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Use https to reach the store
    #[arg(long, env = "MINIO_SECURE")]
    secure: Option<bool>,

    #[arg(long, env = "MINIO_REGION")]
    region: Option<String>,

    #[arg(short, long, env = "MINIO_BUCKET_NAME")]
    bucket: Option<String>,

    /// Object key of the raster
    #[arg(short, long, env = "MINIO_OBJECT_KEY")]
    key: Option<String>,

    /// Object to fetch as s3://bucket/key, overrides --bucket and --key
    #[arg(long, conflicts_with = "local")]
    url: Option<String>,

    /// Inspect a local raster instead of fetching one
    #[arg(long)]
    local: Option<PathBuf>,

    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a config template to this path and exit
    #[arg(long)]
    init_config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(self: &Self) -> Result<ConfigFile> {
        let (bucket_name, object_key) = match &self.url {
            Some(url) => {
                let location = ObjectLocation::from_url(url)?;
                (Some(location.bucket), Some(location.key))
            }
            None => (self.bucket.clone(), self.key.clone()),
        };
        Ok(ConfigFile {
            store_host: self.host.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            secure: self.secure,
            region: self.region.clone(),
            bucket_name,
            object_key,
        })
    }

    fn config_file(self: &Self) -> Result<ConfigFile> {
        match &self.config {
            Some(path) => ConfigFile::read(path)
                .with_context(|| format!("Unable to load config {}", path.display())),
            None if Path::new(DEFAULT_CONFIG).exists() => ConfigFile::read(DEFAULT_CONFIG)
                .with_context(|| format!("Unable to load config {}", DEFAULT_CONFIG)),
            None => Ok(ConfigFile::default()),
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn emit(document: &RasterDocument, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            document.write(path)?;
            info!("Document written to {}", path.display());
        }
        None => println!("{}", document.to_json()?),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    if let Some(path) = &cli.init_config {
        ConfigFile::template().write(path)?;
        info!("Config template written to {}", path.display());
        return Ok(());
    }

    let document = match &cli.local {
        Some(path) => raster::inspect(path)?,
        None => {
            let config = cli.config_file()?.merge(cli.overrides()?).validate()?;
            let fetcher = RemoteFetcher::from_config(&config).await;
            probe(&fetcher, &config.bucket_name, &config.object_key).await?
        }
    };

    if let Some(document) = document {
        emit(&document, cli.output.as_deref())?;
    }

    Ok(())
}
