//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use metcast::cache::disk::DiskTier;
use metcast::cache::key::CacheKey;
use metcast::cache::tier::CacheTier;
use metcast::core::model::Locationforecast;
use metcast::core::paths::default_cache_dir;
use metcast::core::render::{MetaReport, OutputFormat, RenderConfig, Renderer};
use metcast::core::util::now;
use metcast::service::forecast::{ForecastService, ServiceConfig, DEFAULT_BASE_URL};

/// metcast - fetch met.no forecasts through a memory + disk cache.
#[derive(Parser, Debug)]
#[command(name = "metcast")]
#[command(
    author,
    version,
    about,
    long_about = r#"metcast retrieves met.no Locationforecast documents while avoiding
redundant downloads.

Lookups go through an in-process memory tier and an on-disk tier. The
network is only used when no tier holds an unexpired forecast, and even
then the request is conditional (If-Modified-Since), so an unchanged
forecast costs a 304 instead of a full download.

Output formats:
- json: the forecast document (default)
- md: a Markdown table of the next hours

Examples:
    metcast --client-id "example.com/app" fetch --lat 59.9428 --lon 10.7207 --alt 100
    metcast inspect --lat 59.9428 --lon 10.7207 --alt 100
    metcast clear --lat 59.9428 --lon 10.7207 --alt 100
"#
)]
pub struct Cli {
    /// Client identification sent as User-Agent (required by met.no).
    #[arg(
        long,
        global = true,
        env = "METCAST_CLIENT_ID",
        value_name = "ID",
        long_help = "Client identification sent as the User-Agent header.\n\n\
met.no's terms of service require a value that identifies your application,\n\
for example a domain or a contact address. Required by `fetch`."
    )]
    pub client_id: Option<String>,

    /// Directory for the disk cache tier.
    #[arg(
        long,
        global = true,
        env = "METCAST_CACHE_DIR",
        value_name = "DIR",
        long_help = "Directory holding the disk cache tier.\n\n\
Defaults to <user cache dir>/metcast. Two JSON files are kept per location:\n\
the forecast and its freshness metadata."
    )]
    pub cache_dir: Option<PathBuf>,

    /// Disable the disk cache tier.
    #[arg(long, global = true)]
    pub no_disk_cache: bool,

    /// Upstream Locationforecast endpoint.
    #[arg(
        long,
        global = true,
        env = "METCAST_BASE_URL",
        value_name = "URL",
        default_value = DEFAULT_BASE_URL
    )]
    pub base_url: String,

    /// Upstream request timeout in seconds.
    #[arg(long, global = true, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Output format (json/md).
    #[arg(long, global = true, default_value = "json", value_name = "FORMAT")]
    pub format: String,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (cache and request diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log tier hits, misses, promotions and upstream requests to stderr.\n\
RUST_LOG takes precedence when set."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// A forecast location
#[derive(Args, Debug, Clone, Copy)]
pub struct Point {
    /// Latitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Altitude in whole meters above sea level.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub alt: i32,
}

impl Point {
    fn key(&self) -> CacheKey {
        CacheKey::locationforecast(self.lat, self.lon, self.alt)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the forecast for a location, using the cache when fresh.
    Fetch {
        #[command(flatten)]
        point: Point,
    },

    /// Show the disk cache's freshness metadata for a location.
    Inspect {
        #[command(flatten)]
        point: Point,
    },

    /// Remove a location from the disk cache.
    Clear {
        #[command(flatten)]
        point: Point,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let renderer = Renderer::with_config(RenderConfig::with_pretty(format, cli.pretty));

    let cache_dir = if cli.no_disk_cache {
        None
    } else {
        cli.cache_dir.clone().or_else(default_cache_dir)
    };

    match cli.command {
        Commands::Fetch { point } => {
            let mut config = ServiceConfig::new(cli.client_id.unwrap_or_default())
                .with_base_url(cli.base_url)
                .with_timeout(Duration::from_secs(cli.timeout));
            if let Some(dir) = cache_dir {
                config = config.with_cache_dir(dir);
            }
            run_fetch(config, point, &renderer)
        }
        Commands::Inspect { point } => run_inspect(cache_dir, point, &renderer),
        Commands::Clear { point } => run_clear(cache_dir, point, &renderer),
    }
}

fn run_fetch(config: ServiceConfig, point: Point, renderer: &Renderer) -> Result<()> {
    let service: ForecastService = ForecastService::new(config)
        .context("Invalid configuration (pass --client-id or set METCAST_CLIENT_ID)")?;

    let forecast: Locationforecast = service
        .fetch(point.lat, point.lon, point.alt)
        .with_context(|| format!("Failed to fetch forecast for {}", point.key()))?;

    println!("{}", renderer.render_forecast(&forecast, now()));
    Ok(())
}

fn run_inspect(cache_dir: Option<PathBuf>, point: Point, renderer: &Renderer) -> Result<()> {
    let disk = disk_tier(cache_dir)?;
    let key = point.key();
    let meta = disk
        .read_meta(&key)
        .with_context(|| format!("Failed to read cache metadata for {}", key))?;

    let report = MetaReport::new(key.as_str(), meta.as_ref(), now());
    println!("{}", renderer.render_report(&report));
    Ok(())
}

fn run_clear(cache_dir: Option<PathBuf>, point: Point, renderer: &Renderer) -> Result<()> {
    let disk = disk_tier(cache_dir)?;
    let key = point.key();
    CacheTier::<Locationforecast>::clear(&disk, &key)
        .with_context(|| format!("Failed to clear {}", key))?;

    let report = MetaReport::new(key.as_str(), None, now());
    println!("{}", renderer.render_report(&report));
    Ok(())
}

fn disk_tier(cache_dir: Option<PathBuf>) -> Result<DiskTier> {
    match cache_dir {
        Some(dir) => Ok(DiskTier::new(dir)),
        None => bail!("Disk cache is disabled (no --cache-dir and no user cache directory)"),
    }
}
