//! Paired satellite/cropland dataset builder.
//!
//! - `generate` samples random squares inside a bounding box and writes a
//!   Sentinel-2 true color image and a CDL cultivation mask for each
//! - `split` copies the pairs into `train/` and `test/` partitions
//! - `stats` reports the share of cultivated pixels in a folder of masks

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dataset::{
    pixel_balance, split_dataset, EarthEngineSource, Generator, LogProgress, SplitOptions,
};
use dataset_common::{BoundingBox, SampleKind};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{Overrides, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "dataset-builder")]
#[command(about = "Build paired optical/cultivation training datasets from Earth Engine")]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download image pairs for random locations
    Generate(GenerateArgs),

    /// Partition generated pairs into train and test sets
    Split {
        /// Dataset root containing copernicus/ and usda_nass/
        #[arg(long, env = "DATASET_ROOT", default_value = "dataset")]
        root: PathBuf,

        /// Share of pairs placed in train/
        #[arg(long, default_value = "0.8")]
        train_fraction: f64,

        /// RNG seed for a reproducible split
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Report the white/black pixel balance of a folder of masks
    Stats {
        /// Folder of cultivation images (default: <DATASET_ROOT>/usda_nass)
        folder: Option<PathBuf>,

        #[arg(long, env = "DATASET_ROOT", default_value = "dataset")]
        root: PathBuf,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// YAML run file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of pairs to generate
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Sequence number of the first pair
    #[arg(long)]
    start_index: Option<u64>,

    /// Sampling area as min_lon,min_lat,max_lon,max_lat
    #[arg(long, allow_hyphen_values = true)]
    bounds: Option<BoundingBox>,

    /// Side of each square in kilometers
    #[arg(long)]
    square_size_km: Option<f64>,

    /// Export resolution in meters per pixel
    #[arg(long)]
    scale: Option<f64>,

    /// Edge of the top-left crop in pixels
    #[arg(long)]
    crop_size: Option<u32>,

    /// Keep full exports instead of cropping
    #[arg(long)]
    no_crop: bool,

    /// Dataset root directory
    #[arg(short, long, env = "DATASET_ROOT")]
    output_root: Option<PathBuf>,

    /// RNG seed for reproducible locations
    #[arg(long)]
    seed: Option<u64>,

    /// Earth Engine REST endpoint
    #[arg(long, env = "EE_API_URL")]
    api_url: Option<String>,

    /// Cloud project billed for requests
    #[arg(long, env = "EE_PROJECT")]
    project: Option<String>,

    /// OAuth2 access token (expires after about an hour)
    #[arg(long, env = "EE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Refresh credentials JSON, used instead of a fixed access token
    #[arg(long, env = "EE_CREDENTIALS")]
    credentials: Option<PathBuf>,
}

impl From<GenerateArgs> for Overrides {
    fn from(args: GenerateArgs) -> Self {
        Overrides {
            count: args.count,
            start_index: args.start_index,
            bounds: args.bounds,
            square_size_km: args.square_size_km,
            scale: args.scale,
            crop_size: args.crop_size,
            no_crop: args.no_crop,
            output_root: args.output_root,
            seed: args.seed,
            api_url: args.api_url,
            project: args.project,
            access_token: args.access_token,
            credentials_file: args.credentials,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json)?;

    match cli.command {
        Commands::Generate(args) => generate(args).await,
        Commands::Split {
            root,
            train_fraction,
            seed,
        } => split(root, train_fraction, seed),
        Commands::Stats { folder, root } => {
            let folder = folder.unwrap_or_else(|| root.join(SampleKind::Cultivation.dir_name()));
            stats(folder)
        }
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

async fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = RunConfig::load(args.config.as_deref())?;
    config.apply(args.into());

    let client = config.earth_engine.client()?;
    let source =
        EarthEngineSource::with_queries(client, config.optical_query(), config.cultivation_query());

    let mut generator =
        Generator::new(config.generator.clone()).context("Invalid generation settings")?;
    let summary = generator
        .run(&source, &mut LogProgress)
        .await
        .context("Sample generation failed")?;

    match summary.indices {
        Some((first, last)) => info!(
            generated = summary.generated,
            first,
            last,
            undersized = summary.undersized,
            elapsed_secs = summary.elapsed.as_secs_f64(),
            "Finished"
        ),
        None => info!("Nothing to generate"),
    }
    Ok(())
}

fn split(root: PathBuf, train_fraction: f64, seed: Option<u64>) -> Result<()> {
    let options = SplitOptions {
        train_fraction,
        seed,
    };
    let summary = split_dataset(&root, &options)
        .with_context(|| format!("Failed to split dataset at {}", root.display()))?;

    info!(
        train = summary.train.len(),
        test = summary.test.len(),
        "Split complete"
    );
    Ok(())
}

fn stats(folder: PathBuf) -> Result<()> {
    let balance = pixel_balance(&folder)
        .with_context(|| format!("Failed to measure {}", folder.display()))?;

    println!("Pct. white pixels:\t{}", balance.white_fraction());
    println!("Pct. black pixels:\t{}", balance.black_fraction());
    Ok(())
}
