use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::info;

mod config;
mod display;

use config::Config;
use display::DisplayMode;
use simfov::geometry::{AspectRatio, Axis};
use simfov::units::DistanceUnit;

#[derive(Parser, Debug)]
#[command(name = "simfov")]
#[command(author, version, about = "Field-of-view calculator for sim racing setups")]
struct Args {
    /// Output mode: plain, toml or terminal
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Config file path
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Aspect ratio as H:V, e.g. 16:9 or 21:9
    #[arg(short, long)]
    ratio: Option<AspectRatio>,

    /// Diagonal screen size in inches
    #[arg(short, long)]
    size: Option<f64>,

    /// Distance from eye to screen
    #[arg(short, long)]
    distance: Option<f64>,

    /// Unit of --distance
    #[arg(short, long)]
    unit: Option<DistanceUnit>,

    /// Curve rating in millimeters (1800 for 1800R), 0 for flat
    #[arg(long)]
    curve: Option<f64>,

    /// Number of screens: 1 or 3
    #[arg(long)]
    screens: Option<u8>,

    /// Bezel width per joined edge in millimeters
    #[arg(long)]
    bezel: Option<f64>,

    /// Only list titles on this axis
    #[arg(short, long)]
    axis: Option<Axis>,

    /// Only list titles whose name contains this text
    #[arg(short, long)]
    game: Option<String>,

    /// Write a commented config template to the default path and exit
    #[arg(long)]
    init_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging on stderr so stdout stays a clean report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("simfov=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "simfov", &mut std::io::stdout());
        return Ok(());
    }

    if args.init_config {
        let path = Config::init_default_config().context("Failed to write config template")?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    // Load or create config
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(&args);

    info!("Starting simfov in {:?} mode", config.output.mode);

    match config.output.mode {
        DisplayMode::Plain => display::report::print_plain(&config)?,
        DisplayMode::Toml => display::report::print_toml(&config)?,
        DisplayMode::Terminal => display::terminal::run(config).await?,
    }

    Ok(())
}
