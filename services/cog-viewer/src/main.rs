//! Command-line viewer for Cloud Optimized GeoTIFFs.
//!
//! Talks to a COG tile service to:
//! - print raster metadata (`info`)
//! - build the tile URL template for a raster and rendering options (`tile-url`)
//! - drive an interactive viewer session against a headless map (`interactive`)

mod commands;
mod config;
mod headless;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cog_client::{HttpMetadataClient, MetadataSource};
use cog_common::{Colormap, InfoPanel};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use viewer::{
    BandType, RenderParameters, Resolution, SessionConfig, SessionSnapshot, ViewerCommand,
    ViewerSession,
};

use commands::{parse_line, LineCommand, HELP};
use config::ViewerConfig;
use headless::{HeadlessMap, ViewState};

#[derive(Parser, Debug)]
#[command(name = "cog-viewer")]
#[command(about = "Browse Cloud Optimized GeoTIFFs through a COG tile service")]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "COG_VIEWER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Tile service root (overrides the config file)
    #[arg(long, env = "COG_SERVICE_URL", global = true)]
    service_url: Option<String>,

    /// Debounce for locator edits in milliseconds (overrides the config file)
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print metadata for a raster
    Info {
        /// Local path or remote URL of the raster
        #[arg(long)]
        url: String,

        /// Print the raw metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the tile URL template for a raster and rendering options
    TileUrl {
        /// Local path or remote URL of the raster
        #[arg(long)]
        url: String,

        #[command(flatten)]
        style: StyleArgs,

        /// Print a JSON report instead of the bare template
        #[arg(long)]
        json: bool,

        /// Also list the tiles covering the fitted view
        #[arg(long)]
        tiles: bool,
    },

    /// Line-driven viewer session on stdin
    Interactive,
}

#[derive(clap::Args, Debug)]
struct StyleArgs {
    #[arg(long, default_value = "viridis")]
    colormap: Colormap,

    /// 1-based band index (multi-band rasters)
    #[arg(long, default_value = "1")]
    band: u32,

    #[arg(long, default_value = "single")]
    band_type: BandType,

    /// Rescale minimum; only sent together with --max
    #[arg(long, allow_hyphen_values = true)]
    min: Option<f64>,

    /// Rescale maximum; only sent together with --min
    #[arg(long, allow_hyphen_values = true)]
    max: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    nodata: Option<f64>,
}

impl StyleArgs {
    fn commands(&self) -> Vec<ViewerCommand> {
        vec![
            ViewerCommand::SetBandType(self.band_type),
            ViewerCommand::SetColormap(self.colormap),
            ViewerCommand::SetBand(self.band),
            ViewerCommand::SetMin(self.min),
            ViewerCommand::SetMax(self.max),
            ViewerCommand::SetNodata(self.nodata),
        ]
    }
}

#[derive(Debug, Serialize)]
struct TileUrlReport {
    tile_url: String,
    resolution: Resolution,
    params: RenderParameters,
    center: [f64; 2],
    zoom: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tiles: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let config = load_config(&args)?;
    info!(service_url = %config.service_url, "Starting COG viewer");

    match args.command {
        Command::Info { url, json } => run_info(&config, &url, json).await,
        Command::TileUrl {
            url,
            style,
            json,
            tiles,
        } => run_tile_url(&config, &url, &style, json, tiles).await,
        Command::Interactive => run_interactive(config).await,
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
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Config file (or defaults), then command-line and environment overrides.
fn load_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };

    if let Some(url) = &args.service_url {
        config.service_url = url.clone();
    }
    if let Some(debounce_ms) = args.debounce_ms {
        config.debounce_ms = debounce_ms;
    }

    config.validate().context("Invalid viewer configuration")?;
    Ok(config)
}

fn initial_view(config: &ViewerConfig) -> ViewState {
    ViewState {
        center: config.initial_center,
        zoom: config.initial_zoom,
        size: config.viewport,
    }
}

async fn run_info(config: &ViewerConfig, url: &str, json: bool) -> Result<()> {
    let client = HttpMetadataClient::new(config.client_config())?;
    let metadata = client
        .fetch_info(url)
        .await
        .with_context(|| format!("Failed to fetch info for {}", url))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        println!("{}", InfoPanel(&metadata));
    }
    Ok(())
}

async fn run_tile_url(
    config: &ViewerConfig,
    url: &str,
    style: &StyleArgs,
    json: bool,
    tiles: bool,
) -> Result<()> {
    if url.trim().is_empty() {
        bail!("No metadata: the raster locator is blank");
    }

    let client = Arc::new(HttpMetadataClient::new(config.client_config())?);
    let map = HeadlessMap::new(initial_view(config));

    // One locator and no typing: nothing to debounce
    let session_config = SessionConfig {
        debounce: Duration::ZERO,
        ..config.session_config()
    };
    let mut session = ViewerSession::new(session_config, map.clone(), client);

    for command in style.commands() {
        session.dispatch(command);
    }
    session.dispatch(ViewerCommand::SetLocator(url.to_string()));
    if !session.process_next_fetch().await || session.metadata().is_none() {
        bail!("No metadata for {}; see the log for the service response", url);
    }

    session.dispatch(ViewerCommand::Show);
    let snapshot = session.snapshot();
    session.shutdown();

    let Some(tile_url) = snapshot.tile_url else {
        bail!("Nothing to render for {}", url);
    };
    let view = map.view();
    let tiles = if tiles { map.visible_tiles() } else { Vec::new() };

    if json {
        let report = TileUrlReport {
            tile_url,
            resolution: snapshot.resolution,
            params: snapshot.params,
            center: view.center,
            zoom: view.zoom,
            tiles,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", tile_url);
        for tile in tiles {
            println!("{}", tile);
        }
    }
    Ok(())
}

async fn run_interactive(config: ViewerConfig) -> Result<()> {
    let client = Arc::new(HttpMetadataClient::new(config.client_config())?);
    let map = HeadlessMap::new(initial_view(&config));
    let (handle, task) = ViewerSession::new(config.session_config(), map.clone(), client).spawn();

    println!("COG viewer on {}. Type 'help' for commands.", config.service_url);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match parse_line(&line) {
            Ok(LineCommand::Session(command)) => handle.send(command).await?,
            Ok(LineCommand::Info) => print_info(&handle.snapshot().await?),
            Ok(LineCommand::Status) => print_status(&handle.snapshot().await?, &map),
            Ok(LineCommand::Tiles) => {
                let tiles = map.visible_tiles();
                if tiles.is_empty() {
                    println!("No COG tiles in view");
                }
                for tile in tiles {
                    println!("{}", tile);
                }
            }
            Ok(LineCommand::Help) => println!("{}", HELP),
            Ok(LineCommand::Quit) => break,
            Ok(LineCommand::Empty) => {}
            Err(message) => eprintln!("{}", message),
        }
    }

    handle.shutdown().await?;
    task.await.context("Viewer session task failed")?;
    info!("Viewer session closed");
    Ok(())
}

fn print_info(snapshot: &SessionSnapshot) {
    let Some(metadata) = &snapshot.metadata else {
        println!("No raster metadata");
        return;
    };
    println!("{}", InfoPanel(metadata));

    let controls = snapshot.resolution.controls();
    let mut offered = Vec::new();
    if let Some(bands) = controls.band_options {
        offered.push(format!("band {}-{}", bands.start(), bands.end()));
    }
    if controls.colormap {
        offered.push(format!(
            "colormap ({})",
            Colormap::ALL.map(|c| c.as_str()).join(", ")
        ));
    }
    if controls.rescale {
        offered.push("min/max".to_string());
    }
    if controls.nodata {
        offered.push("nodata".to_string());
    }
    if offered.is_empty() {
        println!("Controls:   none (true color)");
    } else {
        println!("Controls:   {}", offered.join("; "));
    }
}

fn print_status(snapshot: &SessionSnapshot, map: &HeadlessMap) {
    let view = map.view();
    println!("Locator:    {}", snapshot.locator);
    println!(
        "Tile URL:   {}",
        snapshot.tile_url.as_deref().unwrap_or("(none)")
    );
    println!(
        "View:       center {:.1}, {:.1} zoom {}",
        view.center[0], view.center[1], view.zoom
    );
    let layers: Vec<&str> = map.layers().iter().map(|l| l.name).collect();
    println!("Layers:     {}", layers.join(", "));
    if !map.is_attached() {
        println!("Map detached");
    }
    if snapshot.fetch_pending {
        println!("Fetching raster info...");
    }
}
