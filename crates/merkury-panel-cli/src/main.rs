//! Merkury Panel Control Tool
//!
//! CLI for driving a Merkury 16x16 LED matrix panel over BLE.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use merkury_panel_ble::{
    BleCentral, PanelSession, Pixel, PixelGrid, SessionConfig, PANEL_HEIGHT, PANEL_WIDTH,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "merkurypanelctl")]
#[command(about = "Control tool for Merkury LED matrix panels")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Pairing scan timeout in seconds
    #[arg(long, default_value_t = 20)]
    scan_timeout: u64,

    /// Delay between frame packets in milliseconds
    #[arg(long, default_value_t = 30)]
    packet_delay: u64,

    /// Total pairing attempts before giving up
    #[arg(long, default_value_t = 10)]
    attempts: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw an image to the panel
    Draw {
        /// Path to a static or animated image
        image: PathBuf,

        /// Replay the image forever
        #[arg(long)]
        repeat: bool,
    },
    /// Show the current unix time as a 256-bit binary pattern, forever
    Clock,
    /// Fill the panel with a solid color
    Fill {
        /// Color in hex format (e.g., #FF0000 for red)
        #[arg(default_value = "#000000")]
        color: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    let config = SessionConfig {
        scan_timeout: Duration::from_secs(cli.scan_timeout),
        packet_delay: Duration::from_millis(cli.packet_delay),
    };
    let central = BleCentral::new()
        .await
        .context("Failed to open a Bluetooth adapter")?;
    let mut session = PanelSession::with_transport(central, config);

    pair_with_retries(&mut session, cli.attempts).await?;
    session
        .connect()
        .await
        .context("Failed to connect to the panel")?;

    match cli.command {
        Commands::Draw { image, repeat } => {
            let frames = PixelGrid::load(&image)?;
            info!("Loaded {} frame(s) from {}", frames.len(), image.display());
            if repeat {
                session.play(&frames).await?;
            } else {
                session.draw_frames(&frames).await?;
                session.disconnect().await?;
            }
        }
        Commands::Clock => run_clock(&mut session).await?,
        Commands::Fill { color } => {
            let pixel =
                Pixel::from_hex(&color).with_context(|| format!("Invalid color: {color}"))?;
            let mut grid = PixelGrid::new();
            grid.clear(pixel);
            session.draw(&grid).await?;
            session.disconnect().await?;
        }
    }

    Ok(())
}

/// Attempts pairing up to `attempts` times total before aborting.
async fn pair_with_retries(session: &mut PanelSession<BleCentral>, attempts: u32) -> Result<()> {
    info!("Finding panel...");
    for attempt in 1..=attempts {
        if session.pair().await.context("Pairing scan failed")? {
            info!("Found panel");
            return Ok(());
        }
        if attempt < attempts {
            warn!("Failed to pair (attempt {attempt}/{attempts}), trying again...");
        }
    }
    bail!(
        "No panel found after {attempts} attempts. \
         Is it nearby, powered on, and not already connected to something?"
    )
}

/// Draws the current unix time as a binary pattern, once per frame, forever.
async fn run_clock(session: &mut PanelSession<BleCentral>) -> Result<()> {
    info!("Drawing binary clock (ctrl-c to stop)");
    loop {
        let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        session.draw(&clock_grid(secs)?).await?;
    }
}

/// Renders a timestamp as a 256-bit binary pattern, most significant bit
/// first in row-major order, white for set bits.
fn clock_grid(secs: u64) -> Result<PixelGrid> {
    let mut grid = PixelGrid::new();
    let cells = PANEL_WIDTH * PANEL_HEIGHT;
    for index in 0..cells {
        let shift = cells - 1 - index;
        let bit = shift < 64 && (secs >> shift) & 1 == 1;
        grid.set_pixel(index % PANEL_WIDTH, index / PANEL_WIDTH, Pixel::from_bool(bit))?;
    }
    Ok(grid)
}
