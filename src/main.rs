use anyhow::{Context, Result};
use clap::Parser;
use radar_core::runtime::{LogSpeaker, Narrator, PacedWorker};
use radar_core::{Settings, SummarySlot};
use radar_cv::{MinimapPipeline, RadarConfig, ScreenCapturer};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, mpsc};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod console;
mod presenter;

use presenter::{OutputFormat, Presenter};

const DEFAULT_LOG_FILTER: &str = "minimap_radar=info,radar_core=info,radar_cv=info";

/// Minimap radar: reports teammate, enemy and planted-device zones.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding the zone file, reference map and template
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))]
    assets: PathBuf,

    /// JSON configuration file; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print each summary as a JSON line instead of the text view
    #[arg(long)]
    json: bool,

    /// Start with voice narration enabled
    #[arg(long)]
    voice: bool,

    /// Start with the presentation hidden
    #[arg(long)]
    no_display: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("🛰  Minimap radar starting");

    let config = match &args.config {
        Some(path) => RadarConfig::load(path)?,
        None => RadarConfig::default(),
    };

    let mut pipeline = MinimapPipeline::load(&config, &args.assets)
        .with_context(|| format!("Failed to load assets from {}", args.assets.display()))?;
    info!("✓ Pipeline ready");

    let settings = Arc::new(Settings::new());
    settings.set_voice_enabled(args.voice);
    settings.set_presentation_enabled(!args.no_display);
    let slot = Arc::new(SummarySlot::new());

    let mut capturer = ScreenCapturer::new(config.capture);
    PacedWorker::new(Arc::clone(&settings), Arc::clone(&slot), config.pacing, move || {
        pipeline.cycle(&mut capturer)
    })
    .spawn()
    .context("Failed to start pipeline worker")?;

    let (narration_tx, narration_rx) = mpsc::channel();
    Narrator::new(LogSpeaker, Arc::clone(&settings))
        .spawn(narration_rx)
        .context("Failed to start narration worker")?;

    let quit = Arc::new(AtomicBool::new(false));
    console::spawn(Arc::clone(&settings), Arc::clone(&quit)).context("Failed to start console")?;

    for (action, key) in settings.hotkeys().iter() {
        if let Some(key) = key {
            info!("  {:<10} {}", action.name(), key);
        }
    }

    let format = if args.json { OutputFormat::Json } else { OutputFormat::Text };
    Presenter::new(settings, slot, format, std::io::stdout())
        .with_narration(narration_tx)
        .run(&quit)?;

    Ok(())
}
