//! Binary entry point: drive a car around the track to browse the portfolio.
use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use trackfolio::{init_logging, DrivePlugin, PresentationPlugin, SurfaceStrategy, TrackfolioConfig};

/// An interactive racetrack portfolio
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the drivability strategy (`raster` or `outline`)
    #[arg(long)]
    surface: Option<SurfaceStrategy>,
}

fn load_config(args: &Args) -> Result<TrackfolioConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => TrackfolioConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => TrackfolioConfig::default(),
    };
    if let Some(surface) = args.surface {
        config.surface = surface;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args).inspect_err(|err| log::error!("{err:#}"))?;

    App::new()
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "trackfolio".to_owned(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins((DrivePlugin::new(config), PresentationPlugin))
        .run();
    Ok(())
}
