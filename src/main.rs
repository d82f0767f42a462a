//! AFK Auto-Help - keeps a game character fed and chopping while away
//!
//! Feeds on a fixed timer or whenever an on-screen hunger bar runs low,
//! and clicks a fixed point at a steady rate for a bounded time.

mod app;
mod capture;
mod config;
mod dashboard;
mod hotkey;
mod input;
mod overlay;
mod shared;
mod storage;
mod vision;
mod workers;

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::AutomationCoordinator;
use crate::capture::{ScreenRegion, XcapCapturer};
use crate::config::AppConfig;
use crate::dashboard::{run_dashboard, DashboardApp};
use crate::hotkey::HotkeyManager;
use crate::input::EnigoClicker;
use crate::vision::{try_read_hunger_fraction, PixelHungerSensor};

/// AFK Auto-Help - timed feeding, hunger-bar feeding and auto-chop
#[derive(Parser, Debug)]
#[command(name = "afk-auto-help", version)]
#[command(about = "Feeds and chops for you while you are away from the keyboard")]
struct Args {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List available monitors and exit
    #[arg(long)]
    list_monitors: bool,

    /// Read the hunger bar in region "x,y,w,h" once and exit
    #[arg(long, value_name = "X,Y,W,H")]
    probe: Option<String>,
}

/// Outcome of locating the startup configuration
enum ConfigSource {
    Loaded(PathBuf),
    Created(PathBuf),
    Defaults(anyhow::Error),
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, source) = load_or_create_config(args.config.as_deref());

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.general.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = match source {
        ConfigSource::Loaded(path) => {
            info!("Loaded configuration from {:?}", path);
            Some(path)
        }
        ConfigSource::Created(path) => {
            info!("Wrote default configuration to {:?}", path);
            Some(path)
        }
        ConfigSource::Defaults(e) => {
            warn!("Using default configuration: {:#}", e);
            None
        }
    };

    if args.list_monitors {
        return list_monitors();
    }

    if let Some(region) = args.probe.as_deref() {
        return probe(region, &config);
    }

    info!("AFK Auto-Help starting...");

    let capturer = Arc::new(XcapCapturer::new());
    let sensor = Arc::new(PixelHungerSensor::new(capturer, config.detection.clone()));
    let coordinator = AutomationCoordinator::new(&config, Arc::new(EnigoClicker::new()), sensor);

    let hotkeys = match HotkeyManager::new(&config.hotkeys) {
        Ok(hotkeys) => Some(hotkeys),
        Err(e) => {
            warn!("Global hotkeys unavailable: {:#}", e);
            None
        }
    };

    let app = DashboardApp::new(coordinator, hotkeys, config, config_path);
    if let Err(e) = run_dashboard(app) {
        error!("Dashboard error: {}", e);
    }

    info!("AFK Auto-Help shutdown complete");
    Ok(())
}

/// Load the configuration file, writing the defaults if it does not exist
fn load_or_create_config(explicit: Option<&Path>) -> (AppConfig, ConfigSource) {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match storage::default_config_path() {
            Ok(path) => path,
            Err(e) => return (AppConfig::default(), ConfigSource::Defaults(e)),
        },
    };

    if path.exists() {
        return match config::load_config(&path) {
            Ok(config) => (config, ConfigSource::Loaded(path)),
            Err(e) => (
                AppConfig::default(),
                ConfigSource::Defaults(e.context(format!("could not read {}", path.display()))),
            ),
        };
    }

    let config = AppConfig::default();
    match config::save_config(&config, &path) {
        Ok(()) => (config, ConfigSource::Created(path)),
        Err(e) => (
            config,
            ConfigSource::Defaults(e.context(format!("could not write {}", path.display()))),
        ),
    }
}

fn list_monitors() -> Result<()> {
    let monitors = capture::list_monitors()?;
    println!("Available monitors:");
    if monitors.is_empty() {
        println!("  No monitors detected");
    }
    for monitor in &monitors {
        println!(
            "  [{}] {} - {}x{} at ({}, {}){}",
            monitor.index,
            monitor.name,
            monitor.bounds.width,
            monitor.bounds.height,
            monitor.bounds.x,
            monitor.bounds.y,
            if monitor.is_primary { " (primary)" } else { "" }
        );
    }
    Ok(())
}

fn probe(region: &str, config: &AppConfig) -> Result<()> {
    let region = ScreenRegion::parse(region)
        .ok_or_else(|| anyhow!("expected region as x,y,w,h, got '{}'", region))?;
    let fraction = try_read_hunger_fraction(&XcapCapturer::new(), Some(&region), &config.detection)?;
    println!("Hunger in {}: {:.1}%", region, fraction * 100.0);
    Ok(())
}
