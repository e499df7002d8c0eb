//! Air-quality sensor settings
//!
//! Device management for particulate sensors (Plantower, Nova, Honeywell,
//! Sensirion) attached over serial ports.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `ports/` - Trait definitions (interfaces) for the settings store and port scanning
//! - `registry/` - Draft/commit reconciliation of devices and locations (pure, no I/O)
//! - `panel` - Settings panel view model around the registry
//! - `adapters/` - Implementations of ports (JSON files, in-memory, serialport)
//! - `discovery`, `sensor_thread` - Backend port scanning and the sensor read worker
//! - `commands/` - JSON command handlers (driving adapters)
//! - `state` - Application state management

// Core domain (pure, no I/O)
pub mod domain;
pub mod panel;
pub mod ports;
pub mod registry;

// Adapters (external I/O)
pub mod adapters;
pub mod discovery;
pub mod sensor_thread;

// Host integration
pub mod commands;
pub mod state;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use adapters::json_store::JsonFileStore;
use adapters::serial_port::SystemPortScanner;
use domain::{AirQualityError, AirQualityResult, PluginSettings};
use state::AppState;

/// Default data directory when none is given on the command line
pub const DEFAULT_DATA_DIR: &str = "airquality-data";

/// Run the line-oriented host: one JSON command per stdin line, one JSON
/// reply per stdout line, with pushed plugin messages interleaved.
pub fn run(data_dir: Option<PathBuf>) -> AirQualityResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let store = JsonFileStore::open(&data_dir)?;
    let settings = PluginSettings::load_or_init(&store.dir().join("settings.json"))?;
    log::info!("Starting air-quality host with {settings:?}");

    let (state, messages) = AppState::new(settings, Box::new(store), Box::new(SystemPortScanner));
    let stdout = Arc::new(Mutex::new(std::io::stdout()));

    let forward_out = Arc::clone(&stdout);
    let forwarder = std::thread::Builder::new()
        .name("plugin-messages".to_string())
        .spawn(move || {
            for message in messages {
                let Ok(line) = serde_json::to_string(&message) else {
                    continue;
                };
                let Ok(mut out) = forward_out.lock() else {
                    break;
                };
                if let Err(e) = writeln!(out, "{line}") {
                    log::warn!("Failed to write plugin message, stopping forwarder: {e}");
                    break;
                }
            }
        })
        .map_err(|e| AirQualityError::Worker(format!("Failed to spawn message forwarder: {e}")))?;

    if state.settings.start_reading_on_startup {
        let interval = Duration::from_secs(state.settings.read_interval_secs.max(1));
        let mut worker = state
            .read_thread
            .lock()
            .map_err(|_| AirQualityError::Worker("Sensor read thread state corrupted".into()))?;
        worker.start(
            Arc::clone(&state.discovery),
            Arc::clone(&state.store),
            interval,
        )?;
    }

    serve(&state, std::io::stdin().lock(), &*stdout)?;

    log::info!("Input closed, shutting down");
    // Dropping the state stops the worker and closes the message channel
    drop(state);
    let _ = forwarder.join();
    Ok(())
}

/// Answer one JSON command per `input` line on `out`. Stops when input ends
/// or a reply cannot be written.
pub fn serve<R: BufRead, W: Write>(
    state: &AppState,
    input: R,
    out: &Mutex<W>,
) -> AirQualityResult<()> {
    for line in input.lines() {
        let line = line.map_err(|e| AirQualityError::Config(format!("Failed to read input: {e}")))?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = commands::dispatch_json(state, &line);
        let Ok(mut out) = out.lock() else {
            break;
        };
        if let Err(e) = writeln!(out, "{reply}") {
            log::warn!("Failed to write reply, shutting down: {e}");
            break;
        }
    }
    Ok(())
}
