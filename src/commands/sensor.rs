//! Sensor read thread commands: start, stop

use std::sync::Arc;
use std::time::Duration;

use crate::state::AppState;

use super::CommandReply;

pub fn start_sensor_read(state: &AppState) -> Result<CommandReply, String> {
    let interval = Duration::from_secs(state.settings.read_interval_secs.max(1));
    let started = state
        .read_thread
        .lock()
        .map_err(|_| "Sensor read thread state corrupted".to_string())?
        .start(
            Arc::clone(&state.discovery),
            Arc::clone(&state.store),
            interval,
        )
        .map_err(|e| format!("Failed to start the Sensors Read Thread: {e}"))?;
    Ok(CommandReply::message(if started {
        "Sensors Read Thread started"
    } else {
        "Sensors Read Thread is already running"
    }))
}

pub fn stop_sensor_read(state: &AppState) -> Result<CommandReply, String> {
    let stopped = state
        .read_thread
        .lock()
        .map_err(|_| "Sensor read thread state corrupted".to_string())?
        .stop();
    Ok(CommandReply::message(if stopped {
        "Sensors Read Thread stopped"
    } else {
        "Sensors Read Thread is already stopped"
    }))
}
