//! Serial port commands: rescan, printer port changes
//!
//! The port list is not part of the reply: it reaches the panel through the
//! plugin message channel, like every other port update.

use crate::state::AppState;

use super::CommandReply;

pub fn refresh_available_serial_ports(state: &AppState) -> Result<CommandReply, String> {
    state
        .discovery
        .lock()
        .map_err(|_| "Port discovery state corrupted".to_string())?
        .refresh()
        .map_err(|e| format!("Failed to refresh serial port availability: {e}"))?;
    Ok(CommandReply::message("Serial port availability refreshed"))
}

/// The printer connected; hide its port from sensors and rescan if it moved.
pub fn printer_connected(state: &AppState, port: Option<String>) -> Result<CommandReply, String> {
    let mut discovery = state
        .discovery
        .lock()
        .map_err(|_| "Port discovery state corrupted".to_string())?;
    if discovery.printer_port() == port.as_deref() {
        return Ok(CommandReply::message("Printer port unchanged"));
    }
    log::info!("Printer connected on {}", port.as_deref().unwrap_or("unknown port"));
    discovery.set_printer_port(port);
    discovery
        .refresh()
        .map_err(|e| format!("Failed to refresh serial port availability: {e}"))?;
    Ok(CommandReply::message("Serial port availability refreshed"))
}
