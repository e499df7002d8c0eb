//! Command surface exposed to the settings panel
//!
//! Each request is a JSON object tagged by `command`, e.g.
//! `{"command": "create_device", "device": {...}}`. Handlers take the shared
//! `AppState` and return `Result<CommandReply, String>`; `dispatch_json`
//! wraps that into one JSON reply line.

pub mod records;
pub mod sensor;
pub mod serial;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Device, Location};
use crate::state::AppState;

/// Reference to a stored record by id, as sent by delete requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ApiCommand {
    GetDevices,
    CreateDevice { device: Device },
    UpdateDevice { device: Device },
    DeleteDevice { device: RecordRef },
    ReplaceDevices { devices: Vec<Device> },
    GetLocations,
    CreateLocation { location: Location },
    UpdateLocation { location: Location },
    DeleteLocation { location: RecordRef },
    ReplaceLocations { locations: Vec<Location> },
    RefreshAvailableSerialPorts,
    StartSensorRead,
    StopSensorRead,
    PrinterConnected { port: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandReply {
    Created { message: String, id: u64 },
    Message { message: String },
    Devices { devices: Vec<Device> },
    Locations { locations: Vec<Location> },
}

impl CommandReply {
    pub(crate) fn message(message: &str) -> Self {
        Self::Message {
            message: message.to_string(),
        }
    }
}

/// Run one command against the application state.
pub fn handle(state: &AppState, command: ApiCommand) -> Result<CommandReply, String> {
    match command {
        ApiCommand::GetDevices => records::get_devices(state),
        ApiCommand::CreateDevice { device } => records::create_device(state, device),
        ApiCommand::UpdateDevice { device } => records::update_device(state, device),
        ApiCommand::DeleteDevice { device } => records::delete_device(state, device.id),
        ApiCommand::ReplaceDevices { devices } => records::replace_devices(state, devices),
        ApiCommand::GetLocations => records::get_locations(state),
        ApiCommand::CreateLocation { location } => records::create_location(state, location),
        ApiCommand::UpdateLocation { location } => records::update_location(state, location),
        ApiCommand::DeleteLocation { location } => records::delete_location(state, location.id),
        ApiCommand::ReplaceLocations { locations } => records::replace_locations(state, locations),
        ApiCommand::RefreshAvailableSerialPorts => serial::refresh_available_serial_ports(state),
        ApiCommand::StartSensorRead => sensor::start_sensor_read(state),
        ApiCommand::StopSensorRead => sensor::stop_sensor_read(state),
        ApiCommand::PrinterConnected { port } => serial::printer_connected(state, port),
    }
}

/// Parse a JSON request, run it, and render the reply (or `{"error": ...}`).
pub fn dispatch_json(state: &AppState, request: &str) -> String {
    let reply = serde_json::from_str::<ApiCommand>(request)
        .map_err(|e| format!("Invalid command: {e}"))
        .and_then(|command| {
            log::info!("API command received: {}", command_name(&command));
            handle(state, command)
        })
        .and_then(|reply| {
            serde_json::to_value(&reply).map_err(|e| format!("Serialization error: {e}"))
        });
    let value = match reply {
        Ok(value) => value,
        Err(error) => {
            log::warn!("Command failed: {error}");
            serde_json::json!({ "error": error })
        }
    };
    value.to_string()
}

fn command_name(command: &ApiCommand) -> &'static str {
    match command {
        ApiCommand::GetDevices => "get_devices",
        ApiCommand::CreateDevice { .. } => "create_device",
        ApiCommand::UpdateDevice { .. } => "update_device",
        ApiCommand::DeleteDevice { .. } => "delete_device",
        ApiCommand::ReplaceDevices { .. } => "replace_devices",
        ApiCommand::GetLocations => "get_locations",
        ApiCommand::CreateLocation { .. } => "create_location",
        ApiCommand::UpdateLocation { .. } => "update_location",
        ApiCommand::DeleteLocation { .. } => "delete_location",
        ApiCommand::ReplaceLocations { .. } => "replace_locations",
        ApiCommand::RefreshAvailableSerialPorts => "refresh_available_serial_ports",
        ApiCommand::StartSensorRead => "start_sensor_read",
        ApiCommand::StopSensorRead => "stop_sensor_read",
        ApiCommand::PrinterConnected { .. } => "printer_connected",
    }
}

/// Panels serialise ids with `JSON.stringify`, so `3` may arrive as `"3"`.
fn id_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim_matches('"')
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id {text:?}"))),
    }
}
