//! Core domain types
//!
//! Pure types with no I/O dependencies: configured devices and locations,
//! serial port descriptors and the messages pushed to the settings panel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Single source of truth for supported sensor model code ↔ label mapping.
/// Each entry is (model code, human-readable name).
pub const MODEL_TABLE: &[(&str, &str)] = &[
    ("PMS1003", "Plantower PMS1003 (aka G1)"),
    ("PMS3003", "Plantower PMS3003 (aka G3)"),
    ("PMS5003", "Plantower PMS5003 (aka G5)"),
    ("PMS5003S", "Plantower PMS5003S"),
    ("PMS5003ST", "Plantower PMS5003ST"),
    ("PMS5003T", "Plantower PMS5003T"),
    ("PMS7003", "Plantower PMS7003 (aka G7)"),
    ("PMSA003", "Plantower PMSA003 (aka G10)"),
    ("SDS011", "Nova SDS011"),
    ("SDS018", "Nova SDS018"),
    ("SDS021", "Nova SDS021"),
    ("SDS198", "Nova SDS198"),
    ("HPMA115S0", "Honeywell HPMA115S0"),
    ("HPMA115C0", "Honeywell HPMA115C0"),
    ("SPS30", "Sensirion SPS30"),
];

/// Look up the human-readable label for a model code.
pub fn pretty_model_name(code: &str) -> Option<&'static str> {
    MODEL_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

pub fn is_supported_model(code: &str) -> bool {
    pretty_model_name(code).is_some()
}

/// All supported models in display order, for a model picker.
pub fn supported_models() -> impl Iterator<Item = (&'static str, &'static str)> {
    MODEL_TABLE.iter().copied()
}

/// A configured particulate sensor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Assigned by the settings store; `None` until first saved
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    /// Model code from `MODEL_TABLE`, or empty when not chosen yet
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub location_id: Option<u64>,
    /// Serial port path (e.g. "/dev/ttyUSB0"); `None` means not assigned
    #[serde(default)]
    pub port: Option<String>,
}

impl Device {
    /// The assigned port, treating an empty string as unassigned.
    pub fn port(&self) -> Option<&str> {
        self.port.as_deref().filter(|p| !p.is_empty())
    }

    /// Collapse empty form values to `None`.
    pub fn normalized(mut self) -> Self {
        if self.port().is_none() {
            self.port = None;
        }
        self
    }
}

/// A named place a device is installed in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
}

/// Information about a serial port
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialPortInfo {
    /// Port path, the key devices refer to
    pub device: String,
    /// Short name (last path component)
    pub name: String,
    pub port_type: String,
    pub description: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

/// Messages pushed from the backend to the settings panel.
///
/// Wire form is a single-key object, e.g. `{"serial_ports": {...}}` or
/// `{"sensors_read_thread_active_status": "true"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginMessage {
    #[serde(rename = "serial_ports")]
    SerialPorts(BTreeMap<String, SerialPortInfo>),
    #[serde(rename = "sensors_read_thread_active_status")]
    ReadThreadStatus(#[serde(with = "bool_as_string")] bool),
}

/// The status flag travels as `"true"` / `"false"`.
mod bool_as_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<bool>()
            .map_err(|_| D::Error::custom(format!("expected \"true\" or \"false\", got {raw:?}")))
    }
}
