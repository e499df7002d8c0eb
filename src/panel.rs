//! Settings panel view model
//!
//! Wraps the draft registry with the state the panel shows around it: the
//! sensor read thread indicator, a transient alert, and display rows for
//! the device table.

use crate::domain::{supported_models, AirQualityResult, PluginMessage};
use crate::ports::SettingsStore;
use crate::registry::{DraftDeviceRegistry, EntryKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

/// One line of the device table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    pub key: EntryKey,
    pub name: String,
    /// Pretty model name, or the raw code if it is not in the table
    pub model: String,
    pub location: Option<String>,
    pub port: Option<String>,
    /// False when a port is assigned but not currently plugged in
    pub port_available: bool,
}

#[derive(Debug, Default)]
pub struct SettingsPanel {
    registry: DraftDeviceRegistry,
    read_thread_running: bool,
    alert: Option<Alert>,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &DraftDeviceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DraftDeviceRegistry {
        &mut self.registry
    }

    /// Load the drafts when the panel is opened.
    pub fn open(&mut self, store: &dyn SettingsStore) -> AirQualityResult<()> {
        let loaded = self.registry.load(store);
        if let Err(e) = &loaded {
            self.show(AlertKind::Error, format!("Failed to load settings: {e}"));
        }
        loaded
    }

    /// Apply a message pushed by the backend.
    pub fn handle_message(&mut self, message: PluginMessage) {
        match message {
            PluginMessage::SerialPorts(ports) => self.registry.on_ports_updated(ports.into_keys()),
            PluginMessage::ReadThreadStatus(active) => self.read_thread_running = active,
        }
    }

    pub fn read_thread_running(&self) -> bool {
        self.read_thread_running
    }

    /// Commit the drafts. A store failure is shown as an alert and returned;
    /// the drafts stay as they were so the user can retry. A save that leaves
    /// a device on an unplugged port succeeds with a warning.
    pub fn save(&mut self, store: &mut dyn SettingsStore) -> AirQualityResult<bool> {
        match self.registry.save(store) {
            Ok(true) => {
                let unplugged = self.unplugged_ports().first().map(|p| p.to_string());
                match unplugged {
                    Some(port) => self.show(
                        AlertKind::Warning,
                        format!("Settings saved, but {port} is not currently connected"),
                    ),
                    None => self.show(AlertKind::Success, "Settings saved".to_string()),
                }
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                self.show(AlertKind::Error, format!("Failed to save settings: {e}"));
                Err(e)
            }
        }
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Warn when the device being edited points at a port that is not plugged in.
    pub fn selected_port_warning(&self) -> Option<String> {
        let selected = self.registry.selected()?;
        if !self.registry.port_unavailable(selected) {
            return None;
        }
        selected
            .port()
            .map(|port| format!("{port} is not currently connected"))
    }

    /// (code, label) pairs for the model picker, in table order.
    pub fn model_options(&self) -> Vec<(&'static str, &'static str)> {
        supported_models().collect()
    }

    pub fn device_rows(&self) -> Vec<DeviceRow> {
        self.registry
            .devices()
            .iter()
            .map(|entry| {
                let device = entry.value();
                DeviceRow {
                    key: entry.key(),
                    name: device.name.clone(),
                    model: self
                        .registry
                        .pretty_model_name(&device.model)
                        .map_or_else(|| device.model.clone(), String::from),
                    location: device
                        .location_id
                        .and_then(|id| self.registry.location_name(id))
                        .map(String::from),
                    port: device.port().map(String::from),
                    port_available: !self.registry.port_unavailable(device),
                }
            })
            .collect()
    }

    fn unplugged_ports(&self) -> Vec<&str> {
        self.registry
            .devices()
            .iter()
            .map(|entry| entry.value())
            .filter(|device| self.registry.port_unavailable(device))
            .filter_map(|device| device.port())
            .collect()
    }

    fn show(&mut self, kind: AlertKind, message: String) {
        self.alert = Some(Alert { kind, message });
    }
}
