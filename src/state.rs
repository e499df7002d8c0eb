//! Application state

use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};

use crate::discovery::PortDiscovery;
use crate::domain::{PluginMessage, PluginSettings};
use crate::ports::{PortScanner, SettingsStore};
use crate::sensor_thread::SensorReadThread;

/// Settings store shared between the command layer and the sensor read thread
pub type SharedStore = Arc<Mutex<Box<dyn SettingsStore>>>;

/// Port discovery shared between the command layer and the sensor read thread
pub type SharedDiscovery = Arc<Mutex<PortDiscovery>>;

/// Shared application state handed to every command
pub struct AppState {
    pub settings: PluginSettings,
    pub store: SharedStore,
    pub discovery: SharedDiscovery,
    pub read_thread: Mutex<SensorReadThread>,
}

impl AppState {
    /// Build the state and the receiving end of the plugin message channel.
    pub fn new(
        settings: PluginSettings,
        store: Box<dyn SettingsStore>,
        scanner: Box<dyn PortScanner>,
    ) -> (Self, Receiver<PluginMessage>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::with_notifier(settings, store, scanner, tx), rx)
    }

    pub fn with_notifier(
        settings: PluginSettings,
        store: Box<dyn SettingsStore>,
        scanner: Box<dyn PortScanner>,
        notifier: Sender<PluginMessage>,
    ) -> Self {
        let discovery = PortDiscovery::new(scanner, settings.printer_port.clone(), notifier.clone());
        Self {
            settings,
            store: Arc::new(Mutex::new(store)),
            discovery: Arc::new(Mutex::new(discovery)),
            read_thread: Mutex::new(SensorReadThread::new(notifier)),
        }
    }
}
