//! Sensor read thread lifecycle
//!
//! The worker owns no hardware itself: each tick it re-polls port discovery
//! and checks which configured devices are currently plugged in. AppState
//! only holds an AtomicBool run flag and the thread's JoinHandle, and every
//! start/stop is announced to the panel as a status message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::domain::{AirQualityError, AirQualityResult, PluginMessage};
use crate::state::{SharedDiscovery, SharedStore};

/// How often the sleeping worker checks its run flag
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct SensorReadThread {
    active: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    notifier: Sender<PluginMessage>,
}

impl SensorReadThread {
    pub fn new(notifier: Sender<PluginMessage>) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
            handle: None,
            notifier,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Spawn the worker. Returns `false` if it was already running.
    pub fn start(
        &mut self,
        discovery: SharedDiscovery,
        store: SharedStore,
        interval: Duration,
    ) -> AirQualityResult<bool> {
        if self.handle.is_some() {
            return Ok(false);
        }
        self.active.store(true, Ordering::SeqCst);
        let active = Arc::clone(&self.active);
        let spawned = thread::Builder::new()
            .name("sensor-read".to_string())
            .spawn(move || read_loop(&active, &discovery, &store, interval));
        match spawned {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => {
                self.active.store(false, Ordering::SeqCst);
                return Err(AirQualityError::Worker(format!("Failed to spawn: {e}")));
            }
        }
        self.publish_status();
        Ok(true)
    }

    /// Signal the worker to stop and wait for it. Returns `false` if it was
    /// not running.
    pub fn stop(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        self.active.store(false, Ordering::SeqCst);
        if handle.join().is_err() {
            log::error!("Sensor read thread panicked");
        }
        self.publish_status();
        true
    }

    fn publish_status(&self) {
        let active = self.is_active();
        log::info!("Sensor read thread status set to {active}");
        if self
            .notifier
            .send(PluginMessage::ReadThreadStatus(active))
            .is_err()
        {
            log::warn!("No listener for sensor read thread status");
        }
    }
}

impl Drop for SensorReadThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_loop(
    active: &AtomicBool,
    discovery: &SharedDiscovery,
    store: &SharedStore,
    interval: Duration,
) {
    log::info!("Starting sensor read loop");
    while active.load(Ordering::SeqCst) {
        tick(discovery, store);

        let deadline = Instant::now() + interval;
        while active.load(Ordering::SeqCst) && Instant::now() < deadline {
            thread::sleep(STOP_POLL_INTERVAL.min(interval));
        }
    }
    log::info!("Sensor read thread stopped");
}

/// One pass: rescan ports, then report each configured device's availability.
fn tick(discovery: &SharedDiscovery, store: &SharedStore) {
    let Ok(mut discovery) = discovery.lock() else {
        log::error!("Port discovery state corrupted");
        return;
    };
    if let Err(e) = discovery.poll() {
        log::warn!("Port scan failed: {e}");
    }

    let devices = match store.lock() {
        Ok(store) => store.get_devices(),
        Err(_) => {
            log::error!("Settings store state corrupted");
            return;
        }
    };
    let devices = match devices {
        Ok(devices) => devices,
        Err(e) => {
            log::warn!("Could not read configured devices: {e}");
            return;
        }
    };

    for device in &devices {
        match device.port() {
            Some(port) if discovery.is_available(port) => {
                log::debug!("Device '{}' available on {port}", device.name);
            }
            Some(port) => log::warn!("Device '{}' unavailable: {port} not present", device.name),
            None => log::debug!("Device '{}' has no port assigned", device.name),
        }
    }
}
