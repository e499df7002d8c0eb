//! Port discovery
//!
//! Scans the system's serial ports, hides the printer's own port, and pushes
//! the result to the settings panel as a `serial_ports` message. The last
//! scan is kept so availability questions can be answered without rescanning.

use std::collections::BTreeMap;

use crossbeam_channel::Sender;

use crate::domain::{AirQualityResult, PluginMessage, SerialPortInfo};
use crate::ports::PortScanner;

pub struct PortDiscovery {
    scanner: Box<dyn PortScanner>,
    printer_port: Option<String>,
    ports: BTreeMap<String, SerialPortInfo>,
    notifier: Sender<PluginMessage>,
}

impl PortDiscovery {
    pub fn new(
        scanner: Box<dyn PortScanner>,
        printer_port: Option<String>,
        notifier: Sender<PluginMessage>,
    ) -> Self {
        Self {
            scanner,
            printer_port,
            ports: BTreeMap::new(),
            notifier,
        }
    }

    pub fn printer_port(&self) -> Option<&str> {
        self.printer_port.as_deref()
    }

    /// The printer moved to another port; the next refresh uses it.
    pub fn set_printer_port(&mut self, port: Option<String>) {
        self.printer_port = port;
    }

    /// Rescan on request, always publish the port map, and report whether
    /// it changed since the previous scan.
    pub fn refresh(&mut self) -> AirQualityResult<bool> {
        self.scan(true)
    }

    /// Periodic rescan; publishes only when the port map changed.
    pub fn poll(&mut self) -> AirQualityResult<bool> {
        self.scan(false)
    }

    fn scan(&mut self, publish: bool) -> AirQualityResult<bool> {
        log::debug!("Building list of available serial ports...");
        let ports: BTreeMap<String, SerialPortInfo> = self
            .scanner
            .list_ports()?
            .into_iter()
            .filter(|p| Some(&p.device) != self.printer_port.as_ref())
            .map(|p| (p.device.clone(), p))
            .collect();

        if let Some(printer) = &self.printer_port {
            log::debug!("Ignoring printer port {printer}");
        }

        let changed = ports != self.ports;
        self.ports = ports;
        if !(publish || changed) {
            return Ok(false);
        }

        if self.ports.is_empty() {
            log::info!("No serial ports available");
        } else {
            let names: Vec<&str> = self.ports.keys().map(String::as_str).collect();
            log::info!("Available serial ports: {}", names.join(", "));
        }
        if self
            .notifier
            .send(PluginMessage::SerialPorts(self.ports.clone()))
            .is_err()
        {
            log::warn!("No listener for serial port updates");
        }
        Ok(changed)
    }

    pub fn ports(&self) -> &BTreeMap<String, SerialPortInfo> {
        &self.ports
    }

    /// Whether `port` was present in the last scan.
    pub fn is_available(&self, port: &str) -> bool {
        self.ports.contains_key(port)
    }
}
