//! Serial port discovery trait

use crate::domain::{AirQualityResult, SerialPortInfo};

/// Enumerates the serial ports currently present on the system.
pub trait PortScanner: Send {
    /// List available serial ports
    fn list_ports(&self) -> AirQualityResult<Vec<SerialPortInfo>>;
}
