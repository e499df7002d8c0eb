//! Serial port scanner using the `serialport` crate
//!
//! Implements `PortScanner`. The scanner has no state; the printer's port
//! is filtered out later by `PortDiscovery`.

use crate::domain::{AirQualityError, AirQualityResult, SerialPortInfo};
use crate::ports::PortScanner;

/// Zero-sized scanner over the system's serial ports.
pub struct SystemPortScanner;

impl PortScanner for SystemPortScanner {
    fn list_ports(&self) -> AirQualityResult<Vec<SerialPortInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| AirQualityError::Serial(format!("Failed to list ports: {e}")))?;

        Ok(ports.into_iter().map(describe).collect())
    }
}

fn describe(port: serialport::SerialPortInfo) -> SerialPortInfo {
    let name = port
        .port_name
        .rsplit('/')
        .next()
        .unwrap_or(&port.port_name)
        .to_string();
    let mut info = SerialPortInfo {
        device: port.port_name.clone(),
        name,
        ..SerialPortInfo::default()
    };
    match port.port_type {
        serialport::SerialPortType::UsbPort(usb) => {
            info.port_type = format!("USB ({:04X}:{:04X})", usb.vid, usb.pid);
            info.vid = Some(usb.vid);
            info.pid = Some(usb.pid);
            info.description = usb.product.clone();
            info.serial_number = usb.serial_number;
            info.manufacturer = usb.manufacturer;
            info.product = usb.product;
        }
        serialport::SerialPortType::PciPort => info.port_type = "PCI".to_string(),
        serialport::SerialPortType::BluetoothPort => info.port_type = "Bluetooth".to_string(),
        serialport::SerialPortType::Unknown => info.port_type = "Native".to_string(),
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usb_port_descriptor_carries_ids() {
        let info = describe(serialport::SerialPortInfo {
            port_name: "/dev/ttyUSB0".to_string(),
            port_type: serialport::SerialPortType::UsbPort(serialport::UsbPortInfo {
                vid: 0x1a86,
                pid: 0x7523,
                serial_number: None,
                manufacturer: Some("QinHeng".to_string()),
                product: Some("USB Serial".to_string()),
            }),
        });
        assert_eq!(info.device, "/dev/ttyUSB0");
        assert_eq!(info.name, "ttyUSB0");
        assert_eq!(info.port_type, "USB (1A86:7523)");
        assert_eq!(info.vid, Some(0x1a86));
        assert_eq!(info.product.as_deref(), Some("USB Serial"));
    }

    #[test]
    fn native_port_descriptor() {
        let info = describe(serialport::SerialPortInfo {
            port_name: "COM3".to_string(),
            port_type: serialport::SerialPortType::Unknown,
        });
        assert_eq!(info.name, "COM3");
        assert_eq!(info.port_type, "Native");
        assert_eq!(info.vid, None);
    }
}
