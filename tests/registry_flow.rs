//! Settings panel flow over a real data directory
//!
//! Open the panel against a `JsonFileStore`, feed it port updates the way the
//! backend pushes them, edit the drafts and save. Verifies that nothing
//! reaches disk before save and that a reopened panel sees the saved state.

use std::collections::BTreeMap;

use airquality_lib::adapters::json_store::JsonFileStore;
use airquality_lib::domain::{Device, PluginMessage, SerialPortInfo};
use airquality_lib::panel::{AlertKind, SettingsPanel};
use airquality_lib::ports::SettingsStore;

fn port_message(ports: &[&str]) -> PluginMessage {
    let map: BTreeMap<String, SerialPortInfo> = ports
        .iter()
        .map(|p| {
            (
                p.to_string(),
                SerialPortInfo {
                    device: p.to_string(),
                    ..SerialPortInfo::default()
                },
            )
        })
        .collect();
    PluginMessage::SerialPorts(map)
}

#[test]
fn add_device_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::open(dir.path()).unwrap();

    let mut panel = SettingsPanel::new();
    panel.open(&store).unwrap();
    panel.handle_message(port_message(&["/dev/ttyUSB0", "/dev/ttyUSB1"]));

    // Location first, saved so devices can reference its id
    let registry = panel.registry_mut();
    registry.begin_add_location();
    registry.selected_location_mut().unwrap().name = "Workshop".into();
    registry.commit_add_location().unwrap();
    panel.save(&mut store).unwrap();

    let registry = panel.registry_mut();
    registry.begin_add();
    let offered = registry.available_ports_for(registry.selected());
    assert_eq!(offered, vec!["/dev/ttyUSB0", "/dev/ttyUSB1"]);
    *registry.selected_mut().unwrap() = Device {
        name: "Enclosure".into(),
        model: "PMS7003".into(),
        location_id: Some(1),
        port: Some("/dev/ttyUSB1".into()),
        ..Device::default()
    };
    registry.commit_add().unwrap();
    assert_eq!(registry.available_ports_for(None), vec!["/dev/ttyUSB0"]);

    // Not on disk until saved
    assert!(store.get_devices().unwrap().is_empty());
    assert!(panel.registry().unsaved_changes());

    assert!(panel.save(&mut store).unwrap());
    assert_eq!(panel.alert().map(|a| a.kind), Some(AlertKind::Success));
    assert!(!panel.registry().unsaved_changes());

    let reopened_store = JsonFileStore::open(dir.path()).unwrap();
    let mut reopened = SettingsPanel::new();
    reopened.open(&reopened_store).unwrap();
    let rows = reopened.device_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Enclosure");
    assert_eq!(rows[0].model, "Plantower PMS7003 (aka G7)");
    assert_eq!(rows[0].location.as_deref(), Some("Workshop"));
    // No port update received yet in this panel
    assert!(!rows[0].port_available);
}

#[test]
fn failed_save_alerts_and_keeps_drafts() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::open(dir.path()).unwrap();
    let mut panel = SettingsPanel::new();
    panel.open(&store).unwrap();

    let registry = panel.registry_mut();
    registry.begin_add();
    registry.selected_mut().unwrap().name = "Enclosure".into();
    registry.commit_add().unwrap();

    // Make the data directory unusable for the rename target
    std::fs::create_dir(dir.path().join("devices.json")).unwrap();

    assert!(panel.save(&mut store).is_err());
    assert_eq!(panel.alert().map(|a| a.kind), Some(AlertKind::Error));
    assert!(panel.registry().unsaved_changes());
    assert_eq!(panel.registry().devices().len(), 1);
    assert!(panel.registry().committed_devices().is_empty());
}
