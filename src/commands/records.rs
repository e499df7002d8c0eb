//! Device and location commands: settings store CRUD

use std::sync::MutexGuard;

use crate::domain::{Device, Location};
use crate::ports::SettingsStore;
use crate::state::AppState;

use super::CommandReply;

fn lock_store(state: &AppState) -> Result<MutexGuard<'_, Box<dyn SettingsStore>>, String> {
    state
        .store
        .lock()
        .map_err(|_| "Settings store state corrupted".to_string())
}

pub fn get_devices(state: &AppState) -> Result<CommandReply, String> {
    let devices = lock_store(state)?
        .get_devices()
        .map_err(|e| format!("Failed to get devices: {e}"))?;
    Ok(CommandReply::Devices { devices })
}

pub fn create_device(state: &AppState, device: Device) -> Result<CommandReply, String> {
    let created = lock_store(state)?
        .create_device(device.normalized())
        .map_err(|e| format!("Failed to create device: {e}"))?;
    log::info!("Created device '{}'", created.name);
    Ok(CommandReply::Created {
        message: "Device created".to_string(),
        id: created.id.unwrap_or_default(),
    })
}

pub fn update_device(state: &AppState, device: Device) -> Result<CommandReply, String> {
    lock_store(state)?
        .update_device(device.normalized())
        .map_err(|e| format!("Failed to update device: {e}"))?;
    Ok(CommandReply::message("Device updated"))
}

pub fn delete_device(state: &AppState, id: u64) -> Result<CommandReply, String> {
    lock_store(state)?
        .delete_device(id)
        .map_err(|e| format!("Failed to delete device: {e}"))?;
    Ok(CommandReply::message("Device deleted"))
}

pub fn replace_devices(state: &AppState, devices: Vec<Device>) -> Result<CommandReply, String> {
    let devices: Vec<Device> = devices.into_iter().map(Device::normalized).collect();
    let devices = lock_store(state)?
        .replace_devices(devices)
        .map_err(|e| format!("Failed to save devices: {e}"))?;
    Ok(CommandReply::Devices { devices })
}

pub fn get_locations(state: &AppState) -> Result<CommandReply, String> {
    let locations = lock_store(state)?
        .get_locations()
        .map_err(|e| format!("Failed to get locations: {e}"))?;
    Ok(CommandReply::Locations { locations })
}

pub fn create_location(state: &AppState, location: Location) -> Result<CommandReply, String> {
    let created = lock_store(state)?
        .create_location(location)
        .map_err(|e| format!("Failed to create location: {e}"))?;
    Ok(CommandReply::Created {
        message: "Location created".to_string(),
        id: created.id.unwrap_or_default(),
    })
}

pub fn update_location(state: &AppState, location: Location) -> Result<CommandReply, String> {
    lock_store(state)?
        .update_location(location)
        .map_err(|e| format!("Failed to update location: {e}"))?;
    Ok(CommandReply::message("Location updated"))
}

pub fn delete_location(state: &AppState, id: u64) -> Result<CommandReply, String> {
    lock_store(state)?
        .delete_location(id)
        .map_err(|e| format!("Failed to delete location: {e}"))?;
    Ok(CommandReply::message("Location deleted"))
}

pub fn replace_locations(
    state: &AppState,
    locations: Vec<Location>,
) -> Result<CommandReply, String> {
    let locations = lock_store(state)?
        .replace_locations(locations)
        .map_err(|e| format!("Failed to save locations: {e}"))?;
    Ok(CommandReply::Locations { locations })
}
