//! Settings store trait
//!
//! The canonical persisted copy of configured devices and locations. The
//! bulk `replace_*` calls are the primitive; per-record CRUD is layered on
//! top of them so every implementation gets it for free.

use crate::domain::{AirQualityError, AirQualityResult, Device, Location, Record};

/// Persisted devices and locations.
/// Only requires `Send` (not `Sync`); always accessed behind a Mutex.
pub trait SettingsStore: Send {
    fn get_devices(&self) -> AirQualityResult<Vec<Device>>;

    /// Replace the whole device collection, returning it as stored
    /// (with ids assigned to new records).
    fn replace_devices(&mut self, devices: Vec<Device>) -> AirQualityResult<Vec<Device>>;

    fn get_locations(&self) -> AirQualityResult<Vec<Location>>;

    /// Replace the whole location collection, returning it as stored.
    fn replace_locations(&mut self, locations: Vec<Location>) -> AirQualityResult<Vec<Location>>;

    fn create_device(&mut self, device: Device) -> AirQualityResult<Device> {
        let mut devices = self.get_devices()?;
        devices.push(Device { id: None, ..device });
        let stored = self.replace_devices(devices)?;
        stored
            .last()
            .cloned()
            .ok_or_else(|| AirQualityError::Store("Created device was not stored".to_string()))
    }

    fn update_device(&mut self, device: Device) -> AirQualityResult<()> {
        let mut devices = self.get_devices()?;
        replace_by_id(&mut devices, device)?;
        self.replace_devices(devices).map(|_| ())
    }

    fn delete_device(&mut self, id: u64) -> AirQualityResult<()> {
        let mut devices = self.get_devices()?;
        remove_by_id(&mut devices, id)?;
        self.replace_devices(devices).map(|_| ())
    }

    fn create_location(&mut self, location: Location) -> AirQualityResult<Location> {
        let mut locations = self.get_locations()?;
        locations.push(Location { id: None, ..location });
        let stored = self.replace_locations(locations)?;
        stored
            .last()
            .cloned()
            .ok_or_else(|| AirQualityError::Store("Created location was not stored".to_string()))
    }

    fn update_location(&mut self, location: Location) -> AirQualityResult<()> {
        let mut locations = self.get_locations()?;
        replace_by_id(&mut locations, location)?;
        self.replace_locations(locations).map(|_| ())
    }

    /// Deleting a location still referenced by a device is rejected.
    fn delete_location(&mut self, id: u64) -> AirQualityResult<()> {
        if let Some(device) = self
            .get_devices()?
            .into_iter()
            .find(|d| d.location_id == Some(id))
        {
            return Err(AirQualityError::Validation(format!(
                "Location {id} is still used by device '{}'",
                device.name
            )));
        }
        let mut locations = self.get_locations()?;
        remove_by_id(&mut locations, id)?;
        self.replace_locations(locations).map(|_| ())
    }
}

fn replace_by_id<T: Record>(records: &mut [T], record: T) -> AirQualityResult<()> {
    let id = record.id().ok_or_else(|| {
        AirQualityError::Validation(format!("Cannot update a {} without an id", T::KIND))
    })?;
    let slot = records
        .iter_mut()
        .find(|r| r.id() == Some(id))
        .ok_or_else(|| AirQualityError::NotFound(format!("{} {id}", T::KIND)))?;
    *slot = record;
    Ok(())
}

fn remove_by_id<T: Record>(records: &mut Vec<T>, id: u64) -> AirQualityResult<()> {
    let index = records
        .iter()
        .position(|r| r.id() == Some(id))
        .ok_or_else(|| AirQualityError::NotFound(format!("{} {id}", T::KIND)))?;
    records.remove(index);
    Ok(())
}
