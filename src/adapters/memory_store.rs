//! In-memory settings store for tests and dry runs without a data directory.
//!
//! Every write is logged at DEBUG level so a dry run shows exactly what
//! would have been persisted.

use crate::domain::{
    assign_ids, validate_devices, validate_location_refs, AirQualityResult, Device, Location,
};
use crate::ports::SettingsStore;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    devices: Vec<Device>,
    locations: Vec<Location>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store; records without ids get one.
    pub fn with_records(mut devices: Vec<Device>, mut locations: Vec<Location>) -> Self {
        assign_ids(&mut locations);
        assign_ids(&mut devices);
        Self {
            devices,
            locations,
            writes: 0,
        }
    }

    /// Number of successful `replace_*` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SettingsStore for MemoryStore {
    fn get_devices(&self) -> AirQualityResult<Vec<Device>> {
        Ok(self.devices.clone())
    }

    fn replace_devices(&mut self, mut devices: Vec<Device>) -> AirQualityResult<Vec<Device>> {
        validate_devices(&devices)?;
        validate_location_refs(&devices, &self.locations)?;
        assign_ids(&mut devices);
        log::debug!("[MEMORY STORE] replace_devices → {} device(s)", devices.len());
        self.devices = devices.clone();
        self.writes += 1;
        Ok(devices)
    }

    fn get_locations(&self) -> AirQualityResult<Vec<Location>> {
        Ok(self.locations.clone())
    }

    fn replace_locations(
        &mut self,
        mut locations: Vec<Location>,
    ) -> AirQualityResult<Vec<Location>> {
        validate_location_refs(&self.devices, &locations)?;
        assign_ids(&mut locations);
        log::debug!("[MEMORY STORE] replace_locations → {} location(s)", locations.len());
        self.locations = locations.clone();
        self.writes += 1;
        Ok(locations)
    }
}
