//! Settings store backed by JSON files in the plugin data directory.
//!
//! `devices.json` and `locations.json` each hold one array. A replace
//! rewrites the whole file: serialize to a sibling temp file, then rename
//! over the previous file, so a failed write never leaves a truncated file.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{
    assign_ids, validate_devices, validate_location_refs, AirQualityError, AirQualityResult,
    Device, Location,
};
use crate::ports::SettingsStore;

const DEVICES_FILE: &str = "devices.json";
const LOCATIONS_FILE: &str = "locations.json";

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> AirQualityResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AirQualityError::Store(format!("Failed to create {}: {e}", dir.display()))
        })?;
        log::info!("Settings store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> AirQualityResult<Vec<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&path)
            .map_err(|e| AirQualityError::Store(format!("Failed to read {file}: {e}")))?;
        serde_json::from_str(&json)
            .map_err(|e| AirQualityError::Store(format!("Failed to parse {file}: {e}")))
    }

    fn write<T: Serialize>(&self, file: &str, records: &[T]) -> AirQualityResult<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| AirQualityError::Store(format!("Serialization error: {e}")))?;
        let path = self.dir.join(file);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| AirQualityError::Store(format!("Failed to write {file}: {e}")))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| AirQualityError::Store(format!("Failed to replace {file}: {e}")))?;
        log::debug!("Wrote {} record(s) to {file}", records.len());
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get_devices(&self) -> AirQualityResult<Vec<Device>> {
        self.read(DEVICES_FILE)
    }

    fn replace_devices(&mut self, mut devices: Vec<Device>) -> AirQualityResult<Vec<Device>> {
        validate_devices(&devices)?;
        validate_location_refs(&devices, &self.get_locations()?)?;
        assign_ids(&mut devices);
        self.write(DEVICES_FILE, &devices)?;
        Ok(devices)
    }

    fn get_locations(&self) -> AirQualityResult<Vec<Location>> {
        self.read(LOCATIONS_FILE)
    }

    fn replace_locations(
        &mut self,
        mut locations: Vec<Location>,
    ) -> AirQualityResult<Vec<Location>> {
        validate_location_refs(&self.get_devices()?, &locations)?;
        assign_ids(&mut locations);
        self.write(LOCATIONS_FILE, &locations)?;
        Ok(locations)
    }
}
