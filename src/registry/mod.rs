//! Draft device registry
//!
//! Holds a local editable copy of the configured devices and locations,
//! reconciles it against the persisted copy, and derives what the settings
//! panel shows: selectable ports, the unsaved-changes flag and port warnings.
//!
//! Nothing here performs I/O except `load` and `save`, which go through a
//! `SettingsStore`. Derived port values are computed when read; the
//! unsaved flag is recomputed by every mutating operation.

mod draft;
mod save;

use std::collections::BTreeSet;

pub use draft::{DraftEntry, EntryKey};
pub use save::{SaveOutcome, SavePlan};

use draft::{DraftList, Selection};

use crate::domain::{
    pretty_model_name, validate_model, validate_port_free, AirQualityError, AirQualityResult,
    Device, Location,
};
use crate::ports::SettingsStore;

#[derive(Debug)]
pub struct DraftDeviceRegistry {
    devices: DraftList<Device>,
    locations: DraftList<Location>,
    available_ports: BTreeSet<String>,
    selected: Option<Selection<Device>>,
    selected_location: Option<Selection<Location>>,
    save_in_progress: bool,
}

impl DraftDeviceRegistry {
    pub fn new() -> Self {
        Self {
            devices: DraftList::new(),
            locations: DraftList::new(),
            available_ports: BTreeSet::new(),
            selected: None,
            selected_location: None,
            save_in_progress: false,
        }
    }

    /// Replace both drafts with fresh copies of what the store holds.
    /// On a store error nothing changes.
    pub fn load(&mut self, store: &dyn SettingsStore) -> AirQualityResult<()> {
        let locations = store.get_locations()?;
        let devices = store.get_devices()?;
        self.locations.load(locations);
        self.devices.load(devices);
        Ok(())
    }

    /// Discard every draft edit, returning to the committed copy.
    pub fn revert(&mut self) {
        let locations = self.locations.committed().to_vec();
        let devices = self.devices.committed().to_vec();
        self.locations.load(locations);
        self.devices.load(devices);
        self.selected = None;
        self.selected_location = None;
    }

    pub fn devices(&self) -> &[DraftEntry<Device>] {
        self.devices.entries()
    }

    pub fn committed_devices(&self) -> &[Device] {
        self.devices.committed()
    }

    pub fn locations(&self) -> &[DraftEntry<Location>] {
        self.locations.entries()
    }

    pub fn committed_locations(&self) -> &[Location] {
        self.locations.committed()
    }

    pub fn device(&self, key: EntryKey) -> AirQualityResult<&Device> {
        self.devices.get(key)
    }

    /// True iff either draft differs structurally from its committed copy.
    pub fn unsaved_changes(&self) -> bool {
        self.devices.unsaved() || self.locations.unsaved()
    }

    pub fn save_in_progress(&self) -> bool {
        self.save_in_progress
    }

    // ------------------------------------------------------------------
    // Device add / edit / remove
    // ------------------------------------------------------------------

    /// Start composing a new device with every field empty.
    pub fn begin_add(&mut self) {
        self.selected = Some(Selection {
            target: None,
            value: Device::default(),
        });
    }

    /// Start editing a copy of an existing entry; the list is untouched
    /// until `commit_edit`.
    pub fn begin_edit(&mut self, key: EntryKey) -> AirQualityResult<()> {
        let value = self.devices.get(key)?.clone();
        self.selected = Some(Selection {
            target: Some(key),
            value,
        });
        Ok(())
    }

    pub fn selected(&self) -> Option<&Device> {
        self.selected.as_ref().map(|s| &s.value)
    }

    /// The form writes into this copy.
    pub fn selected_mut(&mut self) -> Option<&mut Device> {
        self.selected.as_mut().map(|s| &mut s.value)
    }

    pub fn cancel(&mut self) {
        self.selected = None;
    }

    /// Append the selected new device to the draft.
    ///
    /// On error the draft and the selection are left as they were so the
    /// form can be corrected.
    pub fn commit_add(&mut self) -> AirQualityResult<EntryKey> {
        let selection = self
            .selected
            .as_ref()
            .ok_or_else(|| AirQualityError::NotFound("No device is being added".to_string()))?;
        if selection.target.is_some() {
            return Err(AirQualityError::Validation(
                "The selected device is being edited, not added".to_string(),
            ));
        }
        let device = Device {
            id: None,
            ..selection.value.clone()
        }
        .normalized();
        self.validate_device(&device, None)?;

        self.selected = None;
        Ok(self.devices.push(device))
    }

    /// Copy the selected device's fields onto the entry chosen by `begin_edit`.
    pub fn commit_edit(&mut self) -> AirQualityResult<()> {
        let selection = self
            .selected
            .as_ref()
            .ok_or_else(|| AirQualityError::NotFound("No device is being edited".to_string()))?;
        let key = selection.target.ok_or_else(|| {
            AirQualityError::Validation("The selected device is being added, not edited".to_string())
        })?;
        self.devices.get(key)?;
        let edited = selection.value.clone().normalized();
        self.validate_device(&edited, Some(key))?;

        self.devices.update(key, |device| {
            device.name = edited.name;
            device.model = edited.model;
            device.location_id = edited.location_id;
            device.port = edited.port;
        })?;
        self.selected = None;
        Ok(())
    }

    /// Delete one entry by identity; entries with identical fields are unaffected.
    pub fn remove(&mut self, key: EntryKey) -> AirQualityResult<Device> {
        self.devices.remove(key)
    }

    fn validate_device(&self, device: &Device, target: Option<EntryKey>) -> AirQualityResult<()> {
        validate_model(&device.model)?;
        validate_port_free(device.port(), self.devices.others(target))?;
        if let Some(id) = device.location_id {
            if self.location_name(id).is_none() {
                return Err(AirQualityError::Validation(format!(
                    "Location {id} does not exist"
                )));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Location add / edit / remove
    // ------------------------------------------------------------------

    pub fn begin_add_location(&mut self) {
        self.selected_location = Some(Selection {
            target: None,
            value: Location::default(),
        });
    }

    pub fn begin_edit_location(&mut self, key: EntryKey) -> AirQualityResult<()> {
        let value = self.locations.get(key)?.clone();
        self.selected_location = Some(Selection {
            target: Some(key),
            value,
        });
        Ok(())
    }

    pub fn selected_location(&self) -> Option<&Location> {
        self.selected_location.as_ref().map(|s| &s.value)
    }

    pub fn selected_location_mut(&mut self) -> Option<&mut Location> {
        self.selected_location.as_mut().map(|s| &mut s.value)
    }

    pub fn cancel_location(&mut self) {
        self.selected_location = None;
    }

    pub fn commit_add_location(&mut self) -> AirQualityResult<EntryKey> {
        let selection = self.selected_location.as_ref().ok_or_else(|| {
            AirQualityError::NotFound("No location is being added".to_string())
        })?;
        if selection.target.is_some() {
            return Err(AirQualityError::Validation(
                "The selected location is being edited, not added".to_string(),
            ));
        }
        let location = Location {
            id: None,
            name: selection.value.name.trim().to_string(),
        };
        validate_location_name(&location.name)?;

        self.selected_location = None;
        Ok(self.locations.push(location))
    }

    pub fn commit_edit_location(&mut self) -> AirQualityResult<()> {
        let selection = self.selected_location.as_ref().ok_or_else(|| {
            AirQualityError::NotFound("No location is being edited".to_string())
        })?;
        let key = selection.target.ok_or_else(|| {
            AirQualityError::Validation(
                "The selected location is being added, not edited".to_string(),
            )
        })?;
        let name = selection.value.name.trim().to_string();
        validate_location_name(&name)?;

        self.locations.update(key, |location| location.name = name)?;
        self.selected_location = None;
        Ok(())
    }

    /// Remove a location unless a draft device still refers to it.
    pub fn remove_location(&mut self, key: EntryKey) -> AirQualityResult<Location> {
        if let Some(id) = self.locations.get(key)?.id {
            if let Some(entry) = self
                .devices
                .entries()
                .iter()
                .find(|e| e.value().location_id == Some(id))
            {
                return Err(AirQualityError::Validation(format!(
                    "Location is still used by device '{}'",
                    entry.value().name
                )));
            }
        }
        self.locations.remove(key)
    }

    /// Name of the draft location with the given id.
    pub fn location_name(&self, id: u64) -> Option<&str> {
        self.locations
            .entries()
            .iter()
            .map(DraftEntry::value)
            .find(|l| l.id == Some(id))
            .map(|l| l.name.as_str())
    }

    // ------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------

    /// Snapshot the changed collections for writing and raise the
    /// in-progress guard. Returns `None` when there is nothing to write.
    pub fn begin_save(&mut self) -> AirQualityResult<Option<SavePlan>> {
        if self.save_in_progress {
            return Err(AirQualityError::SaveInProgress);
        }
        if !self.unsaved_changes() {
            return Ok(None);
        }
        let plan = SavePlan {
            devices: self.devices.unsaved().then(|| self.devices.snapshot()),
            locations: self.locations.unsaved().then(|| self.locations.snapshot()),
            previous_locations: self.locations.committed().to_vec(),
        };
        self.save_in_progress = true;
        Ok(Some(plan))
    }

    /// Apply the store's answer to a plan from `begin_save`.
    ///
    /// Whatever the store now holds becomes the committed copy; a collection
    /// the store did not change keeps its previous committed copy. Returns
    /// the store error, if any.
    pub fn finish_save(&mut self, plan: SavePlan, outcome: SaveOutcome) -> AirQualityResult<()> {
        self.save_in_progress = false;

        if let (Some((keys, _)), Some(stored)) = (plan.locations, outcome.locations) {
            self.locations.apply_saved(&keys, stored);
        }
        if let (Some((keys, _)), Some(stored)) = (plan.devices, outcome.devices) {
            self.devices.apply_saved(&keys, stored);
        }

        match outcome.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Write the draft to `store` if it has unsaved changes.
    /// Returns whether anything was written.
    pub fn save(&mut self, store: &mut dyn SettingsStore) -> AirQualityResult<bool> {
        let Some(plan) = self.begin_save()? else {
            return Ok(false);
        };
        let outcome = plan.execute(store);
        self.finish_save(plan, outcome)?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Ports
    // ------------------------------------------------------------------

    /// Replace the set of plugged-in ports. Dependent values are derived on read.
    pub fn on_ports_updated(&mut self, ports: impl IntoIterator<Item = String>) {
        self.available_ports = ports.into_iter().collect();
    }

    pub fn available_ports(&self) -> &BTreeSet<String> {
        &self.available_ports
    }

    /// Ports an edit form may offer: plugged-in ports not claimed by any
    /// draft device, plus the candidate's own current port. Sorted, no duplicates.
    pub fn available_ports_for(&self, candidate: Option<&Device>) -> Vec<String> {
        let claimed: BTreeSet<&str> = self
            .devices
            .entries()
            .iter()
            .filter_map(|e| e.value().port())
            .collect();
        let mut ports: BTreeSet<&str> = self
            .available_ports
            .iter()
            .map(String::as_str)
            .filter(|p| !claimed.contains(p))
            .collect();
        if let Some(own) = candidate.and_then(Device::port) {
            ports.insert(own);
        }
        ports.into_iter().map(String::from).collect()
    }

    /// True when the candidate has a port assigned that is not plugged in.
    pub fn port_unavailable(&self, candidate: &Device) -> bool {
        candidate
            .port()
            .is_some_and(|port| !self.available_ports.contains(port))
    }

    pub fn pretty_model_name(&self, code: &str) -> Option<&'static str> {
        pretty_model_name(code)
    }
}

impl Default for DraftDeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_location_name(name: &str) -> AirQualityResult<()> {
    if name.is_empty() {
        return Err(AirQualityError::Validation(
            "Location name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
