//! Two-phase save.
//!
//! `begin_save` captures a `SavePlan`; the plan is executed against a store
//! (possibly on another thread, it owns its data) and the resulting
//! `SaveOutcome` is handed back to `finish_save`.

use crate::domain::{AirQualityError, Device, Location};
use crate::ports::SettingsStore;

use super::draft::EntryKey;

/// Snapshot of the collections that changed since the last load or save.
#[derive(Debug, Clone)]
pub struct SavePlan {
    pub(crate) devices: Option<(Vec<EntryKey>, Vec<Device>)>,
    pub(crate) locations: Option<(Vec<EntryKey>, Vec<Location>)>,
    /// Committed locations at `begin_save`, restored if the device write fails.
    pub(crate) previous_locations: Vec<Location>,
}

/// What the store holds after a plan ran.
///
/// `locations` / `devices` are set when the store now holds a different
/// collection than before; `error` is the first failure, if any.
#[derive(Debug, Default)]
pub struct SaveOutcome {
    pub(crate) locations: Option<Vec<Location>>,
    pub(crate) devices: Option<Vec<Device>>,
    pub(crate) error: Option<AirQualityError>,
}

impl SavePlan {
    pub fn devices(&self) -> Option<&[Device]> {
        self.devices.as_ref().map(|(_, d)| d.as_slice())
    }

    pub fn locations(&self) -> Option<&[Location]> {
        self.locations.as_ref().map(|(_, l)| l.as_slice())
    }

    /// Committed locations the draft dropped.
    fn removed_locations(&self) -> Vec<Location> {
        let Some((_, draft)) = &self.locations else {
            return Vec::new();
        };
        self.previous_locations
            .iter()
            .filter(|prev| !draft.iter().any(|l| l.id.is_some() && l.id == prev.id))
            .cloned()
            .collect()
    }

    /// Write the plan.
    ///
    /// When both collections changed the writes are ordered so the store
    /// never holds a device whose location is gone:
    /// 1. locations, with removed ones still present
    /// 2. devices
    /// 3. locations again, without the removed ones
    ///
    /// If step 2 fails the locations are put back as they were.
    pub fn execute(&self, store: &mut dyn SettingsStore) -> SaveOutcome {
        let mut outcome = SaveOutcome::default();

        let Some((_, devices)) = &self.devices else {
            if let Some((_, locations)) = &self.locations {
                match store.replace_locations(locations.clone()) {
                    Ok(stored) => outcome.locations = Some(stored),
                    Err(e) => outcome.error = Some(e),
                }
            }
            return outcome;
        };

        let removed = self.removed_locations();
        let staged = match &self.locations {
            Some((_, locations)) => {
                let mut staged = locations.clone();
                staged.extend(removed.iter().cloned());
                match store.replace_locations(staged) {
                    Ok(stored) => Some(stored),
                    Err(e) => {
                        outcome.error = Some(e);
                        return outcome;
                    }
                }
            }
            None => None,
        };

        match store.replace_devices(devices.clone()) {
            Ok(stored) => outcome.devices = Some(stored),
            Err(e) => {
                if let Some(staged) = staged {
                    if store.replace_locations(self.previous_locations.clone()).is_err() {
                        outcome.locations = Some(staged);
                    }
                }
                outcome.error = Some(e);
                return outcome;
            }
        }

        let Some(staged) = staged else {
            return outcome;
        };
        if removed.is_empty() {
            outcome.locations = Some(staged);
            return outcome;
        }
        let kept: Vec<Location> = staged
            .iter()
            .filter(|l| !removed.iter().any(|r| r.id == l.id))
            .cloned()
            .collect();
        match store.replace_locations(kept) {
            Ok(stored) => outcome.locations = Some(stored),
            Err(e) => {
                outcome.locations = Some(staged);
                outcome.error = Some(e);
            }
        }
        outcome
    }
}
