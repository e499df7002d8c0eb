//! Field and collection validation shared by the draft registry and the stores

use super::{is_supported_model, AirQualityError, AirQualityResult, Device, Location};

/// A persisted record with a store-assigned id.
pub trait Record: Clone + PartialEq {
    /// Label used in error messages ("device", "location")
    const KIND: &'static str;

    fn id(&self) -> Option<u64>;
    fn set_id(&mut self, id: u64);
}

impl Record for Device {
    const KIND: &'static str = "device";

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

impl Record for Location {
    const KIND: &'static str = "location";

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

/// Give every record without an id the next free one (`max + 1`).
pub fn assign_ids<T: Record>(records: &mut [T]) {
    let mut next = records.iter().filter_map(Record::id).max().unwrap_or(0) + 1;
    for record in records.iter_mut().filter(|r| r.id().is_none()) {
        record.set_id(next);
        next += 1;
    }
}

/// An empty model is allowed (not chosen yet); anything else must be supported.
pub fn validate_model(code: &str) -> AirQualityResult<()> {
    if code.is_empty() || is_supported_model(code) {
        Ok(())
    } else {
        Err(AirQualityError::Validation(format!(
            "Unsupported sensor model '{code}'"
        )))
    }
}

/// Reject `port` if any of `others` already claims it.
pub fn validate_port_free<'a>(
    port: Option<&str>,
    mut others: impl Iterator<Item = &'a Device>,
) -> AirQualityResult<()> {
    let Some(port) = port else {
        return Ok(());
    };
    match others.find(|d| d.port() == Some(port)) {
        Some(owner) => Err(AirQualityError::Validation(format!(
            "Port {port} is already used by device '{}'",
            owner.name
        ))),
        None => Ok(()),
    }
}

/// Check a whole device collection before it is persisted.
pub fn validate_devices(devices: &[Device]) -> AirQualityResult<()> {
    for (i, device) in devices.iter().enumerate() {
        validate_model(&device.model)?;
        validate_port_free(device.port(), devices[..i].iter())?;
    }
    let mut ids: Vec<u64> = devices.iter().filter_map(|d| d.id).collect();
    ids.sort_unstable();
    if ids.windows(2).any(|w| w[0] == w[1]) {
        return Err(AirQualityError::Validation("Duplicate device id".to_string()));
    }
    Ok(())
}

/// Every device location must name a location in `locations`.
pub fn validate_location_refs(devices: &[Device], locations: &[Location]) -> AirQualityResult<()> {
    let dangling = devices
        .iter()
        .filter_map(|d| d.location_id)
        .find(|id| !locations.iter().any(|l| l.id == Some(*id)));
    match dangling {
        Some(id) => Err(AirQualityError::Validation(format!(
            "A device references missing location {id}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, port: Option<&str>) -> Device {
        Device {
            name: name.into(),
            port: port.map(String::from),
            ..Device::default()
        }
    }

    #[test]
    fn assign_ids_continues_after_max() {
        let mut devices = vec![
            Device { id: Some(4), ..device("a", None) },
            device("b", None),
            device("c", None),
        ];
        assign_ids(&mut devices);
        let ids: Vec<_> = devices.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![Some(4), Some(5), Some(6)]);
    }

    #[test]
    fn assign_ids_starts_at_one() {
        let mut locations = vec![Location { id: None, name: "Workshop".into() }];
        assign_ids(&mut locations);
        assert_eq!(locations[0].id, Some(1));
    }

    #[test]
    fn model_validation() {
        assert!(validate_model("").is_ok());
        assert!(validate_model("SPS30").is_ok());
        assert!(matches!(
            validate_model("BOGUS9999"),
            Err(AirQualityError::Validation(_))
        ));
    }

    #[test]
    fn shared_port_is_rejected() {
        let devices = vec![
            device("a", Some("/dev/ttyUSB0")),
            device("b", Some("/dev/ttyUSB0")),
        ];
        assert!(matches!(
            validate_devices(&devices),
            Err(AirQualityError::Validation(_))
        ));
    }

    #[test]
    fn unassigned_ports_never_conflict() {
        let devices = vec![device("a", None), device("b", Some("")), device("c", None)];
        assert!(validate_devices(&devices).is_ok());
    }

    #[test]
    fn location_refs_must_resolve() {
        let workshop = Location { id: Some(1), name: "Workshop".into() };
        let devices = vec![
            Device { location_id: Some(1), ..device("a", None) },
            device("b", None),
        ];
        assert!(validate_location_refs(&devices, std::slice::from_ref(&workshop)).is_ok());
        assert!(matches!(
            validate_location_refs(&devices, &[]),
            Err(AirQualityError::Validation(_))
        ));
    }
}
