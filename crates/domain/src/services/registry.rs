//! Device registry: the set of bookable devices.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared::validation::{validate_max_duration, validate_not_blank, validate_power_watts};

use crate::error::BookingError;
use crate::models::{Device, UpdateDeviceRequest};

/// In-memory registry of devices, kept in insertion order.
///
/// The registry validates static attributes and answers lookups; occupancy
/// transitions go through the lifecycle controller, which owns the single
/// writable instance.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Builds a registry from previously persisted devices.
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    /// Adds a new device after validating its static attributes.
    pub fn register(&mut self, device: Device) -> Result<(), BookingError> {
        validate_attributes(&device)?;

        if self.devices.iter().any(|d| d.id == device.id) {
            return Err(BookingError::Conflict(format!(
                "Device {} is already registered",
                device.id
            )));
        }

        self.devices.push(device);
        Ok(())
    }

    /// Applies a patch to the editable fields of a device.
    pub fn update(
        &mut self,
        device_id: Uuid,
        patch: &UpdateDeviceRequest,
        now: DateTime<Utc>,
    ) -> Result<&Device, BookingError> {
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.id == device_id)
            .ok_or_else(|| BookingError::NotFound(format!("Device {} not found", device_id)))?;

        let mut updated = device.clone();
        if let Some(name) = &patch.name {
            updated.name = name.clone();
        }
        if let Some(location) = &patch.location {
            updated.location = location.clone();
        }
        if let Some(watts) = patch.power_watts {
            updated.power_watts = watts;
        }
        if let Some(minutes) = patch.max_duration_minutes {
            updated.max_duration_minutes = minutes;
        }
        validate_attributes(&updated)?;

        updated.updated_at = now;
        *device = updated;
        Ok(device)
    }

    /// Removes a device. The caller is responsible for checking that no
    /// Active reservation exists; the registry itself only knows devices.
    pub fn remove(&mut self, device_id: Uuid) -> Result<Device, BookingError> {
        let index = self
            .devices
            .iter()
            .position(|d| d.id == device_id)
            .ok_or_else(|| BookingError::NotFound(format!("Device {} not found", device_id)))?;
        Ok(self.devices.remove(index))
    }

    pub fn get(&self, device_id: Uuid) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == device_id)
    }

    pub(crate) fn get_mut(&mut self, device_id: Uuid) -> Result<&mut Device, BookingError> {
        self.devices
            .iter_mut()
            .find(|d| d.id == device_id)
            .ok_or_else(|| BookingError::NotFound(format!("Device {} not found", device_id)))
    }

    /// All devices in insertion order.
    pub fn list(&self) -> &[Device] {
        &self.devices
    }
}

fn validate_attributes(device: &Device) -> Result<(), BookingError> {
    validate_not_blank(&device.name)
        .map_err(|_| BookingError::Validation("Device name must not be empty".to_string()))?;
    validate_not_blank(&device.location)
        .map_err(|_| BookingError::Validation("Device location must not be empty".to_string()))?;
    validate_power_watts(device.power_watts).map_err(|_| {
        BookingError::Validation("Power must be between 100 and 2000 watts".to_string())
    })?;
    validate_max_duration(device.max_duration_minutes).map_err(|_| {
        BookingError::Validation("Maximum duration must be between 1 and 60 minutes".to_string())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeviceStatus;

    fn device(name: &str) -> Device {
        let now = Utc::now();
        Device {
            id: Uuid::new_v4(),
            name: name.to_string(),
            location: "Break Room - Floor 2".to_string(),
            power_watts: 800,
            max_duration_minutes: 25,
            status: DeviceStatus::Available,
            current_user_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = DeviceRegistry::default();
        let d = device("Break Room Microwave");
        let id = d.id;
        registry.register(d).unwrap();

        let found = registry.get(id).unwrap();
        assert_eq!(found.name, "Break Room Microwave");
        assert_eq!(found.status, DeviceStatus::Available);
    }

    #[test]
    fn test_register_rejects_out_of_range_power() {
        let mut registry = DeviceRegistry::default();
        let mut d = device("Bad Microwave");
        d.power_watts = 50;
        assert!(matches!(
            registry.register(d),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn test_register_rejects_blank_location() {
        let mut registry = DeviceRegistry::default();
        let mut d = device("Nameless");
        d.location = "  ".to_string();
        assert!(matches!(
            registry.register(d),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn test_register_rejects_duplicate_id() {
        let mut registry = DeviceRegistry::default();
        let d = device("Original");
        let dup = d.clone();
        registry.register(d).unwrap();
        assert!(matches!(
            registry.register(dup),
            Err(BookingError::Conflict(_))
        ));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut registry = DeviceRegistry::default();
        let names = ["First", "Second", "Third"];
        for name in names {
            registry.register(device(name)).unwrap();
        }
        let listed: Vec<_> = registry.list().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn test_update_patch_and_revalidation() {
        let mut registry = DeviceRegistry::default();
        let d = device("Cafeteria Microwave 1");
        let id = d.id;
        registry.register(d).unwrap();

        let patch = UpdateDeviceRequest {
            power_watts: Some(1200),
            max_duration_minutes: Some(35),
            ..Default::default()
        };
        let updated = registry.update(id, &patch, Utc::now()).unwrap();
        assert_eq!(updated.power_watts, 1200);
        assert_eq!(updated.max_duration_minutes, 35);
        assert_eq!(updated.name, "Cafeteria Microwave 1");

        let bad_patch = UpdateDeviceRequest {
            max_duration_minutes: Some(90),
            ..Default::default()
        };
        assert!(matches!(
            registry.update(id, &bad_patch, Utc::now()),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn test_update_unknown_device() {
        let mut registry = DeviceRegistry::default();
        let patch = UpdateDeviceRequest::default();
        assert!(matches!(
            registry.update(Uuid::new_v4(), &patch, Utc::now()),
            Err(BookingError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove() {
        let mut registry = DeviceRegistry::default();
        let d = device("Removable");
        let id = d.id;
        registry.register(d).unwrap();

        registry.remove(id).unwrap();
        assert!(registry.get(id).is_none());
        assert!(matches!(
            registry.remove(id),
            Err(BookingError::NotFound(_))
        ));
    }
}
