//! Input devices.
//!
//! Only pointing devices get a transformation matrix: for keyboards and the
//! other XInput device classes the property has no meaning.

pub mod xinput;

use regex::Regex;
use serde::Serialize;

use crate::backends::{DeviceId, DisplayServer};
use crate::error::Result;

/// XInput2 device use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DeviceUse {
    MasterPointer,
    MasterKeyboard,
    SlavePointer,
    SlaveKeyboard,
    /// Floating slaves and anything newer.
    Other,
}

impl DeviceUse {
    pub fn is_pointer(self) -> bool {
        matches!(self, DeviceUse::MasterPointer | DeviceUse::SlavePointer)
    }

    pub fn is_keyboard(self) -> bool {
        matches!(self, DeviceUse::MasterKeyboard | DeviceUse::SlaveKeyboard)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeviceDescriptor {
    pub id: DeviceId,
    pub name: String,
    #[serde(rename = "use")]
    pub use_: DeviceUse,
}

/// Pointer devices, master and slave, in enumeration order.
pub fn select_pointer_devices<D: DisplayServer + ?Sized>(
    display: &mut D,
) -> Result<Vec<DeviceDescriptor>> {
    Ok(display
        .input_devices()?
        .into_iter()
        .filter(|device| device.use_.is_pointer())
        .collect())
}

/// Skips devices by name.
#[derive(Clone, Debug, Default)]
pub struct DeviceFilter {
    exclude: Option<Regex>,
}

impl DeviceFilter {
    pub fn exclude(pattern: &str) -> Result<Self> {
        Ok(DeviceFilter {
            exclude: Some(Regex::new(pattern)?),
        })
    }

    pub fn accepts(&self, device: &DeviceDescriptor) -> bool {
        match &self.exclude {
            Some(pattern) => !pattern.is_match(&device.name),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::dummy::DummyDisplay;

    fn device(id: DeviceId, name: &str, use_: DeviceUse) -> DeviceDescriptor {
        DeviceDescriptor {
            id,
            name: name.into(),
            use_,
        }
    }

    #[test]
    fn classification() {
        assert!(DeviceUse::MasterPointer.is_pointer());
        assert!(DeviceUse::SlavePointer.is_pointer());
        assert!(!DeviceUse::MasterKeyboard.is_pointer());
        assert!(!DeviceUse::Other.is_pointer());

        assert!(DeviceUse::MasterKeyboard.is_keyboard());
        assert!(DeviceUse::SlaveKeyboard.is_keyboard());
        assert!(!DeviceUse::SlavePointer.is_keyboard());
        assert!(!DeviceUse::Other.is_keyboard());
    }

    #[test]
    fn selects_only_pointers() -> Result<()> {
        let mut display = DummyDisplay::new(1920, 1080)
            .with_device(device(2, "Virtual core pointer", DeviceUse::MasterPointer))
            .with_device(device(3, "Virtual core keyboard", DeviceUse::MasterKeyboard))
            .with_device(device(10, "Wacom HID 5276 Finger", DeviceUse::SlavePointer))
            .with_device(device(11, "AT Translated Set 2 keyboard", DeviceUse::SlaveKeyboard))
            .with_device(device(12, "Floating thing", DeviceUse::Other));

        let ids: Vec<DeviceId> = select_pointer_devices(&mut display)?
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![2, 10]);
        Ok(())
    }

    #[test]
    fn filter_excludes_by_name() -> Result<()> {
        let filter = DeviceFilter::exclude("(?i)touchpad|trackpoint")?;
        let touchpad = device(12, "SynPS/2 Synaptics TouchPad", DeviceUse::SlavePointer);
        let trackpoint = device(13, "TPPS/2 IBM TrackPoint", DeviceUse::SlavePointer);
        let touchscreen = device(10, "Wacom HID 5276 Finger", DeviceUse::SlavePointer);
        assert!(!filter.accepts(&touchpad));
        assert!(!filter.accepts(&trackpoint));
        assert!(filter.accepts(&touchscreen));

        assert!(DeviceFilter::default().accepts(&touchpad));
        assert!(DeviceFilter::exclude("(").is_err());
        Ok(())
    }
}
