//! Display server access.
//!
//! The orchestrator only talks to the display server through the
//! [`DisplayServer`] trait, so the X11 backend can be swapped for the
//! in-memory one in tests.

use crate::devices::DeviceDescriptor;
use crate::error::Result;

pub mod dummy;
pub mod xorg;

pub type Atom = u32;
pub type DeviceId = u16;

/// Screen configuration needed to issue a rotation change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenConfig {
    /// RandR rotation bitmask (rotation and reflection bits).
    pub rotation: u16,
    pub size_id: u16,
    pub config_timestamp: u32,
}

/// CRTC placement of an output within the screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CrtcGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutputInfo {
    pub name: String,
    pub connected: bool,
    /// `None` when no CRTC drives the output.
    pub crtc: Option<CrtcGeometry>,
}

/// Raw reply of a device property read.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyValue {
    pub type_: Atom,
    /// 8, 16 or 32; 0 when the property doesn't exist.
    pub format: u8,
    pub num_items: u32,
    pub bytes_after: u32,
    pub data: Vec<u32>,
}

pub trait DisplayServer {
    /// Current size of the whole screen canvas, in pixels.
    fn screen_size(&mut self) -> Result<(u32, u32)>;

    fn screen_config(&mut self) -> Result<ScreenConfig>;

    /// Request a new rotation bitmask, keeping the current size. The outcome
    /// is not checked.
    fn set_screen_rotation(&mut self, config: &ScreenConfig, rotation: u16) -> Result<()>;

    /// All outputs, in server order.
    fn outputs(&mut self) -> Result<Vec<OutputInfo>>;

    fn input_devices(&mut self) -> Result<Vec<DeviceDescriptor>>;

    /// Look up an atom without creating it.
    fn find_atom(&mut self, name: &str) -> Result<Option<Atom>>;

    fn device_property(
        &mut self,
        device: DeviceId,
        property: Atom,
        type_: Atom,
        len: u32,
    ) -> Result<PropertyValue>;

    /// Replace a 32-bit device property.
    fn replace_device_property(
        &mut self,
        device: DeviceId,
        property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> Result<()>;
}
