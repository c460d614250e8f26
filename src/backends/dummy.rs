//! Dummy display server.
//!
//! This is purely for testing or debugging.
//! It records every request and logs changes.

use std::collections::{HashMap, HashSet};

use log::debug;
use x11rb::errors::{ConnectionError, ReplyError};

use super::{
    Atom, CrtcGeometry, DeviceId, DisplayServer, OutputInfo, PropertyValue, ScreenConfig,
};
use crate::devices::xinput::{FLOAT_TYPE, MATRIX_PROPERTY};
use crate::devices::DeviceDescriptor;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::orientation::{RR_ROTATE_0, RR_ROTATE_270, RR_ROTATE_90};

#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    ScreenSize,
    ScreenConfig,
    SetScreenRotation(u16),
    Outputs,
    InputDevices,
    FindAtom(String),
    DeviceProperty(DeviceId),
    ReplaceDeviceProperty(DeviceId),
}

#[derive(Debug, Default)]
pub struct DummyDisplay {
    width: u32,
    height: u32,
    rotation: u16,
    size_id: u16,
    screen_config_broken: bool,
    outputs: Vec<OutputInfo>,
    devices: Vec<DeviceDescriptor>,
    atoms: HashMap<String, Atom>,
    properties: HashMap<DeviceId, PropertyValue>,
    failing_writes: HashSet<DeviceId>,
    requests: Vec<Request>,
}

impl DummyDisplay {
    /// A screen of the given size in its normal rotation, with no outputs
    /// and no devices.
    pub fn new(width: u32, height: u32) -> Self {
        DummyDisplay {
            width,
            height,
            rotation: RR_ROTATE_0,
            ..Default::default()
        }
    }

    /// A laptop panel covering the whole screen.
    pub fn single_output(width: u32, height: u32) -> Self {
        DummyDisplay::new(width, height).with_output(OutputInfo {
            name: "eDP-1".into(),
            connected: true,
            crtc: Some(CrtcGeometry {
                x: 0,
                y: 0,
                width,
                height,
            }),
        })
    }

    pub fn with_output(mut self, output: OutputInfo) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn with_device(mut self, device: DeviceDescriptor) -> Self {
        self.devices.push(device);
        self
    }

    pub fn with_rotation(mut self, bits: u16) -> Self {
        self.rotation = bits;
        self
    }

    /// Make the FLOAT and matrix atoms resolvable. Devices without an
    /// explicit property then report an identity matrix.
    pub fn with_matrix_support(mut self) -> Self {
        let next = self.atoms.len() as Atom + 100;
        self.atoms.insert(FLOAT_TYPE.to_owned(), next);
        self.atoms.insert(MATRIX_PROPERTY.to_owned(), next + 1);
        self
    }

    /// Register a single atom, leaving the rest of the property setup out.
    pub fn with_atom(mut self, name: &str) -> Self {
        let next = self.atoms.len() as Atom + 100;
        self.atoms.insert(name.to_owned(), next);
        self
    }

    pub fn with_broken_screen_config(mut self) -> Self {
        self.screen_config_broken = true;
        self
    }

    pub fn failing_writes_for(mut self, device: DeviceId) -> Self {
        self.failing_writes.insert(device);
        self
    }

    /// The atom for `name`, or None (0) if it was never registered.
    pub fn atom(&self, name: &str) -> Atom {
        self.atoms.get(name).copied().unwrap_or(x11rb::NONE)
    }

    pub fn set_property(&mut self, device: DeviceId, value: PropertyValue) {
        self.properties.insert(device, value);
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn rotation(&self) -> u16 {
        self.rotation
    }

    /// Number of requests that changed server state.
    pub fn writes(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Request::SetScreenRotation(_) | Request::ReplaceDeviceProperty(_)
                )
            })
            .count()
    }

    pub fn property_writes(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| matches!(r, Request::ReplaceDeviceProperty(_)))
            .count()
    }

    /// The matrix currently stored on a device.
    pub fn matrix_of(&self, device: DeviceId) -> Option<Matrix> {
        let value = self.current_property(device)?;
        if value.data.len() != 9 {
            return None;
        }
        let mut m = [0.0; 9];
        for (slot, bits) in m.iter_mut().zip(value.data.iter()) {
            *slot = f32::from_bits(*bits);
        }
        Some(Matrix::from(m))
    }

    fn current_property(&self, device: DeviceId) -> Option<PropertyValue> {
        if let Some(value) = self.properties.get(&device) {
            return Some(value.clone());
        }
        let float = self.atoms.get(FLOAT_TYPE)?;
        self.devices.iter().find(|d| d.id == device)?;
        Some(PropertyValue {
            type_: *float,
            format: 32,
            num_items: 9,
            bytes_after: 0,
            data: Matrix::identity()
                .values()
                .iter()
                .map(|v| v.to_bits())
                .collect(),
        })
    }

    fn is_sideways(bits: u16) -> bool {
        bits & (RR_ROTATE_90 | RR_ROTATE_270) != 0
    }
}

impl DisplayServer for DummyDisplay {
    fn screen_size(&mut self) -> Result<(u32, u32)> {
        self.requests.push(Request::ScreenSize);
        Ok((self.width, self.height))
    }

    fn screen_config(&mut self) -> Result<ScreenConfig> {
        self.requests.push(Request::ScreenConfig);
        if self.screen_config_broken {
            return Err(Error::MissingExtension("RANDR"));
        }
        Ok(ScreenConfig {
            rotation: self.rotation,
            size_id: self.size_id,
            config_timestamp: 0,
        })
    }

    fn set_screen_rotation(&mut self, config: &ScreenConfig, rotation: u16) -> Result<()> {
        self.requests.push(Request::SetScreenRotation(rotation));
        debug!(
            "dummy: rotation {:#06x} -> {:#06x} (size {})",
            self.rotation, rotation, config.size_id
        );

        // Going between landscape and portrait swaps the screen and every
        // CRTC, like the server does.
        if Self::is_sideways(self.rotation) != Self::is_sideways(rotation) {
            std::mem::swap(&mut self.width, &mut self.height);
            for crtc in self.outputs.iter_mut().filter_map(|o| o.crtc.as_mut()) {
                std::mem::swap(&mut crtc.width, &mut crtc.height);
            }
        }
        self.rotation = rotation;
        Ok(())
    }

    fn outputs(&mut self) -> Result<Vec<OutputInfo>> {
        self.requests.push(Request::Outputs);
        Ok(self.outputs.clone())
    }

    fn input_devices(&mut self) -> Result<Vec<DeviceDescriptor>> {
        self.requests.push(Request::InputDevices);
        Ok(self.devices.clone())
    }

    fn find_atom(&mut self, name: &str) -> Result<Option<Atom>> {
        self.requests.push(Request::FindAtom(name.to_owned()));
        Ok(self.atoms.get(name).copied())
    }

    fn device_property(
        &mut self,
        device: DeviceId,
        _property: Atom,
        _type_: Atom,
        _len: u32,
    ) -> Result<PropertyValue> {
        self.requests.push(Request::DeviceProperty(device));
        Ok(self.current_property(device).unwrap_or(PropertyValue {
            type_: x11rb::NONE,
            format: 0,
            num_items: 0,
            bytes_after: 0,
            data: Vec::new(),
        }))
    }

    fn replace_device_property(
        &mut self,
        device: DeviceId,
        _property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> Result<()> {
        self.requests.push(Request::ReplaceDeviceProperty(device));
        if self.failing_writes.contains(&device) {
            return Err(Error::WriteFailed(ReplyError::from(
                ConnectionError::UnknownError,
            )));
        }
        debug!("dummy: device {} matrix {:?}", device, data);
        self.properties.insert(
            device,
            PropertyValue {
                type_,
                format: 32,
                num_items: data.len() as u32,
                bytes_after: 0,
                data: data.to_vec(),
            },
        );
        Ok(())
    }
}
