use log::debug;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::randr::{self, ConnectionExt as _};
use x11rb::protocol::xinput::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{self, ConnectionExt as _, Window};
use x11rb::rust_connection::RustConnection;

use super::{
    Atom, CrtcGeometry, DeviceId, DisplayServer, OutputInfo, PropertyValue, ScreenConfig,
};
use crate::devices::{DeviceDescriptor, DeviceUse};
use crate::error::{Error, Result};

/// A connection to an X server with RandR 1.2 and XInput 2.2.
pub struct XorgBackend {
    conn: RustConnection,
    root: Window,
}

impl XorgBackend {
    /// Connect to `display`, or to `$DISPLAY` when `None`.
    pub fn connect(display: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(display)?;
        let root = conn.setup().roots[screen_num].root;

        if conn
            .extension_information(randr::X11_EXTENSION_NAME)?
            .is_none()
        {
            return Err(Error::MissingExtension(randr::X11_EXTENSION_NAME));
        }
        let version = conn.randr_query_version(1, 2)?.reply()?;
        debug!("RandR {}.{}", version.major_version, version.minor_version);

        if conn
            .extension_information(xinput::X11_EXTENSION_NAME)?
            .is_none()
        {
            return Err(Error::MissingExtension(xinput::X11_EXTENSION_NAME));
        }
        let version = conn.xinput_xi_query_version(2, 2)?.reply()?;
        debug!("XInput {}.{}", version.major_version, version.minor_version);

        Ok(XorgBackend { conn, root })
    }
}

impl DisplayServer for XorgBackend {
    fn screen_size(&mut self) -> Result<(u32, u32)> {
        // The setup data goes stale once the screen is rotated; the root
        // window geometry does not.
        let geometry = self.conn.get_geometry(self.root)?.reply()?;
        Ok((geometry.width.into(), geometry.height.into()))
    }

    fn screen_config(&mut self) -> Result<ScreenConfig> {
        let info = self.conn.randr_get_screen_info(self.root)?.reply()?;
        Ok(ScreenConfig {
            rotation: info.rotation.into(),
            size_id: info.size_id,
            config_timestamp: info.config_timestamp,
        })
    }

    fn set_screen_rotation(&mut self, config: &ScreenConfig, rotation: u16) -> Result<()> {
        // Dropping the cookie discards the reply.
        let _ = self.conn.randr_set_screen_config(
            self.root,
            x11rb::CURRENT_TIME,
            config.config_timestamp,
            config.size_id,
            randr::Rotation::from(rotation),
            0,
        )?;
        self.conn.flush()?;
        Ok(())
    }

    fn outputs(&mut self) -> Result<Vec<OutputInfo>> {
        let resources = self.conn.randr_get_screen_resources(self.root)?.reply()?;

        let mut outputs = Vec::with_capacity(resources.outputs.len());
        for &output in &resources.outputs {
            let info = self
                .conn
                .randr_get_output_info(output, resources.config_timestamp)?
                .reply()?;

            let crtc = if info.crtc == x11rb::NONE {
                None
            } else {
                let crtc = self
                    .conn
                    .randr_get_crtc_info(info.crtc, resources.config_timestamp)?
                    .reply()?;
                Some(CrtcGeometry {
                    x: crtc.x.into(),
                    y: crtc.y.into(),
                    width: crtc.width.into(),
                    height: crtc.height.into(),
                })
            };

            outputs.push(OutputInfo {
                name: String::from_utf8_lossy(&info.name).into_owned(),
                connected: info.connection == randr::Connection::CONNECTED,
                crtc,
            });
        }
        Ok(outputs)
    }

    fn input_devices(&mut self) -> Result<Vec<DeviceDescriptor>> {
        let reply = self
            .conn
            .xinput_xi_query_device(xinput::Device::ALL)?
            .reply()?;

        Ok(reply
            .infos
            .into_iter()
            .map(|info| DeviceDescriptor {
                id: info.deviceid,
                name: String::from_utf8_lossy(&info.name).into_owned(),
                use_: device_use(info.type_),
            })
            .collect())
    }

    fn find_atom(&mut self, name: &str) -> Result<Option<Atom>> {
        let atom = self.conn.intern_atom(true, name.as_bytes())?.reply()?.atom;
        Ok(if atom == x11rb::NONE { None } else { Some(atom) })
    }

    fn device_property(
        &mut self,
        device: DeviceId,
        property: Atom,
        type_: Atom,
        len: u32,
    ) -> Result<PropertyValue> {
        let reply = self
            .conn
            .xinput_xi_get_property(device, false, property, type_, 0, len)?
            .reply()?;

        let (format, data) = match reply.items {
            xinput::XIGetPropertyItems::Data32(data) => (32, data),
            xinput::XIGetPropertyItems::Data16(data) => {
                (16, data.into_iter().map(u32::from).collect())
            }
            xinput::XIGetPropertyItems::Data8(data) => {
                (8, data.into_iter().map(u32::from).collect())
            }
            _ => (0, Vec::new()),
        };

        Ok(PropertyValue {
            type_: reply.type_,
            format,
            num_items: reply.num_items,
            bytes_after: reply.bytes_after,
            data,
        })
    }

    fn replace_device_property(
        &mut self,
        device: DeviceId,
        property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> Result<()> {
        let items = xinput::XIChangePropertyAux::Data32(data.to_vec());
        self.conn
            .xinput_xi_change_property(
                device,
                xproto::PropMode::REPLACE,
                property,
                type_,
                data.len() as u32,
                &items,
            )?
            .check()
            .map_err(Error::WriteFailed)
    }
}

fn device_use(type_: xinput::DeviceType) -> DeviceUse {
    match type_ {
        xinput::DeviceType::MASTER_POINTER => DeviceUse::MasterPointer,
        xinput::DeviceType::MASTER_KEYBOARD => DeviceUse::MasterKeyboard,
        xinput::DeviceType::SLAVE_POINTER => DeviceUse::SlavePointer,
        xinput::DeviceType::SLAVE_KEYBOARD => DeviceUse::SlaveKeyboard,
        _ => DeviceUse::Other,
    }
}
