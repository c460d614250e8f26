//! iio-sensor-proxy over the system bus.
//!
//! The session owns the bus connection and, while the service is present,
//! a claimed proxy. Two watcher threads feed a single channel: one follows
//! the service's name owner, the other forwards `AccelerometerOrientation`
//! changes. The run loop consumes that channel one event at a time.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::{debug, warn};
use zbus::blocking::fdo::{DBusProxy, PropertiesProxy};
use zbus::blocking::Connection;
use zbus::names::BusName;
use zbus::zvariant::Value;

use super::{Sensor, SensorEvent};
use crate::error::Result;

const SERVICE: &str = "net.hadess.SensorProxy";
const PATH: &str = "/net/hadess/SensorProxy";
const ORIENTATION_PROPERTY: &str = "AccelerometerOrientation";

#[zbus::proxy(
    interface = "net.hadess.SensorProxy",
    default_service = "net.hadess.SensorProxy",
    default_path = "/net/hadess/SensorProxy",
    gen_async = false,
    blocking_name = "SensorProxyBlocking"
)]
trait SensorProxy {
    fn claim_accelerometer(&self) -> zbus::Result<()>;

    fn release_accelerometer(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn has_accelerometer(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn accelerometer_orientation(&self) -> zbus::Result<String>;
}

pub struct IioSensorProxy {
    connection: Connection,
    proxy: Option<SensorProxyBlocking<'static>>,
    events: Receiver<SensorEvent>,
}

impl IioSensorProxy {
    /// Connect to the system bus and start watching for the service.
    ///
    /// If the service is already running the first event is `Appeared`.
    pub fn connect() -> Result<Self> {
        let connection = Connection::system()?;
        let (sender, events) = mpsc::channel();

        watch_owner(&connection, sender.clone())?;
        watch_orientation(&connection, sender.clone())?;

        let dbus = DBusProxy::new(&connection)?;
        let service = BusName::from_static_str(SERVICE).map_err(zbus::Error::from)?;
        if dbus.name_has_owner(service).map_err(zbus::Error::from)? {
            // The receiver is still alive, so this can't fail.
            let _ = sender.send(SensorEvent::Appeared);
        } else {
            debug!("Waiting for iio-sensor-proxy to appear");
        }

        Ok(IioSensorProxy {
            connection,
            proxy: None,
            events,
        })
    }
}

impl Sensor for IioSensorProxy {
    fn name(&self) -> &str {
        "iio-sensor-proxy"
    }

    fn next_event(&mut self) -> Option<SensorEvent> {
        self.events.recv().ok()
    }

    fn acquire(&mut self) -> Result<Option<String>> {
        let proxy = SensorProxyBlocking::new(&self.connection)?;
        if !proxy.has_accelerometer()? {
            warn!("iio-sensor-proxy reports no accelerometer");
        }
        proxy.claim_accelerometer()?;
        // Held from here on, so release() drops the claim even if the read
        // below fails.
        let proxy = self.proxy.insert(proxy);
        Ok(Some(proxy.accelerometer_orientation()?))
    }

    fn is_acquired(&self) -> bool {
        self.proxy.is_some()
    }

    fn release(&mut self) {
        if let Some(proxy) = self.proxy.take() {
            // Fails when the service is already gone, which is the usual case.
            if let Err(e) = proxy.release_accelerometer() {
                debug!("ReleaseAccelerometer: {}", e);
            }
        }
    }
}

impl Drop for IioSensorProxy {
    fn drop(&mut self) {
        self.release();
    }
}

fn watch_owner(connection: &Connection, sender: Sender<SensorEvent>) -> Result<()> {
    let dbus = DBusProxy::new(connection)?;
    let changes = dbus.receive_name_owner_changed_with_args(&[(0, SERVICE)])?;

    thread::Builder::new()
        .name("sensor-owner".into())
        .spawn(move || {
            for signal in changes {
                let args = match signal.args() {
                    Ok(args) => args,
                    Err(e) => {
                        warn!("Malformed NameOwnerChanged signal: {}", e);
                        continue;
                    }
                };
                if args.name().as_str() != SERVICE {
                    continue;
                }
                let event = if args.new_owner().is_some() {
                    SensorEvent::Appeared
                } else {
                    SensorEvent::Vanished
                };
                if sender.send(event).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

fn watch_orientation(connection: &Connection, sender: Sender<SensorEvent>) -> Result<()> {
    let properties = PropertiesProxy::builder(connection)
        .destination(SERVICE)?
        .path(PATH)?
        .build()?;
    let changes = properties.receive_properties_changed()?;

    thread::Builder::new()
        .name("sensor-orientation".into())
        .spawn(move || {
            for signal in changes {
                let args = match signal.args() {
                    Ok(args) => args,
                    Err(e) => {
                        warn!("Malformed PropertiesChanged signal: {}", e);
                        continue;
                    }
                };
                if args.interface_name().as_str() != SERVICE {
                    continue;
                }
                let label = match args.changed_properties().get(ORIENTATION_PROPERTY) {
                    Some(Value::Str(label)) => label.to_string(),
                    Some(other) => {
                        warn!("Unexpected {} value {:?}", ORIENTATION_PROPERTY, other);
                        continue;
                    }
                    None => continue,
                };
                if sender.send(SensorEvent::Orientation(label)).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}
