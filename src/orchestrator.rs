//! # Orchestration
//!
//! One sensor event in, one bounded batch of display-server requests out:
//! rotate the screen, re-read where the output ended up, then push the
//! matching matrix to every pointer device.

use log::{debug, info, warn};

use crate::backends::DisplayServer;
use crate::devices::xinput::apply_matrix;
use crate::devices::{select_pointer_devices, DeviceDescriptor, DeviceFilter};
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::orientation::{OrientationLabel, ScreenRotation};
use crate::output::{find_active_output, OutputGeometry};
use crate::sensors::{Sensor, SensorEvent};
use crate::transform::derive_transform;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum State {
    WaitingForSensor,
    /// Last orientation that was applied.
    OrientationKnown(OrientationLabel),
}

#[derive(Debug)]
pub struct DeviceReport {
    pub device: DeviceDescriptor,
    pub result: Result<()>,
}

#[derive(Debug)]
pub enum Outcome {
    /// The label wasn't one we act on; nothing was sent.
    Ignored,
    /// The screen was rotated but no output could be located, so no device
    /// was touched.
    NoActiveOutput { screen: ScreenRotation },
    Applied {
        screen: ScreenRotation,
        geometry: OutputGeometry,
        matrix: Matrix,
        devices: Vec<DeviceReport>,
    },
}

pub struct Orchestrator<D> {
    display: D,
    filter: DeviceFilter,
    state: State,
}

impl<D: DisplayServer> Orchestrator<D> {
    pub fn new(display: D) -> Self {
        Orchestrator {
            display,
            filter: DeviceFilter::default(),
            state: State::WaitingForSensor,
        }
    }

    pub fn with_filter(mut self, filter: DeviceFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Apply the orientation reported by the sensor.
    pub fn handle(&mut self, label: &str) -> Result<Outcome> {
        let orientation = match OrientationLabel::parse(label) {
            Some(orientation) => orientation,
            None => {
                debug!("ignoring orientation {:?}", label);
                return Ok(Outcome::Ignored);
            }
        };

        let config = self.display.screen_config()?;
        let current = ScreenRotation::from_bits(config.rotation)?;
        let target = current.with_rotation(orientation.rotation());
        info!("{}: rotating screen from {} to {}", orientation, current, target);

        self.display.set_screen_rotation(&config, target.to_bits())?;
        self.state = State::OrientationKnown(orientation);

        let geometry = match find_active_output(&mut self.display)? {
            Some(geometry) => geometry,
            None => {
                warn!("Unable to find an active output, it may not be connected");
                return Ok(Outcome::NoActiveOutput { screen: target });
            }
        };
        debug!("active output {:?}", geometry);

        let matrix = derive_transform(&geometry, target);

        let mut devices = Vec::new();
        for device in select_pointer_devices(&mut self.display)? {
            if !self.filter.accepts(&device) {
                debug!("skipping excluded device {}", device.name);
                continue;
            }
            let result = apply_matrix(&mut self.display, device.id, &matrix);
            match &result {
                Ok(()) => info!("Adjusted {} ({})", device.name, device.id),
                Err(e) => warn!("Failed to adjust {} ({}): {}", device.name, device.id, e),
            }
            devices.push(DeviceReport { device, result });
        }

        Ok(Outcome::Applied {
            screen: target,
            geometry,
            matrix,
            devices,
        })
    }
}

/// Drive the orchestrator from a sensor until the sensor goes away for good.
///
/// Errors are logged per event; the loop only ends when the sensor does.
pub fn run<S, D>(sensor: &mut S, orchestrator: &mut Orchestrator<D>)
where
    S: Sensor + ?Sized,
    D: DisplayServer,
{
    while let Some(event) = sensor.next_event() {
        match event {
            SensorEvent::Appeared => {
                info!("+++ {} appeared", sensor.name());
                if let Ok(Some(label)) = claim(sensor) {
                    report(orchestrator.handle(&label));
                }
            }
            SensorEvent::Vanished => {
                info!("--- {} vanished, waiting for it to appear", sensor.name());
                sensor.release();
                orchestrator.state = State::WaitingForSensor;
            }
            SensorEvent::Orientation(label) if sensor.is_acquired() => {
                info!("Accelerometer orientation changed: {}", label);
                report(orchestrator.handle(&label));
            }
            SensorEvent::Orientation(label) => {
                // An earlier claim failed. The value read on claiming is
                // fresher than the event, if there is one.
                debug!("orientation {:?} while unclaimed, claiming again", label);
                match claim(sensor) {
                    Ok(Some(current)) => report(orchestrator.handle(&current)),
                    Ok(None) => report(orchestrator.handle(&label)),
                    Err(_) => {}
                }
            }
        }
    }
}

fn claim<S: Sensor + ?Sized>(sensor: &mut S) -> Result<Option<String>> {
    let result = sensor.acquire();
    if let Err(e) = &result {
        warn!("Unable to claim the accelerometer: {}", e);
    }
    result
}

fn report(outcome: Result<Outcome>) {
    match outcome {
        Ok(_) => {}
        Err(Error::InvalidRotation(bits)) => {
            warn!("Current screen rotation {:#06x} is not understood", bits)
        }
        Err(e) => warn!("Unable to apply orientation: {}", e),
    }
}
