//! Sensors
//!
//! This is the abstraction over whatever reports the device's physical
//! orientation. A sensor produces a stream of events; the run loop claims it
//! when it appears and releases it when it goes away.

pub mod dummy;
pub mod iio_proxy;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq)]
pub enum SensorEvent {
    /// The sensor became reachable and should be acquired.
    Appeared,
    /// The sensor went away; anything acquired is stale.
    Vanished,
    /// A new orientation label, e.g. "left-up".
    Orientation(String),
}

pub trait Sensor {
    /// Human readable name for log messages.
    fn name(&self) -> &str;

    /// Block until the next event. `None` ends the run loop.
    fn next_event(&mut self) -> Option<SensorEvent>;

    /// Claim the sensor, returning its current orientation if it has one.
    fn acquire(&mut self) -> Result<Option<String>>;

    /// Whether a claim is currently held.
    fn is_acquired(&self) -> bool;

    /// Drop the claim and any handles tied to it.
    fn release(&mut self);
}
