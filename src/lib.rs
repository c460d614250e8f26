//! Rotate an X11 screen, and the pointer input mapped onto it, to follow
//! the accelerometer orientation reported by iio-sensor-proxy.

pub mod backends;
pub mod devices;
pub mod error;
pub mod matrix;
pub mod orchestrator;
pub mod orientation;
pub mod output;
pub mod sensors;
pub mod transform;
