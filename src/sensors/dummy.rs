//! Dummy sensor.
//!
//! Replays a fixed list of orientation labels. Used for one-shot runs from
//! the command line and for testing.

use std::collections::VecDeque;

use super::{Sensor, SensorEvent};
use crate::error::{Error, Result};

pub struct ScriptedSensor {
    labels: VecDeque<String>,
    initial: Option<String>,
    vanish_after: Option<usize>,
    delivered: usize,
    pending: VecDeque<SensorEvent>,
    failing_claims: usize,
    acquired: bool,
    claims: usize,
    releases: usize,
}

impl ScriptedSensor {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedSensor {
            labels: labels.into_iter().map(Into::into).collect(),
            initial: None,
            vanish_after: None,
            delivered: 0,
            pending: vec![SensorEvent::Appeared].into(),
            failing_claims: 0,
            acquired: false,
            claims: 0,
            releases: 0,
        }
    }

    /// Orientation reported when the sensor is claimed.
    pub fn with_initial(mut self, label: &str) -> Self {
        self.initial = Some(label.to_owned());
        self
    }

    /// Disappear and reappear once after `count` labels.
    pub fn vanishing_after(mut self, count: usize) -> Self {
        self.vanish_after = Some(count);
        self
    }

    /// Refuse the first `count` claims.
    pub fn failing_claims(mut self, count: usize) -> Self {
        self.failing_claims = count;
        self
    }

    pub fn claims(&self) -> usize {
        self.claims
    }

    pub fn releases(&self) -> usize {
        self.releases
    }
}

impl Sensor for ScriptedSensor {
    fn name(&self) -> &str {
        "scripted sensor"
    }

    fn next_event(&mut self) -> Option<SensorEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        if self.vanish_after == Some(self.delivered) {
            self.vanish_after = None;
            self.pending.push_back(SensorEvent::Appeared);
            return Some(SensorEvent::Vanished);
        }
        let label = self.labels.pop_front()?;
        self.delivered += 1;
        Some(SensorEvent::Orientation(label))
    }

    fn acquire(&mut self) -> Result<Option<String>> {
        self.claims += 1;
        if self.failing_claims > 0 {
            self.failing_claims -= 1;
            return Err(Error::DBus(zbus::Error::Failure("claim refused".into())));
        }
        self.acquired = true;
        Ok(self.initial.clone())
    }

    fn is_acquired(&self) -> bool {
        self.acquired
    }

    fn release(&mut self) {
        self.acquired = false;
        self.releases += 1;
    }
}
