//! # Rotation
//!
//! The display server describes a screen's orientation as one rotation plus
//! an independent reflection. We keep the two apart as enums so that every
//! combination can be matched exhaustively.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub(crate) const RR_ROTATE_0: u16 = 1 << 0;
pub(crate) const RR_ROTATE_90: u16 = 1 << 1;
pub(crate) const RR_ROTATE_180: u16 = 1 << 2;
pub(crate) const RR_ROTATE_270: u16 = 1 << 3;
pub(crate) const RR_ROTATE_MASK: u16 = RR_ROTATE_0 | RR_ROTATE_90 | RR_ROTATE_180 | RR_ROTATE_270;
pub(crate) const RR_REFLECT_X: u16 = 1 << 4;
pub(crate) const RR_REFLECT_Y: u16 = 1 << 5;

/// Counter-clockwise rotation, as RandR counts it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    Normal,
    Rotate90,
    Rotate180,
    Rotate270,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Reflection {
    None,
    X,
    Y,
    XY,
}

/// Rotation and reflection of a screen, 16 combinations in total.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScreenRotation {
    pub rotation: Rotation,
    pub reflection: Reflection,
}

/// Orientation labels reported by iio-sensor-proxy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OrientationLabel {
    Normal,
    LeftUp,
    BottomUp,
    RightUp,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Normal,
        Rotation::Rotate90,
        Rotation::Rotate180,
        Rotation::Rotate270,
    ];

    pub fn to_degrees(self) -> u16 {
        match self {
            Self::Normal => 0,
            Self::Rotate90 => 90,
            Self::Rotate180 => 180,
            Self::Rotate270 => 270,
        }
    }

    fn bits(self) -> u16 {
        match self {
            Self::Normal => RR_ROTATE_0,
            Self::Rotate90 => RR_ROTATE_90,
            Self::Rotate180 => RR_ROTATE_180,
            Self::Rotate270 => RR_ROTATE_270,
        }
    }
}

impl Reflection {
    pub const ALL: [Reflection; 4] = [
        Reflection::None,
        Reflection::X,
        Reflection::Y,
        Reflection::XY,
    ];

    fn bits(self) -> u16 {
        match self {
            Self::None => 0,
            Self::X => RR_REFLECT_X,
            Self::Y => RR_REFLECT_Y,
            Self::XY => RR_REFLECT_X | RR_REFLECT_Y,
        }
    }
}

impl ScreenRotation {
    pub fn new(rotation: Rotation, reflection: Reflection) -> Self {
        ScreenRotation {
            rotation,
            reflection,
        }
    }

    /// Decode a RandR rotation bitmask. Exactly one rotation bit must be set.
    pub fn from_bits(bits: u16) -> Result<Self> {
        let rotation = match bits & RR_ROTATE_MASK {
            RR_ROTATE_0 => Rotation::Normal,
            RR_ROTATE_90 => Rotation::Rotate90,
            RR_ROTATE_180 => Rotation::Rotate180,
            RR_ROTATE_270 => Rotation::Rotate270,
            _ => return Err(Error::InvalidRotation(bits)),
        };
        let reflection = match (bits & RR_REFLECT_X != 0, bits & RR_REFLECT_Y != 0) {
            (false, false) => Reflection::None,
            (true, false) => Reflection::X,
            (false, true) => Reflection::Y,
            (true, true) => Reflection::XY,
        };
        Ok(ScreenRotation::new(rotation, reflection))
    }

    pub fn to_bits(self) -> u16 {
        self.rotation.bits() | self.reflection.bits()
    }

    /// Same reflection, different rotation.
    pub fn with_rotation(self, rotation: Rotation) -> Self {
        ScreenRotation { rotation, ..self }
    }
}

impl fmt::Display for ScreenRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.rotation.to_degrees())?;
        match self.reflection {
            Reflection::None => Ok(()),
            Reflection::X => write!(f, " reflect-x"),
            Reflection::Y => write!(f, " reflect-y"),
            Reflection::XY => write!(f, " reflect-xy"),
        }
    }
}

impl OrientationLabel {
    pub const ALL: [OrientationLabel; 4] = [
        OrientationLabel::Normal,
        OrientationLabel::LeftUp,
        OrientationLabel::BottomUp,
        OrientationLabel::RightUp,
    ];

    /// Returns `None` for anything the sensor may report that we don't act on,
    /// such as "undefined".
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "normal" => Some(Self::Normal),
            "left-up" => Some(Self::LeftUp),
            "bottom-up" => Some(Self::BottomUp),
            "right-up" => Some(Self::RightUp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LeftUp => "left-up",
            Self::BottomUp => "bottom-up",
            Self::RightUp => "right-up",
        }
    }

    pub fn rotation(self) -> Rotation {
        match self {
            Self::Normal => Rotation::Normal,
            Self::LeftUp => Rotation::Rotate90,
            Self::BottomUp => Rotation::Rotate180,
            Self::RightUp => Rotation::Rotate270,
        }
    }
}

impl FromStr for OrientationLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::UnrecognizedOrientation(s.to_owned()))
    }
}

impl fmt::Display for OrientationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
