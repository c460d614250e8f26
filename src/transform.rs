//! Coordinate transformation matrix for an output.
//!
//! Maps normalized device coordinates onto the part of the screen covered by
//! the output, honouring its rotation and reflection. There are 16
//! rotation × reflection cases, each physical transform reachable by two of
//! them. They are spelled out instead of composing rotation matrices so the
//! scale factors stay exactly 0 and ±1.

use crate::matrix::Matrix;
use crate::orientation::{Reflection, Rotation, ScreenRotation};
use crate::output::OutputGeometry;

/// Where the two scale factors go.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Diagonal {
    /// m00, m11: no axis swap.
    Main,
    /// m01, m10: axes swapped.
    Off,
}

pub fn derive_transform(geometry: &OutputGeometry, screen: ScreenRotation) -> Matrix {
    let total_width = geometry.total_width as f32;
    let total_height = geometry.total_height as f32;

    let x = geometry.x as f32 / total_width;
    let y = geometry.y as f32 / total_height;
    let w = geometry.width as f32 / total_width;
    let h = geometry.height as f32 / total_height;

    let mut m = Matrix::identity();

    use Reflection as Re;
    use Rotation as Ro;
    match (screen.rotation, screen.reflection) {
        (Ro::Normal, Re::None) | (Ro::Rotate180, Re::XY) => {
            place(&mut m, x, y, w, h, Diagonal::Main)
        }
        (Ro::Normal, Re::X) | (Ro::Rotate180, Re::Y) => {
            place(&mut m, x + w, y, -w, h, Diagonal::Main)
        }
        (Ro::Normal, Re::Y) | (Ro::Rotate180, Re::X) => {
            place(&mut m, x, y + h, w, -h, Diagonal::Main)
        }
        (Ro::Rotate180, Re::None) | (Ro::Normal, Re::XY) => {
            place(&mut m, x + w, y + h, -w, -h, Diagonal::Main)
        }
        (Ro::Rotate90, Re::None) | (Ro::Rotate270, Re::XY) => {
            place(&mut m, x + w, y, -w, h, Diagonal::Off)
        }
        (Ro::Rotate270, Re::None) | (Ro::Rotate90, Re::XY) => {
            place(&mut m, x, y + h, w, -h, Diagonal::Off)
        }
        (Ro::Rotate90, Re::X) | (Ro::Rotate270, Re::Y) => {
            place(&mut m, x, y, w, h, Diagonal::Off)
        }
        (Ro::Rotate90, Re::Y) | (Ro::Rotate270, Re::X) => {
            place(&mut m, x + w, y + h, -w, -h, Diagonal::Off)
        }
    }

    m
}

fn place(m: &mut Matrix, x02: f32, x12: f32, d1: f32, d2: f32, diagonal: Diagonal) {
    m.set(0, 2, x02);
    m.set(1, 2, x12);

    match diagonal {
        Diagonal::Main => {
            m.set(0, 0, d1);
            m.set(1, 1, d2);
        }
        Diagonal::Off => {
            m.set(0, 0, 0.0);
            m.set(1, 1, 0.0);
            m.set(0, 1, d1);
            m.set(1, 0, d2);
        }
    }
}
