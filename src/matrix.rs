//! Row-major 3×3 homogeneous matrix, the payload of the
//! "Coordinate Transformation Matrix" device property.

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Matrix {
    m: [f32; 9],
}

impl Matrix {
    pub fn identity() -> Self {
        let mut matrix = Matrix { m: [0.0; 9] };
        matrix.set_unity();
        matrix
    }

    pub fn set_unity(&mut self) {
        self.m = [0.0; 9];
        self.set(0, 0, 1.0);
        self.set(1, 1, 1.0);
        self.set(2, 2, 1.0);
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        debug_assert!(row < 3 && col < 3, "matrix index ({}, {})", row, col);
        self.m[row * 3 + col] = value;
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        debug_assert!(row < 3 && col < 3, "matrix index ({}, {})", row, col);
        self.m[row * 3 + col]
    }

    pub fn values(&self) -> &[f32; 9] {
        &self.m
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::identity()
    }
}

impl From<[f32; 9]> for Matrix {
    fn from(m: [f32; 9]) -> Self {
        Matrix { m }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_has_unit_diagonal() {
        let m = Matrix::identity();
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_eq!(m.get(row, col), expected);
            }
        }
    }

    #[test]
    fn set_is_row_major() {
        let mut m = Matrix::identity();
        m.set(0, 2, 0.5);
        m.set(1, 0, -1.0);
        assert_eq!(m.values(), &[1.0, 0.0, 0.5, -1.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn set_unity_clears_previous_values() {
        let mut m = Matrix::from([2.0; 9]);
        m.set_unity();
        assert_eq!(m, Matrix::identity());
    }
}
