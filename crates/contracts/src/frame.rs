//! RawFrame - FrameSource output
//!
//! One time-stamped snapshot of coordinates plus box geometry.

use nalgebra::{Matrix3, Vector3};

/// Periodic box descriptor
///
/// Box vectors are stored as matrix columns. An all-zero matrix means the
/// frame carries no periodicity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicBox {
    /// Box vectors (columns a, b, c), nm
    pub matrix: Matrix3<f32>,
}

impl PeriodicBox {
    /// Non-periodic box
    pub fn none() -> Self {
        Self {
            matrix: Matrix3::zeros(),
        }
    }

    /// Orthorhombic box from edge lengths
    pub fn orthorhombic(a: f32, b: f32, c: f32) -> Self {
        Self {
            matrix: Matrix3::from_diagonal(&Vector3::new(a, b, c)),
        }
    }

    /// Box from the nine components, column by column
    pub fn from_columns(values: [f32; 9]) -> Self {
        Self {
            matrix: Matrix3::from_column_slice(&values),
        }
    }

    /// Whether any box vector is non-zero
    pub fn is_periodic(&self) -> bool {
        self.matrix.iter().any(|v| *v != 0.0)
    }

    /// Lengths of the three box vectors
    pub fn extents(&self) -> Vector3<f32> {
        Vector3::new(
            self.matrix.column(0).norm(),
            self.matrix.column(1).norm(),
            self.matrix.column(2).norm(),
        )
    }

    /// Box volume (0 for a non-periodic box)
    pub fn volume(&self) -> f32 {
        self.matrix.determinant().abs()
    }
}

impl Default for PeriodicBox {
    fn default() -> Self {
        Self::none()
    }
}

/// Raw trajectory frame
///
/// Owned exclusively by the `FrameContainer` that wraps it and never mutated
/// once the container is on a channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    /// One coordinate per atom, nm
    pub coords: Vec<Vector3<f32>>,

    /// Periodic box
    pub pbox: PeriodicBox,

    /// Timestamp reported by the source, ps
    pub time: f64,
}

impl RawFrame {
    /// Create a new frame
    pub fn new(coords: Vec<Vector3<f32>>, pbox: PeriodicBox, time: f64) -> Self {
        Self {
            coords,
            pbox,
            time,
        }
    }

    /// Number of atoms in the frame
    pub fn num_atoms(&self) -> usize {
        self.coords.len()
    }

    /// Geometric centre of all coordinates, `None` for an empty frame
    pub fn center(&self) -> Option<Vector3<f32>> {
        if self.coords.is_empty() {
            return None;
        }
        let sum = self
            .coords
            .iter()
            .fold(Vector3::zeros(), |acc, c| acc + c);
        Some(sum / self.coords.len() as f32)
    }
}
