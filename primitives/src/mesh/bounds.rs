//! Axis-aligned bounding boxes over flat position arrays.

use crate::error::{PrimitiveError, Result};
use crate::math::Vec3;

/// Axis-aligned bounding box stored as component-wise min and max.
///
/// Attached to POSITION accessors so consumers can cull or normalize a mesh
/// without reading its vertex data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Component-wise minimum.
    pub min: [f32; 3],
    /// Component-wise maximum.
    pub max: [f32; 3],
}

impl BoundingBox {
    /// Compute the bounds of a flat `[x, y, z, x, y, z, ...]` array.
    ///
    /// Every bound is attained by at least one vertex.
    ///
    /// # Errors
    ///
    /// - [`PrimitiveError::InvalidInput`] if `positions` is empty or holds a
    ///   non-finite value.
    /// - [`PrimitiveError::MalformedAttributeArray`] if the length is not a
    ///   multiple of 3.
    pub fn from_positions(positions: &[f32]) -> Result<Self> {
        if positions.is_empty() {
            return Err(PrimitiveError::invalid(
                "cannot compute bounds of an empty vertex set",
            ));
        }
        if positions.len() % 3 != 0 {
            return Err(PrimitiveError::MalformedAttributeArray {
                name: "positions".into(),
                len: positions.len(),
                arity: 3,
            });
        }
        if let Some(index) = positions.iter().position(|v| !v.is_finite()) {
            return Err(PrimitiveError::invalid(format!(
                "non-finite position component at index {index}"
            )));
        }

        let first = Vec3::new(positions[0], positions[1], positions[2]);
        let (min, max) = positions
            .chunks_exact(3)
            .skip(1)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .fold((first, first), |(min, max), v| (min.inf(&v), max.sup(&v)));

        Ok(Self {
            min: min.into(),
            max: max.into(),
        })
    }

    /// Center point of the box.
    pub fn center(&self) -> [f32; 3] {
        ((Vec3::from(self.min) + Vec3::from(self.max)) * 0.5).into()
    }

    /// Size of the box along each axis.
    pub fn extent(&self) -> [f32; 3] {
        (Vec3::from(self.max) - Vec3::from(self.min)).into()
    }

    /// Whether `point` lies inside the box (bounds inclusive).
    pub fn contains(&self, point: [f32; 3]) -> bool {
        (0..3).all(|k| self.min[k] <= point[k] && point[k] <= self.max[k])
    }
}
