//! Mesh generators for common shapes.
//!
//! Generators produce flat per-vertex streams ([`SphereGeometry`]) and can
//! wrap them straight into an encoded [`Primitive`].

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use crate::error::{PrimitiveError, Result};
use crate::math::{Vec3, spherical_to_cartesian_y_up};

use super::attributes::{Attributes, VertexSemantic};
use super::encoder::{AttributeStream, FLOAT_SIZE};
use super::primitive::{Primitive, PrimitiveTopology};

/// Parameters for [`generate_sphere_geometry`] and [`create_sphere`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereOptions {
    /// Number of bands from pole to pole (at least 1).
    pub latitude_lines: u32,
    /// Number of bands around the equator (at least 1).
    pub longitude_lines: u32,
    /// Sphere radius. Scales positions only.
    pub radius: f32,
    /// Point normals inwards instead of outwards. Winding is unchanged.
    pub flip_normals: bool,
    /// Emit a TEXCOORD_0 stream.
    pub uvs: bool,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            latitude_lines: 32,
            longitude_lines: 32,
            radius: 1.0,
            flip_normals: false,
            uvs: true,
        }
    }
}

impl SphereOptions {
    /// Unit sphere with the given grid resolution.
    pub fn new(latitude_lines: u32, longitude_lines: u32) -> Self {
        Self {
            latitude_lines,
            longitude_lines,
            ..Self::default()
        }
    }

    /// Set the radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set whether normals point inwards.
    pub fn with_flipped_normals(mut self, flip: bool) -> Self {
        self.flip_normals = flip;
        self
    }

    /// Set whether texture coordinates are generated.
    pub fn with_uvs(mut self, uvs: bool) -> Self {
        self.uvs = uvs;
        self
    }

    /// Number of triangles the generator emits for these options.
    ///
    /// Pole bands emit one triangle per cell, interior bands two. `None` if
    /// the count does not fit in `usize`.
    pub fn triangle_count(&self) -> Option<usize> {
        let lat = self.latitude_lines as usize;
        let lon = self.longitude_lines as usize;
        match lat {
            0 => Some(0),
            1 => Some(lon),
            _ => lon.checked_mul(lat - 1)?.checked_mul(2),
        }
    }

    /// Number of vertices the generator emits, if the whole interleaved
    /// output (3 + 3 + 2 floats per vertex) fits in one allocation.
    fn checked_vertex_count(&self) -> Option<usize> {
        let vertices = self.triangle_count()?.checked_mul(3)?;
        let bytes = vertices.checked_mul(8 * FLOAT_SIZE)?;
        (bytes <= isize::MAX as usize).then_some(vertices)
    }

    fn validate(&self) -> Result<()> {
        if self.latitude_lines == 0 {
            return Err(PrimitiveError::invalid("latitude_lines must be at least 1"));
        }
        if self.longitude_lines == 0 {
            return Err(PrimitiveError::invalid("longitude_lines must be at least 1"));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(PrimitiveError::invalid(format!(
                "radius must be positive and finite, got {}",
                self.radius
            )));
        }
        if self.checked_vertex_count().is_none() {
            return Err(PrimitiveError::invalid(format!(
                "sphere grid {}x{} is too large to encode",
                self.latitude_lines, self.longitude_lines
            )));
        }
        Ok(())
    }
}

/// Flat per-vertex streams of a generated shape.
///
/// Vertex `i` of `positions`, `normals`, and `uvs` describe the same vertex.
/// Every triangle uses its own three vertices (nothing is shared), so the
/// streams are drawn unindexed as a triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereGeometry {
    /// `[x, y, z]` per vertex.
    pub positions: Vec<f32>,
    /// Unit `[x, y, z]` per vertex.
    pub normals: Vec<f32>,
    /// `[u, v]` per vertex, when requested.
    pub uvs: Option<Vec<f32>>,
}

impl SphereGeometry {
    fn with_capacity(vertices: usize, uvs: bool) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            normals: Vec::with_capacity(vertices * 3),
            uvs: uvs.then(|| Vec::with_capacity(vertices * 2)),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    /// Encoder input in buffer order: POSITION, NORMAL, then TEXCOORD_0.
    pub fn streams(&self) -> Vec<AttributeStream<'_>> {
        let mut streams = vec![
            AttributeStream::new(VertexSemantic::Position, &self.positions, 3),
            AttributeStream::new(VertexSemantic::Normal, &self.normals, 3),
        ];
        if let Some(uvs) = &self.uvs {
            streams.push(AttributeStream::new(VertexSemantic::TexCoord(0), uvs, 2));
        }
        streams
    }

    fn push(&mut self, corner: &Corner, radius: f32, normal_sign: f32) {
        let position = corner.direction * radius;
        let normal = corner.direction.normalize() * normal_sign;
        self.positions.extend_from_slice(position.as_slice());
        self.normals.extend_from_slice(normal.as_slice());
        if let Some(uvs) = &mut self.uvs {
            uvs.extend_from_slice(&corner.uv);
        }
    }

    fn push_triangle(&mut self, corners: [&Corner; 3], radius: f32, normal_sign: f32) {
        for corner in corners {
            self.push(corner, radius, normal_sign);
        }
    }
}

/// One grid corner on the unit sphere.
struct Corner {
    direction: Vec3,
    uv: [f32; 2],
}

impl Corner {
    fn new(t: u32, p: u32, latitude_lines: u32, longitude_lines: u32) -> Self {
        let v = t as f32 / latitude_lines as f32;
        let u = p as f32 / longitude_lines as f32;
        Self {
            direction: spherical_to_cartesian_y_up(v * PI, u * TAU),
            uv: [u, v],
        }
    }
}

/// Tessellate a UV sphere into flat, unindexed triangle-list streams.
///
/// The polar angle is split into `latitude_lines` bands and the azimuth into
/// `longitude_lines` bands. Each cell has corners
///
/// ```text
///  phi2   phi1
///   2------1  theta1
///   |      |
///   3------4  theta2
/// ```
///
/// The top band emits triangle (1, 3, 4), the bottom band (3, 1, 2), and
/// interior bands (1, 2, 4) + (2, 3, 4). The sphere is Y-up, so these orders
/// are counter-clockwise seen from outside. UVs are `(phi / 2π, theta / π)`;
/// the seam at phi = 0 / 2π gets separate vertices with u = 0 and u = 1.
///
/// With a single latitude band the top rule wins and the bottom rule is
/// skipped, which yields one zero-area triangle per cell.
///
/// # Errors
///
/// [`PrimitiveError::InvalidInput`] for zero grid lines or a non-positive
/// radius.
pub fn generate_sphere_geometry(options: &SphereOptions) -> Result<SphereGeometry> {
    crate::profile_function!();
    options.validate()?;

    let lat = options.latitude_lines;
    let lon = options.longitude_lines;
    let radius = options.radius;
    let normal_sign = if options.flip_normals { -1.0 } else { 1.0 };

    if lat == 1 {
        log::warn!("sphere with a single latitude band degenerates to zero-area triangles");
    }

    // Validated above.
    let vertices = options.checked_vertex_count().unwrap_or_default();
    let mut geometry = SphereGeometry::with_capacity(vertices, options.uvs);

    for t in 0..lat {
        let top = t == 0;
        let bottom = !top && t + 1 == lat;

        for p in 0..lon {
            let c1 = Corner::new(t, p, lat, lon);
            let c2 = Corner::new(t, p + 1, lat, lon);
            let c3 = Corner::new(t + 1, p + 1, lat, lon);
            let c4 = Corner::new(t + 1, p, lat, lon);

            if top {
                geometry.push_triangle([&c1, &c3, &c4], radius, normal_sign);
            } else if bottom {
                geometry.push_triangle([&c3, &c1, &c2], radius, normal_sign);
            } else {
                geometry.push_triangle([&c1, &c2, &c4], radius, normal_sign);
                geometry.push_triangle([&c2, &c3, &c4], radius, normal_sign);
            }
        }
    }

    log::debug!(
        "generated sphere {}x{}: {} vertices, {} triangles",
        lat,
        lon,
        geometry.vertex_count(),
        geometry.triangle_count()
    );

    Ok(geometry)
}

/// Generate a sphere and encode it into a ready-to-draw [`Primitive`].
///
/// The primitive is unindexed, carries POSITION (with bounds), NORMAL, and
/// (when enabled) TEXCOORD_0, all in one buffer. `mode` of `None` means
/// triangle list.
pub fn create_sphere<M>(
    material: Option<Arc<M>>,
    options: &SphereOptions,
    mode: Option<PrimitiveTopology>,
) -> Result<Primitive<M>> {
    let geometry = generate_sphere_geometry(options)?;
    let attributes = Attributes::from_streams(&geometry.streams())?;
    Primitive::assemble(Arc::new(attributes), material, None, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices(data: &[f32]) -> Vec<Vec3> {
        data.chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect()
    }

    #[test]
    fn test_two_by_four_has_eight_triangles() {
        let geometry = generate_sphere_geometry(&SphereOptions::new(2, 4)).unwrap();
        assert_eq!(geometry.triangle_count(), 8);
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.normals.len(), 72);
        assert_eq!(geometry.uvs.as_ref().map(Vec::len), Some(48));
    }

    #[test]
    fn test_interior_bands_emit_two_triangles_per_cell() {
        let options = SphereOptions::new(4, 8);
        let geometry = generate_sphere_geometry(&options).unwrap();
        // 8 top + 8 bottom + 2 * 8 * 2 interior
        assert_eq!(geometry.triangle_count(), 48);
        assert_eq!(options.triangle_count(), Some(48));
    }

    #[test]
    fn test_normals_are_unit_length() {
        let geometry = generate_sphere_geometry(&SphereOptions::new(7, 13)).unwrap();
        for n in vertices(&geometry.normals) {
            assert!((n.norm() - 1.0).abs() < 1e-6, "normal {n:?}");
        }
    }

    #[test]
    fn test_radius_scales_positions_only() {
        let geometry =
            generate_sphere_geometry(&SphereOptions::new(6, 6).with_radius(2.5)).unwrap();
        for (p, n) in vertices(&geometry.positions)
            .into_iter()
            .zip(vertices(&geometry.normals))
        {
            assert!((p.norm() - 2.5).abs() < 1e-5);
            assert!((p / 2.5 - n).norm() < 1e-5);
        }
    }

    #[test]
    fn test_flip_normals_keeps_topology() {
        let outward = generate_sphere_geometry(&SphereOptions::new(5, 5)).unwrap();
        let inward =
            generate_sphere_geometry(&SphereOptions::new(5, 5).with_flipped_normals(true))
                .unwrap();
        assert_eq!(outward.positions, inward.positions);
        assert_eq!(outward.uvs, inward.uvs);
        for (a, b) in outward.normals.iter().zip(&inward.normals) {
            assert_eq!(*a, -*b);
        }
    }

    #[test]
    fn test_triangles_face_outwards() {
        let geometry = generate_sphere_geometry(&SphereOptions::new(6, 10)).unwrap();
        for tri in vertices(&geometry.positions).chunks_exact(3) {
            let face = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(face.dot(&centroid) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn test_uvs_cover_unit_square_with_seam() {
        let geometry = generate_sphere_geometry(&SphereOptions::new(3, 4)).unwrap();
        let uvs = geometry.uvs.unwrap();
        assert!(uvs.iter().all(|&x| (0.0..=1.0).contains(&x)));
        // Both sides of the seam are present as separate vertices.
        let us: Vec<f32> = uvs.chunks_exact(2).map(|c| c[0]).collect();
        assert!(us.contains(&0.0));
        assert!(us.contains(&1.0));
    }

    #[test]
    fn test_uvs_disabled() {
        let options = SphereOptions::new(3, 3).with_uvs(false);
        let geometry = generate_sphere_geometry(&options).unwrap();
        assert!(geometry.uvs.is_none());
        assert_eq!(geometry.streams().len(), 2);
    }

    #[test]
    fn test_single_latitude_band() {
        let options = SphereOptions::new(1, 5);
        let geometry = generate_sphere_geometry(&options).unwrap();
        assert_eq!(geometry.triangle_count(), 5);
        assert_eq!(options.triangle_count(), Some(5));
    }

    #[test]
    fn test_invalid_options() {
        for options in [
            SphereOptions::new(0, 4),
            SphereOptions::new(4, 0),
            SphereOptions::new(4, 4).with_radius(0.0),
            SphereOptions::new(4, 4).with_radius(f32::NAN),
        ] {
            assert!(matches!(
                generate_sphere_geometry(&options),
                Err(PrimitiveError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_oversized_grid_is_invalid() {
        let options = SphereOptions::new(u32::MAX, u32::MAX);
        assert_eq!(options.triangle_count(), None);
        assert!(matches!(
            generate_sphere_geometry(&options),
            Err(PrimitiveError::InvalidInput(_))
        ));
        assert!(matches!(
            create_sphere::<()>(None, &options, None),
            Err(PrimitiveError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_create_sphere_primitive() {
        let sphere = create_sphere(Some(Arc::new(())), &SphereOptions::new(2, 4), None).unwrap();
        assert_eq!(sphere.mode(), PrimitiveTopology::TriangleList);
        assert!(!sphere.is_indexed());
        assert_eq!(sphere.vertex_count(), 24);
        assert_eq!(sphere.attributes().len(), 3);

        let bounds = sphere.attributes().position().unwrap().bounds().copied().unwrap();
        for k in 0..3 {
            assert!(bounds.min[k] >= -1.0 - 1e-6 && bounds.max[k] <= 1.0 + 1e-6);
        }
        assert!((bounds.max[1] - 1.0).abs() < 1e-6);
        assert!((bounds.min[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_create_sphere_without_uvs() {
        let sphere =
            create_sphere::<()>(None, &SphereOptions::new(3, 3).with_uvs(false), None).unwrap();
        assert!(!sphere.attributes().contains(&VertexSemantic::TexCoord(0)));
        assert!(sphere.attributes().contains(&VertexSemantic::Normal));
    }
}
