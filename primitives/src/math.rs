//! Math type aliases and helper functions.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// Convert spherical coordinates on the unit sphere to a Y-up Cartesian point.
///
/// `theta` is the polar angle measured from +Y, `phi` the azimuth measured
/// from +X towards +Z. This is the textbook Z-up mapping
/// `(sinθ·cosφ, sinθ·sinφ, cosθ)` with Y and Z exchanged.
pub fn spherical_to_cartesian_y_up(theta: f32, phi: f32) -> Vec3 {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi)
}
