//! # RedLilium Primitives
//!
//! Procedural mesh primitives packed into GPU-ready attribute buffers.
//!
//! A generator produces loose per-vertex streams (positions, normals, UVs).
//! The [`mesh`] module encodes them back-to-back into one little-endian byte
//! buffer, describes each stream with an [`mesh::Accessor`] over a shared
//! [`mesh::BufferView`], and groups the accessors into a [`mesh::Primitive`]
//! that a renderer can bind without further negotiation.
//!
//! ```
//! use std::sync::Arc;
//! use redlilium_primitives::mesh::generators::{SphereOptions, create_sphere};
//! use redlilium_primitives::mesh::{PrimitiveTopology, VertexSemantic};
//!
//! let sphere = create_sphere(Some(Arc::new("chrome")), &SphereOptions::new(8, 16), None).unwrap();
//! assert_eq!(sphere.mode(), PrimitiveTopology::TriangleList);
//! assert!(sphere.attributes().get(&VertexSemantic::Normal).is_some());
//!
//! // Same geometry, different look.
//! let matte = sphere.clone_with_material(Some(Arc::new("matte")), None);
//! assert!(Arc::ptr_eq(sphere.attributes(), matte.attributes()));
//! ```

pub mod error;
pub mod math;
pub mod mesh;
pub mod profiling;

pub use error::{PrimitiveError, Result};

/// Primitives library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Announce the library through the `log` facade.
pub fn init() {
    log::info!("RedLilium Primitives v{} initialized", VERSION);
}
