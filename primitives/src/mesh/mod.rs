//! Mesh buffer model and generators.
//!
//! This module turns loose per-vertex streams into renderer-ready data:
//!
//! - [`BoundingBox`] - Component-wise min/max over 3-component positions
//! - [`encode_attributes`] - Packs streams into one little-endian byte buffer
//! - [`BufferView`] / [`Accessor`] - Offset and shape metadata over that buffer
//! - [`Attributes`] - Semantic name to accessor map, shared between primitives
//! - [`Primitive`] - Attributes + indices + material + draw topology
//! - [`generators`] - Procedural shapes (sphere)

mod accessor;
mod attributes;
mod bounds;
mod encoder;
pub mod generators;
mod primitive;

pub use accessor::{Accessor, AccessorType, BufferTarget, BufferView, ComponentType};
pub use attributes::{Attributes, VertexSemantic};
pub use bounds::BoundingBox;
pub use encoder::{AttributeStream, EncodedAttributes, FLOAT_SIZE, encode_attributes};
pub use primitive::{Primitive, PrimitiveTopology, clone_with_material};
