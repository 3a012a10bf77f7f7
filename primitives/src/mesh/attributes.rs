//! Semantic attribute names and the attribute map of a primitive.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{PrimitiveError, Result};

use super::accessor::{Accessor, AccessorType, BufferTarget, BufferView, ComponentType};
use super::bounds::BoundingBox;
use super::encoder::{AttributeStream, encode_attributes};

/// Semantic meaning of a vertex attribute.
///
/// Displays as its glTF name (`POSITION`, `TEXCOORD_0`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexSemantic {
    /// Vertex position (required on every primitive).
    Position,
    /// Vertex normal.
    Normal,
    /// Vertex tangent.
    Tangent,
    /// Texture coordinate set `n`.
    TexCoord(u32),
    /// Vertex color set `n`.
    Color(u32),
    /// Skinning joint indices set `n`.
    Joints(u32),
    /// Skinning weights set `n`.
    Weights(u32),
}

impl fmt::Display for VertexSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => f.write_str("POSITION"),
            Self::Normal => f.write_str("NORMAL"),
            Self::Tangent => f.write_str("TANGENT"),
            Self::TexCoord(n) => write!(f, "TEXCOORD_{n}"),
            Self::Color(n) => write!(f, "COLOR_{n}"),
            Self::Joints(n) => write!(f, "JOINTS_{n}"),
            Self::Weights(n) => write!(f, "WEIGHTS_{n}"),
        }
    }
}

/// Immutable map from semantic to accessor.
///
/// Primitives hold it behind an `Arc`, so every primitive cloned from the
/// same geometry points at the same map and the same bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    accessors: BTreeMap<VertexSemantic, Arc<Accessor>>,
}

impl Attributes {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `streams` into one buffer and describe each with an accessor.
    ///
    /// All accessors share a single [`BufferView`] over the whole buffer.
    /// Element shape follows each stream's arity. The POSITION accessor gets
    /// the bounding box of the original float data.
    ///
    /// # Errors
    ///
    /// Propagates encoder errors; [`PrimitiveError::InvalidInput`] for an
    /// arity above 4 or an empty POSITION stream.
    pub fn from_streams(streams: &[AttributeStream<'_>]) -> Result<Self> {
        crate::profile_function!();

        let encoded = encode_attributes(streams)?;
        let view = Arc::new(
            BufferView::new(Arc::clone(encoded.buffer())).with_target(BufferTarget::ArrayBuffer),
        );

        let mut accessors = BTreeMap::new();
        for (stream, &(_, offset)) in streams.iter().zip(encoded.offsets()) {
            let shape = AccessorType::from_arity(stream.arity).ok_or_else(|| {
                PrimitiveError::invalid(format!(
                    "attribute `{}` has unsupported arity {}",
                    stream.semantic, stream.arity
                ))
            })?;
            let mut accessor = Accessor::new(
                Arc::clone(&view),
                ComponentType::Float,
                shape,
                stream.element_count(),
                offset,
            )?;
            if stream.semantic == VertexSemantic::Position {
                accessor = accessor.with_bounds(BoundingBox::from_positions(stream.data)?);
            }
            accessors.insert(stream.semantic, Arc::new(accessor));
        }

        let attributes = Self { accessors };
        attributes.check_vertex_counts()?;
        Ok(attributes)
    }

    /// Check that every accessor has as many elements as POSITION.
    ///
    /// Vertex `i` of one attribute describes the same vertex as vertex `i`
    /// of every other. Maps without POSITION pass trivially.
    ///
    /// # Errors
    ///
    /// [`PrimitiveError::InvalidInput`] naming the first mismatching semantic.
    pub fn check_vertex_counts(&self) -> Result<()> {
        let Some(position) = self.position() else {
            return Ok(());
        };
        let vertex_count = position.count();
        match self
            .accessors
            .iter()
            .find(|(_, accessor)| accessor.count() != vertex_count)
        {
            Some((semantic, accessor)) => Err(PrimitiveError::invalid(format!(
                "attribute `{semantic}` has {} elements but POSITION has {vertex_count}",
                accessor.count()
            ))),
            None => Ok(()),
        }
    }

    /// Add an externally built accessor.
    ///
    /// # Errors
    ///
    /// [`PrimitiveError::InvalidInput`] if `semantic` is already present.
    pub fn with_accessor(
        mut self,
        semantic: VertexSemantic,
        accessor: Arc<Accessor>,
    ) -> Result<Self> {
        if self.accessors.contains_key(&semantic) {
            return Err(PrimitiveError::invalid(format!(
                "attribute `{semantic}` is already set"
            )));
        }
        self.accessors.insert(semantic, accessor);
        Ok(self)
    }

    /// Accessor for `semantic`, if present.
    pub fn get(&self, semantic: &VertexSemantic) -> Option<&Arc<Accessor>> {
        self.accessors.get(semantic)
    }

    /// Whether `semantic` is present.
    pub fn contains(&self, semantic: &VertexSemantic) -> bool {
        self.accessors.contains_key(semantic)
    }

    /// The POSITION accessor, if present.
    pub fn position(&self) -> Option<&Arc<Accessor>> {
        self.get(&VertexSemantic::Position)
    }

    /// Iterate over `(semantic, accessor)` pairs in semantic order.
    pub fn iter(&self) -> impl Iterator<Item = (&VertexSemantic, &Arc<Accessor>)> {
        self.accessors.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}
