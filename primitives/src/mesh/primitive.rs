//! Drawable primitives: attributes + indices + material + topology.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{PrimitiveError, Result};

use super::accessor::Accessor;
use super::attributes::{Attributes, VertexSemantic};

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices form a closed loop of lines.
    LineLoop,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
    /// Triangles share the first vertex.
    TriangleFan,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive (for non-strip topologies).
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            Self::PointList => Some(1),
            Self::LineList => Some(2),
            Self::TriangleList => Some(3),
            Self::LineLoop | Self::LineStrip | Self::TriangleStrip | Self::TriangleFan => None,
        }
    }

    /// The glTF `mode` value.
    pub fn gl_mode(&self) -> u32 {
        match self {
            Self::PointList => 0,
            Self::LineList => 1,
            Self::LineLoop => 2,
            Self::LineStrip => 3,
            Self::TriangleList => 4,
            Self::TriangleStrip => 5,
            Self::TriangleFan => 6,
        }
    }
}

/// One drawable geometry unit.
///
/// The attribute map and index accessor are shared, immutable geometry:
/// [`clone_with_material`](Self::clone_with_material) hands the same `Arc`s
/// to the new primitive, so the encoded bytes live as long as the longest
/// lived primitive using them. `M` is the caller's material type; the
/// primitive only stores and forwards it.
pub struct Primitive<M> {
    attributes: Arc<Attributes>,
    indices: Option<Arc<Accessor>>,
    material: Option<Arc<M>>,
    mode: PrimitiveTopology,
}

impl<M> Primitive<M> {
    /// Assemble a primitive.
    ///
    /// `indices` of `None` means the primitive is drawn unindexed, vertex by
    /// vertex. `mode` of `None` means [`PrimitiveTopology::TriangleList`].
    ///
    /// # Errors
    ///
    /// [`PrimitiveError::MissingRequiredAttribute`] if `attributes` has no
    /// POSITION accessor, or [`PrimitiveError::InvalidInput`] if another
    /// attribute's element count differs from the POSITION count.
    pub fn assemble(
        attributes: Arc<Attributes>,
        material: Option<Arc<M>>,
        indices: Option<Arc<Accessor>>,
        mode: Option<PrimitiveTopology>,
    ) -> Result<Self> {
        if !attributes.contains(&VertexSemantic::Position) {
            return Err(PrimitiveError::MissingRequiredAttribute(
                VertexSemantic::Position,
            ));
        }
        attributes.check_vertex_counts()?;
        Ok(Self {
            attributes,
            indices,
            material,
            mode: mode.unwrap_or_default(),
        })
    }

    /// Create a primitive sharing this one's attributes and indices, with a
    /// different material and mode. `self` is left untouched and no vertex
    /// bytes are copied.
    pub fn clone_with_material(
        &self,
        material: Option<Arc<M>>,
        mode: Option<PrimitiveTopology>,
    ) -> Self {
        Self {
            attributes: Arc::clone(&self.attributes),
            indices: self.indices.clone(),
            material,
            mode: mode.unwrap_or_default(),
        }
    }

    /// The shared attribute map.
    pub fn attributes(&self) -> &Arc<Attributes> {
        &self.attributes
    }

    /// The index accessor, if indexed.
    pub fn indices(&self) -> Option<&Arc<Accessor>> {
        self.indices.as_ref()
    }

    /// The material, if set.
    pub fn material(&self) -> Option<&Arc<M>> {
        self.material.as_ref()
    }

    /// Draw topology.
    pub fn mode(&self) -> PrimitiveTopology {
        self.mode
    }

    /// Check if this primitive uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of vertices (elements of the POSITION accessor).
    pub fn vertex_count(&self) -> usize {
        self.attributes.position().map_or(0, |p| p.count())
    }

    /// Number of elements a draw call consumes: the index count when
    /// indexed, the vertex count otherwise.
    pub fn draw_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or_else(|| self.vertex_count(), |i| i.count())
    }
}

impl<M> Clone for Primitive<M> {
    fn clone(&self) -> Self {
        Self {
            attributes: Arc::clone(&self.attributes),
            indices: self.indices.clone(),
            material: self.material.clone(),
            mode: self.mode,
        }
    }
}

impl<M> fmt::Debug for Primitive<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive")
            .field(
                "attributes",
                &self
                    .attributes
                    .iter()
                    .map(|(s, _)| s.to_string())
                    .collect::<Vec<_>>(),
            )
            .field("vertex_count", &self.vertex_count())
            .field("index_count", &self.indices.as_ref().map(|i| i.count()))
            .field("has_material", &self.material.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Type-erased form of [`Primitive::clone_with_material`].
///
/// For callers that hold geometry as `dyn Any` (scene registries, scripting
/// bridges).
///
/// # Errors
///
/// [`PrimitiveError::TypeMismatch`] if `value` is not a `Primitive<M>`.
pub fn clone_with_material<M: 'static>(
    value: &dyn Any,
    material: Option<Arc<M>>,
    mode: Option<PrimitiveTopology>,
) -> Result<Primitive<M>> {
    value
        .downcast_ref::<Primitive<M>>()
        .map(|primitive| primitive.clone_with_material(material, mode))
        .ok_or(PrimitiveError::TypeMismatch {
            expected: std::any::type_name::<Primitive<M>>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::AttributeStream;

    #[derive(Debug, PartialEq)]
    struct TestMaterial(&'static str);

    fn triangle_attributes() -> Arc<Attributes> {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        Arc::new(
            Attributes::from_streams(&[AttributeStream::new(
                VertexSemantic::Position,
                &positions,
                3,
            )])
            .unwrap(),
        )
    }

    #[test]
    fn test_topology_codes() {
        assert_eq!(PrimitiveTopology::default(), PrimitiveTopology::TriangleList);
        assert_eq!(PrimitiveTopology::TriangleList.gl_mode(), 4);
        assert_eq!(PrimitiveTopology::PointList.gl_mode(), 0);
        assert_eq!(
            PrimitiveTopology::TriangleList.vertices_per_primitive(),
            Some(3)
        );
        assert_eq!(PrimitiveTopology::TriangleFan.vertices_per_primitive(), None);
    }

    #[test]
    fn test_assemble_defaults() {
        let primitive =
            Primitive::<TestMaterial>::assemble(triangle_attributes(), None, None, None).unwrap();
        assert_eq!(primitive.mode(), PrimitiveTopology::TriangleList);
        assert!(!primitive.is_indexed());
        assert!(primitive.material().is_none());
        assert_eq!(primitive.vertex_count(), 3);
        assert_eq!(primitive.draw_count(), 3);
    }

    #[test]
    fn test_assemble_indexed() {
        let indices = Arc::new(Accessor::from_indices_u16(&[0, 1, 2, 2, 1, 0]));
        let primitive = Primitive::assemble(
            triangle_attributes(),
            Some(Arc::new(TestMaterial("red"))),
            Some(indices.clone()),
            Some(PrimitiveTopology::LineList),
        )
        .unwrap();
        assert!(primitive.is_indexed());
        assert!(Arc::ptr_eq(primitive.indices().unwrap(), &indices));
        assert_eq!(primitive.draw_count(), 6);
        assert_eq!(primitive.mode(), PrimitiveTopology::LineList);
    }

    #[test]
    fn test_assemble_requires_position() {
        let normals = [0.0, 1.0, 0.0];
        let attributes = Attributes::from_streams(&[AttributeStream::new(
            VertexSemantic::Normal,
            &normals,
            3,
        )])
        .unwrap();
        let err = Primitive::<TestMaterial>::assemble(Arc::new(attributes), None, None, None)
            .unwrap_err();
        assert_eq!(
            err,
            PrimitiveError::MissingRequiredAttribute(VertexSemantic::Position)
        );
    }

    #[test]
    fn test_assemble_rejects_mismatched_counts() {
        let positions = [0.0f32; 9];
        let attributes = Attributes::from_streams(&[AttributeStream::new(
            VertexSemantic::Position,
            &positions,
            3,
        )])
        .unwrap();
        // Two UVs for three vertices.
        let short_uvs = Arc::new(Accessor::from_indices_u16(&[0, 1]));
        let attributes = attributes
            .with_accessor(VertexSemantic::TexCoord(0), short_uvs)
            .unwrap();

        let err = Primitive::<TestMaterial>::assemble(Arc::new(attributes), None, None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            PrimitiveError::InvalidInput(ref msg) if msg.contains("TEXCOORD_0")
        ));
    }

    #[test]
    fn test_clone_with_material_shares_geometry() {
        let indices = Arc::new(Accessor::from_indices_u32(&[0, 1, 2]));
        let m1 = Arc::new(TestMaterial("m1"));
        let m2 = Arc::new(TestMaterial("m2"));
        let original = Primitive::assemble(
            triangle_attributes(),
            Some(m1.clone()),
            Some(indices),
            Some(PrimitiveTopology::TriangleStrip),
        )
        .unwrap();

        let variant = original.clone_with_material(Some(m2.clone()), None);

        assert!(Arc::ptr_eq(original.attributes(), variant.attributes()));
        assert!(Arc::ptr_eq(
            original.indices().unwrap(),
            variant.indices().unwrap()
        ));
        assert!(Arc::ptr_eq(variant.material().unwrap(), &m2));
        assert!(Arc::ptr_eq(original.material().unwrap(), &m1));
        assert_eq!(original.mode(), PrimitiveTopology::TriangleStrip);
        assert_eq!(variant.mode(), PrimitiveTopology::TriangleList);
    }

    #[test]
    fn test_geometry_outlives_source_primitive() {
        let original =
            Primitive::<TestMaterial>::assemble(triangle_attributes(), None, None, None).unwrap();
        let variant = original.clone_with_material(Some(Arc::new(TestMaterial("late"))), None);
        drop(original);
        let positions = variant.attributes().position().unwrap().read_f32().unwrap();
        assert_eq!(positions.len(), 9);
    }

    #[test]
    fn test_type_erased_clone() {
        let original =
            Primitive::<TestMaterial>::assemble(triangle_attributes(), None, None, None).unwrap();
        let erased: &dyn Any = &original;
        let variant =
            clone_with_material(erased, Some(Arc::new(TestMaterial("blue"))), None).unwrap();
        assert!(Arc::ptr_eq(original.attributes(), variant.attributes()));
        assert_eq!(variant.material().map(|m| m.0), Some("blue"));
    }

    #[test]
    fn test_type_erased_clone_rejects_other_types() {
        let not_a_primitive: &dyn Any = &42u32;
        let err = clone_with_material::<TestMaterial>(not_a_primitive, None, None).unwrap_err();
        assert!(matches!(err, PrimitiveError::TypeMismatch { .. }));

        let attributes: &dyn Any = &Attributes::new();
        assert!(clone_with_material::<TestMaterial>(attributes, None, None).is_err());
    }
}
