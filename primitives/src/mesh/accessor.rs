//! Buffer views and accessors.
//!
//! A [`BufferView`] names a contiguous byte range of an encoded buffer. An
//! [`Accessor`] reinterprets part of a view as typed elements: component
//! type, element shape, element count, and byte offset. Both use the glTF
//! vocabulary so GPU-binding consumers can read the buffer directly.

use std::fmt;
use std::sync::Arc;

use crate::error::{PrimitiveError, Result};

use super::bounds::BoundingBox;
use super::encoder::read_f32_le;

/// Scalar type of each accessor component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Signed 8-bit integer.
    Byte,
    /// Unsigned 8-bit integer.
    UnsignedByte,
    /// Signed 16-bit integer.
    Short,
    /// Unsigned 16-bit integer.
    UnsignedShort,
    /// Unsigned 32-bit integer.
    UnsignedInt,
    /// 32-bit IEEE-754 float.
    Float,
}

impl ComponentType {
    /// Size of one component in bytes.
    pub fn size(&self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
        }
    }

    /// The GL enum value used by glTF.
    pub fn gl_code(&self) -> u32 {
        match self {
            Self::Byte => 5120,
            Self::UnsignedByte => 5121,
            Self::Short => 5122,
            Self::UnsignedShort => 5123,
            Self::UnsignedInt => 5125,
            Self::Float => 5126,
        }
    }

    /// Look up a component type by its GL enum value.
    pub fn from_gl_code(code: u32) -> Option<Self> {
        match code {
            5120 => Some(Self::Byte),
            5121 => Some(Self::UnsignedByte),
            5122 => Some(Self::Short),
            5123 => Some(Self::UnsignedShort),
            5125 => Some(Self::UnsignedInt),
            5126 => Some(Self::Float),
            _ => None,
        }
    }
}

/// Shape of one accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorType {
    /// Single component.
    Scalar,
    /// 2-component vector.
    Vec2,
    /// 3-component vector.
    Vec3,
    /// 4-component vector.
    Vec4,
    /// 2x2 matrix.
    Mat2,
    /// 3x3 matrix.
    Mat3,
    /// 4x4 matrix.
    Mat4,
}

impl AccessorType {
    /// Number of components per element.
    pub fn component_count(&self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }

    /// The glTF name (`"VEC3"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat2 => "MAT2",
            Self::Mat3 => "MAT3",
            Self::Mat4 => "MAT4",
        }
    }

    /// Vector shape for a tuple arity (1 through 4).
    pub fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            1 => Some(Self::Scalar),
            2 => Some(Self::Vec2),
            3 => Some(Self::Vec3),
            4 => Some(Self::Vec4),
            _ => None,
        }
    }
}

impl fmt::Display for AccessorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binding hint for a buffer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    ArrayBuffer,
    /// Index data.
    ElementArrayBuffer,
}

impl BufferTarget {
    /// The GL enum value used by glTF.
    pub fn gl_code(&self) -> u32 {
        match self {
            Self::ArrayBuffer => 34962,
            Self::ElementArrayBuffer => 34963,
        }
    }
}

/// A contiguous byte range of an immutable buffer.
///
/// Many accessors can share one view. The view holds the buffer through an
/// `Arc`, so no accessor or primitive ever copies the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct BufferView {
    buffer: Arc<[u8]>,
    byte_offset: usize,
    byte_length: usize,
    target: Option<BufferTarget>,
}

impl BufferView {
    /// Create a view over the whole buffer.
    pub fn new(buffer: Arc<[u8]>) -> Self {
        let byte_length = buffer.len();
        Self {
            buffer,
            byte_offset: 0,
            byte_length,
            target: None,
        }
    }

    /// Create a view over `byte_length` bytes starting at `byte_offset`.
    pub fn with_range(buffer: Arc<[u8]>, byte_offset: usize, byte_length: usize) -> Result<Self> {
        let end = byte_offset.checked_add(byte_length);
        if end.is_none_or(|end| end > buffer.len()) {
            return Err(PrimitiveError::invalid(format!(
                "buffer view {byte_offset}+{byte_length} exceeds buffer of {} bytes",
                buffer.len()
            )));
        }
        Ok(Self {
            buffer,
            byte_offset,
            byte_length,
            target: None,
        })
    }

    /// Set the binding hint.
    pub fn with_target(mut self, target: BufferTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &Arc<[u8]> {
        &self.buffer
    }

    /// Offset of the view into the buffer.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Length of the view in bytes.
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Binding hint, if any.
    pub fn target(&self) -> Option<BufferTarget> {
        self.target
    }

    /// The bytes covered by this view.
    pub fn data(&self) -> &[u8] {
        &self.buffer[self.byte_offset..self.byte_offset + self.byte_length]
    }
}

impl fmt::Debug for BufferView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferView")
            .field("buffer_len", &self.buffer.len())
            .field("byte_offset", &self.byte_offset)
            .field("byte_length", &self.byte_length)
            .field("target", &self.target)
            .finish()
    }
}

/// Typed description of a region of a [`BufferView`].
///
/// Invariant: `byte_offset + count * element_size <= buffer_view.byte_length()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    buffer_view: Arc<BufferView>,
    byte_offset: usize,
    count: usize,
    component_type: ComponentType,
    accessor_type: AccessorType,
    bounds: Option<BoundingBox>,
}

impl Accessor {
    /// Describe `count` elements of `component_type`/`accessor_type` starting
    /// `byte_offset` bytes into `buffer_view`.
    ///
    /// # Errors
    ///
    /// [`PrimitiveError::InvalidInput`] if the range does not fit in the view
    /// or the offset is not aligned to the component size.
    pub fn new(
        buffer_view: Arc<BufferView>,
        component_type: ComponentType,
        accessor_type: AccessorType,
        count: usize,
        byte_offset: usize,
    ) -> Result<Self> {
        if byte_offset % component_type.size() != 0 {
            return Err(PrimitiveError::invalid(format!(
                "accessor offset {byte_offset} is not aligned to {} bytes",
                component_type.size()
            )));
        }

        let element_size = component_type.size() * accessor_type.component_count();
        let end = count
            .checked_mul(element_size)
            .and_then(|len| len.checked_add(byte_offset));
        if end.is_none_or(|end| end > buffer_view.byte_length()) {
            return Err(PrimitiveError::invalid(format!(
                "accessor of {count} {accessor_type} elements at offset {byte_offset} \
                 exceeds buffer view of {} bytes",
                buffer_view.byte_length()
            )));
        }

        Ok(Self {
            buffer_view,
            byte_offset,
            count,
            component_type,
            accessor_type,
            bounds: None,
        })
    }

    /// Build an index accessor over its own `UNSIGNED_SHORT` buffer.
    pub fn from_indices_u16(indices: &[u16]) -> Self {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        Self::index_accessor(bytes, ComponentType::UnsignedShort, indices.len())
    }

    /// Build an index accessor over its own `UNSIGNED_INT` buffer.
    pub fn from_indices_u32(indices: &[u32]) -> Self {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        Self::index_accessor(bytes, ComponentType::UnsignedInt, indices.len())
    }

    fn index_accessor(bytes: Vec<u8>, component_type: ComponentType, count: usize) -> Self {
        let view = BufferView::new(bytes.into()).with_target(BufferTarget::ElementArrayBuffer);
        Self {
            buffer_view: Arc::new(view),
            byte_offset: 0,
            count,
            component_type,
            accessor_type: AccessorType::Scalar,
            bounds: None,
        }
    }

    /// Attach a bounding box (POSITION accessors).
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// The buffer view this accessor reads from.
    pub fn buffer_view(&self) -> &Arc<BufferView> {
        &self.buffer_view
    }

    /// Byte offset into the buffer view.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Component type.
    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    /// Element shape.
    pub fn accessor_type(&self) -> AccessorType {
        self.accessor_type
    }

    /// Bounding box, if attached.
    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.component_type.size() * self.accessor_type.component_count()
    }

    /// Total size of the described region in bytes.
    pub fn byte_length(&self) -> usize {
        self.count * self.element_size()
    }

    /// The raw bytes described by this accessor.
    pub fn bytes(&self) -> &[u8] {
        &self.buffer_view.data()[self.byte_offset..self.byte_offset + self.byte_length()]
    }

    /// Decode a `FLOAT` accessor into flat scalars.
    pub fn read_f32(&self) -> Result<Vec<f32>> {
        if self.component_type != ComponentType::Float {
            return Err(PrimitiveError::invalid(format!(
                "cannot read {:?} components as f32",
                self.component_type
            )));
        }
        Ok(read_f32_le(self.bytes()))
    }

    /// Decode an unsigned `SCALAR` accessor into indices.
    pub fn read_indices(&self) -> Result<Vec<u32>> {
        if self.accessor_type != AccessorType::Scalar {
            return Err(PrimitiveError::invalid(format!(
                "index accessor must be SCALAR, found {}",
                self.accessor_type
            )));
        }
        let bytes = self.bytes();
        match self.component_type {
            ComponentType::UnsignedByte => Ok(bytes.iter().map(|&b| u32::from(b)).collect()),
            ComponentType::UnsignedShort => Ok(bytes
                .chunks_exact(2)
                .map(|c| u32::from(u16::from_le_bytes([c[0], c[1]])))
                .collect()),
            ComponentType::UnsignedInt => Ok(bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect()),
            other => Err(PrimitiveError::invalid(format!(
                "index accessor must be unsigned, found {other:?}"
            ))),
        }
    }
}
