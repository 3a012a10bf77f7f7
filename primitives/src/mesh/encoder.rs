//! Attribute buffer encoder.
//!
//! Packs several float streams back-to-back into one byte buffer. Every
//! scalar is written as a 4-byte IEEE-754 float in little-endian order,
//! whatever the host byte order is, so identical input always produces
//! identical bytes.

use std::sync::Arc;

use crate::error::{PrimitiveError, Result};

use super::attributes::VertexSemantic;

/// Size in bytes of one encoded float component.
pub const FLOAT_SIZE: usize = std::mem::size_of::<f32>();

/// One named per-vertex float stream to encode.
#[derive(Debug, Clone, Copy)]
pub struct AttributeStream<'a> {
    /// Semantic name of the stream; also used in error messages.
    pub semantic: VertexSemantic,
    /// Flat scalar data, `arity` scalars per element.
    pub data: &'a [f32],
    /// Scalars per element (2 for UVs, 3 for positions and normals).
    pub arity: usize,
}

impl<'a> AttributeStream<'a> {
    /// Create a stream description.
    pub fn new(semantic: VertexSemantic, data: &'a [f32], arity: usize) -> Self {
        Self {
            semantic,
            data,
            arity,
        }
    }

    /// Number of elements (tuples) in the stream.
    ///
    /// Only meaningful once the stream passed [`validate`](Self::validate).
    pub fn element_count(&self) -> usize {
        self.data.len() / self.arity.max(1)
    }

    /// Size of the encoded stream in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len() * FLOAT_SIZE
    }

    /// Check that the arity is usable and the length is a multiple of it.
    pub fn validate(&self) -> Result<()> {
        if self.arity == 0 {
            return Err(PrimitiveError::invalid(format!(
                "attribute array `{}` declares an arity of 0",
                self.semantic
            )));
        }
        if self.data.len() % self.arity != 0 {
            return Err(PrimitiveError::MalformedAttributeArray {
                name: self.semantic.to_string(),
                len: self.data.len(),
                arity: self.arity,
            });
        }
        Ok(())
    }
}

/// Result of [`encode_attributes`]: the packed buffer and where each stream starts.
#[derive(Debug, Clone)]
pub struct EncodedAttributes {
    buffer: Arc<[u8]>,
    offsets: Vec<(VertexSemantic, usize)>,
}

impl EncodedAttributes {
    /// The packed, immutable byte buffer.
    pub fn buffer(&self) -> &Arc<[u8]> {
        &self.buffer
    }

    /// Total buffer size in bytes.
    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }

    /// Starting byte offset of every stream, in encoding order.
    pub fn offsets(&self) -> &[(VertexSemantic, usize)] {
        &self.offsets
    }

    /// Starting byte offset of one stream.
    pub fn offset(&self, semantic: &VertexSemantic) -> Option<usize> {
        self.offsets
            .iter()
            .find(|(s, _)| s == semantic)
            .map(|&(_, offset)| offset)
    }
}

/// Encode `streams` back-to-back, in the order given, into one byte buffer.
///
/// The first stream starts at offset 0 and each following stream starts
/// where the previous one ends. All streams are validated before anything is
/// written, so no partial buffer is ever produced.
///
/// # Errors
///
/// - [`PrimitiveError::MalformedAttributeArray`] if a stream's length is not
///   a multiple of its arity.
/// - [`PrimitiveError::InvalidInput`] if an arity is zero or two streams share
///   a semantic.
pub fn encode_attributes(streams: &[AttributeStream<'_>]) -> Result<EncodedAttributes> {
    crate::profile_function!();

    for (i, stream) in streams.iter().enumerate() {
        stream.validate()?;
        if streams[..i].iter().any(|s| s.semantic == stream.semantic) {
            return Err(PrimitiveError::invalid(format!(
                "attribute `{}` appears more than once",
                stream.semantic
            )));
        }
    }

    let total: usize = streams.iter().map(AttributeStream::byte_len).sum();
    let mut bytes = Vec::with_capacity(total);
    let mut offsets = Vec::with_capacity(streams.len());

    for stream in streams {
        let offset = bytes.len();
        offsets.push((stream.semantic, offset));
        write_f32_le(&mut bytes, stream.data);
        log::trace!(
            "encoded {} ({} x {}) at byte {offset}",
            stream.semantic,
            stream.element_count(),
            stream.arity,
        );
    }
    debug_assert_eq!(bytes.len(), total);

    log::debug!(
        "encoded {} attribute streams into {} bytes",
        streams.len(),
        bytes.len()
    );

    Ok(EncodedAttributes {
        buffer: bytes.into(),
        offsets,
    })
}

/// Append `data` as little-endian f32 bytes.
#[cfg(target_endian = "little")]
fn write_f32_le(out: &mut Vec<u8>, data: &[f32]) {
    // Native order already is the output order.
    out.extend_from_slice(bytemuck::cast_slice(data));
}

/// Append `data` as little-endian f32 bytes.
#[cfg(not(target_endian = "little"))]
fn write_f32_le(out: &mut Vec<u8>, data: &[f32]) {
    for v in data {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

/// Decode little-endian f32 bytes. Trailing bytes that do not form a full
/// float are ignored.
pub(crate) fn read_f32_le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(FLOAT_SIZE)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
