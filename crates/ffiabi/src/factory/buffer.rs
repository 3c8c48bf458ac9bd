//! Binary buffer element kinds

use std::fmt;

use crate::types::{NativePrimitiveType, PrimitiveKind};

/// Element kinds of the typed binary buffers that can be handed to native
/// code without copying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BufferElementKind {
    Int8 = 0,
    Uint8 = 1,
    /// Bytes clamped to 0..=255 on store; same layout as `Uint8`
    Uint8Clamped = 2,
    Int16 = 3,
    Uint16 = 4,
    Int32 = 5,
    Uint32 = 6,
    Int64 = 7,
    Uint64 = 8,
    Float32 = 9,
    Float64 = 10,
}

impl BufferElementKind {
    pub const ALL: [BufferElementKind; 11] = [
        BufferElementKind::Int8,
        BufferElementKind::Uint8,
        BufferElementKind::Uint8Clamped,
        BufferElementKind::Int16,
        BufferElementKind::Uint16,
        BufferElementKind::Int32,
        BufferElementKind::Uint32,
        BufferElementKind::Int64,
        BufferElementKind::Uint64,
        BufferElementKind::Float32,
        BufferElementKind::Float64,
    ];

    /// Decode a raw element kind id
    pub fn from_id(id: u8) -> Option<BufferElementKind> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Byte width of one element
    pub fn element_size_in_bytes(self) -> usize {
        match self {
            BufferElementKind::Int8 | BufferElementKind::Uint8 | BufferElementKind::Uint8Clamped => 1,
            BufferElementKind::Int16 | BufferElementKind::Uint16 => 2,
            BufferElementKind::Int32 | BufferElementKind::Uint32 | BufferElementKind::Float32 => 4,
            BufferElementKind::Int64 | BufferElementKind::Uint64 | BufferElementKind::Float64 => 8,
        }
    }
}

impl fmt::Display for BufferElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferElementKind::Int8 => "Int8List",
            BufferElementKind::Uint8 => "Uint8List",
            BufferElementKind::Uint8Clamped => "Uint8ClampedList",
            BufferElementKind::Int16 => "Int16List",
            BufferElementKind::Uint16 => "Uint16List",
            BufferElementKind::Int32 => "Int32List",
            BufferElementKind::Uint32 => "Uint32List",
            BufferElementKind::Int64 => "Int64List",
            BufferElementKind::Uint64 => "Uint64List",
            BufferElementKind::Float32 => "Float32List",
            BufferElementKind::Float64 => "Float64List",
        };
        f.write_str(name)
    }
}

/// The primitive type of one buffer element
pub fn from_buffer_element_kind(kind: BufferElementKind) -> NativePrimitiveType {
    let primitive = match kind {
        BufferElementKind::Int8 => PrimitiveKind::Int8,
        BufferElementKind::Uint8 | BufferElementKind::Uint8Clamped => PrimitiveKind::Uint8,
        BufferElementKind::Int16 => PrimitiveKind::Int16,
        BufferElementKind::Uint16 => PrimitiveKind::Uint16,
        BufferElementKind::Int32 => PrimitiveKind::Int32,
        BufferElementKind::Uint32 => PrimitiveKind::Uint32,
        BufferElementKind::Int64 => PrimitiveKind::Int64,
        BufferElementKind::Uint64 => PrimitiveKind::Uint64,
        BufferElementKind::Float32 => PrimitiveKind::Float,
        BufferElementKind::Float64 => PrimitiveKind::Double,
    };
    NativePrimitiveType::new(primitive)
}

/// [`from_buffer_element_kind`] on a raw id
///
/// # Panics
///
/// If `id` does not name a buffer element kind. Callers decode with
/// [`BufferElementKind::from_id`] when the id is not already known good.
pub fn from_buffer_element_kind_id(id: u8) -> NativePrimitiveType {
    match BufferElementKind::from_id(id) {
        Some(kind) => from_buffer_element_kind(kind),
        None => panic!("buffer element kind id {id} has no native type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sizes_match_element_width() {
        for kind in BufferElementKind::ALL {
            assert_eq!(
                from_buffer_element_kind(kind).size_in_bytes(),
                kind.element_size_in_bytes(),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_ids_round_trip() {
        for kind in BufferElementKind::ALL {
            assert_eq!(BufferElementKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(BufferElementKind::from_id(11), None);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(from_buffer_element_kind(BufferElementKind::Uint8Clamped).kind(), PrimitiveKind::Uint8);
        assert_eq!(from_buffer_element_kind(BufferElementKind::Float32).kind(), PrimitiveKind::Float);
        assert_eq!(from_buffer_element_kind_id(10).kind(), PrimitiveKind::Double);
        assert!(from_buffer_element_kind(BufferElementKind::Int16).is_signed());
    }

    #[test]
    #[should_panic(expected = "buffer element kind id 42")]
    fn test_unknown_id_panics() {
        from_buffer_element_kind_id(42);
    }
}
