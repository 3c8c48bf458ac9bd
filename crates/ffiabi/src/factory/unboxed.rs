//! Bridge to the JIT's unboxed value representations
//!
//! Native types and unboxed representations overlap only partly: unboxed
//! values have no sub-word integers, and native types have no tagged or
//! untagged forms.

use std::fmt;

use crate::types::{NativePrimitiveType, NativeType, PrimitiveKind};

/// How the JIT holds a value in a register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Boxed or small-integer tagged object reference
    Tagged,
    /// Raw address not visible to the GC
    Untagged,
    UnboxedDouble,
    UnboxedFloat,
    UnboxedInt32,
    UnboxedUint32,
    UnboxedInt64,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Representation::Tagged => "tagged",
            Representation::Untagged => "untagged",
            Representation::UnboxedDouble => "double",
            Representation::UnboxedFloat => "float",
            Representation::UnboxedInt32 => "int32",
            Representation::UnboxedUint32 => "uint32",
            Representation::UnboxedInt64 => "int64",
        };
        f.write_str(name)
    }
}

/// The native primitive that holds every value of `rep` losslessly
///
/// # Panics
///
/// On `Tagged` and `Untagged`, which have no native counterpart.
pub fn from_unboxed_representation(rep: Representation) -> NativePrimitiveType {
    let kind = match rep {
        Representation::UnboxedDouble => PrimitiveKind::Double,
        Representation::UnboxedFloat => PrimitiveKind::Float,
        Representation::UnboxedInt32 => PrimitiveKind::Int32,
        Representation::UnboxedUint32 => PrimitiveKind::Uint32,
        Representation::UnboxedInt64 => PrimitiveKind::Int64,
        Representation::Tagged | Representation::Untagged => {
            panic!("representation {rep} has no native type")
        }
    };
    NativePrimitiveType::new(kind)
}

impl NativePrimitiveType {
    /// The unboxed representation of this type, if there is an exact one
    pub fn as_representation(&self) -> Option<Representation> {
        match self.kind() {
            PrimitiveKind::Int32 => Some(Representation::UnboxedInt32),
            PrimitiveKind::Uint32 => Some(Representation::UnboxedUint32),
            // The range of an unboxed int64 is not constrained to signed.
            PrimitiveKind::Int64 | PrimitiveKind::Uint64 => Some(Representation::UnboxedInt64),
            PrimitiveKind::Float => Some(Representation::UnboxedFloat),
            PrimitiveKind::Double => Some(Representation::UnboxedDouble),
            PrimitiveKind::Int8
            | PrimitiveKind::Uint8
            | PrimitiveKind::Int16
            | PrimitiveKind::Uint16
            | PrimitiveKind::HalfDouble
            | PrimitiveKind::Void => None,
        }
    }

    pub fn is_expressible_as_representation(&self) -> bool {
        self.as_representation().is_some()
    }
}

impl NativeType {
    pub fn as_representation(&self) -> Option<Representation> {
        self.as_primitive().and_then(|p| p.as_representation())
    }

    pub fn is_expressible_as_representation(&self) -> bool {
        self.as_representation().is_some()
    }

    /// Unboxed representation after widening, which covers sub-word
    /// integers by over-approximating them with 32 bits
    pub fn as_representation_over_approx(&self) -> Option<Representation> {
        self.widen_to_4_bytes().as_representation()
    }
}
