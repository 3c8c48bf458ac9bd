//! Native types used to describe calling conventions
//!
//! Native types overlap with, but are not the same as, the JIT's unboxed
//! representations. They have no tagged or untagged forms, and they do have
//! sub-word integers and `void`, which unboxed values lack.

use std::fmt;

use super::alignment::AlignmentPolicy;
use super::primitive::PrimitiveKind;
use super::zone::TypeId;

/// A primitive native type: exactly one kind, nothing else
///
/// Called object types in C and fundamental types in C++. Every query is
/// answered from the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativePrimitiveType {
    kind: PrimitiveKind,
}

impl NativePrimitiveType {
    pub const fn new(kind: PrimitiveKind) -> Self {
        Self { kind }
    }

    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub const fn is_int(&self) -> bool {
        self.kind.is_int()
    }

    pub const fn is_float(&self) -> bool {
        self.kind.is_float()
    }

    pub const fn is_void(&self) -> bool {
        self.kind.is_void()
    }

    pub const fn is_signed(&self) -> bool {
        self.kind.is_signed()
    }

    /// Size in bytes, without padding for repetition
    pub const fn size_in_bytes(&self) -> usize {
        self.kind.size_in_bytes()
    }

    pub fn alignment_in_bytes_stack(&self, policy: &impl AlignmentPolicy) -> usize {
        policy.stack_alignment(self.kind, self.size_in_bytes())
    }

    pub fn alignment_in_bytes_field(&self, policy: &impl AlignmentPolicy) -> usize {
        policy.field_alignment(self.kind, self.size_in_bytes())
    }

    /// Promote 8- and 16-bit integers to the 32-bit integer of the same
    /// signedness. Every other kind is returned unchanged.
    pub const fn widen_to_4_bytes(self) -> Self {
        match self.kind {
            PrimitiveKind::Int8 | PrimitiveKind::Int16 => Self::new(PrimitiveKind::Int32),
            PrimitiveKind::Uint8 | PrimitiveKind::Uint16 => Self::new(PrimitiveKind::Uint32),
            _ => self,
        }
    }

    /// The capability to split, if this kind is 8 bytes wide
    pub const fn as_splittable(self) -> Option<SplittablePrimitive> {
        match self.kind {
            PrimitiveKind::Int64 | PrimitiveKind::Uint64 | PrimitiveKind::Double => {
                Some(SplittablePrimitive { kind: self.kind })
            }
            _ => None,
        }
    }

    pub const fn is_splittable(&self) -> bool {
        self.as_splittable().is_some()
    }

    /// One 4-byte half of an 8-byte value, `0` for low and `1` for high
    ///
    /// # Panics
    ///
    /// If the kind is not 8 bytes wide or `index` is neither 0 nor 1. Callers
    /// lowering a call must check [`Self::is_splittable`] first.
    pub fn split(&self, index: usize) -> NativePrimitiveType {
        let Some(splittable) = self.as_splittable() else {
            panic!("cannot split native type {}: not an 8-byte primitive", self.kind);
        };
        match Half::from_index(index) {
            Some(half) => splittable.half(half),
            None => panic!("split index {index} out of range for {}", self.kind),
        }
    }
}

impl From<PrimitiveKind> for NativePrimitiveType {
    fn from(kind: PrimitiveKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for NativePrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

/// Which half of a split value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
    /// Low-order 4 bytes
    Low,
    /// High-order 4 bytes
    High,
}

impl Half {
    pub const fn from_index(index: usize) -> Option<Half> {
        match index {
            0 => Some(Half::Low),
            1 => Some(Half::High),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Half::Low => 0,
            Half::High => 1,
        }
    }
}

/// An 8-byte primitive, proven splittable
///
/// Only obtainable through [`NativePrimitiveType::as_splittable`], so
/// [`SplittablePrimitive::half`] is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplittablePrimitive {
    kind: PrimitiveKind,
}

impl SplittablePrimitive {
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// The 4-byte type holding `half` of the value
    ///
    /// Concatenating the low half then the high half reproduces the 8-byte value
    /// bits. Doubles split into two half-doubles, 64-bit integers into two
    /// 32-bit integers of the same signedness. Both halves share a kind; the
    /// argument only names which location the caller is filling.
    pub const fn half(&self, _half: Half) -> NativePrimitiveType {
        let kind = match self.kind {
            PrimitiveKind::Double => PrimitiveKind::HalfDouble,
            PrimitiveKind::Uint64 => PrimitiveKind::Uint32,
            _ => PrimitiveKind::Int32,
        };
        NativePrimitiveType::new(kind)
    }

    /// Both halves, low first
    pub const fn halves(&self) -> [NativePrimitiveType; 2] {
        [self.half(Half::Low), self.half(Half::High)]
    }
}

/// A call or callee signature
///
/// Holds handles into the zone that owns the argument and return types;
/// the zone outlives every signature built from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NativeFunctionType {
    argument_types: Vec<TypeId>,
    return_type: TypeId,
}

impl NativeFunctionType {
    pub fn new(argument_types: Vec<TypeId>, return_type: TypeId) -> Self {
        Self { argument_types, return_type }
    }

    pub fn argument_types(&self) -> &[TypeId] {
        &self.argument_types
    }

    pub fn return_type(&self) -> TypeId {
        self.return_type
    }
}

/// The types calling conventions are specified in terms of
///
/// Composite (struct and union) types are not modelled yet. When they are,
/// they become a new variant here and every exhaustive match below has to
/// say how a composite is sized, aligned and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeType {
    Primitive(NativePrimitiveType),
    Function(NativeFunctionType),
}

impl NativeType {
    pub const fn primitive(kind: PrimitiveKind) -> Self {
        NativeType::Primitive(NativePrimitiveType::new(kind))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, NativeType::Primitive(_))
    }

    pub fn as_primitive(&self) -> Option<NativePrimitiveType> {
        match self {
            NativeType::Primitive(p) => Some(*p),
            NativeType::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&NativeFunctionType> {
        match self {
            NativeType::Function(f) => Some(f),
            NativeType::Primitive(_) => None,
        }
    }

    pub fn is_int(&self) -> bool {
        match self {
            NativeType::Primitive(p) => p.is_int(),
            NativeType::Function(_) => false,
        }
    }

    pub fn is_float(&self) -> bool {
        match self {
            NativeType::Primitive(p) => p.is_float(),
            NativeType::Function(_) => false,
        }
    }

    pub fn is_void(&self) -> bool {
        match self {
            NativeType::Primitive(p) => p.is_void(),
            NativeType::Function(_) => false,
        }
    }

    pub fn is_signed(&self) -> bool {
        match self {
            NativeType::Primitive(p) => p.is_signed(),
            NativeType::Function(_) => false,
        }
    }

    /// Size in bytes; a signature describes a call and occupies nothing
    pub fn size_in_bytes(&self) -> usize {
        match self {
            NativeType::Primitive(p) => p.size_in_bytes(),
            NativeType::Function(_) => 0,
        }
    }

    pub fn alignment_in_bytes_stack(&self, policy: &impl AlignmentPolicy) -> usize {
        match self {
            NativeType::Primitive(p) => p.alignment_in_bytes_stack(policy),
            NativeType::Function(_) => 1,
        }
    }

    pub fn alignment_in_bytes_field(&self, policy: &impl AlignmentPolicy) -> usize {
        match self {
            NativeType::Primitive(p) => p.alignment_in_bytes_field(policy),
            NativeType::Function(_) => 1,
        }
    }

    pub fn widen_to_4_bytes(&self) -> NativeType {
        match self {
            NativeType::Primitive(p) => NativeType::Primitive(p.widen_to_4_bytes()),
            NativeType::Function(_) => self.clone(),
        }
    }

    pub fn is_splittable(&self) -> bool {
        self.as_primitive().is_some_and(|p| p.is_splittable())
    }

    /// See [`NativePrimitiveType::split`]
    ///
    /// # Panics
    ///
    /// On signatures, non 8-byte primitives, or an index other than 0 or 1.
    pub fn split(&self, index: usize) -> NativePrimitiveType {
        match self {
            NativeType::Primitive(p) => p.split(index),
            NativeType::Function(_) => panic!("cannot split a function signature"),
        }
    }
}

impl From<NativePrimitiveType> for NativeType {
    fn from(p: NativePrimitiveType) -> Self {
        NativeType::Primitive(p)
    }
}
