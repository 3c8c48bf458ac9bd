//! Per-pass interning store for native types
//!
//! Every native type built during one compilation pass lives in a single
//! [`NativeTypeZone`]. Callers hold [`TypeId`] handles, never owned nodes;
//! dropping the zone at the end of the pass frees everything at once.
//!
//! Types are hash-consed: interning a structurally equal type twice yields
//! the same handle, which is how call sites discover that they share a
//! signature.

use std::fmt;

use indexmap::IndexSet;

use super::native_type::{NativeFunctionType, NativePrimitiveType, NativeType};
use super::primitive::PrimitiveKind;

/// Handle to a type interned in a [`NativeTypeZone`]
///
/// Only meaningful together with the zone that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    // Primitives are interned at fixed indices by `NativeTypeZone::new`,
    // in `PrimitiveKind` declaration order.
    pub const INT8: TypeId = TypeId::of(PrimitiveKind::Int8);
    pub const UINT8: TypeId = TypeId::of(PrimitiveKind::Uint8);
    pub const INT16: TypeId = TypeId::of(PrimitiveKind::Int16);
    pub const UINT16: TypeId = TypeId::of(PrimitiveKind::Uint16);
    pub const INT32: TypeId = TypeId::of(PrimitiveKind::Int32);
    pub const UINT32: TypeId = TypeId::of(PrimitiveKind::Uint32);
    pub const INT64: TypeId = TypeId::of(PrimitiveKind::Int64);
    pub const UINT64: TypeId = TypeId::of(PrimitiveKind::Uint64);
    pub const FLOAT: TypeId = TypeId::of(PrimitiveKind::Float);
    pub const DOUBLE: TypeId = TypeId::of(PrimitiveKind::Double);
    pub const HALF_DOUBLE: TypeId = TypeId::of(PrimitiveKind::HalfDouble);
    pub const VOID: TypeId = TypeId::of(PrimitiveKind::Void);

    /// First index handed out for non-primitive types
    pub const FIRST_DYNAMIC: u32 = PrimitiveKind::ALL.len() as u32;

    /// The reserved handle of a primitive kind
    pub const fn of(kind: PrimitiveKind) -> TypeId {
        TypeId(kind as u32)
    }

    /// Raw index, for debugging
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

/// Interning store owned by one compilation pass
///
/// Not shared: a pass that runs on another thread builds its own zone.
#[derive(Debug, Clone)]
pub struct NativeTypeZone {
    types: IndexSet<NativeType>,
}

impl NativeTypeZone {
    pub fn new() -> Self {
        let mut types = IndexSet::with_capacity(TypeId::FIRST_DYNAMIC as usize);
        for kind in PrimitiveKind::ALL {
            types.insert(NativeType::primitive(kind));
        }
        Self { types }
    }

    /// Intern `ty`, returning the existing handle if an equal type is present
    pub fn intern(&mut self, ty: NativeType) -> TypeId {
        if let NativeType::Function(sig) = &ty {
            for id in sig.argument_types().iter().copied().chain([sig.return_type()]) {
                assert!(self.contains(id), "type handle {} is not from this zone", id.0);
            }
        }
        let (index, _) = self.types.insert_full(ty);
        TypeId(index as u32)
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        TypeId::of(kind)
    }

    /// Intern the signature `(arguments) -> return_type`
    pub fn function(
        &mut self,
        argument_types: impl IntoIterator<Item = TypeId>,
        return_type: TypeId,
    ) -> TypeId {
        let sig = NativeFunctionType::new(argument_types.into_iter().collect(), return_type);
        self.intern(NativeType::Function(sig))
    }

    pub fn contains(&self, id: TypeId) -> bool {
        (id.0 as usize) < self.types.len()
    }

    /// Look up a handle
    ///
    /// # Panics
    ///
    /// If `id` was produced by a different zone and is out of range here.
    pub fn get(&self, id: TypeId) -> &NativeType {
        match self.types.get_index(id.0 as usize) {
            Some(ty) => ty,
            None => panic!("type handle {} is not from this zone", id.0),
        }
    }

    pub fn as_primitive(&self, id: TypeId) -> Option<NativePrimitiveType> {
        self.get(id).as_primitive()
    }

    pub fn as_function(&self, id: TypeId) -> Option<&NativeFunctionType> {
        self.get(id).as_function()
    }

    pub fn size_in_bytes(&self, id: TypeId) -> usize {
        self.get(id).size_in_bytes()
    }

    /// Handle of the widened type; widening only ever produces primitives,
    /// which are always interned
    pub fn widen_to_4_bytes(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            NativeType::Primitive(p) => TypeId::of(p.widen_to_4_bytes().kind()),
            NativeType::Function(_) => id,
        }
    }

    /// Handle of one half of a split type
    ///
    /// # Panics
    ///
    /// As [`NativeType::split`].
    pub fn split(&self, id: TypeId, index: usize) -> TypeId {
        TypeId::of(self.get(id).split(index).kind())
    }

    /// Structural equality
    pub fn equals(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (NativeType::Primitive(x), NativeType::Primitive(y)) => x == y,
            (NativeType::Function(x), NativeType::Function(y)) => {
                x.argument_types().len() == y.argument_types().len()
                    && x
                        .argument_types()
                        .iter()
                        .zip(y.argument_types())
                        .all(|(l, r)| self.equals(*l, *r))
                    && self.equals(x.return_type(), y.return_type())
            }
            _ => false,
        }
    }

    /// Canonical text of a type, e.g. `(int32, double) -> void`
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { zone: self, id }
    }

    pub fn render(&self, id: TypeId) -> String {
        self.display(id).to_string()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All interned types with their handles, in interning order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &NativeType)> {
        self.types.iter().enumerate().map(|(i, ty)| (TypeId(i as u32), ty))
    }
}

impl Default for NativeTypeZone {
    fn default() -> Self {
        Self::new()
    }
}

/// [`fmt::Display`] adapter returned by [`NativeTypeZone::display`]
#[derive(Clone, Copy)]
pub struct TypeDisplay<'z> {
    zone: &'z NativeTypeZone,
    id: TypeId,
}

impl TypeDisplay<'_> {
    fn fmt_nested(&self, id: TypeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.zone.get(id) {
            NativeType::Primitive(p) => write!(f, "{}", p),
            // Signatures in argument or return position are parenthesized
            // so the arrow stays unambiguous.
            NativeType::Function(_) => write!(f, "({})", self.zone.display(id)),
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.zone.get(self.id) {
            NativeType::Primitive(p) => write!(f, "{}", p),
            NativeType::Function(sig) => {
                f.write_str("(")?;
                for (i, arg) in sig.argument_types().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.fmt_nested(*arg, f)?;
                }
                f.write_str(") -> ")?;
                self.fmt_nested(sig.return_type(), f)
            }
        }
    }
}

impl fmt::Debug for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_primitives_are_preinterned() {
        let zone = NativeTypeZone::new();
        assert_eq!(zone.len(), PrimitiveKind::ALL.len());
        for kind in PrimitiveKind::ALL {
            let id = zone.primitive(kind);
            assert!(id.is_primitive());
            assert_eq!(zone.as_primitive(id).map(|p| p.kind()), Some(kind));
        }
    }

    #[test]
    fn test_intern_deduplicates() {
        let mut zone = NativeTypeZone::new();
        let a = zone.intern(NativeType::primitive(PrimitiveKind::Int32));
        assert_eq!(a, TypeId::INT32);

        let f = zone.function([TypeId::INT32, TypeId::DOUBLE], TypeId::VOID);
        let g = zone.function([TypeId::INT32, TypeId::DOUBLE], TypeId::VOID);
        assert_eq!(f, g);
        assert!(!f.is_primitive());
        assert_eq!(zone.len(), PrimitiveKind::ALL.len() + 1);
    }

    #[test]
    fn test_signature_queries() {
        let mut zone = NativeTypeZone::new();
        let f = zone.function([TypeId::UINT8], TypeId::INT64);
        let sig = zone.as_function(f).unwrap();

        assert_eq!(zone.size_in_bytes(sig.argument_types()[0]), 1);
        assert_eq!(zone.size_in_bytes(sig.return_type()), 8);
    }

    #[test]
    fn test_equals_is_structural() {
        let mut zone = NativeTypeZone::new();
        assert!(zone.equals(TypeId::INT32, TypeId::INT32));
        assert!(!zone.equals(TypeId::INT32, TypeId::UINT32));

        let f = zone.function([TypeId::INT32], TypeId::VOID);
        let g = zone.function([TypeId::INT32, TypeId::INT32], TypeId::VOID);
        let h = zone.function([TypeId::INT32], TypeId::FLOAT);
        assert!(zone.equals(f, f));
        assert!(!zone.equals(f, g));
        assert!(!zone.equals(g, f));
        assert!(!zone.equals(f, h));
        assert!(!zone.equals(f, TypeId::INT32));
        assert!(!zone.equals(TypeId::INT32, f));
    }

    #[test]
    fn test_equals_symmetric_over_all_pairs() {
        let mut zone = NativeTypeZone::new();
        zone.function([TypeId::INT8], TypeId::VOID);
        zone.function([], TypeId::DOUBLE);
        let ids: Vec<_> = zone.iter().map(|(id, _)| id).collect();
        for &a in &ids {
            assert!(zone.equals(a, a));
            for &b in &ids {
                assert_eq!(zone.equals(a, b), zone.equals(b, a));
            }
        }
    }

    #[test]
    fn test_render() {
        let mut zone = NativeTypeZone::new();
        let f = zone.function([TypeId::INT32, TypeId::DOUBLE], TypeId::VOID);
        assert_eq!(zone.render(f), "(int32, double) -> void");
        // Rendering is stable.
        assert_eq!(zone.render(f), zone.render(f));

        assert_eq!(zone.render(TypeId::HALF_DOUBLE), "half-double");
        let empty = zone.function([], TypeId::UINT64);
        assert_eq!(zone.render(empty), "() -> uint64");
    }

    #[test]
    fn test_render_nested_signature() {
        let mut zone = NativeTypeZone::new();
        let callback = zone.function([TypeId::INT32], TypeId::VOID);
        let f = zone.function([callback, TypeId::FLOAT], TypeId::INT8);
        assert_eq!(zone.render(f), "((int32) -> void, float) -> int8");
    }

    #[test]
    fn test_widen_and_split_handles() {
        let mut zone = NativeTypeZone::new();
        assert_eq!(zone.widen_to_4_bytes(TypeId::INT8), TypeId::INT32);
        assert_eq!(zone.widen_to_4_bytes(TypeId::UINT16), TypeId::UINT32);
        assert_eq!(zone.widen_to_4_bytes(TypeId::DOUBLE), TypeId::DOUBLE);
        assert_eq!(zone.widen_to_4_bytes(TypeId::VOID), TypeId::VOID);

        let f = zone.function([], TypeId::VOID);
        assert_eq!(zone.widen_to_4_bytes(f), f);

        assert_eq!(zone.split(TypeId::DOUBLE, 0), TypeId::HALF_DOUBLE);
        assert_eq!(zone.split(TypeId::DOUBLE, 1), TypeId::HALF_DOUBLE);
    }

    #[test]
    #[should_panic(expected = "cannot split a function signature")]
    fn test_split_signature_panics() {
        let mut zone = NativeTypeZone::new();
        let f = zone.function([], TypeId::VOID);
        zone.split(f, 0);
    }

    #[test]
    #[should_panic(expected = "not from this zone")]
    fn test_foreign_handle_panics() {
        let mut big = NativeTypeZone::new();
        let f = big.function([], TypeId::VOID);
        NativeTypeZone::new().get(f);
    }
}
