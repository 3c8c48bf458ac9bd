//! Primitive native kinds and their fixed classification table

use std::fmt;

/// Every primitive a calling convention talks about
///
/// Pointers are not here: they are lowered to word-sized integers before
/// they reach this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
    /// One 32-bit half of a double that is split over two locations
    HalfDouble,
    Void,
}

/// Size and kind predicates of one primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub size_in_bytes: usize,
    pub is_int: bool,
    pub is_float: bool,
    pub is_signed: bool,
    pub is_void: bool,
}

impl Classification {
    const fn int(size_in_bytes: usize, is_signed: bool) -> Self {
        Self { size_in_bytes, is_int: true, is_float: false, is_signed, is_void: false }
    }

    const fn float(size_in_bytes: usize, is_signed: bool) -> Self {
        Self { size_in_bytes, is_int: false, is_float: true, is_signed, is_void: false }
    }
}

/// Classify a primitive kind
///
/// No wildcard arm: a new kind must get a row here before anything compiles.
pub const fn classify(kind: PrimitiveKind) -> Classification {
    match kind {
        PrimitiveKind::Int8 => Classification::int(1, true),
        PrimitiveKind::Uint8 => Classification::int(1, false),
        PrimitiveKind::Int16 => Classification::int(2, true),
        PrimitiveKind::Uint16 => Classification::int(2, false),
        PrimitiveKind::Int32 => Classification::int(4, true),
        PrimitiveKind::Uint32 => Classification::int(4, false),
        PrimitiveKind::Int64 => Classification::int(8, true),
        PrimitiveKind::Uint64 => Classification::int(8, false),
        // IEEE floats carry a sign bit.
        PrimitiveKind::Float => Classification::float(4, true),
        PrimitiveKind::Double => Classification::float(8, true),
        // Raw bits of one half, the sign lives in the high half only.
        PrimitiveKind::HalfDouble => Classification::float(4, false),
        PrimitiveKind::Void => Classification {
            size_in_bytes: 0,
            is_int: false,
            is_float: false,
            is_signed: false,
            is_void: true,
        },
    }
}

impl PrimitiveKind {
    /// All kinds, in declaration order
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Int8,
        PrimitiveKind::Uint8,
        PrimitiveKind::Int16,
        PrimitiveKind::Uint16,
        PrimitiveKind::Int32,
        PrimitiveKind::Uint32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::HalfDouble,
        PrimitiveKind::Void,
    ];

    pub const fn classify(self) -> Classification {
        classify(self)
    }

    pub const fn size_in_bytes(self) -> usize {
        classify(self).size_in_bytes
    }

    pub const fn is_int(self) -> bool {
        classify(self).is_int
    }

    pub const fn is_float(self) -> bool {
        classify(self).is_float
    }

    pub const fn is_signed(self) -> bool {
        classify(self).is_signed
    }

    pub const fn is_void(self) -> bool {
        classify(self).is_void
    }

    /// Canonical lower-case name used in rendered signatures
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::HalfDouble => "half-double",
            PrimitiveKind::Void => "void",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_rows() {
        use PrimitiveKind::*;
        // (kind, size, int, float, signed, void)
        let rows = [
            (Int8, 1, true, false, true, false),
            (Uint8, 1, true, false, false, false),
            (Int16, 2, true, false, true, false),
            (Uint16, 2, true, false, false, false),
            (Int32, 4, true, false, true, false),
            (Uint32, 4, true, false, false, false),
            (Int64, 8, true, false, true, false),
            (Uint64, 8, true, false, false, false),
            (Float, 4, false, true, true, false),
            (Double, 8, false, true, true, false),
            (HalfDouble, 4, false, true, false, false),
            (Void, 0, false, false, false, true),
        ];
        assert_eq!(rows.len(), PrimitiveKind::ALL.len());

        for (kind, size, is_int, is_float, is_signed, is_void) in rows {
            let expected = Classification { size_in_bytes: size, is_int, is_float, is_signed, is_void };
            assert_eq!(classify(kind), expected, "{kind}");
            // Pure lookup, repeated calls agree.
            assert_eq!(classify(kind), classify(kind));
        }
    }

    #[test]
    fn test_int16_and_void() {
        let c = classify(PrimitiveKind::Int16);
        assert_eq!(c.size_in_bytes, 2);
        assert!(c.is_int);
        assert!(c.is_signed);

        let v = classify(PrimitiveKind::Void);
        assert_eq!(v.size_in_bytes, 0);
        assert!(v.is_void);
        assert!(!v.is_int && !v.is_float);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = PrimitiveKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PrimitiveKind::ALL.len());
        assert_eq!(PrimitiveKind::HalfDouble.to_string(), "half-double");
    }
}
