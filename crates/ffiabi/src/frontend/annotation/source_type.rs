//! Source-level foreign-type descriptors
//!
//! These are what the host type system hands to the native type factory:
//! one node per annotation, each with the span it was written at so an
//! unsupported shape can be reported against the user's declaration.

use std::fmt;

use string_interner::{DefaultStringInterner, DefaultSymbol};

use crate::common::Span;

/// Interned struct and union names
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    interner: DefaultStringInterner,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> DefaultSymbol {
        self.interner.get_or_intern(name)
    }

    pub fn resolve(&self, symbol: DefaultSymbol) -> &str {
        self.interner.resolve(symbol).unwrap_or("<unknown>")
    }

    pub fn len(&self) -> usize {
        self.interner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interner.is_empty()
    }
}

/// A foreign-type annotation
#[derive(Debug, Clone, PartialEq)]
pub struct SourceType {
    pub kind: SourceTypeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceTypeKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    /// Pointer-sized signed integer
    IntPtr,
    Float,
    Double,
    Void,
    /// Address of a native value
    Pointer(Box<SourceType>),
    /// `Return Function(Params...)`
    Function {
        params: Vec<SourceType>,
        return_type: Box<SourceType>,
    },
    Struct(DefaultSymbol),
    Union(DefaultSymbol),
}

impl SourceType {
    pub fn new(kind: SourceTypeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SourceTypeKind::Function { .. })
    }

    /// Whether this names a struct or union
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, SourceTypeKind::Struct(_) | SourceTypeKind::Union(_))
    }

    /// Render back in annotation syntax
    pub fn display<'a>(&'a self, names: &'a NameTable) -> SourceTypeDisplay<'a> {
        SourceTypeDisplay { ty: self, names }
    }
}

/// [`fmt::Display`] adapter returned by [`SourceType::display`]
pub struct SourceTypeDisplay<'a> {
    ty: &'a SourceType,
    names: &'a NameTable,
}

impl fmt::Display for SourceTypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names;
        match &self.ty.kind {
            SourceTypeKind::Int8 => f.write_str("Int8"),
            SourceTypeKind::Int16 => f.write_str("Int16"),
            SourceTypeKind::Int32 => f.write_str("Int32"),
            SourceTypeKind::Int64 => f.write_str("Int64"),
            SourceTypeKind::Uint8 => f.write_str("Uint8"),
            SourceTypeKind::Uint16 => f.write_str("Uint16"),
            SourceTypeKind::Uint32 => f.write_str("Uint32"),
            SourceTypeKind::Uint64 => f.write_str("Uint64"),
            SourceTypeKind::IntPtr => f.write_str("IntPtr"),
            SourceTypeKind::Float => f.write_str("Float"),
            SourceTypeKind::Double => f.write_str("Double"),
            SourceTypeKind::Void => f.write_str("Void"),
            SourceTypeKind::Pointer(inner) => {
                if inner.is_function() {
                    write!(f, "Pointer<NativeFunction<{}>>", inner.display(names))
                } else {
                    write!(f, "Pointer<{}>", inner.display(names))
                }
            }
            SourceTypeKind::Function { params, return_type } => {
                write!(f, "{} Function(", return_type.display(names))?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", param.display(names))?;
                }
                f.write_str(")")
            }
            SourceTypeKind::Struct(name) => write!(f, "Struct {}", names.resolve(*name)),
            SourceTypeKind::Union(name) => write!(f, "Union {}", names.resolve(*name)),
        }
    }
}
