//! Native types from foreign-type annotations

use crate::common::{AbiError, AbiResult};
use crate::frontend::{SourceType, SourceTypeKind};
use crate::target::Arch;
use crate::types::{NativeTypeZone, PrimitiveKind, TypeId};

/// Map an annotation to a native type interned in `zone`
///
/// Pointers and `IntPtr` become the target's word-sized signed integer.
/// Structs and unions fail with [`AbiError::UnsupportedNativeType`], as do
/// `Void` arguments and signatures passed without a `Pointer` wrapper.
pub fn from_source_type(
    zone: &mut NativeTypeZone,
    arch: Arch,
    ty: &SourceType,
) -> AbiResult<TypeId> {
    let kind = match &ty.kind {
        SourceTypeKind::Int8 => PrimitiveKind::Int8,
        SourceTypeKind::Int16 => PrimitiveKind::Int16,
        SourceTypeKind::Int32 => PrimitiveKind::Int32,
        SourceTypeKind::Int64 => PrimitiveKind::Int64,
        SourceTypeKind::Uint8 => PrimitiveKind::Uint8,
        SourceTypeKind::Uint16 => PrimitiveKind::Uint16,
        SourceTypeKind::Uint32 => PrimitiveKind::Uint32,
        SourceTypeKind::Uint64 => PrimitiveKind::Uint64,
        SourceTypeKind::Float => PrimitiveKind::Float,
        SourceTypeKind::Double => PrimitiveKind::Double,
        SourceTypeKind::Void => PrimitiveKind::Void,
        SourceTypeKind::IntPtr | SourceTypeKind::Pointer(_) => arch.word_kind(),

        SourceTypeKind::Function { params, return_type } => {
            let mut argument_types = Vec::with_capacity(params.len());
            for param in params {
                match &param.kind {
                    SourceTypeKind::Void => {
                        return Err(AbiError::unsupported(
                            "Void is only valid as a return type",
                            param.span,
                        ));
                    }
                    SourceTypeKind::Function { .. } => {
                        return Err(AbiError::unsupported(
                            "callbacks must be passed as Pointer<NativeFunction<...>>",
                            param.span,
                        ));
                    }
                    _ => argument_types.push(from_source_type(zone, arch, param)?),
                }
            }
            if return_type.is_function() {
                return Err(AbiError::unsupported(
                    "functions must return callbacks as Pointer<NativeFunction<...>>",
                    return_type.span,
                ));
            }
            let return_type = from_source_type(zone, arch, return_type)?;
            return Ok(zone.function(argument_types, return_type));
        }

        SourceTypeKind::Struct(_) => {
            return Err(AbiError::unsupported("struct types are not supported yet", ty.span));
        }
        SourceTypeKind::Union(_) => {
            return Err(AbiError::unsupported("union types are not supported yet", ty.span));
        }
    };
    Ok(zone.primitive(kind))
}
