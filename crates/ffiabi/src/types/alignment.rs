//! Alignment policy seam between the type table and target conventions

use super::PrimitiveKind;

/// Per-target alignment rules
///
/// Sizes are architecture independent, alignments are not: whether an
/// 8-byte value sits on a 4- or 8-byte boundary depends on the target's
/// calling convention and on whether it is passed on the stack or laid out
/// inside a composite. Implementations must be total over every kind and
/// must never return 0.
pub trait AlignmentPolicy {
    /// Alignment in bytes when passed on the call stack
    fn stack_alignment(&self, kind: PrimitiveKind, size_in_bytes: usize) -> usize;

    /// Alignment in bytes as a member of a composite
    fn field_alignment(&self, kind: PrimitiveKind, size_in_bytes: usize) -> usize;
}

impl<P: AlignmentPolicy + ?Sized> AlignmentPolicy for &P {
    fn stack_alignment(&self, kind: PrimitiveKind, size_in_bytes: usize) -> usize {
        (**self).stack_alignment(kind, size_in_bytes)
    }

    fn field_alignment(&self, kind: PrimitiveKind, size_in_bytes: usize) -> usize {
        (**self).field_alignment(kind, size_in_bytes)
    }
}
