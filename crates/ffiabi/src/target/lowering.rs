//! Per-argument lowering plan for a native signature
//!
//! Decides which parts every argument and the result occupy after widening
//! and splitting. Assigning those parts to registers or stack slots is the
//! call-sequence generator's job.

use super::Arch;
use crate::types::{NativeType, NativeTypeZone, TypeId};

/// How one value of a signature is lowered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentLowering {
    /// Type as declared in the signature
    pub declared: TypeId,
    /// Declared type widened to at least 4 bytes
    pub widened: TypeId,
    /// Locations the value occupies, low half first when split.
    /// Empty for `void`.
    pub parts: Vec<TypeId>,
}

impl ArgumentLowering {
    pub fn is_split(&self) -> bool {
        self.parts.len() == 2
    }

    pub fn is_widened(&self) -> bool {
        self.declared != self.widened
    }
}

/// Lowering of a whole signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweringPlan {
    pub arch: Arch,
    pub arguments: Vec<ArgumentLowering>,
    pub result: ArgumentLowering,
}

impl LoweringPlan {
    /// Number of locations needed for all arguments
    pub fn argument_locations(&self) -> usize {
        self.arguments.iter().map(|a| a.parts.len()).sum()
    }
}

impl Arch {
    /// Lower one value for this target
    pub fn lower_value(&self, zone: &NativeTypeZone, declared: TypeId) -> ArgumentLowering {
        let widened = zone.widen_to_4_bytes(declared);
        let ty = zone.get(widened);
        let parts = if ty.is_void() {
            Vec::new()
        } else if self.needs_split(ty) {
            vec![zone.split(widened, 0), zone.split(widened, 1)]
        } else {
            vec![widened]
        };
        ArgumentLowering { declared, widened, parts }
    }

    /// Lower every argument and the result of signature `sig`
    ///
    /// # Panics
    ///
    /// If `sig` is not a function signature.
    pub fn lower_signature(&self, zone: &NativeTypeZone, sig: TypeId) -> LoweringPlan {
        let NativeType::Function(function) = zone.get(sig) else {
            panic!("cannot lower {}: not a function signature", zone.display(sig));
        };
        LoweringPlan {
            arch: *self,
            arguments: function
                .argument_types()
                .iter()
                .map(|arg| self.lower_value(zone, *arg))
                .collect(),
            result: self.lower_value(zone, function.return_type()),
        }
    }
}
