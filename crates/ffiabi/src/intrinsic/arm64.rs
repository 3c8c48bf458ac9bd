//! AArch64 intrinsic registers
//!
//! Native convention is AAPCS64: x19-x28 and the frame pointer are
//! callee-saved. The return address arrives in the link register.

use std::fmt;

use super::{IntrinsicAbi, IntrinsicInst, ReturnAddress};
use crate::target::Arch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    R0, R1, R2, R3, R4, R5, R6, R7,
    R8, R9, R10, R11, R12, R13, R14, R15,
    R16, R17, R18, R19, R20, R21, R22, R23,
    R24, R25, R26, R27, R28,
    /// Frame pointer (x29)
    Fp,
    /// Link register (x30)
    Lr,
    Sp,
}

pub const ABI_PRESERVED: &[Register] = &[
    Register::R19,
    Register::R20,
    Register::R21,
    Register::R22,
    Register::R23,
    Register::R24,
    Register::R25,
    Register::R26,
    Register::R27,
    Register::R28,
    Register::Fp,
];

pub const CODE_REG: Register = Register::R24;
pub const ARGS_DESC_REG: Register = Register::R4;
pub const CALLEE_SAVED_TEMP: Register = Register::R19;
pub const CALLEE_SAVED_TEMP2: Register = Register::R20;
pub const LINK_REGISTER: Register = Register::Lr;

register_contract!();

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Fp => write!(f, "fp"),
            Register::Lr => write!(f, "lr"),
            Register::Sp => write!(f, "sp"),
            other => write!(f, "x{}", *other as u8),
        }
    }
}

pub struct Arm64;

impl IntrinsicAbi for Arm64 {
    type Register = Register;

    const ARCH: Arch = Arch::Arm64;
    const CODE_REG: Register = CODE_REG;
    const ARGS_DESC_REG: Register = ARGS_DESC_REG;
    const CALLEE_SAVED_TEMP: Register = CALLEE_SAVED_TEMP;
    const CALLEE_SAVED_TEMP2: Register = CALLEE_SAVED_TEMP2;
    const RETURN_ADDRESS: ReturnAddress<Register> = ReturnAddress::Register(LINK_REGISTER);

    fn is_abi_preserved(reg: Register) -> bool {
        is_abi_preserved(reg)
    }

    /// The return address is not on the stack, so the first parameter sits
    /// one slot below where it would on x86
    fn parameter_slot_from_sp() -> isize {
        -1
    }

    fn format(inst: &IntrinsicInst<Register>) -> String {
        match inst {
            IntrinsicInst::Comment(text) => format!("    // {}", text),
            IntrinsicInst::Move { dst, src } => format!("    mov {}, {}", dst, src),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrinsic::{intrinsic_call_epilogue, intrinsic_call_prologue, Assembler};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_names() {
        assert_eq!(Register::R0.to_string(), "x0");
        assert_eq!(Register::R28.to_string(), "x28");
        assert_eq!(Register::Fp.to_string(), "fp");
        assert_eq!(Register::Lr.to_string(), "lr");
    }

    #[test]
    fn test_preserved_set() {
        assert!(is_abi_preserved(Register::R19));
        assert!(is_abi_preserved(Register::R28));
        assert!(!is_abi_preserved(Register::R18));
        assert!(!is_abi_preserved(Register::Lr));
    }

    #[test]
    fn test_prologue_epilogue_text() {
        let mut asm = Assembler::<Arm64>::new();
        let state = intrinsic_call_prologue(&mut asm);
        intrinsic_call_epilogue(&mut asm, &state);
        assert_eq!(
            asm.format(),
            "    // IntrinsicCallPrologue\n\
             \x20   mov x19, lr\n\
             \x20   mov x20, x4\n\
             \x20   // IntrinsicCallEpilogue\n\
             \x20   mov lr, x19\n\
             \x20   mov x4, x20\n"
        );
    }
}
