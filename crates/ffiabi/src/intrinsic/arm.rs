//! 32-bit ARM intrinsic registers (AAPCS: r4-r11 callee-saved)

use std::fmt;

use super::{IntrinsicAbi, IntrinsicInst, ReturnAddress};
use crate::target::Arch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    R0, R1, R2, R3, R4, R5, R6, R7,
    R8, R9, R10, R11,
    /// Intra-procedure scratch (r12)
    Ip,
    Sp,
    Lr,
    Pc,
}

pub const ABI_PRESERVED: &[Register] = &[
    Register::R4,
    Register::R5,
    Register::R6,
    Register::R7,
    Register::R8,
    Register::R9,
    Register::R10,
    Register::R11,
];

pub const CODE_REG: Register = Register::R6;
pub const ARGS_DESC_REG: Register = Register::R3;
pub const CALLEE_SAVED_TEMP: Register = Register::R8;
pub const CALLEE_SAVED_TEMP2: Register = Register::R10;
pub const LINK_REGISTER: Register = Register::Lr;

register_contract!();

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Ip => write!(f, "ip"),
            Register::Sp => write!(f, "sp"),
            Register::Lr => write!(f, "lr"),
            Register::Pc => write!(f, "pc"),
            other => write!(f, "r{}", *other as u8),
        }
    }
}

pub struct Arm;

impl IntrinsicAbi for Arm {
    type Register = Register;

    const ARCH: Arch = Arch::Arm;
    const CODE_REG: Register = CODE_REG;
    const ARGS_DESC_REG: Register = ARGS_DESC_REG;
    const CALLEE_SAVED_TEMP: Register = CALLEE_SAVED_TEMP;
    const CALLEE_SAVED_TEMP2: Register = CALLEE_SAVED_TEMP2;
    const RETURN_ADDRESS: ReturnAddress<Register> = ReturnAddress::Register(LINK_REGISTER);

    fn is_abi_preserved(reg: Register) -> bool {
        is_abi_preserved(reg)
    }

    fn parameter_slot_from_sp() -> isize {
        -1
    }

    fn format(inst: &IntrinsicInst<Register>) -> String {
        match inst {
            IntrinsicInst::Comment(text) => format!("    @ {}", text),
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
        assert_eq!(Register::R3.to_string(), "r3");
        assert_eq!(Register::R11.to_string(), "r11");
        assert_eq!(Register::Ip.to_string(), "ip");
    }

    #[test]
    fn test_move_syntax() {
        let mov = IntrinsicInst::Move { dst: Register::R8, src: Register::Lr };
        assert_eq!(Arm::format(&mov), "    mov r8, lr");
    }

    #[test]
    fn test_prologue_epilogue_text() {
        let mut asm = Assembler::<Arm>::new();
        let state = intrinsic_call_prologue(&mut asm);
        intrinsic_call_epilogue(&mut asm, &state);
        assert_eq!(
            asm.format(),
            "    @ IntrinsicCallPrologue\n\
             \x20   mov r8, lr\n\
             \x20   mov r10, r3\n\
             \x20   @ IntrinsicCallEpilogue\n\
             \x20   mov lr, r8\n\
             \x20   mov r3, r10\n"
        );
    }
}
