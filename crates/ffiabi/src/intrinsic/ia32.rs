//! 32-bit x86 intrinsic registers (cdecl: ebx, esi, edi, ebp callee-saved)

use std::fmt;

use super::{IntrinsicAbi, IntrinsicInst, ReturnAddress};
use crate::target::Arch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    Eax,
    Ecx,
    Edx,
    Ebx,
    Esp,
    Ebp,
    Esi,
    Edi,
}

pub const ABI_PRESERVED: &[Register] = &[Register::Ebx, Register::Ebp, Register::Esi, Register::Edi];

pub const CODE_REG: Register = Register::Edi;
pub const ARGS_DESC_REG: Register = Register::Edx;
pub const CALLEE_SAVED_TEMP: Register = Register::Ebx;
pub const CALLEE_SAVED_TEMP2: Register = Register::Esi;

register_contract!();

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::Eax => "eax",
            Register::Ecx => "ecx",
            Register::Edx => "edx",
            Register::Ebx => "ebx",
            Register::Esp => "esp",
            Register::Ebp => "ebp",
            Register::Esi => "esi",
            Register::Edi => "edi",
        };
        write!(f, "{}", name)
    }
}

pub struct Ia32;

impl IntrinsicAbi for Ia32 {
    type Register = Register;

    const ARCH: Arch = Arch::Ia32;
    const CODE_REG: Register = CODE_REG;
    const ARGS_DESC_REG: Register = ARGS_DESC_REG;
    const CALLEE_SAVED_TEMP: Register = CALLEE_SAVED_TEMP;
    const CALLEE_SAVED_TEMP2: Register = CALLEE_SAVED_TEMP2;
    const RETURN_ADDRESS: ReturnAddress<Register> = ReturnAddress::Stack;

    fn is_abi_preserved(reg: Register) -> bool {
        is_abi_preserved(reg)
    }

    fn parameter_slot_from_sp() -> isize {
        0
    }

    fn format(inst: &IntrinsicInst<Register>) -> String {
        match inst {
            IntrinsicInst::Comment(text) => format!("    # {}", text),
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
    fn test_prologue_epilogue_text() {
        let mut asm = Assembler::<Ia32>::new();
        let state = intrinsic_call_prologue(&mut asm);
        intrinsic_call_epilogue(&mut asm, &state);
        assert_eq!(
            asm.format(),
            "    # IntrinsicCallPrologue\n\
             \x20   mov esi, edx\n\
             \x20   # IntrinsicCallEpilogue\n\
             \x20   mov edx, esi\n"
        );
    }

    #[test]
    fn test_parameter_slot() {
        assert_eq!(Ia32::parameter_slot_from_sp(), 0);
    }
}
