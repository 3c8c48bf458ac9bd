//! x86-64 intrinsic registers
//!
//! System V convention: rbx, rbp and r12-r15 are callee-saved. `call`
//! leaves the return address on top of the stack, where it stays for the
//! whole fast path; only the arguments descriptor is moved aside.

use std::fmt;

use super::{IntrinsicAbi, IntrinsicInst, ReturnAddress};
use crate::target::Arch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    Rax, Rcx, Rdx, Rbx, Rsp, Rbp, Rsi, Rdi,
    R8, R9, R10, R11, R12, R13, R14, R15,
}

pub const ABI_PRESERVED: &[Register] = &[
    Register::Rbx,
    Register::Rbp,
    Register::R12,
    Register::R13,
    Register::R14,
    Register::R15,
];

pub const CODE_REG: Register = Register::R12;
pub const ARGS_DESC_REG: Register = Register::R10;
pub const CALLEE_SAVED_TEMP: Register = Register::Rbx;
pub const CALLEE_SAVED_TEMP2: Register = Register::R13;

register_contract!();

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::Rax => "rax",
            Register::Rcx => "rcx",
            Register::Rdx => "rdx",
            Register::Rbx => "rbx",
            Register::Rsp => "rsp",
            Register::Rbp => "rbp",
            Register::Rsi => "rsi",
            Register::Rdi => "rdi",
            Register::R8 => "r8",
            Register::R9 => "r9",
            Register::R10 => "r10",
            Register::R11 => "r11",
            Register::R12 => "r12",
            Register::R13 => "r13",
            Register::R14 => "r14",
            Register::R15 => "r15",
        };
        write!(f, "{}", name)
    }
}

pub struct X64;

impl IntrinsicAbi for X64 {
    type Register = Register;

    const ARCH: Arch = Arch::X64;
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
    fn test_preserved_set() {
        assert!(is_abi_preserved(Register::Rbx));
        assert!(is_abi_preserved(Register::R15));
        assert!(!is_abi_preserved(Register::Rdi));
        assert!(!is_abi_preserved(Register::R11));
    }

    #[test]
    fn test_prologue_epilogue_text() {
        let mut asm = Assembler::<X64>::new();
        let state = intrinsic_call_prologue(&mut asm);
        intrinsic_call_epilogue(&mut asm, &state);
        assert_eq!(
            asm.format(),
            "    # IntrinsicCallPrologue\n\
             \x20   mov r13, r10\n\
             \x20   # IntrinsicCallEpilogue\n\
             \x20   mov r10, r13\n"
        );
    }
}
