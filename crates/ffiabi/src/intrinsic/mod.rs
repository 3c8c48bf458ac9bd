//! Register preservation around inlined intrinsic fast paths
//!
//! An intrinsic is a hand-written fast path for a library call, emitted in
//! place of the normal call sequence. When the fast path gives up it falls
//! back to the general call, so it must not lose the return address or the
//! arguments descriptor on the way. On entry ([`intrinsic_call_prologue`])
//! both are copied into callee-saved scratch registers and before leaving
//! ([`intrinsic_call_epilogue`]) they are copied back. Only register moves
//! are emitted: the stack pointer never changes, so parameter slots stay
//! where [`IntrinsicAbi::parameter_slot_from_sp`] says they are. On x86 the
//! return address is already on the stack and is left there.
//!
//! The register choices are checked at compile time in each target module.

/// Preserved-set lookup and compile-time checks of a target's register roles
///
/// Expects `Register` (a fieldless `#[repr(u8)]` enum), `ABI_PRESERVED`,
/// `CODE_REG`, `ARGS_DESC_REG`, `CALLEE_SAVED_TEMP` and `CALLEE_SAVED_TEMP2`
/// in the invoking module.
macro_rules! register_contract {
    () => {
        pub const fn is_abi_preserved(reg: Register) -> bool {
            let mut i = 0;
            while i < ABI_PRESERVED.len() {
                if ABI_PRESERVED[i] as u8 == reg as u8 {
                    return true;
                }
                i += 1;
            }
            false
        }

        const _: () = {
            const fn distinct(a: Register, b: Register) -> bool {
                a as u8 != b as u8
            }

            assert!(is_abi_preserved(CODE_REG));
            assert!(!is_abi_preserved(ARGS_DESC_REG));
            assert!(is_abi_preserved(CALLEE_SAVED_TEMP));
            assert!(is_abi_preserved(CALLEE_SAVED_TEMP2));
            assert!(distinct(CALLEE_SAVED_TEMP, CALLEE_SAVED_TEMP2));
            assert!(distinct(CALLEE_SAVED_TEMP, CODE_REG));
            assert!(distinct(CALLEE_SAVED_TEMP2, CODE_REG));
            assert!(distinct(CALLEE_SAVED_TEMP, ARGS_DESC_REG));
            assert!(distinct(CALLEE_SAVED_TEMP2, ARGS_DESC_REG));
        };
    };
}

pub mod arm;
pub mod arm64;
pub mod ia32;
pub mod x64;

use std::fmt;
use std::marker::PhantomData;

use crate::target::Arch;

pub use arm::Arm;
pub use arm64::Arm64;
pub use ia32::Ia32;
pub use x64::X64;

/// Where a call leaves its return address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnAddress<R> {
    /// In a link register
    Register(R),
    /// On top of the stack
    Stack,
}

/// The few instructions the prologue and epilogue need
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntrinsicInst<R> {
    Comment(String),
    Move { dst: R, src: R },
}

/// One target's register assignment for intrinsic code
pub trait IntrinsicAbi {
    type Register: Copy + Eq + fmt::Display + fmt::Debug;

    const ARCH: Arch;
    /// Holds the code object being executed; preserved by calls
    const CODE_REG: Self::Register;
    /// Holds the arguments descriptor; clobbered by calls
    const ARGS_DESC_REG: Self::Register;
    /// Receives the return address inside the fast path when it arrives in
    /// a link register; reserved but unused on x86
    const CALLEE_SAVED_TEMP: Self::Register;
    /// Receives the arguments descriptor inside the fast path
    const CALLEE_SAVED_TEMP2: Self::Register;
    const RETURN_ADDRESS: ReturnAddress<Self::Register>;

    /// Whether the native calling convention preserves `reg` across calls
    fn is_abi_preserved(reg: Self::Register) -> bool;

    /// Stack slot of the first parameter relative to SP, valid on entry and
    /// throughout the fast path
    fn parameter_slot_from_sp() -> isize;

    /// Assembly text of one instruction
    fn format(inst: &IntrinsicInst<Self::Register>) -> String;
}

/// Instruction buffer for one target
pub struct Assembler<A: IntrinsicAbi> {
    instructions: Vec<IntrinsicInst<A::Register>>,
    _abi: PhantomData<A>,
}

impl<A: IntrinsicAbi> Assembler<A> {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
            _abi: PhantomData,
        }
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.instructions.push(IntrinsicInst::Comment(text.into()));
    }

    pub fn mov(&mut self, dst: A::Register, src: A::Register) {
        self.instructions.push(IntrinsicInst::Move { dst, src });
    }

    pub fn instructions(&self) -> &[IntrinsicInst<A::Register>] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Format as assembly text, one instruction per line
    pub fn format(&self) -> String {
        let mut result = String::new();
        for inst in &self.instructions {
            result.push_str(&A::format(inst));
            result.push('\n');
        }
        result
    }
}

impl<A: IntrinsicAbi> Default for Assembler<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that a prologue has been emitted on the current path
///
/// Emitting an epilogue requires one, so code generation cannot restore
/// registers it never saved.
#[must_use = "the fast path must be closed with intrinsic_call_epilogue"]
pub struct IntrinsicState<A: IntrinsicAbi> {
    _abi: PhantomData<A>,
}

/// Enter the fast path: copy the arguments descriptor, and the return
/// address when it is in a link register, into the callee-saved temporaries
pub fn intrinsic_call_prologue<A: IntrinsicAbi>(assembler: &mut Assembler<A>) -> IntrinsicState<A> {
    assembler.comment("IntrinsicCallPrologue");
    if let ReturnAddress::Register(link) = A::RETURN_ADDRESS {
        assembler.mov(A::CALLEE_SAVED_TEMP, link);
    }
    assembler.mov(A::CALLEE_SAVED_TEMP2, A::ARGS_DESC_REG);
    IntrinsicState { _abi: PhantomData }
}

/// Undo [`intrinsic_call_prologue`] before falling back to the general call
/// sequence or returning
///
/// May be emitted once per exit path of the fast path.
pub fn intrinsic_call_epilogue<A: IntrinsicAbi>(
    assembler: &mut Assembler<A>,
    _inside: &IntrinsicState<A>,
) {
    assembler.comment("IntrinsicCallEpilogue");
    if let ReturnAddress::Register(link) = A::RETURN_ADDRESS {
        assembler.mov(link, A::CALLEE_SAVED_TEMP);
    }
    assembler.mov(A::ARGS_DESC_REG, A::CALLEE_SAVED_TEMP2);
}

/// A broken register contract
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("code object register {0} is not preserved across calls")]
    CodeRegNotPreserved(String),
    #[error("arguments descriptor register {0} is preserved across calls")]
    ArgsDescPreserved(String),
    #[error("scratch register {0} is not callee-saved")]
    TempNotPreserved(String),
    #[error("register {0} has two roles")]
    Aliased(String),
}

/// Check the contract of `A` at run time
///
/// The target modules assert the same facts at compile time; this form
/// exists so tests and tools can enumerate every target.
pub fn verify_contract<A: IntrinsicAbi>() -> Result<(), ContractViolation> {
    if !A::is_abi_preserved(A::CODE_REG) {
        return Err(ContractViolation::CodeRegNotPreserved(A::CODE_REG.to_string()));
    }
    if A::is_abi_preserved(A::ARGS_DESC_REG) {
        return Err(ContractViolation::ArgsDescPreserved(A::ARGS_DESC_REG.to_string()));
    }
    for temp in [A::CALLEE_SAVED_TEMP, A::CALLEE_SAVED_TEMP2] {
        if !A::is_abi_preserved(temp) {
            return Err(ContractViolation::TempNotPreserved(temp.to_string()));
        }
    }
    let roles = [A::CODE_REG, A::ARGS_DESC_REG, A::CALLEE_SAVED_TEMP, A::CALLEE_SAVED_TEMP2];
    for (i, a) in roles.iter().enumerate() {
        if roles[i + 1..].contains(a) {
            return Err(ContractViolation::Aliased(a.to_string()));
        }
    }
    if let ReturnAddress::Register(link) = A::RETURN_ADDRESS {
        if roles.contains(&link) {
            return Err(ContractViolation::Aliased(link.to_string()));
        }
    }
    Ok(())
}

/// Register names of one target's contract, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrinsicContract {
    pub arch: Arch,
    pub code_reg: String,
    pub args_desc_reg: String,
    pub callee_saved_temp: String,
    pub callee_saved_temp2: String,
    /// `None` when the return address is on the stack
    pub link_reg: Option<String>,
    pub parameter_slot_from_sp: isize,
}

impl IntrinsicContract {
    fn of<A: IntrinsicAbi>() -> Self {
        Self {
            arch: A::ARCH,
            code_reg: A::CODE_REG.to_string(),
            args_desc_reg: A::ARGS_DESC_REG.to_string(),
            callee_saved_temp: A::CALLEE_SAVED_TEMP.to_string(),
            callee_saved_temp2: A::CALLEE_SAVED_TEMP2.to_string(),
            link_reg: match A::RETURN_ADDRESS {
                ReturnAddress::Register(link) => Some(link.to_string()),
                ReturnAddress::Stack => None,
            },
            parameter_slot_from_sp: A::parameter_slot_from_sp(),
        }
    }
}

impl fmt::Display for IntrinsicContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "code object:          {}", self.code_reg)?;
        writeln!(f, "arguments descriptor: {}", self.args_desc_reg)?;
        match &self.link_reg {
            Some(link) => writeln!(f, "return address:       {} -> {}", link, self.callee_saved_temp)?,
            None => writeln!(f, "return address:       stays at [sp]")?,
        }
        writeln!(f, "descriptor saved in:  {}", self.callee_saved_temp2)?;
        write!(f, "parameter slot:       sp[{}]", self.parameter_slot_from_sp)
    }
}

/// Prologue and epilogue text for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrinsicListing {
    pub prologue: String,
    pub epilogue: String,
}

fn listing<A: IntrinsicAbi>() -> IntrinsicListing {
    let mut prologue = Assembler::<A>::new();
    let inside = intrinsic_call_prologue(&mut prologue);
    let mut epilogue = Assembler::<A>::new();
    intrinsic_call_epilogue(&mut epilogue, &inside);
    IntrinsicListing {
        prologue: prologue.format(),
        epilogue: epilogue.format(),
    }
}

impl Arch {
    pub fn intrinsic_contract(&self) -> IntrinsicContract {
        match self {
            Arch::Ia32 => IntrinsicContract::of::<Ia32>(),
            Arch::X64 => IntrinsicContract::of::<X64>(),
            Arch::Arm => IntrinsicContract::of::<Arm>(),
            Arch::Arm64 => IntrinsicContract::of::<Arm64>(),
        }
    }

    pub fn intrinsic_listing(&self) -> IntrinsicListing {
        match self {
            Arch::Ia32 => listing::<Ia32>(),
            Arch::X64 => listing::<X64>(),
            Arch::Arm => listing::<Arm>(),
            Arch::Arm64 => listing::<Arm64>(),
        }
    }

    pub fn verify_intrinsic_contract(&self) -> Result<(), ContractViolation> {
        match self {
            Arch::Ia32 => verify_contract::<Ia32>(),
            Arch::X64 => verify_contract::<X64>(),
            Arch::Arm => verify_contract::<Arm>(),
            Arch::Arm64 => verify_contract::<Arm64>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_target_honours_contract() {
        for arch in Arch::ALL {
            assert_eq!(arch.verify_intrinsic_contract(), Ok(()), "{arch}");
        }
    }

    #[test]
    fn test_contract_names_target() {
        for arch in Arch::ALL {
            let contract = arch.intrinsic_contract();
            assert_eq!(contract.arch, arch);
            assert_ne!(contract.callee_saved_temp, contract.callee_saved_temp2);
        }
    }

    #[test]
    fn test_prologue_and_epilogue_are_inverse() {
        let mut asm = Assembler::<Arm64>::new();
        let inside = intrinsic_call_prologue(&mut asm);
        let prologue_len = asm.len();
        intrinsic_call_epilogue(&mut asm, &inside);

        let insts = asm.instructions();
        assert_eq!(insts.len(), prologue_len * 2);
        for (save, restore) in insts[1..prologue_len].iter().zip(&insts[prologue_len + 1..]) {
            let (IntrinsicInst::Move { dst: d1, src: s1 }, IntrinsicInst::Move { dst: d2, src: s2 }) =
                (save, restore)
            else {
                panic!("expected moves, got {:?} / {:?}", save, restore);
            };
            assert_eq!((d1, s1), (s2, d2));
        }
    }

    #[test]
    fn test_stack_return_address_stays_in_place() {
        let mut asm = Assembler::<X64>::new();
        let inside = intrinsic_call_prologue(&mut asm);
        intrinsic_call_epilogue(&mut asm, &inside);
        assert_eq!(
            &asm.instructions()[1..],
            &[
                IntrinsicInst::Move { dst: X64::CALLEE_SAVED_TEMP2, src: X64::ARGS_DESC_REG },
                IntrinsicInst::Comment("IntrinsicCallEpilogue".to_string()),
                IntrinsicInst::Move { dst: X64::ARGS_DESC_REG, src: X64::CALLEE_SAVED_TEMP2 },
            ]
        );
    }

    /// The frame never moves SP, so the parameter slot reported for entry
    /// holds inside the fast path: one slot lower when no return address
    /// sits on the stack.
    fn assert_parameter_slot_is_stable<A: IntrinsicAbi>(stack_pointer: &str) {
        let mut asm = Assembler::<A>::new();
        let state = intrinsic_call_prologue(&mut asm);
        intrinsic_call_epilogue(&mut asm, &state);
        for inst in asm.instructions() {
            if let IntrinsicInst::Move { dst, src } = inst {
                assert_ne!(dst.to_string(), stack_pointer, "{}", A::ARCH);
                assert_ne!(src.to_string(), stack_pointer, "{}", A::ARCH);
            }
        }
        let expected = match A::RETURN_ADDRESS {
            ReturnAddress::Register(_) => -1,
            ReturnAddress::Stack => 0,
        };
        assert_eq!(A::parameter_slot_from_sp(), expected, "{}", A::ARCH);
    }

    #[test]
    fn test_parameter_slot_matches_emitted_frame() {
        assert_parameter_slot_is_stable::<Ia32>("esp");
        assert_parameter_slot_is_stable::<X64>("rsp");
        assert_parameter_slot_is_stable::<Arm>("sp");
        assert_parameter_slot_is_stable::<Arm64>("sp");
    }

    #[test]
    fn test_epilogue_may_close_several_exits() {
        let mut asm = Assembler::<Ia32>::new();
        let inside = intrinsic_call_prologue(&mut asm);
        intrinsic_call_epilogue(&mut asm, &inside);
        intrinsic_call_epilogue(&mut asm, &inside);
        assert_eq!(asm.len(), 6);
    }

    /// A deliberately broken target to exercise the runtime check
    struct Broken;

    impl IntrinsicAbi for Broken {
        type Register = u8;
        const ARCH: Arch = Arch::Arm64;
        const CODE_REG: u8 = 1;
        const ARGS_DESC_REG: u8 = 2;
        const CALLEE_SAVED_TEMP: u8 = 1;
        const CALLEE_SAVED_TEMP2: u8 = 3;
        const RETURN_ADDRESS: ReturnAddress<u8> = ReturnAddress::Stack;

        fn is_abi_preserved(reg: u8) -> bool {
            reg != 2
        }

        fn parameter_slot_from_sp() -> isize {
            0
        }

        fn format(inst: &IntrinsicInst<u8>) -> String {
            format!("{:?}", inst)
        }
    }

    #[test]
    fn test_aliased_temp_is_reported() {
        assert_eq!(
            verify_contract::<Broken>(),
            Err(ContractViolation::Aliased("1".to_string()))
        );
    }
}
