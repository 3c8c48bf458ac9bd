//! Target architectures and their calling convention facts
//!
//! Each supported architecture answers three questions for the type layer:
//! how wide a machine word is, how primitives are aligned, and which values
//! do not fit one location and must be split.

mod lowering;

pub use lowering::{ArgumentLowering, LoweringPlan};

use std::fmt;
use std::str::FromStr;

use crate::types::{AlignmentPolicy, NativeType, PrimitiveKind};

/// Supported target architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 32-bit x86, System V i386 convention
    Ia32,
    /// x86-64, System V AMD64 convention
    X64,
    /// 32-bit ARM, AAPCS (EABI)
    Arm,
    /// AArch64, AAPCS64
    Arm64,
}

impl Arch {
    pub const ALL: [Arch; 4] = [Arch::Ia32, Arch::X64, Arch::Arm, Arch::Arm64];

    /// The architecture this binary was built for, if supported
    pub fn host() -> Option<Arch> {
        if cfg!(target_arch = "x86") {
            Some(Arch::Ia32)
        } else if cfg!(target_arch = "x86_64") {
            Some(Arch::X64)
        } else if cfg!(target_arch = "arm") {
            Some(Arch::Arm)
        } else if cfg!(target_arch = "aarch64") {
            Some(Arch::Arm64)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Arch::Ia32 => "ia32",
            Arch::X64 => "x64",
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
        }
    }

    /// Size of a general purpose register, in bytes
    pub fn word_size(&self) -> usize {
        match self {
            Arch::Ia32 | Arch::Arm => 4,
            Arch::X64 | Arch::Arm64 => 8,
        }
    }

    /// Signed integer kind pointers are lowered to
    pub fn word_kind(&self) -> PrimitiveKind {
        match self.word_size() {
            4 => PrimitiveKind::Int32,
            _ => PrimitiveKind::Int64,
        }
    }

    /// Whether `ty` is wider than one location on this target
    ///
    /// Only 8-byte primitives on 32-bit targets qualify; those are the
    /// values call lowering must pass as two halves.
    pub fn needs_split(&self, ty: &NativeType) -> bool {
        self.word_size() == 4 && ty.is_splittable()
    }
}

impl AlignmentPolicy for Arch {
    fn stack_alignment(&self, _kind: PrimitiveKind, size_in_bytes: usize) -> usize {
        match self {
            // Every stack slot is one word.
            Arch::Ia32 | Arch::X64 | Arch::Arm64 => self.word_size(),
            // EABI: 8-byte values start on an even slot pair.
            Arch::Arm => size_in_bytes.max(4),
        }
    }

    fn field_alignment(&self, _kind: PrimitiveKind, size_in_bytes: usize) -> usize {
        match self {
            // i386 System V aligns 8-byte members to 4.
            Arch::Ia32 => size_in_bytes.clamp(1, 4),
            Arch::X64 | Arch::Arm | Arch::Arm64 => size_in_bytes.max(1),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown architecture name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown architecture '{0}' (expected one of: ia32, x64, arm, arm64)")]
pub struct UnknownArch(pub String);

impl FromStr for Arch {
    type Err = UnknownArch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ia32" | "x86" | "i386" => Ok(Arch::Ia32),
            "x64" | "x86_64" | "amd64" => Ok(Arch::X64),
            "arm" | "arm32" => Ok(Arch::Arm),
            "arm64" | "aarch64" => Ok(Arch::Arm64),
            other => Err(UnknownArch(other.to_string())),
        }
    }
}

/// Target selection passed to the factories and the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetConfig {
    pub arch: Arch,
}

impl TargetConfig {
    pub fn new(arch: Arch) -> Self {
        Self { arch }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self { arch: Arch::host().unwrap_or(Arch::X64) }
    }
}
