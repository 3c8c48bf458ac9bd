//! Native type hierarchy used to describe calling conventions
//!
//! - [`PrimitiveKind`] and [`classify`]: the fixed size/kind table
//! - [`NativeType`]: primitives and function signatures
//! - [`NativeTypeZone`]: per-pass store handing out [`TypeId`] handles
//! - [`AlignmentPolicy`]: the seam where targets supply alignment rules

mod alignment;
mod native_type;
mod primitive;
mod zone;

pub use alignment::AlignmentPolicy;
pub use native_type::{Half, NativeFunctionType, NativePrimitiveType, NativeType, SplittablePrimitive};
pub use primitive::{classify, Classification, PrimitiveKind};
pub use zone::{NativeTypeZone, TypeDisplay, TypeId};
