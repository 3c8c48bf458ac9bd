//! Native ABI type classification
//!
//! This library describes the primitive native types that cross a foreign
//! function boundary, how each target architecture aligns, widens and splits
//! them, and how inlined intrinsic fast paths keep the call state intact.
//!
//! ## Architecture
//!
//! The library is organized into:
//! - **Types** (`types/`): primitive classification table, native types and the interning zone
//! - **Target** (`target/`): per-architecture alignment rules and signature lowering
//! - **Factory** (`factory/`): native types from annotations, buffer element kinds and unboxed representations
//! - **Frontend** (`frontend/`): the foreign-type annotation language
//! - **Intrinsic** (`intrinsic/`): register preservation around intrinsic fast paths
//! - **Common** (`common/`): shared infrastructure (errors, spans)

pub mod common;
pub mod types;
pub mod target;
pub mod factory;
pub mod frontend;
pub mod intrinsic;
pub mod driver;

// Re-exports for convenience
pub use common::{AbiError, AbiResult, DiagnosticReporter, Span};
pub use driver::{Classified, Pipeline};
pub use frontend::{CompileContext, FrontendConfig};
pub use target::{Arch, LoweringPlan, TargetConfig};
pub use types::{NativeType, NativeTypeZone, PrimitiveKind, TypeId};
