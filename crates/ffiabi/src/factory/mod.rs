//! Construction of native types from external representations
//!
//! - [`from_source_type`]: foreign-type annotations from the host language
//! - [`from_buffer_element_kind`]: element kinds of binary buffers
//! - [`from_unboxed_representation`]: the JIT's unboxed value kinds
//!   (only with the `jit` feature)
//!
//! Inputs outside a factory's declared domain are compiler bugs and panic.
//! Only [`from_source_type`] can fail recoverably, for shapes this layer
//! does not lower yet.

mod buffer;
mod source;
#[cfg(feature = "jit")]
mod unboxed;

pub use buffer::{from_buffer_element_kind, from_buffer_element_kind_id, BufferElementKind};
pub use source::from_source_type;
#[cfg(feature = "jit")]
pub use unboxed::{from_unboxed_representation, Representation};
