//! Common infrastructure shared by the annotation frontend, the factories
//! and the driver

mod error;
mod span;

pub use error::{AbiError, AbiResult, DiagnosticReporter};
pub use span::Span;
