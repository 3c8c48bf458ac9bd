//! Frontend for source-level foreign-type annotations
//!
//! The frontend is responsible for:
//! 1. Lexing annotation text into tokens
//! 2. Parsing tokens into [`annotation::SourceType`] descriptors
//!
//! Mapping descriptors to native types is the factory's job.

pub mod annotation;

use crate::common::DiagnosticReporter;

pub use annotation::{parse_annotation, NameTable, SourceType, SourceTypeKind};

/// Configuration options passed to the frontend
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub verbose: bool,
}

/// Context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}
