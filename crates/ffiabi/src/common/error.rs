//! Error types and diagnostic reporting
//!
//! Only recoverable failures live here. Misuse of the type hierarchy by the
//! compiler itself (splitting a non-splittable type, factory input outside
//! its domain) panics instead; see the individual operations.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use thiserror::Error;
use super::Span;

/// Failure surfaced to the pass that requested a native type
#[derive(Error, Debug)]
pub enum AbiError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    /// The annotation is well formed but names a native shape this layer
    /// cannot lower yet (structs, unions). The enclosing FFI declaration
    /// should be rejected with a user-facing error.
    #[error("Unsupported native type at {span:?}: {message}")]
    UnsupportedNativeType { message: String, span: Span },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AbiError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn unsupported(message: impl Into<String>, span: Span) -> Self {
        Self::UnsupportedNativeType {
            message: message.into(),
            span,
        }
    }

    /// Source location of the error, if it has one
    pub fn span(&self) -> Option<Span> {
        match self {
            AbiError::Lexer { span, .. }
            | AbiError::Parser { span, .. }
            | AbiError::UnsupportedNativeType { span, .. } => Some(*span),
            AbiError::Io(_) => None,
        }
    }
}

pub type AbiResult<T> = Result<T, AbiError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Build the diagnostic for `error` against file `file_id`
    pub fn diagnostic(&self, file_id: usize, error: &AbiError) -> Diagnostic<usize> {
        match error {
            AbiError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            AbiError::Parser { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            AbiError::UnsupportedNativeType { message, span } => Diagnostic::error()
                .with_message("Unsupported native type")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ])
                .with_notes(vec!["only primitive types, pointers and native functions can cross the FFI boundary".to_string()]),

            AbiError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }

    /// Render `error` to `writer`
    pub fn emit_to(
        &self,
        writer: &mut dyn WriteColor,
        file_id: usize,
        error: &AbiError,
    ) -> Result<(), codespan_reporting::files::Error> {
        let diagnostic = self.diagnostic(file_id, error);
        term::emit(writer, &self.config, &self.files, &diagnostic)
    }

    /// Render `error` to stderr
    pub fn report_error(&self, file_id: usize, error: &AbiError) {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let _ = self.emit_to(&mut writer.lock(), file_id, error);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
