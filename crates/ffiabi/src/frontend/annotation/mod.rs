//! Foreign-type annotation language
//!
//! Turns annotation text such as `Int32 Function(Uint8, Double)` into a
//! [`SourceType`] descriptor, reporting lexer and parser errors against the
//! annotation source.

pub mod lexer;
pub mod parser;
mod source_type;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use source_type::{NameTable, SourceType, SourceTypeDisplay, SourceTypeKind};

use crate::common::AbiResult;
use crate::frontend::{CompileContext, FrontendConfig};

/// Parse one annotation, reporting any error through `ctx`
pub fn parse_annotation(
    source: &str,
    names: &mut NameTable,
    ctx: &CompileContext,
    config: &FrontendConfig,
) -> AbiResult<SourceType> {
    if config.dump_tokens {
        match Lexer::new(source).tokenize_all() {
            Ok(tokens) => {
                eprintln!("=== Annotation Tokens ===");
                for token in &tokens {
                    eprintln!("{:?}", token);
                }
                eprintln!("=== End Tokens ===\n");
            }
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        }
    }

    if config.verbose {
        eprintln!("Parsing annotation {}...", ctx.filename);
    }

    let result = Parser::new(source, names).and_then(|mut parser| parser.parse());
    if let Err(e) = &result {
        ctx.reporter.report_error(ctx.file_id, e);
    }
    result
}

/// Dump the token stream of `source`, one token per line
pub fn dump_tokens(source: &str) -> AbiResult<String> {
    let tokens = Lexer::new(source).tokenize_all()?;
    let mut output = String::new();
    for token in &tokens {
        output.push_str(&format!("{:?}\n", token));
    }
    Ok(output)
}
