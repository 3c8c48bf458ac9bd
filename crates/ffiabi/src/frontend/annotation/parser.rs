//! Recursive descent parser for foreign-type annotations
//!
//! ```text
//! type    := primary { "Function" "(" [ type { "," type } ] ")" }
//! primary := Int8 | ... | Uint64 | IntPtr | Float | Double | Void
//!          | "Pointer" "<" type ">"
//!          | "NativeFunction" "<" type ">"
//!          | "Struct" IDENT | "Union" IDENT
//!          | "(" type ")"
//! ```

use super::lexer::{Lexer, Token, TokenKind};
use super::source_type::{NameTable, SourceType, SourceTypeKind};
use crate::common::{AbiError, AbiResult, Span};

/// Deepest nesting of types accepted in one annotation
pub const MAX_NESTING_DEPTH: usize = 256;

/// Recursive descent parser for one annotation
pub struct Parser<'a, 'n> {
    lexer: Lexer<'a>,
    current: Token,
    names: &'n mut NameTable,
    depth: usize,
}

impl<'a, 'n> Parser<'a, 'n> {
    pub fn new(source: &'a str, names: &'n mut NameTable) -> AbiResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current, names, depth: 0 })
    }

    /// Parse a complete annotation; trailing input is an error
    pub fn parse(&mut self) -> AbiResult<SourceType> {
        let ty = self.parse_type()?;
        if !self.at_end() {
            return Err(AbiError::parser(
                format!("expected end of input, found {}", self.current.kind),
                self.current.span,
            ));
        }
        Ok(ty)
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> AbiResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> AbiResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> AbiResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(AbiError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Every nested type passes through here, so this bounds recursion
    fn parse_type(&mut self) -> AbiResult<SourceType> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(AbiError::parser("annotation nested too deeply", self.current.span));
        }
        self.depth += 1;
        let result = self.parse_signature();
        self.depth -= 1;
        result
    }

    fn parse_signature(&mut self) -> AbiResult<SourceType> {
        let mut ty = self.parse_primary()?;

        // `R Function(A, B)` chains to the left: `R Function() Function()`
        // returns a signature.
        while self.match_token(&TokenKind::Function)? {
            self.expect(TokenKind::LParen)?;
            let mut params = Vec::new();
            if !self.check(&TokenKind::RParen) {
                params.push(self.parse_type()?);
                while self.match_token(&TokenKind::Comma)? {
                    params.push(self.parse_type()?);
                }
            }
            let close = self.expect(TokenKind::RParen)?;
            let span = ty.span.merge(close.span);
            ty = SourceType::new(
                SourceTypeKind::Function { params, return_type: Box::new(ty) },
                span,
            );
        }

        Ok(ty)
    }

    fn parse_primary(&mut self) -> AbiResult<SourceType> {
        let token = self.advance()?;
        let kind = match token.kind {
            TokenKind::Int8 => SourceTypeKind::Int8,
            TokenKind::Int16 => SourceTypeKind::Int16,
            TokenKind::Int32 => SourceTypeKind::Int32,
            TokenKind::Int64 => SourceTypeKind::Int64,
            TokenKind::Uint8 => SourceTypeKind::Uint8,
            TokenKind::Uint16 => SourceTypeKind::Uint16,
            TokenKind::Uint32 => SourceTypeKind::Uint32,
            TokenKind::Uint64 => SourceTypeKind::Uint64,
            TokenKind::IntPtr => SourceTypeKind::IntPtr,
            TokenKind::Float => SourceTypeKind::Float,
            TokenKind::Double => SourceTypeKind::Double,
            TokenKind::Void => SourceTypeKind::Void,

            TokenKind::Pointer => {
                let (inner, close) = self.parse_type_argument()?;
                let span = token.span.merge(close);
                return Ok(SourceType::new(SourceTypeKind::Pointer(Box::new(inner)), span));
            }

            TokenKind::NativeFunction => {
                let (inner, close) = self.parse_type_argument()?;
                if !inner.is_function() {
                    return Err(AbiError::parser(
                        "NativeFunction expects a function signature, e.g. `Void Function(Int32)`",
                        inner.span,
                    ));
                }
                // The wrapper adds nothing beyond the signature itself.
                return Ok(SourceType::new(inner.kind, token.span.merge(close)));
            }

            TokenKind::Struct | TokenKind::Union => {
                let name_token = self.advance()?;
                let TokenKind::Identifier(name) = &name_token.kind else {
                    return Err(AbiError::parser(
                        format!("expected a type name after {}, found {}", token.kind, name_token.kind),
                        name_token.span,
                    ));
                };
                let symbol = self.names.intern(name);
                let kind = if matches!(token.kind, TokenKind::Struct) {
                    SourceTypeKind::Struct(symbol)
                } else {
                    SourceTypeKind::Union(symbol)
                };
                return Ok(SourceType::new(kind, token.span.merge(name_token.span)));
            }

            TokenKind::LParen => {
                let inner = self.parse_type()?;
                let close = self.expect(TokenKind::RParen)?;
                return Ok(SourceType::new(inner.kind, token.span.merge(close.span)));
            }

            TokenKind::Identifier(name) => {
                return Err(AbiError::parser(
                    format!("unknown native type '{}'", name),
                    token.span,
                ));
            }

            other => {
                return Err(AbiError::parser(
                    format!("expected a native type, found {}", other),
                    token.span,
                ));
            }
        };
        Ok(SourceType::new(kind, token.span))
    }

    /// `< type >`, returning the type and the span of the closing `>`
    fn parse_type_argument(&mut self) -> AbiResult<(SourceType, Span)> {
        self.expect(TokenKind::Lt)?;
        let inner = self.parse_type()?;
        let close = self.expect(TokenKind::Gt)?;
        Ok((inner, close.span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> (SourceType, NameTable) {
        let mut names = NameTable::new();
        let ty = Parser::new(source, &mut names).unwrap().parse().unwrap();
        (ty, names)
    }

    fn parse_err(source: &str) -> AbiError {
        let mut names = NameTable::new();
        match Parser::new(source, &mut names).and_then(|mut p| p.parse()) {
            Ok(ty) => panic!("expected error, parsed {:?}", ty),
            Err(e) => e,
        }
    }

    #[test]
    fn test_primitive() {
        let (ty, _) = parse("Uint16");
        assert_eq!(ty, SourceType::new(SourceTypeKind::Uint16, Span::new(0, 6)));
    }

    #[test]
    fn test_signature() {
        let (ty, names) = parse("Int64 Function(Uint8, Double)");
        let SourceTypeKind::Function { params, return_type } = &ty.kind else {
            panic!("expected function, got {:?}", ty.kind);
        };
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].kind, SourceTypeKind::Uint8);
        assert_eq!(params[1].kind, SourceTypeKind::Double);
        assert_eq!(return_type.kind, SourceTypeKind::Int64);
        assert_eq!(ty.span, Span::new(0, 29));
        assert_eq!(ty.display(&names).to_string(), "Int64 Function(Uint8, Double)");
    }

    #[test]
    fn test_native_function_wrapper() {
        let (ty, names) = parse("NativeFunction<Void Function()>");
        assert!(ty.is_function());
        assert_eq!(ty.span, Span::new(0, 31));
        assert_eq!(ty.display(&names).to_string(), "Void Function()");
    }

    #[test]
    fn test_pointer_to_callback() {
        let (ty, names) = parse("Void Function(Pointer<NativeFunction<Int32 Function(Int32)>>)");
        assert_eq!(
            ty.display(&names).to_string(),
            "Void Function(Pointer<NativeFunction<Int32 Function(Int32)>>)"
        );
    }

    #[test]
    fn test_chained_signature() {
        let (ty, names) = parse("Void Function() Function(Float)");
        let SourceTypeKind::Function { params, return_type } = &ty.kind else {
            panic!("expected function");
        };
        assert_eq!(params[0].kind, SourceTypeKind::Float);
        assert!(return_type.is_function());
        assert_eq!(ty.display(&names).to_string(), "Void Function() Function(Float)");
    }

    #[test]
    fn test_struct_names_are_interned() {
        let (ty, names) = parse("Void Function(Struct Point, Struct Point, Union Value)");
        assert_eq!(names.len(), 2);
        let SourceTypeKind::Function { params, .. } = &ty.kind else {
            panic!("expected function");
        };
        assert_eq!(params[0].kind, params[1].kind);
        assert!(params[2].is_composite());
        assert_eq!(params[0].span, Span::new(14, 26));
        assert_eq!(ty.display(&names).to_string(), "Void Function(Struct Point, Struct Point, Union Value)");
    }

    #[test]
    fn test_native_function_requires_signature() {
        let err = parse_err("NativeFunction<Int32>");
        assert!(matches!(err, AbiError::Parser { span, .. } if span == Span::new(15, 20)));
    }

    #[test]
    fn test_unknown_type_name() {
        let err = parse_err("Int32 Function(Handle)");
        assert!(err.to_string().contains("unknown native type 'Handle'"));
        assert_eq!(err.span(), Some(Span::new(15, 21)));
    }

    #[test]
    fn test_trailing_input() {
        let err = parse_err("Int32 Int32");
        assert!(err.to_string().contains("expected end of input"));
    }

    #[test]
    fn test_unclosed_argument_list() {
        let err = parse_err("Void Function(Int32");
        assert!(err.to_string().contains("expected ')'"));
        assert_eq!(err.span(), Some(Span::new(19, 19)));
    }

    #[test]
    fn test_nesting_within_limit() {
        let depth = MAX_NESTING_DEPTH - 1;
        let source = format!("{}Int32{}", "Pointer<".repeat(depth), ">".repeat(depth));
        let (ty, _) = parse(&source);
        assert_eq!(ty.span, Span::new(0, source.len()));
    }

    #[test]
    fn test_nesting_too_deep() {
        let depth = 100_000;
        let source = format!("{}Int32{}", "Pointer<".repeat(depth), ">".repeat(depth));
        let err = parse_err(&source);
        assert!(matches!(err, AbiError::Parser { .. }));
        assert!(err.to_string().contains("nested too deeply"));
        let offset = MAX_NESTING_DEPTH * "Pointer<".len();
        assert_eq!(err.span(), Some(Span::new(offset, offset + "Pointer".len())));
    }

    #[test]
    fn test_nested_parameters_count_towards_limit() {
        let depth = MAX_NESTING_DEPTH;
        let source = format!("{}Int32{}", "Void Function(".repeat(depth), ")".repeat(depth));
        let err = parse_err(&source);
        assert!(err.to_string().contains("nested too deeply"));
    }
}
