//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{AbiError, AbiResult, Span};
use logos::Logos;

/// Lexer for annotation source text
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            at_eof: false,
        }
    }

    /// Get the next token; keeps returning `Eof` once input is exhausted
    pub fn next_token(&mut self) -> AbiResult<Token> {
        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(())) => {
                let span = self.inner.span();
                Err(AbiError::lexer(
                    format!("unexpected character '{}'", self.inner.slice()),
                    Span::new(span.start, span.end),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Tokenize the entire source, including the trailing `Eof`
    pub fn tokenize_all(mut self) -> AbiResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_keywords() {
        let source = "Int8 Uint16 IntPtr Double Void";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Int8));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Uint16));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::IntPtr));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Double));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Void));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eof));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eof));
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        let mut lexer = Lexer::new("Int8x Pointers");

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "Int8x"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "Pointers"
        ));
    }

    #[test]
    fn test_signature_tokens() {
        let source = "Pointer<NativeFunction<Void Function(Int32, Float)>>";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        assert!(matches!(tokens[0].kind, TokenKind::Pointer));
        assert!(matches!(tokens[1].kind, TokenKind::Lt));
        assert!(matches!(tokens[2].kind, TokenKind::NativeFunction));
        assert!(matches!(tokens[3].kind, TokenKind::Lt));
        assert!(matches!(tokens[4].kind, TokenKind::Void));
        assert!(matches!(tokens[5].kind, TokenKind::Function));
        assert!(matches!(tokens[6].kind, TokenKind::LParen));
        assert!(matches!(tokens[7].kind, TokenKind::Int32));
        assert!(matches!(tokens[8].kind, TokenKind::Comma));
        assert!(matches!(tokens[9].kind, TokenKind::Float));
        assert!(matches!(tokens[10].kind, TokenKind::RParen));
        assert!(matches!(tokens[11].kind, TokenKind::Gt));
        assert!(matches!(tokens[12].kind, TokenKind::Gt));
        assert!(matches!(tokens[13].kind, TokenKind::Eof));
        assert_eq!(tokens[2].span, Span::new(8, 22));
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = Lexer::new("// callback\nStruct Point").tokenize_all().unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Struct));
        assert!(matches!(&tokens[1].kind, TokenKind::Identifier(s) if s == "Point"));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("Int32 *");
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, AbiError::Lexer { span, .. } if span == Span::new(6, 7)));
    }
}
