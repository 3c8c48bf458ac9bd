//! Token definitions for foreign-type annotations

use crate::common::Span;
use logos::Logos;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All token kinds of the annotation language
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]  // Skip whitespace
#[logos(skip r"//[^\n]*")]      // Skip line comments
pub enum TokenKind {
    // === Primitive types ===
    #[token("Int8")]
    Int8,
    #[token("Int16")]
    Int16,
    #[token("Int32")]
    Int32,
    #[token("Int64")]
    Int64,
    #[token("Uint8")]
    Uint8,
    #[token("Uint16")]
    Uint16,
    #[token("Uint32")]
    Uint32,
    #[token("Uint64")]
    Uint64,
    #[token("IntPtr")]
    IntPtr,
    #[token("Float")]
    Float,
    #[token("Double")]
    Double,
    #[token("Void")]
    Void,

    // === Type constructors ===
    #[token("Pointer")]
    Pointer,
    #[token("NativeFunction")]
    NativeFunction,
    #[token("Function")]
    Function,
    #[token("Struct")]
    Struct,
    #[token("Union")]
    Union,

    // === Identifiers ===
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // === Punctuation ===
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,

    /// End of input (not produced by logos)
    Eof,
}

impl TokenKind {
    /// Check if this token names a primitive or `IntPtr`
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TokenKind::Int8
                | TokenKind::Int16
                | TokenKind::Int32
                | TokenKind::Int64
                | TokenKind::Uint8
                | TokenKind::Uint16
                | TokenKind::Uint32
                | TokenKind::Uint64
                | TokenKind::IntPtr
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::Void
        )
    }

    /// Check if this token can start a type
    pub fn can_start_type(&self) -> bool {
        self.is_primitive()
            || matches!(
                self,
                TokenKind::Pointer
                    | TokenKind::NativeFunction
                    | TokenKind::Struct
                    | TokenKind::Union
                    | TokenKind::LParen
            )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "'{:?}'", self),
        }
    }
}
