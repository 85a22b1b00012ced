//! Logos-based lexer for OData option values
//!
//! Tokenizes the value region of a query option (or a key predicate) into
//! tokens carrying absolute byte offsets into the full request text.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }

    pub fn start(&self) -> usize {
        usize::from(self.offset)
    }

    pub fn end(&self) -> usize {
        usize::from(self.offset) + self.text.len()
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    base: TextSize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_offset(input, TextSize::new(0))
    }

    /// Lex a sub-region of a larger text; token offsets are shifted by `base`.
    pub fn with_offset(input: &'a str, base: TextSize) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            base,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = self.base + TextSize::new(self.inner.span().start as u32);

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string, dropping trivia
pub fn tokenize(input: &str, base: TextSize) -> Vec<Token<'_>> {
    Lexer::with_offset(input, base)
        .filter(|t| !t.kind.is_trivia())
        .collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"([ \t\r\n]|%20)+")]
    Whitespace,

    // =========================================================================
    // NAMES
    // =========================================================================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*")]
    Ident,

    #[regex(r"\$[A-Za-z]+")]
    SystemName,

    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*")]
    Alias,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"-?[0-9]+[lL]?")]
    Integer,

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[mMdDfF]?")]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+[mMdDfF]?")]
    #[regex(r"-?[0-9]+[mMdDfF]")]
    Decimal,

    #[regex(r"'([^']|'')*'")]
    String,

    #[regex(r"(datetime|datetimeoffset|guid|time|duration|binary|X|geography|geometry)'([^']|'')*'")]
    TypedString,

    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}")]
    Date,

    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]+)?)?(Z|[+-][0-9]{2}:[0-9]{2})?")]
    DateTimeOffset,

    #[regex(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")]
    Guid,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("/")]
    Slash,
    #[token("=")]
    Eq,
    #[token(";")]
    Semicolon,
    #[token("*")]
    Star,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,

            Ident => SyntaxKind::IDENT,
            SystemName => SyntaxKind::SYSTEM_NAME,
            Alias => SyntaxKind::ALIAS,

            Integer => SyntaxKind::INTEGER,
            Decimal => SyntaxKind::DECIMAL,
            String => SyntaxKind::STRING,
            TypedString => SyntaxKind::TYPED_STRING,
            Date => SyntaxKind::DATE,
            DateTimeOffset => SyntaxKind::DATE_TIME_OFFSET,
            Guid => SyntaxKind::GUID,

            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Comma => SyntaxKind::COMMA,
            Slash => SyntaxKind::SLASH,
            Eq => SyntaxKind::EQ,
            Semicolon => SyntaxKind::SEMICOLON,
            Star => SyntaxKind::STAR,
        }
    }
}
