//! Token kinds produced by the value lexer
//!
//! OData operators (`eq`, `and`, `asc`, ...) are lexed as plain identifiers
//! and recognised by the parser from context, so a property named `Date`
//! or `desc` never collides with a keyword.

/// All token kinds in option values and key predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,

    // =========================================================================
    // NAMES
    // =========================================================================
    IDENT,       // OrderID, geo.distance, NS.Type
    SYSTEM_NAME, // $select (inside $expand options)
    ALIAS,       // @p1

    // =========================================================================
    // LITERALS
    // =========================================================================
    INTEGER,          // 42, -1, 10L
    DECIMAL,          // 3.14, 1e10, 2.5m
    STRING,           // 'text'
    TYPED_STRING,     // datetime'2020-01-01T00:00', guid'...'
    DATE,             // 2020-01-31
    DATE_TIME_OFFSET, // 2020-01-31T10:00:00Z
    GUID,             // 01234567-89ab-cdef-0123-456789abcdef

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,   // (
    R_PAREN,   // )
    COMMA,     // ,
    SLASH,     // /
    EQ,        // =
    SEMICOLON, // ;
    STAR,      // *

    ERROR,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE)
    }

    /// Check if this token is a literal value
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INTEGER
                | Self::DECIMAL
                | Self::STRING
                | Self::TYPED_STRING
                | Self::DATE
                | Self::DATE_TIME_OFFSET
                | Self::GUID
        )
    }

    /// Human-readable description used in error messages
    pub fn describe(self) -> &'static str {
        match self {
            Self::WHITESPACE => "whitespace",
            Self::IDENT => "identifier",
            Self::SYSTEM_NAME => "system query option",
            Self::ALIAS => "parameter alias",
            Self::INTEGER => "integer",
            Self::DECIMAL => "decimal",
            Self::STRING => "string literal",
            Self::TYPED_STRING => "typed literal",
            Self::DATE => "date",
            Self::DATE_TIME_OFFSET => "date-time",
            Self::GUID => "guid",
            Self::L_PAREN => "'('",
            Self::R_PAREN => "')'",
            Self::COMMA => "','",
            Self::SLASH => "'/'",
            Self::EQ => "'='",
            Self::SEMICOLON => "';'",
            Self::STAR => "'*'",
            Self::ERROR => "invalid character",
        }
    }
}
