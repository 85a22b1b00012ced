//! # odata-lang
//!
//! Core library for OData query URL parsing, EDMX metadata digestion and
//! semantic analysis.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Editor features (completion, hover, signature help, debounced analysis)
//!   ↓
//! semantic  → Name resolution against a DataModel, warnings
//!   ↓
//! metadata  → EDMX reader, digester, per-endpoint model cache
//!   ↓
//! syntax    → URL normalization, layout formatter
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, typed AST
//!   ↓
//! base      → Primitives (Span, Position, LineIndex, ODataVersion)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → metadata → semantic → ide)
// ============================================================================

/// Foundation types: Span, Position, LineIndex, protocol versions
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, typed AST
pub mod parser;

/// Syntax: URL normalization and formatting
pub mod syntax;

/// Metadata: EDMX digestion and the model cache
pub mod metadata;

/// Semantic analysis: resolution and warnings
pub mod semantic;

/// IDE features: completion, hover, signature help, analysis host
pub mod ide;

// Re-export commonly needed items
pub use parser::keywords;
pub use parser::{ParseOptions, ParsedQuery, SyntaxError, parse, parse_with};
pub use syntax::combine_odata_url;

// Re-export foundation types
pub use base::{LineIndex, ODataVersion, Position, Span, TextRange, TextSize};
