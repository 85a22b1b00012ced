//! Foundation types for the OData toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Span`] - Line/column/offset positions for syntax nodes
//! - [`LineIndex`] - Offset to line/column conversion
//! - [`ODataVersion`], [`Availability`] - Protocol version gating
//! - [`TextRange`], [`TextSize`] - Byte ranges used while parsing
//! - Domain constants (EDMX namespaces, debounce window)
//!
//! This module has NO dependencies on other crate modules.

pub mod constants;
mod line_index;
mod position;
mod version;

pub use line_index::LineIndex;
pub use position::{Position, Span};
pub use version::{Availability, ODataVersion};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
