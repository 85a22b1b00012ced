//! Diagnostics: syntax errors and semantic warnings with locations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::base::Span;
use crate::parser::SyntaxError;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: Span,
    pub severity: Severity,
    /// Error/warning code (e.g., "W0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(span: Span, message: impl Into<Arc<str>>) -> Self {
        Self {
            span,
            severity: Severity::Error,
            code: None,
            message: message.into(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(span: Span, message: impl Into<Arc<str>>) -> Self {
        Self {
            span,
            severity: Severity::Warning,
            code: None,
            message: message.into(),
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(err: &SyntaxError) -> Self {
        let message = if err.expected.is_empty() {
            err.message.clone()
        } else {
            format!("{} (expected one of: {})", err.message, err.expected.join(", "))
        };
        Diagnostic::error(err.span, message).with_code(codes::SYNTAX_ERROR)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Code Ranges
///
/// - **E0001-E0099**: Errors (the request cannot be parsed)
/// - **W0001-W0099**: Warnings (names the metadata does not know)
pub mod codes {
    /// Malformed or unsupported request syntax.
    pub const SYNTAX_ERROR: &str = "E0001";

    /// First resource path segment is not a container member.
    pub const UNRESOLVED_RESOURCE: &str = "W0001";
    /// Name is not a navigation property of the current type.
    pub const UNKNOWN_NAVIGATION: &str = "W0002";
    /// Name is not a property of the current type.
    pub const UNKNOWN_PROPERTY: &str = "W0003";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during semantic analysis.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add an unresolved resource warning.
    pub fn unresolved_resource(&mut self, span: Span, name: &str, profile: Option<&str>) {
        let scope = match profile {
            Some(profile) => format!("profile '{profile}'"),
            None => "the current metadata".to_string(),
        };
        self.add(
            Diagnostic::warning(
                span,
                format!("unresolved resource path '{name}': not exposed by {scope}"),
            )
            .with_code(codes::UNRESOLVED_RESOURCE),
        );
    }

    /// Add an unknown navigation property warning.
    pub fn unknown_navigation(&mut self, span: Span, name: &str, type_name: &str) {
        self.add(
            Diagnostic::warning(
                span,
                format!("unknown navigation property '{name}' on '{type_name}'"),
            )
            .with_code(codes::UNKNOWN_NAVIGATION),
        );
    }

    /// Add an unknown property warning.
    pub fn unknown_property(&mut self, span: Span, name: &str, type_name: &str) {
        self.add(
            Diagnostic::warning(span, format!("unknown property '{name}' on '{type_name}'"))
                .with_code(codes::UNKNOWN_PROPERTY),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
