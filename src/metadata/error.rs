//! Error types for metadata digestion and caching.

use thiserror::Error;

/// Errors that can occur while turning an EDMX document into a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestionError {
    /// The root element is not `Edmx` in a known EDMX namespace.
    #[error("Not an EDMX document: root element is {0}")]
    NotEdmx(String),

    /// The `Version` attribute of the root is neither 1.0 nor 4.0/4.01.
    #[error("Unsupported EDMX version: {0}")]
    UnsupportedVersion(String),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Missing required element or attribute.
    #[error("Missing required {kind}: {name}")]
    Missing { kind: &'static str, name: String },

    /// A type reference that names nothing declared in the document.
    #[error("Unresolved type reference: {0}")]
    UnresolvedType(String),

    /// A navigation property whose target entity type does not exist.
    #[error("Unresolved navigation target '{target}' for {owner}/{property}")]
    UnresolvedNavigation {
        owner: String,
        property: String,
        target: String,
    },
}

impl DigestionError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a missing element error.
    pub fn missing_element(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "element",
            name: name.into(),
        }
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Self::Missing {
            kind: "attribute",
            name: format!("{element}@{attribute}"),
        }
    }
}

/// Errors surfaced by the model cache.
#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Digestion(#[from] DigestionError),

    /// The source returned no document, or an empty one.
    #[error("No metadata available for {endpoint}")]
    EmptyMetadata { endpoint: String },

    /// The metadata source failed (I/O, lookup).
    #[error("Metadata source error: {0}")]
    Source(String),

    /// The request was cancelled before a model was produced.
    #[error("Metadata request cancelled")]
    Cancelled,
}

impl MetadataError {
    /// Create a source error.
    pub fn source_failure(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }

    pub fn empty(endpoint: impl Into<String>) -> Self {
        Self::EmptyMetadata {
            endpoint: endpoint.into(),
        }
    }
}
