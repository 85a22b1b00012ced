//! Metadata tests
//!
//! Tests for:
//! - Digesting modern and legacy EDMX documents
//! - Vendor namespace stripping
//! - Name collisions, inheritance and complex types
//! - The per-endpoint model cache (single flight, cancellation, refresh)

pub mod tests_cache;
pub mod tests_digest;
