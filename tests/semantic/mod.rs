//! Semantic analysis tests
//!
//! Tests for:
//! - Resource path resolution warnings
//! - Unknown properties in $select, $filter and $orderby
//! - Unknown navigation in $expand and nested options

pub mod tests_warnings;
