//! Parser tests
//!
//! Tests for:
//! - Service root and resource path splitting over real-world URLs
//! - Query option values
//! - Rejected constructs ($apply, lambda operators)
//! - Error spans and expected-token hints

pub mod tests_errors;
pub mod tests_options;
