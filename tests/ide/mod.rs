//! IDE feature tests
//!
//! Tests for:
//! - Code completion
//! - Hover information
//! - Signature help
//! - The analysis host and the debounced scheduler

pub mod tests_completion;
pub mod tests_signature;
