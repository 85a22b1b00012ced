//! Syntax layer integration tests
//!
//! Tests for:
//! - Multi-line request folding
//! - Request layout formatting over the URL corpus
