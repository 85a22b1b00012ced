//! Semantic analysis: name resolution against a metadata model and the
//! warnings it produces.

mod analyzer;
mod diagnostics;
pub mod resolve;

pub use analyzer::{SemanticChecker, analyze};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use resolve::{
    MemberResolution, ResolvedPath, SegmentResolution, resolve_property_path,
    resolve_resource_path,
};
