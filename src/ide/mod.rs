//! IDE features: high-level APIs for editor integrations.
//!
//! This module provides the interface between the parser, the metadata
//! model and an editor. Each function corresponds to an editor request.
//!
//! ## Design Principles
//!
//! 1. **Plain data**: Results are our own serializable types, converted at
//!    the editor boundary
//! 2. **Text first**: Completion and signature help scan the raw text, so
//!    they keep working while the request is incomplete
//! 3. **Composable**: Built on top of parser and semantic queries
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use odata::ide::{AnalysisConfig, AnalysisHost, Profile};
//!
//! let host = AnalysisHost::from_source(source, AnalysisConfig::default());
//! host.set_profile(Profile::new("northwind", "https://host/Northwind.svc"));
//!
//! let analysis = host.analysis(text);
//! let items = analysis.completions(offset);
//! ```

mod analysis;
mod completion;
mod config;
mod debounce;
mod hover;
mod signature;
pub mod text_utils;

pub use analysis::{Analysis, AnalysisHost};
pub use completion::{CompletionItem, CompletionKind, completions, completions_with};
pub use config::{AnalysisConfig, Profile};
pub use debounce::{
    AnalysisReport, DebounceState, Debouncer, SchedulerHandle, spawn_scheduler,
};
pub use hover::{HoverResult, hover, hover_with, query_hover};
pub use signature::{SignatureHelp, signature_help};
