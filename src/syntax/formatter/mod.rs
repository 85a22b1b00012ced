//! Layout formatter for OData requests
//!
//! The parser supplies, for the resource path and every query option, a
//! span and a target indentation depth. The formatter rewrites whitespace
//! around those pieces and never re-derives structure on its own:
//!
//! ```text
//! https://services.odata.org/V4/Northwind/Northwind.svc/
//!     Orders(10248)/Items
//!         ?$select=ProductID,Quantity
//!         &$top=5
//! ```

mod options;


pub use options::FormatOptions;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::normalize::combine_odata_url;
use crate::base::Span;
use crate::parser::{ParseOptions, ParsedQuery, parse_with};

/// Indentation depth of the resource path line.
pub const RESOURCE_PATH_INDENT: usize = 1;
/// Indentation depth of each query option line.
pub const QUERY_OPTION_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormattingKind {
    ResourcePath,
    SystemQueryOption,
}

/// A node the formatter lays out on its own line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingRange {
    pub kind: FormattingKind,
    pub span: Span,
    pub indent: usize,
}

/// Layout targets for a parsed request, in document order.
///
/// Custom options share the query option depth so the `?`/`&` chain stays
/// aligned.
pub fn formatting_ranges(query: &ParsedQuery) -> Vec<FormattingRange> {
    let path = query.resource_path.iter().map(|path| FormattingRange {
        kind: FormattingKind::ResourcePath,
        span: path.span,
        indent: RESOURCE_PATH_INDENT,
    });
    let options = query.query_options.iter().map(|option| FormattingRange {
        kind: FormattingKind::SystemQueryOption,
        span: option.span,
        indent: QUERY_OPTION_INDENT,
    });
    path.chain(options).collect()
}

/// Format a request document with cancellation support.
///
/// Returns `None` if the cancellation token is signalled. Text that does not
/// parse is returned unchanged so an edit in progress is never mangled.
pub fn format_query(
    source: &str,
    options: &FormatOptions,
    parse_options: &ParseOptions,
    cancel: &CancellationToken,
) -> Option<String> {
    let combined = combine_odata_url(source);
    if cancel.is_cancelled() {
        return None;
    }

    let query = match parse_with(&combined, parse_options) {
        Ok(query) => query,
        Err(err) => {
            debug!(error = %err, "leaving unparseable request unformatted");
            return Some(source.to_string());
        }
    };
    if cancel.is_cancelled() {
        return None;
    }

    let mut out = query.service_root.value.trim_end().to_string();
    let mut first_option = true;
    for range in formatting_ranges(&query) {
        if cancel.is_cancelled() {
            return None;
        }
        out.push('\n');
        out.push_str(&options.indent(range.indent));
        if range.kind == FormattingKind::SystemQueryOption {
            out.push(if first_option { '?' } else { '&' });
            first_option = false;
        }
        out.push_str(range.span.text(&combined));
    }

    Some(out)
}
