// Text-level utilities over parsed requests: normalization and layout
pub mod formatter;
mod normalize;

pub use formatter::{
    FormatOptions, FormattingKind, FormattingRange, QUERY_OPTION_INDENT, RESOURCE_PATH_INDENT,
    format_query, formatting_ranges,
};
pub use normalize::combine_odata_url;
