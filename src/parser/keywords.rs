//! OData keywords: system query options and expression operators.

use crate::base::Availability;

/// The fixed set of supported system query options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemQueryOption {
    Select,
    Filter,
    Expand,
    OrderBy,
    Top,
    Skip,
    Count,
    Search,
    Format,
    InlineCount,
    SkipToken,
}

impl SystemQueryOption {
    /// All options, in the order completion offers them.
    pub const ALL: &'static [SystemQueryOption] = &[
        SystemQueryOption::Select,
        SystemQueryOption::Filter,
        SystemQueryOption::Expand,
        SystemQueryOption::OrderBy,
        SystemQueryOption::Top,
        SystemQueryOption::Skip,
        SystemQueryOption::Count,
        SystemQueryOption::Search,
        SystemQueryOption::Format,
        SystemQueryOption::InlineCount,
        SystemQueryOption::SkipToken,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SystemQueryOption::Select => "$select",
            SystemQueryOption::Filter => "$filter",
            SystemQueryOption::Expand => "$expand",
            SystemQueryOption::OrderBy => "$orderby",
            SystemQueryOption::Top => "$top",
            SystemQueryOption::Skip => "$skip",
            SystemQueryOption::Count => "$count",
            SystemQueryOption::Search => "$search",
            SystemQueryOption::Format => "$format",
            SystemQueryOption::InlineCount => "$inlinecount",
            SystemQueryOption::SkipToken => "$skiptoken",
        }
    }

    /// Options whose value goes through the value lexer. Only these can
    /// hold quoted literals, so only these treat quotes as hiding `&`.
    pub fn is_tokenized(&self) -> bool {
        !matches!(
            self,
            SystemQueryOption::Search | SystemQueryOption::Format | SystemQueryOption::SkipToken
        )
    }

    /// Case-insensitive lookup of a `$`-prefixed option name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.name().eq_ignore_ascii_case(name))
    }

    pub fn availability(&self) -> Availability {
        match self {
            SystemQueryOption::InlineCount => Availability::V2Only,
            SystemQueryOption::Count | SystemQueryOption::Search => Availability::V4Only,
            _ => Availability::Common,
        }
    }

    /// Whether the option may appear inside `$expand=Nav(...)`.
    pub fn allowed_in_expand(&self) -> bool {
        !matches!(
            self,
            SystemQueryOption::Format
                | SystemQueryOption::InlineCount
                | SystemQueryOption::SkipToken
        )
    }

    pub fn documentation(&self) -> &'static str {
        match self {
            SystemQueryOption::Select => {
                "Limits the properties returned for each entity to the listed ones."
            }
            SystemQueryOption::Filter => {
                "Restricts the returned entities to those matching a boolean expression."
            }
            SystemQueryOption::Expand => {
                "Includes related entities reached through navigation properties inline."
            }
            SystemQueryOption::OrderBy => {
                "Sorts the result by one or more expressions, each optionally `asc` or `desc`."
            }
            SystemQueryOption::Top => "Returns at most the given number of entities.",
            SystemQueryOption::Skip => "Skips the given number of entities before returning results.",
            SystemQueryOption::Count => "Requests the total count of matching entities (`true`/`false`).",
            SystemQueryOption::Search => "Restricts the result to entities matching a free-text search.",
            SystemQueryOption::Format => "Selects the response media type, e.g. `json` or `xml`.",
            SystemQueryOption::InlineCount => {
                "Includes the total count in the response (`allpages`) or not (`none`)."
            }
            SystemQueryOption::SkipToken => "Opaque token used by the server for server-driven paging.",
        }
    }
}

/// Comparison operators.
pub const COMPARISON_OPERATORS: &[&str] = &["eq", "ne", "gt", "ge", "lt", "le"];

/// Boolean connectives, in ascending precedence.
pub const LOGICAL_OPERATORS: &[&str] = &["or", "and", "not"];

/// Arithmetic operators.
pub const ARITHMETIC_OPERATORS: &[&str] = &["add", "sub", "mul", "div", "mod"];

/// Lambda operators, recognised only to reject them.
pub const LAMBDA_OPERATORS: &[&str] = &["any", "all"];

/// Sort directions accepted after an `$orderby` expression.
pub const SORT_DIRECTIONS: &[&str] = &["asc", "desc"];

pub fn is_lambda_operator(name: &str) -> bool {
    LAMBDA_OPERATORS.contains(&name)
}
