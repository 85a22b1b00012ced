//! The allow-list of OData canonical functions.
//!
//! Each entry carries its parameters, minimum arity and the protocol
//! versions that define it. The parser rejects calls to anything not
//! listed here; completion, hover and signature help read the same table.

use crate::base::{Availability, ODataVersion};

/// A function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub type_name: &'static str,
}

/// Signature of a canonical function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub parameters: &'static [Parameter],
    /// Parameters beyond this count are optional.
    pub min_args: usize,
    pub return_type: &'static str,
    pub availability: Availability,
    pub documentation: &'static str,
}

impl FunctionSignature {
    pub fn max_args(&self) -> usize {
        self.parameters.len()
    }

    pub fn accepts_arity(&self, count: usize) -> bool {
        count >= self.min_args && count <= self.max_args()
    }

    /// Parameter labels, optional ones marked with `?`.
    pub fn parameter_labels(&self) -> Vec<String> {
        self.parameters
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i >= self.min_args {
                    format!("{}?: {}", p.name, p.type_name)
                } else {
                    format!("{}: {}", p.name, p.type_name)
                }
            })
            .collect()
    }

    /// `name(p: T, ...) -> R` rendering used by hover and signature help.
    pub fn label(&self) -> String {
        format!(
            "{}({}) -> {}",
            self.name,
            self.parameter_labels().join(", "),
            self.return_type
        )
    }
}

const fn p(name: &'static str, type_name: &'static str) -> Parameter {
    Parameter { name, type_name }
}

const fn f(
    name: &'static str,
    parameters: &'static [Parameter],
    min_args: usize,
    return_type: &'static str,
    availability: Availability,
    documentation: &'static str,
) -> FunctionSignature {
    FunctionSignature {
        name,
        parameters,
        min_args,
        return_type,
        availability,
        documentation,
    }
}

use Availability::{Common, V2Only, V4Only};

pub const FUNCTIONS: &[FunctionSignature] = &[
    // String functions
    f("startswith", &[p("text", "Edm.String"), p("prefix", "Edm.String")], 2, "Edm.Boolean", Common, "True if `text` starts with `prefix`."),
    f("endswith", &[p("text", "Edm.String"), p("suffix", "Edm.String")], 2, "Edm.Boolean", Common, "True if `text` ends with `suffix`."),
    f("length", &[p("text", "Edm.String")], 1, "Edm.Int32", Common, "Number of characters in `text`."),
    f("indexof", &[p("text", "Edm.String"), p("search", "Edm.String")], 2, "Edm.Int32", Common, "Zero-based index of the first occurrence of `search`, or -1."),
    f("substring", &[p("text", "Edm.String"), p("start", "Edm.Int32"), p("length", "Edm.Int32")], 2, "Edm.String", Common, "Substring of `text` from `start`, optionally limited to `length` characters."),
    f("tolower", &[p("text", "Edm.String")], 1, "Edm.String", Common, "Lower-cased copy of `text`."),
    f("toupper", &[p("text", "Edm.String")], 1, "Edm.String", Common, "Upper-cased copy of `text`."),
    f("trim", &[p("text", "Edm.String")], 1, "Edm.String", Common, "`text` without leading and trailing whitespace."),
    f("concat", &[p("left", "Edm.String"), p("right", "Edm.String")], 2, "Edm.String", Common, "Concatenation of `left` and `right`."),
    f("substringof", &[p("search", "Edm.String"), p("text", "Edm.String")], 2, "Edm.Boolean", V2Only, "True if `search` occurs within `text`."),
    f("replace", &[p("text", "Edm.String"), p("find", "Edm.String"), p("replacement", "Edm.String")], 3, "Edm.String", V2Only, "`text` with every `find` replaced by `replacement`."),
    f("contains", &[p("text", "Edm.String"), p("search", "Edm.String")], 2, "Edm.Boolean", V4Only, "True if `search` occurs within `text`."),
    f("matchesPattern", &[p("text", "Edm.String"), p("pattern", "Edm.String")], 2, "Edm.Boolean", V4Only, "True if `text` matches the ECMAScript regular expression `pattern`."),
    // Date and time functions
    f("year", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.Int32", Common, "Year component of a date or date-time."),
    f("month", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.Int32", Common, "Month component of a date or date-time."),
    f("day", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.Int32", Common, "Day component of a date or date-time."),
    f("hour", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.Int32", Common, "Hour component of a date-time or time of day."),
    f("minute", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.Int32", Common, "Minute component of a date-time or time of day."),
    f("second", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.Int32", Common, "Second component of a date-time or time of day."),
    f("fractionalseconds", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.Decimal", V4Only, "Fractional seconds component of a date-time."),
    f("date", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.Date", V4Only, "Date part of a date-time."),
    f("time", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.TimeOfDay", V4Only, "Time-of-day part of a date-time."),
    f("totaloffsetminutes", &[p("value", "Edm.DateTimeOffset")], 1, "Edm.Int32", V4Only, "Signed time zone offset of a date-time in minutes."),
    f("totalseconds", &[p("value", "Edm.Duration")], 1, "Edm.Decimal", V4Only, "Duration expressed in seconds."),
    f("now", &[], 0, "Edm.DateTimeOffset", V4Only, "Current point in time."),
    f("mindatetime", &[], 0, "Edm.DateTimeOffset", V4Only, "Earliest possible point in time."),
    f("maxdatetime", &[], 0, "Edm.DateTimeOffset", V4Only, "Latest possible point in time."),
    // Arithmetic functions
    f("round", &[p("value", "Edm.Decimal")], 1, "Edm.Decimal", Common, "Nearest integral value."),
    f("floor", &[p("value", "Edm.Decimal")], 1, "Edm.Decimal", Common, "Largest integral value not greater than `value`."),
    f("ceiling", &[p("value", "Edm.Decimal")], 1, "Edm.Decimal", Common, "Smallest integral value not less than `value`."),
    // Type functions
    f("isof", &[p("instance", "Edm.Untyped"), p("type", "Edm.String")], 1, "Edm.Boolean", Common, "True if the instance (or current entity) is of the given type."),
    f("cast", &[p("instance", "Edm.Untyped"), p("type", "Edm.String")], 1, "Edm.Untyped", Common, "The instance (or current entity) cast to the given type."),
    // Geo functions
    f("geo.distance", &[p("from", "Edm.GeographyPoint"), p("to", "Edm.GeographyPoint")], 2, "Edm.Double", V4Only, "Shortest distance between two points."),
    f("geo.length", &[p("line", "Edm.GeographyLineString")], 1, "Edm.Double", V4Only, "Total length of a line string."),
    f("geo.intersects", &[p("point", "Edm.GeographyPoint"), p("polygon", "Edm.GeographyPolygon")], 2, "Edm.Boolean", V4Only, "True if the point lies within the polygon."),
];

/// Look up a canonical function by exact name.
pub fn lookup(name: &str) -> Option<&'static FunctionSignature> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// Functions offered for a model of the given version.
///
/// Common functions are always offered; version-specific ones only when the
/// version is known and matches.
pub fn available(version: Option<ODataVersion>) -> impl Iterator<Item = &'static FunctionSignature> {
    FUNCTIONS
        .iter()
        .filter(move |f| f.availability.allows(version))
}
