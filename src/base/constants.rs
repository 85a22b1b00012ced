//! Domain constants shared across the crate.

/// Quiescence window before a text change triggers a parse + analyze pass.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// EDMX envelope namespace for legacy (`Version="1.0"`) documents.
pub const EDMX_NS_LEGACY: &str = "http://schemas.microsoft.com/ado/2007/06/edmx";

/// EDMX envelope namespace for modern (`Version="4.0"`) documents.
pub const EDMX_NS_MODERN: &str = "http://docs.oasis-open.org/odata/ns/edmx";

/// Data services metadata namespace used by legacy annotations (`m:` prefix).
pub const DATASERVICES_METADATA_NS: &str =
    "http://schemas.microsoft.com/ado/2007/08/dataservices/metadata";

/// The namespace reserved for the `xml:` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Path segments with built-in meaning in a resource path.
pub const SYSTEM_SEGMENTS: &[&str] = &["$count", "$value", "$ref", "$metadata", "$batch"];

/// Values accepted by completion for `$format`.
pub const FORMAT_VALUES: &[&str] = &["json", "xml", "atom"];
