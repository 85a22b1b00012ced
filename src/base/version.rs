//! Protocol versions and version-gated availability.

use serde::{Deserialize, Serialize};

/// OData protocol generation a metadata document was written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ODataVersion {
    /// EDMX `Version="1.0"` documents (OData V2/V3 services).
    V2,
    /// EDMX `Version="4.0"` documents.
    V4,
}

impl ODataVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ODataVersion::V2 => "V2",
            ODataVersion::V4 => "V4",
        }
    }
}

/// Which protocol versions a function or query option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    Common,
    V2Only,
    V4Only,
}

impl Availability {
    /// Strict check: with no known version only `Common` items qualify.
    pub fn allows(self, version: Option<ODataVersion>) -> bool {
        matches!(
            (self, version),
            (Availability::Common, _)
                | (Availability::V2Only, Some(ODataVersion::V2))
                | (Availability::V4Only, Some(ODataVersion::V4))
        )
    }

    /// Lenient check: with no known version everything qualifies.
    pub fn allows_lenient(self, version: Option<ODataVersion>) -> bool {
        version.is_none() || self.allows(version)
    }
}
