//! Layout settings for formatted requests

use serde::{Deserialize, Serialize};

/// How deep-indented lines of a formatted request are written.
///
/// Deserializes from editor settings; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatOptions {
    /// Columns per depth level. Ignored for tabs.
    pub tab_size: usize,
    pub insert_spaces: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
        }
    }
}

impl FormatOptions {
    /// One tab per depth level.
    pub fn tabs() -> Self {
        Self {
            insert_spaces: false,
            ..Self::default()
        }
    }

    /// Leading whitespace for a line at `depth`.
    pub fn indent(&self, depth: usize) -> String {
        match self.insert_spaces {
            true => " ".repeat(self.tab_size * depth),
            false => "\t".repeat(depth),
        }
    }
}
