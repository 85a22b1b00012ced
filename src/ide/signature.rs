//! Signature help for canonical function calls.

use serde::{Deserialize, Serialize};

use super::text_utils::{clamp_offset, identifier_before, open_call};
use crate::parser::functions;

/// The function call surrounding the cursor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHelp {
    /// Rendered signature, e.g. `substring(text: Edm.String, ...) -> Edm.String`.
    pub label: String,
    pub documentation: String,
    /// One label per parameter, as rendered in `label`.
    pub parameters: Vec<String>,
    /// Zero-based index of the argument being typed, clamped to the last
    /// parameter.
    pub active_parameter: usize,
}

/// Signature help at a byte offset.
///
/// Works on incomplete text: the enclosing call is found by scanning
/// backward for the unmatched `(`. Key predicates and `$expand` option
/// lists are not calls and yield `None`.
pub fn signature_help(text: &str, offset: usize) -> Option<SignatureHelp> {
    let offset = clamp_offset(text, offset);
    let (paren, commas) = open_call(text, offset)?;
    let function = functions::lookup(identifier_with_namespace(text, paren))?;

    let parameters = function.parameter_labels();
    let active_parameter = commas.min(parameters.len().saturating_sub(1));

    Some(SignatureHelp {
        label: function.label(),
        documentation: function.documentation.to_string(),
        parameters,
        active_parameter,
    })
}

/// The name before `(`, keeping a `geo.` style prefix.
fn identifier_with_namespace(text: &str, paren: usize) -> &str {
    let name = identifier_before(text, paren);
    let name_start = paren - (text[..paren].len() - text[..paren].trim_end().len()) - name.len();
    match text[..name_start].strip_suffix('.') {
        Some(head) => {
            let prefix = identifier_before(head, head.len());
            &text[name_start - 1 - prefix.len()..name_start + name.len()]
        }
        None => name,
    }
}
