//! Text scanning around an editor cursor.
//!
//! Completion and signature help run on text the user is still typing, so
//! they cannot rely on a successful parse. These helpers look backward from
//! the cursor instead. All offsets are byte offsets; the delimiters scanned
//! for are ASCII, so every boundary found is a char boundary.

use crate::parser::SystemQueryOption;

/// Check if a character can appear in an OData identifier.
#[inline]
pub fn is_word_character(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Clamp `offset` into `text` and back onto a char boundary.
pub fn clamp_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Start of the run of characters matching `pred` that ends at `offset`.
fn run_start(text: &str, offset: usize, pred: impl Fn(char) -> bool) -> usize {
    text[..offset]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| pred(c))
        .last()
        .map_or(offset, |(i, _)| i)
}

/// The word immediately before the cursor, including a leading `$`.
///
/// ```
/// use odata::ide::text_utils::word_before_cursor;
///
/// assert_eq!(word_before_cursor("Orders?$sel", 11), "$sel");
/// assert_eq!(word_before_cursor("Orders?$select=Na", 17), "Na");
/// assert_eq!(word_before_cursor("Orders?", 7), "");
/// ```
pub fn word_before_cursor(text: &str, offset: usize) -> &str {
    let offset = clamp_offset(text, offset);
    let start = run_start(text, offset, |c| is_word_character(c) || c == '$');
    &text[start..offset]
}

/// The property path being typed before the cursor, e.g. `Items/Na`.
pub fn path_before_cursor(text: &str, offset: usize) -> &str {
    let offset = clamp_offset(text, offset);
    let start = run_start(text, offset, |c| is_word_character(c) || c == '/' || c == '.');
    &text[start..offset]
}

/// The identifier that ends at `offset`, skipping whitespace before it.
pub fn identifier_before(text: &str, offset: usize) -> &str {
    let end = text[..offset].trim_end().len();
    let start = run_start(text, end, is_word_character);
    &text[start..end]
}

/// Byte offset of the first `?` outside a quoted string, if any.
pub fn query_start(text: &str) -> Option<usize> {
    let mut in_quote = false;
    text.bytes().position(|b| {
        if b == b'\'' {
            in_quote = !in_quote;
        }
        b == b'?' && !in_quote
    })
}

/// A system query option whose value the cursor is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSite {
    pub option: SystemQueryOption,
    /// Offset of the first byte after `=`.
    pub value_start: usize,
    /// Enclosing `$expand` item paths, outermost first, when the option is
    /// nested as in `$expand=Items($select=`.
    pub expand_scope: Vec<String>,
}

/// Find the system query option the cursor is in.
///
/// Scans backward from `offset`, skipping balanced parentheses and quoted
/// strings. A top-level `&` or `?` that does not introduce a `$name=`
/// option ends the search.
pub fn option_at_cursor(text: &str, offset: usize) -> Option<OptionSite> {
    let offset = clamp_offset(text, offset);
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut i = offset;

    while i > 0 {
        i -= 1;
        let b = bytes[i];
        if b == b'\'' {
            in_quote = !in_quote;
            continue;
        }
        if in_quote {
            continue;
        }
        match b {
            b')' => depth += 1,
            b'(' if depth > 0 => depth -= 1,
            b'(' | b';' | b'&' | b'?' if depth == 0 => {
                if let Some((option, value_start)) = option_name_at(text, i + 1, offset) {
                    let expand_scope = if b == b'(' {
                        expand_scope(text, i)
                    } else {
                        Vec::new()
                    };
                    return Some(OptionSite {
                        option,
                        value_start,
                        expand_scope,
                    });
                }
                if matches!(b, b'&' | b'?') {
                    return None;
                }
            }
            _ => {}
        }
    }
    None
}

/// `$name=` at the start of `text[start..end]`, ignoring leading whitespace.
fn option_name_at(text: &str, start: usize, end: usize) -> Option<(SystemQueryOption, usize)> {
    let segment = &text[start..end];
    let lead = segment.len() - segment.trim_start().len();
    let rest = &segment[lead..];
    if !rest.starts_with('$') {
        return None;
    }
    let eq = rest.find('=')?;
    let option = SystemQueryOption::from_name(rest[..eq].trim())?;
    Some((option, start + lead + eq + 1))
}

/// Expand item paths enclosing the `(` at `paren`.
fn expand_scope(text: &str, paren: usize) -> Vec<String> {
    let Some(outer) = option_at_cursor(text, paren) else {
        return Vec::new();
    };
    if outer.option != SystemQueryOption::Expand {
        return Vec::new();
    }

    let items = &text[outer.value_start..paren];
    let item_start = top_level_comma(items).map_or(0, |i| i + 1);
    let mut scope = outer.expand_scope;
    scope.push(items[item_start..].trim().to_string());
    scope
}

/// Position of the last `,` in `text` outside parentheses.
fn top_level_comma(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().rev() {
        match b {
            b')' => depth += 1,
            b'(' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Innermost `(` left open before the cursor, with the number of top-level
/// commas between it and the cursor.
pub fn open_call(text: &str, offset: usize) -> Option<(usize, usize)> {
    let offset = clamp_offset(text, offset);
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut commas = 0usize;
    let mut in_quote = false;
    let mut i = offset;

    while i > 0 {
        i -= 1;
        let b = bytes[i];
        if b == b'\'' {
            in_quote = !in_quote;
            continue;
        }
        if in_quote {
            continue;
        }
        match b {
            b')' => depth += 1,
            b'(' if depth > 0 => depth -= 1,
            b'(' => return Some((i, commas)),
            b',' if depth == 0 => commas += 1,
            b'&' | b'?' | b';' | b'=' if depth == 0 => return None,
            _ => {}
        }
    }
    None
}
