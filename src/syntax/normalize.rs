//! Multi-line request normalization
//!
//! Editors hold requests wrapped over several lines. [`combine_odata_url`]
//! folds such text into the single-line form a server (or a clipboard)
//! expects.

/// Characters after which a line break joins without a space.
const JOIN_AFTER: &[char] = &['/', '?', '&', '=', '(', ','];

/// Characters before which a line break joins without a space.
const JOIN_BEFORE: &[char] = &['/', '?', '&', ')', ','];

/// Fold a possibly multi-line request into one line.
///
/// Lines are trimmed and joined, directly where the join point is
/// structural and with a single space otherwise. Outside quoted literals,
/// whitespace runs collapse to one space and disappear next to `?` and `&`.
/// Applying the function twice yields the same text as applying it once.
pub fn combine_odata_url(text: &str) -> String {
    let mut joined = String::with_capacity(text.len());
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(prev) = joined.chars().last() {
            let direct = JOIN_AFTER.contains(&prev)
                || line.chars().next().is_some_and(|c| JOIN_BEFORE.contains(&c));
            if !direct {
                joined.push(' ');
            }
        }
        joined.push_str(line);
    }

    condense_whitespace(&joined).trim().to_string()
}

fn condense_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;
    // Last emitted char was an unquoted `?` or `&`.
    let mut after_separator = false;

    for c in text.chars() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        let separator = c == '?' || c == '&';
        if pending_space && !separator && !after_separator && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;

        out.push(c);
        after_separator = separator;
        if c == '\'' || c == '"' {
            quote = Some(c);
        }
    }

    out
}
