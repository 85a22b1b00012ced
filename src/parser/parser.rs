//! Recursive descent parser for OData request URLs
//!
//! The URL skeleton (service root, resource path, the `?`/`&` option split)
//! is scanned directly over the text. Key predicates and option values are
//! tokenized with the logos lexer and parsed by [`ValueParser`].
//!
//! Whitespace, including line breaks, is insignificant around `/` between
//! path segments, before `?`, around `&` and inside values, so a formatted
//! multi-line request parses with spans that point into the editor text.

use rustc_hash::FxHashSet;
use text_size::{TextRange, TextSize};
use tracing::trace;

use super::ast::*;
use super::error::SyntaxError;
use super::functions;
use super::keywords::{self, SystemQueryOption};
use super::lexer::{Token, tokenize};
use super::syntax_kind::SyntaxKind;
use crate::base::{LineIndex, Span, constants::SYSTEM_SEGMENTS};

/// Outcome of parsing one request text
pub type ParseResult = Result<ParsedQuery, SyntaxError>;

/// Maximum number of segments in a `$filter`/`$orderby` property path.
const MAX_EXPRESSION_PATH: usize = 2;

/// Parser configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    /// Known service root (the active profile's base URL). When the text
    /// starts with it, it decides where the resource path begins.
    pub service_root: Option<String>,
}

impl ParseOptions {
    pub fn with_service_root(root: impl Into<String>) -> Self {
        Self {
            service_root: Some(root.into()),
        }
    }
}

/// Parse an OData request URL
pub fn parse(text: &str) -> ParseResult {
    parse_with(text, &ParseOptions::default())
}

/// Parse an OData request URL with explicit options
pub fn parse_with(text: &str, options: &ParseOptions) -> ParseResult {
    UrlParser::new(text, options).parse()
}

fn size(offset: usize) -> TextSize {
    TextSize::new(offset as u32)
}

/// A `/`-delimited path segment before classification
#[derive(Debug, Clone, Copy)]
struct RawSegment {
    /// Offset of the `/` preceding the segment
    slash_before: usize,
    start: usize,
    end: usize,
}

/// The URL-level scanner
struct UrlParser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    index: LineIndex,
    options: &'a ParseOptions,
}

impl<'a> UrlParser<'a> {
    fn new(text: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            index: LineIndex::new(text),
            options,
        }
    }

    // =========================================================================
    // Character inspection
    // =========================================================================

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        self.index.span(TextRange::new(size(start), size(end)))
    }

    /// Error spanning the character at the current position
    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        let len = self.text[self.pos..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        SyntaxError::new(message, self.span(self.pos, self.pos + len))
    }

    // =========================================================================
    // Request
    // =========================================================================

    fn parse(mut self) -> ParseResult {
        self.skip_ws();
        let root_start = self.pos;
        let authority_end = self.parse_scheme_and_authority()?;
        let (segments, trailing_slash) = self.scan_path()?;

        let split = self.split_service_root(root_start, authority_end, &segments, trailing_slash);
        let root_end = self.service_root_end(authority_end, &segments, split, trailing_slash);
        let service_root = ServiceRoot {
            value: self.text[root_start..root_end].to_string(),
            span: self.span(root_start, root_end),
        };

        let resource_path = self.build_resource_path(&segments[split..])?;

        self.skip_ws();
        let query_options = match self.peek() {
            None => Vec::new(),
            Some(b'?') => {
                self.pos += 1;
                self.parse_query_options()?
            }
            Some(_) => {
                return Err(self
                    .error_here("expected '?' or end of input")
                    .with_expected(["?"]));
            }
        };

        trace!(
            root = %service_root.value,
            segments = resource_path.as_ref().map_or(0, |p| p.segments.len()),
            options = query_options.len(),
            "parsed OData request"
        );

        Ok(ParsedQuery {
            service_root,
            resource_path,
            query_options,
        })
    }

    fn parse_scheme_and_authority(&mut self) -> Result<usize, SyntaxError> {
        let rest = &self.bytes[self.pos..];
        let scheme = ["https://", "http://"].into_iter().find(|scheme| {
            rest.len() >= scheme.len() && rest[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
        });
        let Some(scheme) = scheme else {
            return Err(self
                .error_here("expected service root URL")
                .with_expected(["http://", "https://"]));
        };
        self.pos += scheme.len();

        let host_start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, b'/' | b'?' | b'#' | b'&') || c.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        if self.pos == host_start {
            return Err(self.error_here("expected host name"));
        }
        Ok(self.pos)
    }

    /// Collect path segments; returns them plus the offset of a trailing `/`.
    fn scan_path(&mut self) -> Result<(Vec<RawSegment>, Option<usize>), SyntaxError> {
        let mut segments = Vec::new();
        let mut trailing_slash = None;

        loop {
            let mark = self.pos;
            self.skip_ws();
            if self.peek() != Some(b'/') {
                self.pos = mark;
                break;
            }
            let slash = self.pos;
            self.pos += 1;

            let after_slash = self.pos;
            self.skip_ws();
            match self.peek() {
                Some(b'/') => {
                    return Err(SyntaxError::new(
                        "empty path segment",
                        self.span(slash, slash + 1),
                    ));
                }
                Some(c) if !matches!(c, b'?' | b'#' | b'&') => {
                    let start = self.pos;
                    self.scan_segment()?;
                    segments.push(RawSegment {
                        slash_before: slash,
                        start,
                        end: self.pos,
                    });
                }
                _ => {
                    self.pos = after_slash;
                    trailing_slash = Some(slash);
                    break;
                }
            }
        }

        Ok((segments, trailing_slash))
    }

    /// Advance over one segment, keeping parenthesized arguments together.
    fn scan_segment(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut in_quote = false;
        let mut open_paren = start;

        while let Some(c) = self.peek() {
            if in_quote {
                if c == b'\'' {
                    in_quote = false;
                }
                self.pos += 1;
                continue;
            }
            match c {
                b'\'' => in_quote = true,
                b'(' => {
                    if depth == 0 {
                        open_paren = self.pos;
                    }
                    depth += 1;
                }
                b')' => {
                    if depth == 0 {
                        return Err(self.error_here("unexpected ')'"));
                    }
                    depth -= 1;
                }
                b'/' | b'?' | b'#' | b'&' if depth == 0 => break,
                c if c.is_ascii_whitespace() && depth == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }

        if in_quote {
            return Err(SyntaxError::new(
                "unterminated string literal",
                self.span(start, self.pos),
            )
            .with_expected(["'"]));
        }
        if depth > 0 {
            return Err(
                SyntaxError::new("unclosed '('", self.span(open_paren, open_paren + 1))
                    .with_expected([")"]),
            );
        }
        Ok(())
    }

    // =========================================================================
    // Service root / resource path boundary
    // =========================================================================

    /// Number of path segments that belong to the service root.
    fn split_service_root(
        &self,
        root_start: usize,
        authority_end: usize,
        segments: &[RawSegment],
        trailing_slash: Option<usize>,
    ) -> usize {
        if let Some(root) = self.options.service_root.as_deref()
            && let Some(split) = self.configured_split(root, root_start, authority_end, segments)
        {
            return split;
        }

        let segment_name = |s: &RawSegment| {
            let text = &self.text[s.start..s.end];
            text.split('(').next().unwrap_or(text)
        };

        if let Some(i) = segments.iter().rposition(|s| {
            let name = segment_name(s);
            name.len() == self.text[s.start..s.end].len()
                && name.to_ascii_lowercase().ends_with(".svc")
        }) {
            return i + 1;
        }

        if let Some(i) = segments.iter().position(|s| {
            let text = &self.text[s.start..s.end];
            text.contains('(') || text.starts_with('$')
        }) {
            return i;
        }

        match (segments.len(), trailing_slash) {
            (0, _) => 0,
            (n, Some(_)) => n,
            (n, None) => n - 1,
        }
    }

    fn configured_split(
        &self,
        root: &str,
        root_start: usize,
        authority_end: usize,
        segments: &[RawSegment],
    ) -> Option<usize> {
        let wanted = root.trim().trim_end_matches('/');
        let ends = std::iter::once(authority_end).chain(segments.iter().map(|s| s.end));
        for (split, end) in ends.enumerate() {
            let candidate: String = self.text[root_start..end]
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if candidate.eq_ignore_ascii_case(wanted) {
                return Some(split);
            }
        }
        None
    }

    /// End offset of the service root, including the `/` that follows it.
    fn service_root_end(
        &self,
        authority_end: usize,
        segments: &[RawSegment],
        split: usize,
        trailing_slash: Option<usize>,
    ) -> usize {
        let last_end = if split == 0 {
            authority_end
        } else {
            segments[split - 1].end
        };
        let next_slash = match segments.get(split) {
            Some(next) => Some(next.slash_before),
            None => trailing_slash,
        };
        next_slash.map(|slash| slash + 1).unwrap_or(last_end)
    }

    fn build_resource_path(
        &self,
        raw: &[RawSegment],
    ) -> Result<Option<ResourcePath>, SyntaxError> {
        let (Some(first), Some(last)) = (raw.first(), raw.last()) else {
            return Ok(None);
        };
        let segments = raw
            .iter()
            .map(|segment| self.parse_path_segment(segment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(ResourcePath {
            segments,
            span: self.span(first.start, last.end),
        }))
    }

    fn parse_path_segment(&self, raw: &RawSegment) -> Result<PathSegment, SyntaxError> {
        let text = &self.text[raw.start..raw.end];
        let name_end = text.find('(').map(|i| raw.start + i).unwrap_or(raw.end);
        let name_text = &self.text[raw.start..name_end];
        let name_span = self.span(raw.start, name_end);

        if name_text.is_empty() {
            return Err(SyntaxError::new("expected segment name", name_span));
        }

        let kind = if name_text.starts_with('$') {
            SegmentKind::from_system_segment(name_text).ok_or_else(|| {
                SyntaxError::new(
                    format!("unsupported path segment '{name_text}'"),
                    name_span,
                )
                .with_expected(SYSTEM_SEGMENTS.iter().copied())
            })?
        } else if is_identifier(name_text) {
            SegmentKind::Identifier
        } else {
            return Err(SyntaxError::new(
                format!("invalid resource path segment '{name_text}'"),
                name_span,
            ));
        };

        let arguments = if name_end < raw.end {
            if kind != SegmentKind::Identifier {
                return Err(SyntaxError::new(
                    format!("'{name_text}' does not take arguments"),
                    self.span(name_end, raw.end),
                ));
            }
            Some(self.parse_key_predicate(name_end, raw.end)?)
        } else {
            None
        };

        Ok(PathSegment {
            name: Ident {
                name: name_text.into(),
                span: name_span,
            },
            kind,
            arguments,
            span: self.span(raw.start, raw.end),
        })
    }

    /// `(...)` after a segment name; `open` is the offset of `(`.
    fn parse_key_predicate(&self, open: usize, end: usize) -> Result<KeyPredicate, SyntaxError> {
        let close = matching_paren(self.bytes, open).ok_or_else(|| {
            SyntaxError::new("unclosed '('", self.span(open, open + 1)).with_expected([")"])
        })?;
        if close + 1 != end {
            return Err(SyntaxError::new(
                "unexpected text after ')'",
                self.span(close + 1, end),
            ));
        }

        let inner_start = open + 1;
        let tokens = tokenize(&self.text[inner_start..close], size(inner_start));
        let mut parser = ValueParser::new(self.text, &tokens, &self.index, close);
        let values = parser.parse_key_values()?;
        parser.expect_end()?;

        Ok(KeyPredicate {
            values,
            span: self.span(open, close + 1),
        })
    }

    // =========================================================================
    // Query options
    // =========================================================================

    fn parse_query_options(&mut self) -> Result<Vec<QueryOption>, SyntaxError> {
        let mut options = Vec::new();
        let mut seen = FxHashSet::default();

        loop {
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(b'&') => self.pos += 1,
                Some(_) => options.push(self.parse_query_option(&mut seen)?),
            }
        }

        Ok(options)
    }

    fn parse_query_option(
        &mut self,
        seen: &mut FxHashSet<SystemQueryOption>,
    ) -> Result<QueryOption, SyntaxError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == b'=' || c == b'&' || c.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        let name_end = self.pos;
        if name_end == start {
            return Err(self.error_here("expected query option name"));
        }

        let name_text = &self.text[start..name_end];
        let name = Ident {
            name: name_text.into(),
            span: self.span(start, name_end),
        };

        let kind = if name_text.starts_with('$') {
            let option = system_option(name_text, name.span)?;
            if !seen.insert(option) {
                return Err(SyntaxError::new(
                    format!("duplicate system query option '{}'", option.name()),
                    name.span,
                ));
            }
            OptionKind::System(option)
        } else {
            OptionKind::Custom
        };

        self.skip_ws();
        if self.peek() != Some(b'=') {
            return match kind {
                OptionKind::System(option) => {
                    self.pos = name_end;
                    Err(SyntaxError::new(
                        format!("expected '=' after '{}'", option.name()),
                        self.span(name_end, name_end),
                    )
                    .with_expected(["="]))
                }
                OptionKind::Custom => {
                    self.pos = name_end;
                    Ok(QueryOption {
                        span: name.span,
                        name,
                        kind,
                        raw_value: String::new(),
                        value_span: self.span(name_end, name_end),
                        value: OptionValue::Custom(String::new()),
                    })
                }
            };
        }
        self.pos += 1;
        self.skip_ws();

        let value_start = self.pos;
        let quotes_literals = matches!(kind, OptionKind::System(option) if option.is_tokenized());
        let mut in_literal = false;
        while let Some(c) = self.peek() {
            match c {
                b'\'' if quotes_literals => in_literal = !in_literal,
                b'&' if !in_literal => break,
                _ => {}
            }
            self.pos += 1;
        }
        let mut value_end = self.pos;
        while value_end > value_start && self.bytes[value_end - 1].is_ascii_whitespace() {
            value_end -= 1;
        }

        let raw_value = &self.text[value_start..value_end];
        let value = match kind {
            OptionKind::System(option) => self.parse_system_value(option, value_start, value_end)?,
            OptionKind::Custom => OptionValue::Custom(raw_value.to_string()),
        };

        Ok(QueryOption {
            name,
            kind,
            raw_value: raw_value.to_string(),
            value_span: self.span(value_start, value_end),
            value,
            span: self.span(start, value_end),
        })
    }

    fn parse_system_value(
        &self,
        option: SystemQueryOption,
        start: usize,
        end: usize,
    ) -> Result<OptionValue, SyntaxError> {
        let raw = &self.text[start..end];
        let require_value = || {
            if raw.is_empty() {
                Err(SyntaxError::new(
                    format!("expected a value for '{}'", option.name()),
                    self.span(start, end),
                ))
            } else {
                Ok(raw.to_string())
            }
        };

        match option {
            SystemQueryOption::Search => Ok(OptionValue::Search(require_value()?)),
            SystemQueryOption::Format => Ok(OptionValue::Format(require_value()?)),
            SystemQueryOption::SkipToken => Ok(OptionValue::SkipToken(require_value()?)),
            _ => {
                let tokens = tokenize(raw, size(start));
                let mut parser = ValueParser::new(self.text, &tokens, &self.index, end);
                let value = parser.parse_system_value(option)?;
                parser.expect_end()?;
                Ok(value)
            }
        }
    }
}

fn system_option(name: &str, span: Span) -> Result<SystemQueryOption, SyntaxError> {
    SystemQueryOption::from_name(name).ok_or_else(|| {
        let message = if name.eq_ignore_ascii_case("$apply") {
            "'$apply' (aggregation) is not supported".to_string()
        } else {
            format!("unsupported system query option '{name}'")
        };
        SyntaxError::new(message, span)
            .with_expected(SystemQueryOption::ALL.iter().map(|o| o.name()))
    })
}

/// OData identifiers, optionally namespace-qualified with dots.
fn is_identifier(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

/// Offset of the `)` matching the `(` at `open`, skipping quoted text.
fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quote = false;
    for (i, &c) in bytes.iter().enumerate().skip(open) {
        match c {
            b'\'' => in_quote = !in_quote,
            b'(' if !in_quote => depth += 1,
            b')' if !in_quote => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

// =============================================================================
// VALUE PARSER
// =============================================================================

/// Parser over the tokens of one option value or key predicate
struct ValueParser<'p, 'a> {
    text: &'a str,
    tokens: &'p [Token<'a>],
    pos: usize,
    index: &'p LineIndex,
    /// Offset just past the region, used for errors at end of input
    end: usize,
}

impl<'p, 'a> ValueParser<'p, 'a> {
    fn new(text: &'a str, tokens: &'p [Token<'a>], index: &'p LineIndex, end: usize) -> Self {
        Self {
            text,
            tokens,
            pos: 0,
            index,
            end,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&'p Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn nth_kind(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.current()
            .is_some_and(|t| t.kind == SyntaxKind::IDENT && t.text == keyword)
    }

    fn at_any_keyword(&self, keywords: &[&str]) -> Option<&'a str> {
        self.current()
            .filter(|t| t.kind == SyntaxKind::IDENT && keywords.contains(&t.text))
            .map(|t| t.text)
    }

    fn current_start(&self) -> usize {
        self.current().map(Token::start).unwrap_or(self.end)
    }

    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(Token::end)
            .unwrap_or_else(|| self.current_start())
    }

    fn span(&self, start: usize, end: usize) -> Span {
        self.index.span(TextRange::new(size(start), size(end)))
    }

    fn span_from(&self, start: usize) -> Span {
        self.span(start, self.prev_end().max(start))
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) -> Option<&'p Token<'a>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> Result<&'p Token<'a>, SyntaxError> {
        match self.current() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self
                .error_at_current(format!("expected {}", kind.describe()))
                .with_expected([kind.describe()])),
        }
    }

    fn expect_end(&self) -> Result<(), SyntaxError> {
        match self.current() {
            None => Ok(()),
            Some(token) => Err(SyntaxError::new(
                format!("unexpected '{}'", token.text),
                self.index.span(token.range()),
            )),
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error_at_current(&self, message: impl Into<String>) -> SyntaxError {
        let span = match self.current() {
            Some(token) => self.index.span(token.range()),
            None => self.span(self.end, self.end),
        };
        SyntaxError::new(message, span)
    }

    // =========================================================================
    // Option values
    // =========================================================================

    fn parse_system_value(&mut self, option: SystemQueryOption) -> Result<OptionValue, SyntaxError> {
        if self.current().is_none() {
            return Err(self.error_at_current(format!("expected a value for '{}'", option.name())));
        }
        Ok(match option {
            SystemQueryOption::Select => OptionValue::Select(self.parse_comma_list(Self::parse_select_item)?),
            SystemQueryOption::Expand => OptionValue::Expand(self.parse_comma_list(Self::parse_expand_item)?),
            SystemQueryOption::Filter => OptionValue::Filter(self.parse_expr()?),
            SystemQueryOption::OrderBy => {
                OptionValue::OrderBy(self.parse_comma_list(Self::parse_orderby_item)?)
            }
            SystemQueryOption::Top => OptionValue::Top(self.parse_unsigned()?),
            SystemQueryOption::Skip => OptionValue::Skip(self.parse_unsigned()?),
            SystemQueryOption::Count => OptionValue::Count(self.parse_bool()?),
            SystemQueryOption::InlineCount => OptionValue::InlineCount(self.parse_inline_count()?),
            SystemQueryOption::Search => OptionValue::Search(self.parse_raw()),
            SystemQueryOption::Format => OptionValue::Format(self.parse_raw()),
            SystemQueryOption::SkipToken => OptionValue::SkipToken(self.parse_raw()),
        })
    }

    fn parse_comma_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<Vec<T>, SyntaxError> {
        let mut items = vec![item(self)?];
        while self.eat(SyntaxKind::COMMA) {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// All remaining tokens as verbatim text
    fn parse_raw(&mut self) -> String {
        let start = self.current_start();
        self.pos = self.tokens.len();
        let end = self.prev_end().max(start);
        self.text[start..end].to_string()
    }

    fn parse_unsigned(&mut self) -> Result<u64, SyntaxError> {
        let token = self.current();
        let value = token
            .filter(|t| t.kind == SyntaxKind::INTEGER)
            .and_then(|t| t.text.parse::<u64>().ok());
        match value {
            Some(value) => {
                self.pos += 1;
                Ok(value)
            }
            None => Err(self
                .error_at_current("expected a non-negative integer")
                .with_expected(["integer"])),
        }
    }

    fn parse_bool(&mut self) -> Result<bool, SyntaxError> {
        match self.at_any_keyword(&["true", "false"]) {
            Some(word) => {
                self.pos += 1;
                Ok(word == "true")
            }
            None => Err(self
                .error_at_current("expected 'true' or 'false'")
                .with_expected(["true", "false"])),
        }
    }

    fn parse_inline_count(&mut self) -> Result<InlineCount, SyntaxError> {
        match self.at_any_keyword(&["allpages", "none"]) {
            Some("allpages") => {
                self.pos += 1;
                Ok(InlineCount::AllPages)
            }
            Some(_) => {
                self.pos += 1;
                Ok(InlineCount::None)
            }
            None => Err(self
                .error_at_current("expected 'allpages' or 'none'")
                .with_expected(["allpages", "none"])),
        }
    }

    fn parse_select_item(&mut self) -> Result<SelectItem, SyntaxError> {
        if let Some(star) = self.current().filter(|t| t.kind == SyntaxKind::STAR) {
            self.pos += 1;
            return Ok(SelectItem::Star(self.index.span(star.range())));
        }
        if !self.at(SyntaxKind::IDENT) {
            return Err(self
                .error_at_current("expected property name or '*'")
                .with_expected(["property", "*"]));
        }
        Ok(SelectItem::Path(self.parse_property_path(None)?))
    }

    fn parse_expand_item(&mut self) -> Result<ExpandItem, SyntaxError> {
        let start = self.current_start();
        if !self.at(SyntaxKind::IDENT) {
            return Err(self
                .error_at_current("expected navigation property")
                .with_expected(["navigation property"]));
        }
        let path = self.parse_property_path(None)?;
        let options = if self.at(SyntaxKind::L_PAREN) {
            self.parse_nested_options()?
        } else {
            Vec::new()
        };
        Ok(ExpandItem {
            path,
            options,
            span: self.span_from(start),
        })
    }

    /// `($select=...;$top=...)` after an expanded navigation property
    fn parse_nested_options(&mut self) -> Result<Vec<QueryOption>, SyntaxError> {
        let open = self.expect(SyntaxKind::L_PAREN)?;
        let open_span = self.index.span(open.range());
        let mut options = Vec::new();
        let mut seen = FxHashSet::default();

        loop {
            let name_token = match self.current() {
                Some(token) if token.kind == SyntaxKind::SYSTEM_NAME => token,
                _ => {
                    return Err(self
                        .error_at_current("expected nested system query option")
                        .with_expected(
                            SystemQueryOption::ALL
                                .iter()
                                .filter(|o| o.allowed_in_expand())
                                .map(|o| o.name()),
                        ));
                }
            };
            let name_span = self.index.span(name_token.range());
            let option = system_option(name_token.text, name_span)?;
            if !option.allowed_in_expand() {
                return Err(SyntaxError::new(
                    format!("'{}' is not allowed inside $expand", option.name()),
                    name_span,
                ));
            }
            if !seen.insert(option) {
                return Err(SyntaxError::new(
                    format!("duplicate system query option '{}'", option.name()),
                    name_span,
                ));
            }
            self.pos += 1;
            self.expect(SyntaxKind::EQ)?;

            // The value runs to the next `;` or the closing `)` at depth 0.
            let value_start = self.pos;
            let mut depth = 0usize;
            let mut cursor = self.pos;
            while let Some(token) = self.tokens.get(cursor) {
                match token.kind {
                    SyntaxKind::L_PAREN => depth += 1,
                    SyntaxKind::R_PAREN if depth == 0 => break,
                    SyntaxKind::R_PAREN => depth -= 1,
                    SyntaxKind::SEMICOLON if depth == 0 => break,
                    _ => {}
                }
                cursor += 1;
            }
            if cursor >= self.tokens.len() {
                return Err(SyntaxError::new("unclosed '(' in $expand options", open_span)
                    .with_expected([")"]));
            }

            let value_tokens = &self.tokens[value_start..cursor];
            let (Some(first), Some(last)) = (value_tokens.first(), value_tokens.last()) else {
                self.pos = cursor;
                return Err(self.error_at_current(format!(
                    "expected a value for '{}'",
                    option.name()
                )));
            };
            let (value_start_offset, value_end_offset) = (first.start(), last.end());

            let mut nested = ValueParser::new(self.text, value_tokens, self.index, value_end_offset);
            let value = nested.parse_system_value(option)?;
            nested.expect_end()?;
            self.pos = cursor;

            options.push(QueryOption {
                name: Ident {
                    name: name_token.text.into(),
                    span: name_span,
                },
                kind: OptionKind::System(option),
                raw_value: self.text[value_start_offset..value_end_offset].to_string(),
                value_span: self.span(value_start_offset, value_end_offset),
                value,
                span: self.span(name_token.start(), value_end_offset),
            });

            if self.eat(SyntaxKind::SEMICOLON) {
                continue;
            }
            self.expect(SyntaxKind::R_PAREN)?;
            break;
        }

        Ok(options)
    }

    fn parse_orderby_item(&mut self) -> Result<OrderByItem, SyntaxError> {
        let start = self.current_start();
        let expr = self.parse_additive()?;
        let direction = match self.at_any_keyword(keywords::SORT_DIRECTIONS) {
            Some(word) => {
                self.pos += 1;
                if word == "desc" {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                }
            }
            None => SortDirection::Asc,
        };
        Ok(OrderByItem {
            expr,
            direction,
            span: self.span_from(start),
        })
    }

    fn parse_key_values(&mut self) -> Result<Vec<KeyValue>, SyntaxError> {
        if self.current().is_none() {
            return Ok(Vec::new());
        }
        self.parse_comma_list(|p| {
            let start = p.current_start();
            let name = if p.at(SyntaxKind::IDENT) && p.nth_kind(1) == Some(SyntaxKind::EQ) {
                let token = p.expect(SyntaxKind::IDENT)?;
                let name = Ident {
                    name: token.text.into(),
                    span: p.index.span(token.range()),
                };
                p.expect(SyntaxKind::EQ)?;
                Some(name)
            } else {
                None
            };
            let value = p.parse_literal()?;
            Ok(KeyValue {
                name,
                value,
                span: p.span_from(start),
            })
        })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_or()
    }

    fn binary(&self, op: BinaryOp, lhs: Expr, rhs: Expr, start: usize) -> Expr {
        Expr::Binary(BinaryExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span: self.span_from(start),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.current_start();
        let mut lhs = self.parse_and()?;
        while self.at_keyword("or") {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = self.binary(BinaryOp::Or, lhs, rhs, start);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.current_start();
        let mut lhs = self.parse_not()?;
        while self.at_keyword("and") {
            self.pos += 1;
            let rhs = self.parse_not()?;
            lhs = self.binary(BinaryOp::And, lhs, rhs, start);
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, SyntaxError> {
        if self.at_keyword("not") && self.nth_kind(1).is_some() {
            let start = self.current_start();
            self.pos += 1;
            let operand = self.parse_not()?;
            return Ok(Expr::Unary(UnaryExpr {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span: self.span_from(start),
            }));
        }
        self.parse_compare()
    }

    fn parse_compare(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.current_start();
        let lhs = self.parse_additive()?;
        if let Some(word) = self.at_any_keyword(keywords::COMPARISON_OPERATORS)
            && let Some(op) = BinaryOp::from_keyword(word)
        {
            self.pos += 1;
            let rhs = self.parse_additive()?;
            return Ok(self.binary(op, lhs, rhs, start));
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.current_start();
        let mut lhs = self.parse_multiplicative()?;
        while let Some(word) = self.at_any_keyword(&["add", "sub"]) {
            let op = if word == "add" { BinaryOp::Add } else { BinaryOp::Sub };
            self.pos += 1;
            let rhs = self.parse_multiplicative()?;
            lhs = self.binary(op, lhs, rhs, start);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.current_start();
        let mut lhs = self.parse_primary()?;
        while let Some(word) = self.at_any_keyword(&["mul", "div", "mod"]) {
            let op = match word {
                "mul" => BinaryOp::Mul,
                "div" => BinaryOp::Div,
                _ => BinaryOp::Mod,
            };
            self.pos += 1;
            let rhs = self.parse_primary()?;
            lhs = self.binary(op, lhs, rhs, start);
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let Some(token) = self.current() else {
            return Err(self
                .error_at_current("expected expression")
                .with_expected(["literal", "property", "function call", "("]));
        };

        match token.kind {
            SyntaxKind::L_PAREN => {
                self.pos += 1;
                let inner = self.parse_or()?;
                self.expect(SyntaxKind::R_PAREN)?;
                Ok(inner)
            }
            SyntaxKind::IDENT if matches!(token.text, "true" | "false" | "null") => {
                Ok(Expr::Literal(self.parse_literal()?))
            }
            SyntaxKind::IDENT if is_operator_keyword(token.text) => Err(self
                .error_at_current(format!("unexpected operator '{}'", token.text))
                .with_expected(["literal", "property", "function call", "("])),
            SyntaxKind::IDENT if self.nth_kind(1) == Some(SyntaxKind::L_PAREN) => {
                Ok(Expr::Call(self.parse_function_call()?))
            }
            SyntaxKind::IDENT => Ok(Expr::Property(
                self.parse_property_path(Some(MAX_EXPRESSION_PATH))?,
            )),
            kind if kind.is_literal() || kind == SyntaxKind::ALIAS => {
                Ok(Expr::Literal(self.parse_literal()?))
            }
            _ => Err(self
                .error_at_current(format!("unexpected '{}'", token.text))
                .with_expected(["literal", "property", "function call", "("])),
        }
    }

    fn parse_function_call(&mut self) -> Result<FunctionCall, SyntaxError> {
        let start = self.current_start();
        let name_token = self.expect(SyntaxKind::IDENT)?;
        let name_span = self.index.span(name_token.range());

        if keywords::is_lambda_operator(name_token.text) {
            return Err(lambda_error(name_token.text, name_span));
        }
        let Some(signature) = functions::lookup(name_token.text) else {
            return Err(SyntaxError::new(
                format!("unknown function '{}'", name_token.text),
                name_span,
            ));
        };

        self.expect(SyntaxKind::L_PAREN)?;
        let mut args = Vec::new();
        if !self.at(SyntaxKind::R_PAREN) {
            args = self.parse_comma_list(Self::parse_expr)?;
        }
        self.expect(SyntaxKind::R_PAREN)?;

        if !signature.accepts_arity(args.len()) {
            let expected = if signature.min_args == signature.max_args() {
                signature.min_args.to_string()
            } else {
                format!("{} to {}", signature.min_args, signature.max_args())
            };
            return Err(SyntaxError::new(
                format!(
                    "function '{}' expects {} argument(s), found {}",
                    signature.name,
                    expected,
                    args.len()
                ),
                self.span_from(start),
            ));
        }

        Ok(FunctionCall {
            name: Ident {
                name: name_token.text.into(),
                span: name_span,
            },
            args,
            span: self.span_from(start),
        })
    }

    /// `Name` or `Nav/Name`; `max_segments` limits navigation depth.
    fn parse_property_path(&mut self, max_segments: Option<usize>) -> Result<PropertyPath, SyntaxError> {
        let start = self.current_start();
        let first = self.expect(SyntaxKind::IDENT)?;
        let mut segments = vec![Ident {
            name: first.text.into(),
            span: self.index.span(first.range()),
        }];

        while self.at(SyntaxKind::SLASH) {
            self.pos += 1;
            let token = self.expect(SyntaxKind::IDENT)?;
            let span = self.index.span(token.range());
            if keywords::is_lambda_operator(token.text) && self.at(SyntaxKind::L_PAREN) {
                return Err(lambda_error(token.text, span));
            }
            segments.push(Ident {
                name: token.text.into(),
                span,
            });
            if let Some(max) = max_segments
                && segments.len() > max
            {
                return Err(SyntaxError::new(
                    "property paths support at most one navigation step",
                    self.span_from(start),
                ));
            }
        }

        Ok(PropertyPath {
            segments,
            span: self.span_from(start),
        })
    }

    fn parse_literal(&mut self) -> Result<Literal, SyntaxError> {
        let Some(token) = self.current() else {
            return Err(self.error_at_current("expected literal").with_expected(["literal"]));
        };
        let kind = match token.kind {
            SyntaxKind::STRING => LiteralKind::String,
            SyntaxKind::INTEGER => LiteralKind::Integer,
            SyntaxKind::DECIMAL => LiteralKind::Decimal,
            SyntaxKind::TYPED_STRING => LiteralKind::Typed,
            SyntaxKind::DATE => LiteralKind::Date,
            SyntaxKind::DATE_TIME_OFFSET => LiteralKind::DateTimeOffset,
            SyntaxKind::GUID => LiteralKind::Guid,
            SyntaxKind::ALIAS => LiteralKind::Alias,
            SyntaxKind::IDENT if matches!(token.text, "true" | "false") => LiteralKind::Boolean,
            SyntaxKind::IDENT if token.text == "null" => LiteralKind::Null,
            _ => {
                return Err(self
                    .error_at_current(format!("expected literal, found '{}'", token.text))
                    .with_expected(["literal"]));
            }
        };
        self.bump();
        Ok(Literal {
            kind,
            text: token.text.into(),
            span: self.index.span(token.range()),
        })
    }
}

/// Operator words cannot stand alone as an operand.
fn is_operator_keyword(word: &str) -> bool {
    keywords::COMPARISON_OPERATORS.contains(&word)
        || keywords::ARITHMETIC_OPERATORS.contains(&word)
        || keywords::LOGICAL_OPERATORS.contains(&word)
}

fn lambda_error(operator: &str, span: Span) -> SyntaxError {
    SyntaxError::new(
        format!("lambda operator '{operator}' is not supported"),
        span,
    )
}
