#![allow(clippy::unwrap_used)]

//! Rejected requests: each yields exactly one error whose span points at
//! the offending text.

use crate::helpers::url_corpus::{APPLY_URLS, LAMBDA_URLS};
use odata::parse;
use odata::parser::SyntaxError;
use rstest::rstest;

fn parse_err(url: &str) -> SyntaxError {
    match parse(url) {
        Ok(query) => panic!("expected {url:?} to fail, got {query:?}"),
        Err(err) => err,
    }
}

#[test]
fn test_apply_is_rejected_in_any_case() {
    for url in APPLY_URLS {
        let err = parse_err(url);
        assert!(
            err.message.contains("'$apply' (aggregation) is not supported"),
            "{url:?}: {}",
            err.message
        );
        assert!(err.span.text(url).eq_ignore_ascii_case("$apply"));
        assert!(err.expected.iter().any(|e| e == "$filter"));
    }
}

#[test]
fn test_lambda_operators_are_rejected() {
    for url in LAMBDA_URLS {
        let err = parse_err(url);
        assert!(err.message.contains("lambda operator"), "{url:?}: {}", err.message);
        let word = err.span.text(url);
        assert!(word == "any" || word == "all", "{url:?}: span covers {word:?}");
    }
}

#[rstest]
#[case("https://example.com/orders.svc/Orders?$top=1&$top=2", "$top")]
#[case("https://example.com/orders.svc/Orders?$top=1&$TOP=2", "$TOP")]
#[case("https://example.com/orders.svc/Orders?$expand=Items($top=1;$top=2)", "$top")]
fn test_duplicate_system_option(#[case] url: &str, #[case] offending: &str) {
    let err = parse_err(url);
    assert!(err.message.starts_with("duplicate system query option"));
    assert_eq!(err.span.text(url), offending);
    assert_eq!(err.span.start.offset, url.rfind(offending).unwrap());
}

#[rstest]
#[case("https://example.com/orders.svc/Orders?$top=-1", "-1")]
#[case("https://example.com/orders.svc/Orders?$count=yes", "yes")]
#[case("https://example.com/orders.svc/Orders?$inlinecount=some", "some")]
#[case("https://example.com/orders.svc/Orders?$filter=OrderID eq", "")]
#[case("https://example.com/orders.svc/Orders?$orderby=OrderDate desc desc", "desc")]
#[case("https://example.com/orders.svc/Orders?$filter=not", "not")]
#[case("https://example.com/orders.svc/Orders?$filter=OrderID eq not", "not")]
fn test_error_span_covers_offending_token(#[case] url: &str, #[case] offending: &str) {
    let err = parse_err(url);
    assert_eq!(err.span.text(url), offending, "message: {}", err.message);
}

#[test]
fn test_nested_option_not_allowed_in_expand() {
    let url = "https://example.com/orders.svc/Orders?$expand=Items($format=json)";
    let err = parse_err(url);
    assert!(err.message.contains("not allowed inside $expand"));
    assert_eq!(err.span.text(url), "$format");
}

#[test]
fn test_unclosed_key_predicate() {
    let url = "https://example.com/orders.svc/Orders(1/Items";
    let err = parse_err(url);
    assert_eq!(err.expected, vec![")".to_string()]);
    assert_eq!(err.span.text(url), "(");
}

#[test]
fn test_unknown_system_option_lists_alternatives() {
    let url = "https://example.com/orders.svc/Orders?$sleect=OrderID";
    let err = parse_err(url);
    assert_eq!(err.span.text(url), "$sleect");
    assert!(err.expected.iter().any(|e| e == "$select"));
}

#[test]
fn test_text_after_key_predicate() {
    let url = "https://example.com/orders.svc/Orders(1)x";
    let err = parse_err(url);
    assert_eq!(err.span.text(url), "x");
}
