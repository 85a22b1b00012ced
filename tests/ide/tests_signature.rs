#![allow(clippy::unwrap_used)]

//! Signature help while typing function calls.

use odata::ide::signature_help;
use rstest::rstest;

const BASE: &str = "https://example.com/orders.svc/Orders?$filter=";

#[rstest]
#[case("startswith(", "startswith", 0)]
#[case("startswith(CustomerName, ", "startswith", 1)]
#[case("substring(CustomerName, 1, ", "substring", 2)]
#[case("substring(CustomerName, 1, 2, 3", "substring", 2)]
#[case("contains(tolower(CustomerName", "tolower", 0)]
#[case("contains('a,b', ", "contains", 1)]
#[case("OrderID eq 1 and year(", "year", 0)]
#[case("geo.distance(Location, ", "geo.distance", 1)]
fn test_active_parameter(#[case] typed: &str, #[case] function: &str, #[case] active: usize) {
    let text = format!("{BASE}{typed}");
    let help = signature_help(&text, text.len()).unwrap();
    assert!(help.label.starts_with(&format!("{function}(")), "{}", help.label);
    assert_eq!(help.active_parameter, active);
}

#[test]
fn test_parameters_match_label() {
    let text = format!("{BASE}substring(");
    let help = signature_help(&text, text.len()).unwrap();
    assert_eq!(
        help.parameters,
        vec!["text: Edm.String", "start: Edm.Int32", "length?: Edm.Int32"]
    );
    for parameter in &help.parameters {
        assert!(help.label.contains(parameter.as_str()));
    }
    assert!(!help.documentation.is_empty());
}

#[test]
fn test_cursor_inside_closed_call() {
    let text = format!("{BASE}endswith(CustomerName, 'x') eq true");
    let offset = text.find("'x'").unwrap();
    let help = signature_help(&text, offset).unwrap();
    assert!(help.label.starts_with("endswith("));
    assert_eq!(help.active_parameter, 1);
}

#[rstest]
#[case("https://example.com/orders.svc/Orders(")]
#[case("https://example.com/orders.svc/Orders?$expand=Items(")]
#[case("https://example.com/orders.svc/Orders?$filter=(OrderID eq 1")]
#[case("https://example.com/orders.svc/Orders?$filter=frobnicate(")]
#[case("https://example.com/orders.svc/Orders?$filter=length(CustomerName) gt ")]
fn test_no_signature(#[case] text: &str) {
    assert_eq!(signature_help(text, text.len()), None);
}
