#![allow(clippy::unwrap_used)]

//! Warnings produced by checking requests against the order fixtures.

use crate::helpers::fixtures::{CATALOG_V4, ORDERS_V2, ORDERS_V4};
use crate::helpers::{model, parsed};
use odata::semantic::{Diagnostic, Severity, analyze, codes};
use rstest::rstest;

fn check(xml: &str, url: &str) -> Vec<Diagnostic> {
    let model = model(xml);
    analyze(&parsed(url), Some(&model), Some("orders"))
}

#[rstest]
#[case(ORDERS_V4)]
#[case(ORDERS_V2)]
fn test_valid_select_has_no_warnings(#[case] xml: &str) {
    let diagnostics = check(xml, "https://example.com/orders.svc/Orders?$select=OrderID,OrderDate");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[rstest]
#[case(ORDERS_V4)]
#[case(ORDERS_V2)]
fn test_unknown_entity_set(#[case] xml: &str) {
    let url = "https://example.com/orders.svc/NonExistants?$select=OrderID";
    let diagnostics = check(xml, url);
    assert_eq!(diagnostics.len(), 1);

    let warning = &diagnostics[0];
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.code.as_deref(), Some(codes::UNRESOLVED_RESOURCE));
    assert_eq!(warning.span.text(url), "NonExistants");
    assert!(warning.message.contains("'NonExistants'"));
    assert!(warning.message.contains("profile 'orders'"));
}

#[rstest]
#[case(ORDERS_V4)]
#[case(ORDERS_V2)]
fn test_unknown_expand_target(#[case] xml: &str) {
    let url = "https://example.com/orders.svc/Orders?$expand=NonExistantProperty";
    let diagnostics = check(xml, url);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::UNKNOWN_NAVIGATION));
    assert!(diagnostics[0].message.contains("NonExistantProperty"));
    assert_eq!(diagnostics[0].span.text(url), "NonExistantProperty");
}

#[test]
fn test_expanding_a_structural_property_warns() {
    let diagnostics = check(ORDERS_V4, "https://example.com/orders.svc/Orders?$expand=CustomerName");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("navigation"));
}

#[test]
fn test_navigation_chain_in_path() {
    let url = "https://example.com/orders.svc/Orders(1)/Items?$select=Quantity,Price&$orderby=Price desc";
    assert!(check(ORDERS_V4, url).is_empty());

    let url = "https://example.com/orders.svc/Orders(1)/Lines";
    let diagnostics = check(ORDERS_V4, url);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].span.text(url), "Lines");
    assert!(diagnostics[0].message.contains("Example.Orders.Order"));
}

#[test]
fn test_filter_and_orderby_paths() {
    let url = "https://example.com/orders.svc/Orders?$filter=Total gt 10 and startswith(CustomerName,'A')&$orderby=Placed";
    let diagnostics = check(ORDERS_V4, url);
    let names: Vec<_> = diagnostics.iter().map(|d| d.span.text(url)).collect();
    assert_eq!(names, vec!["Total", "Placed"]);
    assert!(
        diagnostics
            .iter()
            .all(|d| d.code.as_deref() == Some(codes::UNKNOWN_PROPERTY))
    );
}

#[test]
fn test_nested_expand_options_are_checked_on_target() {
    let url = "https://example.com/orders.svc/Orders?$expand=Items($select=Quantity,OrderDate)";
    let diagnostics = check(ORDERS_V4, url);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].span.text(url), "OrderDate");
    assert!(diagnostics[0].message.contains("Example.Orders.Item"));
}

#[test]
fn test_inherited_and_complex_members_resolve() {
    let url = "https://example.com/catalog.svc/Suppliers?$select=ID,Rating,Address/City&$expand=Products";
    assert!(check(CATALOG_V4, url).is_empty());
    let url = "https://example.com/catalog.svc/FeaturedSupplier/Products?$select=SKU";
    assert!(check(CATALOG_V4, url).is_empty());
}

#[test]
fn test_function_import_result_type() {
    let url = "https://example.com/orders.svc/TopOrders?$select=CustomerName,Bogus";
    let diagnostics = check(ORDERS_V4, url);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].span.text(url), "Bogus");
}

#[test]
fn test_without_profile_name() {
    let model = model(ORDERS_V4);
    let diagnostics = analyze(&parsed("https://example.com/orders.svc/Nope"), Some(&model), None);
    assert!(diagnostics[0].message.contains("the current metadata"));
}
